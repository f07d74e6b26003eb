//! Length-prefixed framing for the TCP control channel.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────┐
//! │ Len (4, BE)  │   Len bytes of ciphered payload  │
//! └──────────────┴──────────────────────────────────┘
//! ```
//!
//! The protocol itself puts no bound on `Len`; readers here reject anything
//! above a configurable maximum before allocating.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Error;

/// Size of the big-endian length prefix.
pub const HEADER_SIZE: usize = 4;

/// Default maximum accepted payload length (1 MiB).
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Prepends the 4-byte big-endian length of `payload`.
///
/// Fails only if the payload does not fit a `u32` length.
///
/// # Example
///
/// ```
/// use hs100_core::framing::encode_frame;
///
/// let frame = encode_frame(b"abc").unwrap();
/// assert_eq!(frame, vec![0, 0, 0, 3, b'a', b'b', b'c']);
/// ```
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, Error> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        Error::Frame(format!(
            "payload of {} bytes exceeds the 32-bit length prefix",
            payload.len()
        ))
    })?;

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Decodes one frame from an in-memory buffer.
///
/// Bytes after the declared payload are ignored.
pub fn decode_frame(bytes: &[u8], max_len: usize) -> Result<Vec<u8>, Error> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::Frame(format!(
            "incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let len = payload_len([bytes[0], bytes[1], bytes[2], bytes[3]], max_len)?;
    let body = &bytes[HEADER_SIZE..];
    if body.len() < len {
        return Err(Error::Frame(format!(
            "incomplete payload: expected {} bytes, got {}",
            len,
            body.len()
        )));
    }

    Ok(body[..len].to_vec())
}

/// Reads exactly one frame from `reader`.
///
/// Fails with [`Error::Frame`] if the source closes before the header or the
/// declared payload is complete, or if the declared length exceeds `max_len`.
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> Result<Vec<u8>, Error>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; HEADER_SIZE];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| truncated("header", e))?;

    let len = payload_len(len_buf, max_len)?;

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| truncated("payload", e))?;

    Ok(payload)
}

fn payload_len(header: [u8; HEADER_SIZE], max_len: usize) -> Result<usize, Error> {
    let len = u32::from_be_bytes(header) as usize;
    if len > max_len {
        return Err(Error::Frame(format!(
            "declared length {} exceeds maximum {}",
            len, max_len
        )));
    }
    Ok(len)
}

fn truncated(part: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::Frame(format!("connection closed before frame {} was complete", part))
    } else {
        Error::IoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_has_length_header() {
        let frame = encode_frame(b"test").unwrap();
        let len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        assert_eq!(len as usize, 4);
        assert_eq!(&frame[HEADER_SIZE..], b"test");
    }

    #[test]
    fn test_roundtrip_sizes() {
        for size in [0usize, 1, 37, 64 * 1024] {
            let payload: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
            let frame = encode_frame(&payload).unwrap();
            assert_eq!(frame.len(), HEADER_SIZE + size);
            assert_eq!(decode_frame(&frame, MAX_FRAME_LEN).unwrap(), payload);
        }
    }

    #[test]
    fn test_decode_short_header() {
        let err = decode_frame(&[0, 0, 1], MAX_FRAME_LEN).unwrap_err();
        assert!(matches!(err, Error::Frame(_)));
    }

    #[test]
    fn test_decode_declared_length_unmet() {
        let mut frame = encode_frame(b"hello").unwrap();
        frame.truncate(frame.len() - 2);
        let err = decode_frame(&frame, MAX_FRAME_LEN).unwrap_err();
        assert!(matches!(err, Error::Frame(_)));
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let frame = [0xff, 0xff, 0xff, 0xff];
        let err = decode_frame(&frame, MAX_FRAME_LEN).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[tokio::test]
    async fn test_read_frame_from_stream() {
        let mut bytes = encode_frame(b"payload").unwrap();
        bytes.extend_from_slice(b"trailing");
        let mut reader = bytes.as_slice();
        let payload = read_frame(&mut reader, MAX_FRAME_LEN).await.unwrap();
        assert_eq!(payload, b"payload");
        assert_eq!(reader, b"trailing");
    }

    #[tokio::test]
    async fn test_read_frame_source_closes_early() {
        let frame = encode_frame(b"payload").unwrap();
        let mut reader = &frame[..6];
        let err = read_frame(&mut reader, MAX_FRAME_LEN).await.unwrap_err();
        assert!(matches!(err, Error::Frame(_)));
    }

    #[tokio::test]
    async fn test_read_frame_rejects_oversized_before_reading() {
        let header = 10u32.to_be_bytes();
        let mut reader = &header[..];
        let err = read_frame(&mut reader, 8).await.unwrap_err();
        assert!(matches!(err, Error::Frame(_)));
    }
}
