//! TCP transport for the HS100 control protocol.
//!
//! One call is one connection:
//! - connect to the device's control port (9999)
//! - write one frame holding the ciphered request
//! - read one frame holding the ciphered reply
//! - close
//!
//! Connect, write and read are each bounded by the configured timeout. The
//! stream is owned by the call and dropped on every exit path.

use std::time::Duration;

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, net::TcpStream, time::timeout};
use tracing::debug;

use crate::{
    crypto::xor::{decrypt, encrypt},
    error::Error,
    framing::{MAX_FRAME_LEN, encode_frame, read_frame},
    transport::{DeviceConfig, Transport},
};

/// Default control port of HS100-family devices.
pub const DEFAULT_PORT: u16 = 9999;

/// Transport that performs one TCP round trip per command.
///
/// The transport holds only addressing and limits; it keeps no connection
/// between calls, so a single value may be shared by concurrent callers.
///
/// # Example
///
/// ```no_run
/// use hs100_core::transport::{TcpTransport, Transport};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let transport = TcpTransport::new("192.168.1.100", 9999, Duration::from_secs(10));
///     let response = transport.send(r#"{"system":{"get_sysinfo":{}}}"#).await?;
///     println!("{}", response);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TcpTransport {
    host: String,
    port: u16,
    timeout: Duration,
    max_frame_len: usize,
}

impl TcpTransport {
    /// Creates a new TCP transport.
    ///
    /// # Arguments
    ///
    /// * `host` - Device hostname or IP address
    /// * `port` - TCP port (typically 9999)
    /// * `timeout` - Bound applied separately to connect, write and read
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            max_frame_len: MAX_FRAME_LEN,
        }
    }

    /// Creates a transport from a [`DeviceConfig`].
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            timeout: config.timeout,
            max_frame_len: config.max_frame_len,
        }
    }

    /// Returns the I/O timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends one plaintext payload and returns the deciphered reply payload.
    pub async fn round_trip(&self, request: &[u8]) -> Result<Vec<u8>, Error> {
        let addr = format!("{}:{}", self.host, self.port);
        debug!(addr = %addr, "connecting");

        let mut stream = timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| Error::Timeout(format!("connect to {} timed out", addr)))?
            .map_err(|e| Error::ConnectionFailed(format!("{}: {}", addr, e)))?;

        debug!(addr = %addr, "connected");

        let frame = encode_frame(&encrypt(request))?;
        debug!(bytes = frame.len(), "sending request");

        timeout(self.timeout, stream.write_all(&frame))
            .await
            .map_err(|_| Error::Timeout("write timed out".into()))?
            .map_err(|e| Error::IoError(format!("short write: {}", e)))?;

        let payload = timeout(self.timeout, read_frame(&mut stream, self.max_frame_len))
            .await
            .map_err(|_| Error::Timeout("read timed out".into()))??;

        debug!(payload_bytes = payload.len(), "received response");

        // Best effort; the stream is closed on drop either way.
        let _ = stream.shutdown().await;

        Ok(decrypt(&payload))
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, command: &str) -> Result<String, Error> {
        let reply = self.round_trip(command.as_bytes()).await?;
        String::from_utf8(reply)
            .map_err(|e| Error::ParseError(format!("reply is not valid UTF-8: {}", e)))
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use tokio::{io::AsyncReadExt, net::TcpListener};

    use super::*;

    /// Accepts one connection, checks the request, and answers with `reply`.
    async fn serve_once(reply: Vec<u8>) -> (u16, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_frame(&mut socket, MAX_FRAME_LEN).await.unwrap();
            socket.write_all(&reply).await.unwrap();
            decrypt(&request)
        });
        (port, handle)
    }

    #[tokio::test]
    async fn test_round_trip() {
        let reply = br#"{"system":{"set_relay_state":{"err_code":0}}}"#;
        let (port, server) = serve_once(encode_frame(&encrypt(reply)).unwrap()).await;

        let transport = TcpTransport::new("127.0.0.1", port, Duration::from_secs(2));
        let response = transport
            .send(r#"{"system":{"set_relay_state":{"state":1}}}"#)
            .await
            .unwrap();

        assert_eq!(response.as_bytes(), reply);
        let seen = server.await.unwrap();
        assert_eq!(seen, br#"{"system":{"set_relay_state":{"state":1}}}"#);
    }

    #[tokio::test]
    async fn test_truncated_reply_is_frame_error() {
        let mut frame = encode_frame(&encrypt(b"{\"a\":1}")).unwrap();
        frame.truncate(frame.len() - 3);
        let (port, _server) = serve_once(frame).await;

        let transport = TcpTransport::new("127.0.0.1", port, Duration::from_secs(2));
        let err = transport.send("{}").await.unwrap_err();
        assert!(matches!(err, Error::Frame(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_non_utf8_reply_is_parse_error() {
        let (port, _server) = serve_once(encode_frame(&encrypt(&[0xff, 0xfe, 0x80])).unwrap()).await;

        let transport = TcpTransport::new("127.0.0.1", port, Duration::from_secs(2));
        let err = transport.send("{}").await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_oversized_reply_rejected() {
        let (port, _server) = serve_once(vec![0x7f, 0xff, 0xff, 0xff]).await;

        let config = DeviceConfig::new("127.0.0.1")
            .with_port(port)
            .with_timeout(Duration::from_secs(2))
            .with_max_frame_len(1024);
        let transport = TcpTransport::from_config(&config);
        let err = transport.send("{}").await.unwrap_err();
        assert!(matches!(err, Error::Frame(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut sink = Vec::new();
            // Hold the connection open without answering.
            let _ = socket.read_to_end(&mut sink).await;
        });

        let transport = TcpTransport::new("127.0.0.1", port, Duration::from_millis(200));
        let err = transport.send("{}").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "got {:?}", err);
        server.abort();
    }

    #[tokio::test]
    async fn test_unreachable_is_connection_failed() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let transport = TcpTransport::new("127.0.0.1", port, Duration::from_secs(2));
        let err = transport.send("{}").await.unwrap_err();
        assert!(matches!(err, Error::ConnectionFailed(_)), "got {:?}", err);
    }
}
