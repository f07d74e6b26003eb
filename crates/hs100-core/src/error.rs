//! Error types for hs100-core.
//!
//! Every failing call reports the phase that failed: connecting, framing,
//! decoding, or a rejection by the device itself.

use thiserror::Error;

/// Error type for hs100-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connect, write or read did not finish within the call timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// I/O error while writing the request or reading the reply.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Malformed frame (truncated payload or oversized length prefix).
    #[error("frame error: {0}")]
    Frame(String),

    /// Reply text is not a well-formed document.
    #[error("parse error: {0}")]
    ParseError(String),

    /// The reply is well-formed but lacks the requested module/action leaf.
    #[error("response has no {module}.{action} entry")]
    MissingLeaf {
        /// Module name, e.g. `system`.
        module: String,
        /// Action name, e.g. `set_relay_state`.
        action: String,
    },

    /// The device answered with a nonzero `err_code`.
    #[error("device error {code}: {}", message.as_deref().unwrap_or("no message"))]
    DeviceError {
        /// The device's own status code.
        code: i64,
        /// Optional `err_msg` sent alongside the code.
        message: Option<String>,
    },

    /// Command arguments could not be rendered as a document.
    #[error("encode error: {0}")]
    Encode(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect, write, read or timeout failure.
    Transport,
    /// Corrupted or incompatible peer: bad frame, bad document, missing leaf.
    Protocol,
    /// The device rejected the action.
    Device,
}

impl Error {
    /// Returns which part of the call failed.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConnectionFailed(_) | Error::Timeout(_) | Error::IoError(_) => {
                ErrorKind::Transport
            }
            Error::Frame(_)
            | Error::ParseError(_)
            | Error::MissingLeaf { .. }
            | Error::Encode(_) => ErrorKind::Protocol,
            Error::DeviceError { .. } => ErrorKind::Device,
        }
    }

    pub(crate) fn missing_leaf(module: &str, action: &str) -> Self {
        Error::MissingLeaf {
            module: module.to_string(),
            action: action.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::Timeout("read".into()).kind(), ErrorKind::Transport);
        assert_eq!(Error::Frame("short".into()).kind(), ErrorKind::Protocol);
        assert_eq!(
            Error::missing_leaf("system", "reboot").kind(),
            ErrorKind::Protocol
        );
        let device = Error::DeviceError {
            code: -3,
            message: None,
        };
        assert_eq!(device.kind(), ErrorKind::Device);
    }

    #[test]
    fn test_device_error_display() {
        let err = Error::DeviceError {
            code: 1,
            message: Some("bad credentials".into()),
        };
        assert_eq!(err.to_string(), "device error 1: bad credentials");

        let err = Error::DeviceError {
            code: -2,
            message: None,
        };
        assert_eq!(err.to_string(), "device error -2: no message");
    }

    #[test]
    fn test_missing_leaf_display() {
        let err = Error::missing_leaf("time", "get_timezone");
        assert_eq!(err.to_string(), "response has no time.get_timezone entry");
    }
}
