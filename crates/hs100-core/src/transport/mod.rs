//! Transport layer for communicating with HS100-family devices.
//!
//! - [`TcpTransport`]: XOR-ciphered, length-prefixed TCP on port 9999
//!
//! The [`Transport`] trait is what the dispatcher and the per-feature calls
//! in [`crate::device`] run on.

pub mod tcp;

pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;

use crate::{error::Error, framing::MAX_FRAME_LEN};

/// Default timeout for transport operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for reaching a device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// The device hostname or IP address.
    pub host: String,
    /// Control port.
    pub port: u16,
    /// Bound applied separately to connect, write and read.
    pub timeout: Duration,
    /// Largest reply payload accepted from the device.
    pub max_frame_len: usize,
}

impl DeviceConfig {
    /// Creates a configuration with the default port, timeout and frame limit.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: tcp::DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            max_frame_len: MAX_FRAME_LEN,
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum accepted reply length.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }
}

/// Trait for device transport protocols.
///
/// Implementations carry one command document to the device and return the
/// reply document text. They keep no per-call state, so `send` takes
/// `&self` and may be called concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a JSON command to the device and returns the response text.
    async fn send(&self, command: &str) -> Result<String, Error>;

    /// Returns the device host.
    fn host(&self) -> &str;

    /// Returns the device port.
    fn port(&self) -> u16;
}
