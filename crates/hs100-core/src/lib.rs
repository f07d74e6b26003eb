//! Core library for controlling TP-Link HS100-family smart plugs.
//!
//! This crate implements the plug's local control protocol: JSON command
//! documents, obscured with an XOR autokey cipher, carried in length-prefixed
//! frames over a short-lived TCP connection.
//!
//! # Overview
//!
//! Plugs listen on TCP port 9999. Every call opens a connection, writes one
//! frame, reads one frame and closes. A frame is a 4-byte big-endian length
//! followed by the ciphered document; the cipher starts from the key 171 in
//! both directions.
//!
//! # Example
//!
//! ```no_run
//! use hs100_core::{execute, DEFAULT_TIMEOUT};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hs100_core::Error> {
//!     let doc = execute(
//!         "192.168.1.100",
//!         "system",
//!         "set_relay_state",
//!         json!({"state": 1}),
//!         DEFAULT_TIMEOUT,
//!     )
//!     .await?;
//!
//!     doc.check("system", "set_relay_state")?;
//!     Ok(())
//! }
//! ```
//!
//! Most callers will prefer the typed calls on [`DeviceExt`]:
//!
//! ```no_run
//! use hs100_core::{DeviceExt, TcpTransport, DEFAULT_PORT, DEFAULT_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hs100_core::Error> {
//!     let plug = TcpTransport::new("192.168.1.100", DEFAULT_PORT, DEFAULT_TIMEOUT);
//!     let info = plug.get_sysinfo().await?;
//!     println!("{} is {}", info.alias, if info.is_on() { "on" } else { "off" });
//!     Ok(())
//! }
//! ```
//!
//! # Protocol Details
//!
//! 1. Commands are JSON documents (e.g., `{"system":{"get_sysinfo":{}}}`)
//! 2. The text is ciphered with the XOR autokey cipher, initial key 171
//! 3. A 4-byte big-endian length prefix is prepended
//! 4. The frame is sent over TCP to port 9999
//! 5. The reply uses the same framing and is deciphered the same way

pub mod command;
pub mod commands;
pub mod credentials;
pub mod crypto;
pub mod device;
pub mod error;
pub mod framing;
pub mod params;
pub mod response;
pub mod transport;

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

pub use command::Command;
pub use credentials::Credentials;
pub use device::DeviceExt;
pub use error::{Error, ErrorKind};
pub use response::ResponseDocument;
pub use transport::{DEFAULT_TIMEOUT, DeviceConfig, TcpTransport, Transport, tcp::DEFAULT_PORT};

/// The version of the hs100-core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs one module/action against the plug at `address` and returns the
/// decoded reply.
///
/// `address` is a host name or IP, optionally followed by `:port`
/// (`[v6]:port` for IPv6); without a port [`DEFAULT_PORT`] is used.
/// `arguments` must be a JSON object or `null`.
///
/// The caller picks its leaf out of the returned document; see
/// [`ResponseDocument::check`].
pub async fn execute(
    address: &str,
    module: &str,
    action: &str,
    arguments: Value,
    timeout: Duration,
) -> Result<ResponseDocument, Error> {
    let (host, port) = split_address(address)?;
    let config = DeviceConfig::new(host)
        .with_port(port)
        .with_timeout(timeout);
    execute_with_config(&config, module, action, arguments).await
}

/// Same as [`execute`], with the connection settings taken from `config`.
pub async fn execute_with_config(
    config: &DeviceConfig,
    module: &str,
    action: &str,
    arguments: Value,
) -> Result<ResponseDocument, Error> {
    let command = Command::with_arguments(module, action, arguments)?;
    execute_command(&TcpTransport::from_config(config), &command).await
}

/// Sends a built command over any [`Transport`] and decodes the reply.
pub async fn execute_command<T: Transport + ?Sized>(
    transport: &T,
    command: &Command,
) -> Result<ResponseDocument, Error> {
    debug!(
        host = transport.host(),
        module = command.module(),
        action = command.action(),
        "executing"
    );
    let reply = transport.send(&command.to_json()).await?;
    response::decode(&reply)
}

/// Sends raw command text to a device and returns the raw reply text.
///
/// # Example
///
/// ```no_run
/// use hs100_core::{send_command, DEFAULT_PORT, DEFAULT_TIMEOUT};
///
/// #[tokio::main]
/// async fn main() -> Result<(), hs100_core::Error> {
///     let response = send_command(
///         "192.168.1.100",
///         DEFAULT_PORT,
///         DEFAULT_TIMEOUT,
///         r#"{"system":{"get_sysinfo":{}}}"#,
///     )
///     .await?;
///
///     println!("Device info: {}", response);
///     Ok(())
/// }
/// ```
pub async fn send_command(
    target: &str,
    port: u16,
    command_timeout: Duration,
    command: &str,
) -> Result<String, Error> {
    TcpTransport::new(target, port, command_timeout)
        .send(command)
        .await
}

/// Splits `host[:port]` / `[v6]:port`; a bare IPv6 address keeps the default port.
fn split_address(address: &str) -> Result<(&str, u16), Error> {
    let invalid = || Error::ConnectionFailed(format!("invalid address: {}", address));

    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
        return match tail.strip_prefix(':') {
            Some(port) => Ok((host, port.parse().map_err(|_| invalid())?)),
            None if tail.is_empty() => Ok((host, DEFAULT_PORT)),
            None => Err(invalid()),
        };
    }

    match address.split_once(':') {
        Some((host, port)) if !port.contains(':') => {
            Ok((host, port.parse().map_err(|_| invalid())?))
        }
        _ if address.is_empty() => Err(invalid()),
        _ => Ok((address, DEFAULT_PORT)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::{io::AsyncWriteExt, net::TcpListener, task::JoinHandle};

    use super::*;
    use crate::{
        crypto::{xor_decrypt, xor_encrypt},
        framing::{MAX_FRAME_LEN, encode_frame, read_frame},
    };

    /// Answers `{m:{a:args}}` with `{m:{a:{...args, "err_code":0}}}`.
    fn echo_reply(request: &[u8]) -> String {
        let request: Value = serde_json::from_slice(request).unwrap();
        let (module, actions) = request.as_object().unwrap().iter().next().unwrap();
        let (action, args) = actions.as_object().unwrap().iter().next().unwrap();
        let mut leaf = args.as_object().cloned().unwrap_or_default();
        leaf.insert("err_code".into(), json!(0));
        Command::with_arguments(module.as_str(), action.as_str(), Value::Object(leaf))
            .unwrap()
            .to_json()
    }

    /// A plug that serves `connections` calls, each on its own task.
    async fn spawn_plug(connections: usize) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = tokio::spawn(async move {
            for _ in 0..connections {
                let (mut socket, _) = listener.accept().await.unwrap();
                tokio::spawn(async move {
                    let request = read_frame(&mut socket, MAX_FRAME_LEN).await.unwrap();
                    let reply = echo_reply(&xor_decrypt(&request));
                    let frame = encode_frame(&xor_encrypt(reply.as_bytes())).unwrap();
                    socket.write_all(&frame).await.unwrap();
                });
            }
        });
        (addr, handle)
    }

    #[tokio::test]
    async fn test_execute_set_relay_state() {
        let (addr, plug) = spawn_plug(1).await;

        let doc = execute(
            &addr,
            "system",
            "set_relay_state",
            json!({"state": 0}),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

        let status = doc.leaf_status("system", "set_relay_state").unwrap();
        assert_eq!(status.err_code, 0);
        assert!(doc.check("system", "set_relay_state").is_ok());
        plug.await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let (addr, plug) = spawn_plug(8).await;

        let calls = (0..8).map(|i| {
            let addr = addr.clone();
            async move {
                execute(
                    &addr,
                    "system",
                    "set_dev_alias",
                    json!({"alias": format!("plug \"{}\"", i)}),
                    Duration::from_secs(2),
                )
                .await
            }
        });
        let results = futures::future::join_all(calls).await;

        for (i, result) in results.into_iter().enumerate() {
            let doc = result.unwrap();
            let leaf = doc.system.unwrap().set_dev_alias.unwrap();
            assert_eq!(leaf.data["alias"], format!("plug \"{}\"", i));
        }
        plug.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_command_raw() {
        let (addr, plug) = spawn_plug(1).await;
        let (host, port) = split_address(&addr).unwrap();

        let reply = send_command(
            host,
            port,
            Duration::from_secs(2),
            r#"{"time":{"get_time":{}}}"#,
        )
        .await
        .unwrap();
        assert_eq!(reply, r#"{"time":{"get_time":{"err_code":0}}}"#);
        plug.await.unwrap();
    }

    #[tokio::test]
    async fn test_execute_rejects_bad_arguments() {
        let err = execute("127.0.0.1:1", "system", "reboot", json!(5), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
    }

    #[test]
    fn test_split_address() {
        assert_eq!(split_address("10.0.0.5").unwrap(), ("10.0.0.5", 9999));
        assert_eq!(split_address("plug.lan:10999").unwrap(), ("plug.lan", 10999));
        assert_eq!(split_address("[fe80::1]:9999").unwrap(), ("fe80::1", 9999));
        assert_eq!(split_address("[fe80::1]").unwrap(), ("fe80::1", 9999));
        assert_eq!(split_address("fe80::1").unwrap(), ("fe80::1", 9999));
        assert!(split_address("plug.lan:notaport").is_err());
        assert!(split_address("").is_err());
    }
}
