//! Cloud account credentials.
//!
//! The [`Credentials`] struct carries the TP-Link account used by the
//! `cnCloud` `bind` action. The password is kept in a [`SecretString`] from
//! the `secrecy` crate so it never shows up in `Debug` output or logs; it is
//! exposed only while the bind command is being built.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Credentials of a TP-Link cloud account.
///
/// ```
/// use hs100_core::{Credentials, commands};
///
/// let creds = Credentials::new("user@example.com", "password123");
/// let cmd = commands::cloud_bind(&creds);
/// assert_eq!(cmd.arguments()["username"], "user@example.com");
/// assert!(!format!("{:?}", creds).contains("password123"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    /// The username (typically an email address for TP-Link cloud accounts).
    pub username: String,
    /// The password for the account (protected from accidental logging).
    password: SecretString,
}

impl Credentials {
    /// Creates new credentials with the given username and password.
    ///
    /// # Arguments
    ///
    /// * `username` - The TP-Link account email address
    /// * `password` - The account password
    ///
    /// # Example
    ///
    /// ```
    /// use hs100_core::Credentials;
    ///
    /// let creds = Credentials::new("user@example.com", "mypassword");
    /// assert_eq!(creds.username, "user@example.com");
    /// ```
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Exposes the password.
    ///
    /// Only use this method when the password is written into a command
    /// document. Never log or display the returned value.
    ///
    /// # Example
    ///
    /// ```
    /// use hs100_core::Credentials;
    ///
    /// let creds = Credentials::new("user", "secret");
    /// let password = creds.expose_password();
    /// assert_eq!(password, "secret");
    /// ```
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.password.expose_secret() == other.password.expose_secret()
    }
}

impl Eq for Credentials {}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_new() {
        let creds = Credentials::new("user@example.com", "password123");
        assert_eq!(creds.username, "user@example.com");
        assert_eq!(creds.expose_password(), "password123");
    }

    #[test]
    fn test_credentials_equality() {
        let a = Credentials::new("user", "pass");
        let b = Credentials::new("user", "pass");
        let c = Credentials::new("user", "other");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("user@example.com", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("user@example.com"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret123"));
    }
}
