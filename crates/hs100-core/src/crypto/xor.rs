//! XOR autokey cipher used by the HS100 control protocol.
//!
//! Each ciphertext byte becomes the key for the next byte. The running key
//! starts at [`INITIAL_KEY`] for every message, so requests and responses
//! are ciphered independently. A corrupted ciphertext byte garbles its own
//! plaintext byte and the one after it (which uses it as key); every later
//! byte deciphers correctly.

/// Initial key for the XOR autokey cipher.
pub const INITIAL_KEY: u8 = 171;

/// Running key of one cipher pass.
///
/// A fresh state is created for every message; it is never shared between
/// calls or between the two directions of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutokeyState {
    key: u8,
}

impl AutokeyState {
    /// Creates a state seeded with [`INITIAL_KEY`].
    pub fn new() -> Self {
        Self { key: INITIAL_KEY }
    }

    /// Ciphers one plaintext byte and advances the key.
    pub fn encrypt_byte(&mut self, plain: u8) -> u8 {
        let cipher = self.key ^ plain;
        self.key = cipher;
        cipher
    }

    /// Deciphers one ciphertext byte and advances the key.
    pub fn decrypt_byte(&mut self, cipher: u8) -> u8 {
        let plain = self.key ^ cipher;
        self.key = cipher;
        plain
    }
}

impl Default for AutokeyState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ciphers a payload with a fresh autokey state.
///
/// # Example
///
/// ```
/// use hs100_core::crypto::xor::{encrypt, INITIAL_KEY};
///
/// // A zero byte ciphers to the initial key itself.
/// assert_eq!(encrypt(&[0x00]), vec![INITIAL_KEY]);
/// ```
pub fn encrypt(plaintext: &[u8]) -> Vec<u8> {
    let mut state = AutokeyState::new();
    plaintext.iter().map(|&b| state.encrypt_byte(b)).collect()
}

/// Deciphers a payload with a fresh autokey state.
///
/// This is the exact inverse of [`encrypt`] for any input length.
///
/// # Example
///
/// ```
/// use hs100_core::crypto::xor::{decrypt, encrypt};
///
/// let command = br#"{"system":{"get_sysinfo":{}}}"#;
/// assert_eq!(decrypt(&encrypt(command)), command.to_vec());
/// ```
pub fn decrypt(ciphertext: &[u8]) -> Vec<u8> {
    let mut state = AutokeyState::new();
    ciphertext.iter().map(|&b| state.decrypt_byte(b)).collect()
}
