//! Payload obfuscation for the HS100 control protocol.
//!
//! - [`xor`]: autokey XOR stream cipher used in both directions

pub mod xor;

pub use xor::{AutokeyState, INITIAL_KEY, decrypt as xor_decrypt, encrypt as xor_encrypt};
