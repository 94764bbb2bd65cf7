//! Cryptographic operations.
//!
//! Sensitive values are encrypted under a shared passphrase. The [`Cipher`]
//! trait is the raw, fallible primitive; [`Boundary`] wraps one cipher
//! instance and is the only thing the rest of the crate talks to. It fails
//! closed: errors become `None` and a `warn!` event instead of propagating.
//!
//! ## Backends
//!
//! - **passphrase**: age scrypt recipients with ASCII armor. Always available.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file
//! 3. Hand it to `Boundary::new`

use crate::error::Result;

mod boundary;
mod passphrase;

pub use boundary::{Boundary, Keyring};
pub use passphrase::Passphrase;

/// Symmetric encryption primitive.
pub trait Cipher: Send + Sync {
    /// Encrypt plaintext into an armored string.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    /// Decrypt an armored string produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the key is wrong or the input is malformed.
    fn decrypt(&self, encrypted: &str) -> Result<String>;

    /// Backend name for display/logging.
    fn name(&self) -> &'static str;
}
