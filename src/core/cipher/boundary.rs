//! Encryption boundary.
//!
//! The single place where plaintext turns into stored ciphertext and back.
//! Each boundary owns one key; the inventory and credential boundaries are
//! configured independently and never share one.

use tracing::warn;
use zeroize::Zeroizing;

use super::{Cipher, Passphrase};
use crate::core::config::Config;
use crate::core::domain::{Blob, Sealed, StoredValue};
use crate::error::Result;

/// Fail-closed wrapper around a [`Cipher`].
pub struct Boundary {
    label: &'static str,
    cipher: Box<dyn Cipher>,
}

impl Boundary {
    /// Wrap a cipher. `label` names the boundary in log events.
    pub fn new(label: &'static str, cipher: impl Cipher + 'static) -> Self {
        Self {
            label,
            cipher: Box::new(cipher),
        }
    }

    /// Boundary over an age passphrase.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EmptyPassphrase` if the passphrase is empty.
    pub fn passphrase(label: &'static str, passphrase: &str, work_factor: u8) -> Result<Self> {
        Ok(Self::new(
            label,
            Passphrase::with_work_factor(passphrase, work_factor)?,
        ))
    }

    /// Boundary label.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Encrypt a value for storage.
    ///
    /// Empty input yields `None` without touching the cipher. Cipher errors
    /// are logged and also yield `None`.
    pub fn encrypt(&self, value: &str) -> Option<Blob> {
        if value.is_empty() {
            return None;
        }
        match self.cipher.encrypt(value) {
            Ok(armored) => Some(Blob::new(armored)),
            Err(e) => {
                warn!(boundary = self.label, cipher = self.cipher.name(), error = %e, "encryption failed");
                None
            }
        }
    }

    /// Decrypt a stored blob.
    ///
    /// Cipher errors (wrong key, corrupt blob) are logged and yield `None`.
    pub fn decrypt(&self, blob: &Blob) -> Option<Zeroizing<String>> {
        if blob.is_empty() {
            return None;
        }
        match self.cipher.decrypt(blob.armored()) {
            Ok(plaintext) => Some(Zeroizing::new(plaintext)),
            Err(e) => {
                warn!(boundary = self.label, cipher = self.cipher.name(), error = %e, "decryption failed");
                None
            }
        }
    }

    /// Prepare `value` for storage under a variable with the given
    /// sensitivity, comparing against what is currently stored.
    ///
    /// Encrypted values are compared by decrypting the current blob, since
    /// two encryptions of the same plaintext never match.
    pub fn seal(&self, sensitive: bool, current: Option<&StoredValue>, value: &str) -> Sealed {
        if !sensitive {
            return match current {
                Some(StoredValue::Plain(existing)) if existing == value => Sealed::Unchanged,
                _ => Sealed::Store(StoredValue::Plain(value.to_string())),
            };
        }

        if let Some(StoredValue::Encrypted(blob)) = current {
            if self.decrypt(blob).is_some_and(|existing| existing.as_str() == value) {
                return Sealed::Unchanged;
            }
        }
        match self.encrypt(value) {
            Some(blob) => Sealed::Store(StoredValue::Encrypted(blob)),
            None => Sealed::Skipped,
        }
    }

    /// Cleartext of a stored value. Undecryptable blobs read as empty.
    pub fn reveal(&self, stored: &StoredValue) -> String {
        match stored {
            StoredValue::Plain(value) => value.clone(),
            StoredValue::Encrypted(blob) => self
                .decrypt(blob)
                .map(|plaintext| plaintext.as_str().to_owned())
                .unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Boundary")
            .field("label", &self.label)
            .field("cipher", &self.cipher.name())
            .finish()
    }
}

/// The two independently keyed boundaries of a deployment.
#[derive(Debug)]
pub struct Keyring {
    /// Sensitive inventory variables.
    pub inventory: Boundary,
    /// Credential material (API keys and the like).
    pub credentials: Boundary,
}

impl Keyring {
    /// Build both boundaries from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let encryption = &config.encryption;
        Ok(Self {
            inventory: Boundary::passphrase("inventory", &encryption.key, encryption.work_factor)?,
            credentials: Boundary::passphrase(
                "credentials",
                &encryption.secret_key,
                encryption.work_factor,
            )?,
        })
    }
}
