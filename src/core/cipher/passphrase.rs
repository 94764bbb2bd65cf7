//! Passphrase encryption backend.
//!
//! Uses age scrypt recipients with ASCII armor, so stored values are plain
//! text that survives the TOML database file untouched.

use std::io::{Read, Write};

use age::scrypt;
use age::secrecy::SecretString;
use tracing::trace;
use zeroize::Zeroizing;

use super::Cipher;
use crate::core::constants;
use crate::error::{CipherError, Result};

/// age scrypt cipher bound to one passphrase.
pub struct Passphrase {
    passphrase: Zeroizing<String>,
    work_factor: u8,
}

impl Passphrase {
    /// Create a cipher for `passphrase` using the default work factor.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EmptyPassphrase` if the passphrase is empty.
    pub fn new(passphrase: &str) -> Result<Self> {
        Self::with_work_factor(passphrase, constants::DEFAULT_WORK_FACTOR)
    }

    /// Create a cipher with an explicit scrypt work factor (log2 N).
    pub fn with_work_factor(passphrase: &str, work_factor: u8) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(CipherError::EmptyPassphrase.into());
        }
        Ok(Self {
            passphrase: Zeroizing::new(passphrase.to_string()),
            work_factor,
        })
    }

    fn secret(&self) -> SecretString {
        SecretString::from(self.passphrase.as_str().to_owned())
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Passphrase")
            .field("work_factor", &self.work_factor)
            .finish_non_exhaustive()
    }
}

impl Cipher for Passphrase {
    fn name(&self) -> &'static str {
        "passphrase"
    }

    fn encrypt(&self, plaintext: &str) -> Result<String> {
        trace!(
            plaintext_len = plaintext.len(),
            work_factor = self.work_factor,
            "encrypting"
        );

        let mut recipient = scrypt::Recipient::new(self.secret());
        recipient.set_work_factor(self.work_factor);

        let encryptor =
            age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(age::armor::ArmoredWriter::wrap_output(
                &mut encrypted,
                age::armor::Format::AsciiArmor,
            )?)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        writer.write_all(plaintext.as_bytes())?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");

        String::from_utf8(encrypted)
            .map_err(|e| CipherError::EncryptionFailed(format!("UTF-8 error: {}", e)).into())
    }

    fn decrypt(&self, encrypted: &str) -> Result<String> {
        trace!(ciphertext_len = encrypted.len(), "decrypting");

        let reader = age::armor::ArmoredReader::new(encrypted.as_bytes());
        let decryptor = age::Decryptor::new(reader)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        let identity = scrypt::Identity::new(self.secret());
        let mut decrypted = Zeroizing::new(Vec::new());
        let mut reader = decryptor
            .decrypt(std::iter::once(&identity as &dyn age::Identity))
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        reader
            .read_to_end(&mut decrypted)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        trace!(plaintext_len = decrypted.len(), "decrypted");

        String::from_utf8(decrypted.to_vec())
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {}", e)).into())
    }
}
