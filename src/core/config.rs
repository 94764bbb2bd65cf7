//! Configuration file management.
//!
//! Handles reading, writing, and validating `ansibase.toml`.

use std::path::{Path, PathBuf};

use age::secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Deployment configuration stored in `ansibase.toml`.
#[derive(Serialize, Deserialize)]
pub struct Config {
    /// Where the inventory database lives
    pub database: DatabaseConfig,
    /// Key material for the two encryption boundaries
    pub encryption: EncryptionConfig,
    /// Directory relative database paths resolve against
    #[serde(skip)]
    base_dir: PathBuf,
}

/// `[database]` section.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file, relative to the config file unless absolute
    pub path: PathBuf,
}

/// `[encryption]` section.
#[derive(Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Passphrase for sensitive inventory variables
    pub key: String,
    /// Passphrase for credential material
    pub secret_key: String,
    /// scrypt work factor (log2 N) used when encrypting
    #[serde(default = "default_work_factor")]
    pub work_factor: u8,
}

fn default_work_factor() -> u8 {
    constants::DEFAULT_WORK_FACTOR
}

impl Config {
    /// Create a configuration with empty key material.
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseConfig {
                path: database.into(),
            },
            encryption: EncryptionConfig {
                key: String::new(),
                secret_key: String::new(),
                work_factor: constants::DEFAULT_WORK_FACTOR,
            },
            base_dir: PathBuf::new(),
        }
    }

    /// Create a configuration with freshly generated, independent keys.
    pub fn generate(database: impl Into<PathBuf>) -> Self {
        let mut config = Self::new(database);
        config.encryption.key = generate_key();
        config.encryption.secret_key = generate_key();
        config
    }

    /// Default config path in the current directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load, apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// `ConfigError::Parse` if the TOML is malformed, or a validation error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        debug!(database = %config.database_path().display(), "config loaded");
        Ok(config)
    }

    /// Save to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Apply `ANSIBASE_*` overrides through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(constants::ENV_DATABASE) {
            self.database.path = PathBuf::from(path);
        }
        if let Some(key) = lookup(constants::ENV_ENCRYPTION_KEY) {
            self.encryption.key = key;
        }
        if let Some(key) = lookup(constants::ENV_SECRET_KEY) {
            self.encryption.secret_key = key;
        }
    }

    /// Database path, resolved against the config file's directory.
    pub fn database_path(&self) -> PathBuf {
        if self.database.path.is_absolute() {
            self.database.path.clone()
        } else {
            self.base_dir.join(&self.database.path)
        }
    }

    /// Validate the configuration.
    ///
    /// Checks:
    /// - Database path is set
    /// - Both keys are non-empty and differ
    /// - Work factor is within range
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.path",
            }
            .into());
        }
        if self.encryption.key.is_empty() {
            return Err(ConfigError::MissingField {
                field: "encryption.key",
            }
            .into());
        }
        if self.encryption.secret_key.is_empty() {
            return Err(ConfigError::MissingField {
                field: "encryption.secret_key",
            }
            .into());
        }
        if self.encryption.key == self.encryption.secret_key {
            return Err(ConfigError::InvalidValue {
                field: "encryption.secret_key",
                reason: "must differ from encryption.key".to_string(),
            }
            .into());
        }
        let factor = self.encryption.work_factor;
        if factor == 0 || factor > constants::MAX_WORK_FACTOR {
            return Err(ConfigError::InvalidValue {
                field: "encryption.work_factor",
                reason: format!("{} is outside 1..={}", factor, constants::MAX_WORK_FACTOR),
            }
            .into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database", &self.database)
            .field("key", &constants::MASK)
            .field("secret_key", &constants::MASK)
            .field("work_factor", &self.encryption.work_factor)
            .finish()
    }
}

/// 256 bits of key material, rendered as text.
fn generate_key() -> String {
    let identity = age::x25519::Identity::generate();
    identity.to_string().expose_secret().to_string()
}
