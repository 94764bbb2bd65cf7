//! Init command.
//!
//! Writes `ansibase.toml` with two freshly generated keys and creates the
//! seeded database next to it.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::constants;
use crate::core::repository::Repository;
use crate::error::{ConfigError, Result};

/// Initialize ansibase at `path`.
pub fn execute(path: &Path, database: Option<PathBuf>, work_factor: Option<u8>) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()).into());
    }

    let mut config =
        Config::generate(database.unwrap_or_else(|| PathBuf::from(constants::DATABASE_FILE)));
    if let Some(factor) = work_factor {
        config.encryption.work_factor = factor;
    }
    config.validate()?;
    config.save(path)?;

    // Reload so the database path resolves against the config directory.
    let config = Config::load(path)?;
    let repository = Repository::init(&config)?;
    info!(config = %path.display(), "initialized");

    output::success(&format!("initialized {}", output::key(&path.display().to_string())));
    output::kv("database", config.database_path().display());
    output::kv(
        "seeded",
        format!(
            "{} groups, {} builtin variables",
            repository.groups()?.len(),
            repository.variables(&Default::default())?.len()
        ),
    );
    output::hint("keep ansibase.toml private: it holds both encryption keys");
    Ok(())
}
