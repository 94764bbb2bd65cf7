//! Filesystem store.
//!
//! Keeps every table in one TOML document. Saves go through a temporary
//! file in the same directory followed by a rename, so readers never see a
//! half-written database.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Store, Tables};
use crate::error::{Result, StoreError};

/// TOML database file.
#[derive(Debug, Clone)]
pub struct Filesystem {
    path: PathBuf,
}

impl Filesystem {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Store for Filesystem {
    fn load(&self) -> Result<Tables> {
        if !self.path.exists() {
            return Err(StoreError::NotInitialized(self.path.display().to_string()).into());
        }
        debug!(path = %self.path.display(), "loading database");
        let contents = fs::read_to_string(&self.path).map_err(StoreError::ReadFailed)?;
        let tables = toml::from_str(&contents).map_err(StoreError::Parse)?;
        Ok(tables)
    }

    fn save(&self, tables: &Tables) -> Result<()> {
        debug!(path = %self.path.display(), "saving database");
        let contents = toml::to_string_pretty(tables).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::WriteFailed)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, contents).map_err(StoreError::WriteFailed)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp, fs::Permissions::from_mode(0o600))
                .map_err(StoreError::WriteFailed)?;
        }

        fs::rename(&temp, &self.path).map_err(StoreError::WriteFailed)?;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}
