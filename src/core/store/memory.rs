//! In-memory store for tests and embedding.

use std::sync::Mutex;

use super::{Store, Tables};
use crate::error::{Result, StoreError};

/// Tables held in process memory.
#[derive(Debug, Default)]
pub struct Memory {
    tables: Mutex<Option<Tables>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for Memory {
    fn load(&self) -> Result<Tables> {
        let guard = self
            .tables
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        guard
            .clone()
            .ok_or_else(|| StoreError::NotInitialized(self.name().to_string()).into())
    }

    fn save(&self, tables: &Tables) -> Result<()> {
        let mut guard = self
            .tables
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        *guard = Some(tables.clone());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.tables.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
