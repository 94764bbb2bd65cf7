//! Persistence.
//!
//! The relational model lives in [`Tables`]; a [`Store`] loads and saves
//! it as a whole. [`Database`] adds transactions on top: a transaction
//! works on a private copy of the tables and only replaces the stored copy
//! on commit, so a failed or dry-run operation leaves nothing behind.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `Store` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module and hand it to `Database::new`

use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, StoreError};

mod fs;
mod memory;
mod tables;

pub use fs::Filesystem;
pub use memory::Memory;
pub use tables::Tables;

/// Storage backend for the tables.
pub trait Store: Send + Sync {
    /// Load every table.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotInitialized` if nothing was ever saved.
    fn load(&self) -> Result<Tables>;

    /// Replace every table atomically.
    fn save(&self, tables: &Tables) -> Result<()>;

    /// Whether the store has been initialized.
    fn exists(&self) -> bool;

    /// Backend name for display/logging.
    fn name(&self) -> &'static str;
}

/// Transactional access to a [`Store`].
pub struct Database {
    store: Box<dyn Store>,
}

impl Database {
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Database file at `path`.
    pub fn open(path: &Path) -> Self {
        Self::new(Filesystem::new(path))
    }

    /// Empty in-memory database.
    pub fn memory() -> Self {
        Self::new(Memory::new())
    }

    pub fn exists(&self) -> bool {
        self.store.exists()
    }

    /// Save the initial tables.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyInitialized` if the store already holds data.
    pub fn initialize(&self, tables: &Tables) -> Result<()> {
        if self.store.exists() {
            return Err(StoreError::AlreadyInitialized(self.store.name().to_string()).into());
        }
        debug!(backend = self.store.name(), "initializing database");
        self.store.save(tables)
    }

    /// A private snapshot of the tables.
    pub fn read(&self) -> Result<Tables> {
        self.store.load()
    }

    /// Start a transaction over a working copy of the tables.
    pub fn begin(&self) -> Result<Transaction<'_>> {
        let tables = self.store.load()?;
        debug!(backend = self.store.name(), "transaction started");
        Ok(Transaction {
            database: self,
            tables,
            done: false,
        })
    }

    /// Run `f` in a transaction, committing only if it succeeds.
    pub fn write<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tx = self.begin()?;
        let value = f(&mut tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.store.name())
            .finish()
    }
}

/// A pending set of changes. Dropping it without [`commit`] discards them.
///
/// [`commit`]: Transaction::commit
pub struct Transaction<'a> {
    database: &'a Database,
    tables: Tables,
    done: bool,
}

impl Transaction<'_> {
    /// Persist the working copy.
    pub fn commit(mut self) -> Result<()> {
        self.database.store.save(&self.tables)?;
        self.done = true;
        debug!("transaction committed");
        Ok(())
    }

    /// Discard the working copy.
    pub fn rollback(mut self) {
        self.done = true;
        debug!("transaction rolled back");
    }
}

impl Deref for Transaction<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.tables
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Tables {
        &mut self.tables
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.done {
            debug!("transaction dropped without commit");
        }
    }
}
