//! The primary interface for ansibase operations.
//!
//! [`Repository`] owns the database and the keyring and exposes every
//! administrative operation, the resolution entry points and the import
//! front-ends. Operations are split by concern across the submodules.

mod groups;
mod hosts;
mod lint;
mod variables;

pub use groups::{GroupDetails, Requirement};
pub use hosts::HostDetails;
pub use variables::AliasEntry;

use tracing::{debug, info};

use crate::core::builder::InventoryBuilder;
use crate::core::cipher::{Boundary, Keyring};
use crate::core::config::Config;
use crate::core::constants;
use crate::core::domain::{Inventory, VarType, VariableSpec};
use crate::core::import::{GroupsDocument, HostDocument, ImportStats, Importer};
use crate::core::store::{Database, Tables};
use crate::core::types::VarMap;
use crate::error::{Result, StoreError};

/// Options shared by the import front-ends.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Parent of the top-level groups of a group document (id or name)
    pub parent: Option<String>,
    /// Group every imported host joins (host documents only)
    pub group: Option<String>,
    /// Host name of a flat host document
    pub name: Option<String>,
    /// Extra keys registered as sensitive when first seen
    pub sensitive: Vec<String>,
    /// Roll back instead of committing
    pub dry_run: bool,
}

/// The primary interface for ansibase operations.
pub struct Repository {
    pub(super) database: Database,
    pub(super) keyring: Keyring,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("database", &self.database)
            .field("keyring", &self.keyring)
            .finish()
    }
}

impl Repository {
    pub fn new(database: Database, keyring: Keyring) -> Self {
        Self { database, keyring }
    }

    /// Open the database named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotInitialized` if the database file is missing.
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.database_path();
        let database = Database::open(&path);
        if !database.exists() {
            return Err(StoreError::NotInitialized(path.display().to_string()).into());
        }
        debug!(path = %path.display(), "opening repository");
        Ok(Self::new(database, Keyring::from_config(config)?))
    }

    /// Create and seed the database named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyInitialized` if the database exists.
    pub fn init(config: &Config) -> Result<Self> {
        let database = Database::open(&config.database_path());
        let repository = Self::new(database, Keyring::from_config(config)?);
        repository.database.initialize(&Self::seed()?)?;
        info!(path = %config.database_path().display(), "database initialized");
        Ok(repository)
    }

    /// Initial tables: the reserved groups, the builtin connection
    /// variables and the root group's requirements on them.
    pub fn seed() -> Result<Tables> {
        let mut tables = Tables::new();
        let all = tables.insert_group(constants::ROOT_GROUP, "every host", None)?;
        tables.insert_group(
            constants::UNGROUPED_GROUP,
            "hosts without another group",
            Some(all),
        )?;

        let builtins = [
            (
                VariableSpec::new("ansible_host").description("address to connect to"),
                true,
            ),
            (
                VariableSpec::new("ansible_port")
                    .description("SSH port")
                    .var_type(VarType::Int)
                    .default_value("22"),
                false,
            ),
            (
                VariableSpec::new("ansible_user").description("user to connect as"),
                true,
            ),
            (
                VariableSpec::new("ansible_password")
                    .description("connection password")
                    .sensitive(true),
                false,
            ),
            (
                VariableSpec::new("ansible_become_password")
                    .description("privilege escalation password")
                    .sensitive(true),
                false,
            ),
        ];
        for (spec, required) in builtins {
            let id = tables.insert_variable(&spec.builtin(true))?;
            tables.insert_requirement(all, id, required, None)?;
        }
        Ok(tables)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn keyring(&self) -> &Keyring {
        &self.keyring
    }

    /// Boundary for sensitive inventory variables.
    pub(super) fn boundary(&self) -> &Boundary {
        &self.keyring.inventory
    }

    /// The exported inventory. Sensitive values are decrypted unless `masked`.
    pub fn inventory(&self, masked: bool) -> Result<Inventory> {
        let tables = self.database.read()?;
        Ok(InventoryBuilder::new(&tables, self.boundary())
            .masked(masked)
            .build())
    }

    /// Resolved variables of one active host.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the host is absent or inactive.
    pub fn host_vars(&self, name: &str, masked: bool) -> Result<VarMap> {
        let tables = self.database.read()?;
        InventoryBuilder::new(&tables, self.boundary())
            .masked(masked)
            .resolve_host(name)
    }

    /// `ansible-inventory --graph` style rendering of the hierarchy.
    pub fn graph(&self) -> Result<String> {
        let tables = self.database.read()?;
        Ok(InventoryBuilder::new(&tables, self.boundary()).graph())
    }

    /// Import a group document in one transaction.
    pub fn import_groups(
        &self,
        document: &GroupsDocument,
        options: &ImportOptions,
    ) -> Result<ImportStats> {
        let mut tx = self.database.begin()?;
        let parent = options
            .parent
            .as_deref()
            .map(|reference| tx.resolve_group(reference).map(|g| g.id))
            .transpose()?;

        let mut importer =
            Importer::new(&mut tx, self.boundary()).with_sensitive_keys(options.sensitive.clone());
        importer.import_groups(document, parent)?;
        let stats = importer.finish();

        Self::settle(tx, stats, options.dry_run)
    }

    /// Import a host document in one transaction.
    pub fn import_hosts(
        &self,
        document: HostDocument,
        options: &ImportOptions,
    ) -> Result<ImportStats> {
        let hosts = document.into_hosts(options.name.as_deref())?;

        let mut tx = self.database.begin()?;
        let group = options
            .group
            .as_deref()
            .map(|reference| tx.resolve_group(reference).map(|g| g.id))
            .transpose()?;

        let mut importer =
            Importer::new(&mut tx, self.boundary()).with_sensitive_keys(options.sensitive.clone());
        importer.import_hosts(&hosts, group)?;
        let stats = importer.finish();

        Self::settle(tx, stats, options.dry_run)
    }

    fn settle(
        tx: crate::core::store::Transaction<'_>,
        mut stats: ImportStats,
        dry_run: bool,
    ) -> Result<ImportStats> {
        stats.dry_run = dry_run;
        if dry_run {
            tx.rollback();
        } else {
            tx.commit()?;
        }
        Ok(stats)
    }
}
