//! Error types.
//!
//! One top-level [`Error`] wraps a sub-enum per concern so callers can match
//! on the failure class (configuration, storage, cipher, invariants, import
//! documents) or on the lookup/uniqueness failures every operation shares.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Kind of record a lookup or uniqueness failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Host,
    Group,
    Variable,
    Alias,
    Membership,
    HostVariable,
    GroupVariable,
    RequiredVariable,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Host => "host",
            Entity::Group => "group",
            Entity::Variable => "variable",
            Entity::Alias => "alias",
            Entity::Membership => "membership",
            Entity::HostVariable => "host variable",
            Entity::GroupVariable => "group variable",
            Entity::RequiredVariable => "required variable",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("{entity} not found: {reference}")]
    NotFound { entity: Entity, reference: String },

    #[error("{entity} already exists: {name}")]
    Conflict { entity: Entity, name: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    pub fn not_found(entity: Entity, reference: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            reference: reference.into(),
        }
    }

    pub fn conflict(entity: Entity, name: impl Into<String>) -> Self {
        Error::Conflict {
            entity,
            name: name.into(),
        }
    }

    /// Whether this is a lookup failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether this is a uniqueness failure.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Whether this is an invariant violation rejected before any write.
    pub fn is_invariant(&self) -> bool {
        matches!(self, Error::Invariant(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("missing config field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database not initialized: {0}")]
    NotInitialized(String),

    #[error("database already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("failed to read database: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write database: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("corrupt database: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize database: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("database unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("armor failed: {0}")]
    ArmorFailed(String),

    #[error("empty passphrase")]
    EmptyPassphrase,

    #[error("no encryption key configured")]
    NoKey,
}

#[derive(Error, Debug)]
pub enum InvariantError {
    #[error("group '{name}' is protected and cannot be {action}")]
    ProtectedGroup { name: String, action: &'static str },

    #[error("root group '{0}' cannot have a parent")]
    RootParent(String),

    #[error("'{0}' is reserved by the inventory output and cannot name a group")]
    ReservedGroupName(String),

    #[error("group '{0}' cannot be its own parent")]
    SelfParent(String),

    #[error("cannot move group '{group}' under '{parent}': '{group}' is an ancestor of '{parent}'")]
    ParentCycle { group: String, parent: String },

    #[error("variable '{0}' cannot be an alias of itself")]
    SelfAlias(String),

    #[error("cannot change sensitivity of '{key}': {values} value(s) already stored")]
    SensitivityLocked { key: String, values: usize },

    #[error("variable '{0}' is builtin (use force to delete it)")]
    BuiltinVariable(String),

    #[error("variable '{key}' is {expected}: value must be stored {expected}")]
    Representation { key: String, expected: &'static str },

    #[error("invalid variable type: {0} (expected string, int, bool, list or dict)")]
    InvalidType(String),

    #[error("invalid validation regex for '{key}': {reason}")]
    InvalidRegex { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("malformed import document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("malformed import document at {path}: {reason}")]
    Shape { path: String, reason: String },

    #[error("import document is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, Error>;
