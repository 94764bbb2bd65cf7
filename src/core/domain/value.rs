//! Stored variable values.
//!
//! A value is either cleartext or an encrypted blob, never both. The
//! assignment rows carry a single [`StoredValue`], so the exclusivity holds
//! by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::constants;
use crate::core::types::{GroupId, HostId, RowId, VarKey, VariableId};

/// ASCII-armored ciphertext produced by the encryption boundary.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blob(String);

impl Blob {
    pub fn new(armored: String) -> Self {
        Self(armored)
    }

    pub fn armored(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Blob({} bytes)", self.0.len())
    }
}

/// Value column of an assignment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredValue {
    Plain(String),
    Encrypted(Blob),
}

impl StoredValue {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, StoredValue::Encrypted(_))
    }

    /// Cleartext, if stored in clear.
    pub fn plain(&self) -> Option<&str> {
        match self {
            StoredValue::Plain(value) => Some(value),
            StoredValue::Encrypted(_) => None,
        }
    }

    /// Name of the representation, for error messages.
    pub fn representation(&self) -> &'static str {
        match self {
            StoredValue::Plain(_) => "cleartext",
            StoredValue::Encrypted(_) => "encrypted",
        }
    }
}

/// A variable assigned directly to a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVariable {
    pub id: RowId,
    pub host_id: HostId,
    pub variable_id: VariableId,
    pub value: StoredValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A variable assigned directly to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupVariable {
    pub id: RowId,
    pub group_id: GroupId,
    pub variable_id: VariableId,
    pub value: StoredValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Created,
    Updated,
    Unchanged,
}

/// What the encryption boundary made of a value about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sealed {
    /// Store this value.
    Store(StoredValue),
    /// Already stored with the same content.
    Unchanged,
    /// Sensitive value that could not be encrypted (empty or cipher failure).
    Skipped,
}

/// A resolved variable as shown to an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarEntry {
    pub key: VarKey,
    pub value: String,
    pub sensitive: bool,
}

impl VarEntry {
    /// Entry whose sensitive value is hidden.
    pub fn masked(key: impl Into<VarKey>) -> Self {
        Self {
            key: key.into(),
            value: constants::MASK.to_string(),
            sensitive: true,
        }
    }
}
