//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

use std::collections::BTreeMap;

/// Row identifier shared by every table (one database-wide sequence).
pub type RowId = i64;

/// Identifier of a host row.
pub type HostId = RowId;

/// Identifier of a group row.
pub type GroupId = RowId;

/// Identifier of a catalog entry.
pub type VariableId = RowId;

/// Identifier of an alias pair.
pub type AliasId = RowId;

/// A host name (e.g., web01.example.com).
pub type HostName = String;

/// A group name (e.g., webservers).
pub type GroupName = String;

/// A catalog variable key (e.g., ansible_host).
pub type VarKey = String;

/// Resolved variables keyed by variable key, in key order.
pub type VarMap = BTreeMap<VarKey, String>;
