//! Catalog entries and aliases.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::constants;
use crate::core::types::{AliasId, VarKey, VariableId};
use crate::error::{Error, InvariantError};

/// Type tag of a catalog entry.
///
/// Resolution treats every value as an opaque string; the tag only drives
/// lint checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarType {
    #[default]
    String,
    Int,
    Bool,
    List,
    Dict,
}

impl VarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::String => "string",
            VarType::Int => "int",
            VarType::Bool => "bool",
            VarType::List => "list",
            VarType::Dict => "dict",
        }
    }

    /// Whether a stored cleartext value conforms to this type.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            VarType::String => true,
            VarType::Int => value.trim().parse::<i64>().is_ok(),
            VarType::Bool => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "true" | "false" | "yes" | "no"
            ),
            VarType::List => matches!(
                serde_json::from_str::<serde_json::Value>(value),
                Ok(serde_json::Value::Array(_))
            ),
            VarType::Dict => matches!(
                serde_json::from_str::<serde_json::Value>(value),
                Ok(serde_json::Value::Object(_))
            ),
        }
    }
}

impl FromStr for VarType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(VarType::String),
            "int" | "integer" => Ok(VarType::Int),
            "bool" | "boolean" => Ok(VarType::Bool),
            "list" => Ok(VarType::List),
            "dict" | "map" => Ok(VarType::Dict),
            _ => Err(InvariantError::InvalidType(s.to_string()).into()),
        }
    }
}

impl std::fmt::Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry. Owns the sensitivity flag every other component trusts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub key: VarKey,
    #[serde(default)]
    pub description: String,
    pub sensitive: bool,
    #[serde(default)]
    pub var_type: VarType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default)]
    pub builtin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Fields of a catalog entry about to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSpec {
    pub key: VarKey,
    pub description: String,
    pub sensitive: bool,
    pub var_type: VarType,
    pub default_value: Option<String>,
    pub validation: Option<String>,
    pub builtin: bool,
}

impl VariableSpec {
    pub fn new(key: impl Into<VarKey>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Spec for a key first seen during import.
    ///
    /// Well-known credential keys (plus `extra_sensitive`) become sensitive,
    /// reserved prefixes become builtin.
    pub fn classify(key: &str, extra_sensitive: &[String]) -> Self {
        let sensitive = constants::KNOWN_SENSITIVE_KEYS.contains(&key)
            || extra_sensitive.iter().any(|k| k == key);
        let builtin = constants::BUILTIN_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix));
        Self {
            key: key.to_string(),
            description: "registered by import".to_string(),
            sensitive,
            builtin,
            ..Self::default()
        }
    }

    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    pub fn builtin(mut self, builtin: bool) -> Self {
        self.builtin = builtin;
        self
    }

    pub fn var_type(mut self, var_type: VarType) -> Self {
        self.var_type = var_type;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn validation(mut self, pattern: impl Into<String>) -> Self {
        self.validation = Some(pattern.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update of a catalog entry.
///
/// `default_value` and `validation` take `Some(None)` to clear.
#[derive(Debug, Clone, Default)]
pub struct VariablePatch {
    pub description: Option<String>,
    pub sensitive: Option<bool>,
    pub var_type: Option<VarType>,
    pub default_value: Option<Option<String>>,
    pub validation: Option<Option<String>>,
}

/// Listing filter for the catalog.
#[derive(Debug, Clone, Default)]
pub struct VariableFilter {
    pub sensitive: Option<bool>,
    pub builtin: Option<bool>,
    pub var_type: Option<VarType>,
}

impl VariableFilter {
    pub fn matches(&self, variable: &Variable) -> bool {
        self.sensitive.map_or(true, |s| variable.sensitive == s)
            && self.builtin.map_or(true, |b| variable.builtin == b)
            && self.var_type.map_or(true, |t| variable.var_type == t)
    }
}

/// "If `alias_id` has no explicit value, borrow `source_id`'s value."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAlias {
    pub id: AliasId,
    pub alias_id: VariableId,
    pub source_id: VariableId,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}
