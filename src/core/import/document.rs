//! Import documents.
//!
//! Group documents are recursive:
//!
//! ```yaml
//! webservers:
//!   hosts:
//!     web01: { ansible_host: 10.0.0.5 }
//!   vars:
//!     http_port: 80
//!   children:
//!     canary:
//!       hosts:
//!         web02:
//! ```
//!
//! Host documents are either flat (`{varKey: value}` for one named host) or
//! keyed by host name (`{hostName: {varKey: value}}`). Shape is checked by
//! deserialization before anything is written.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{GroupName, HostName, VarKey};
use crate::error::{ImportError, Result};

/// A value as it arrives in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<RawValue>),
    Map(IndexMap<String, RawValue>),
}

impl RawValue {
    /// Stored scalar representation. Composites become compact JSON.
    pub fn normalize(&self) -> String {
        match self {
            RawValue::Null => String::new(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Int(i) => i.to_string(),
            // Debug keeps the fraction of integral floats (`1.0`, not `1`).
            RawValue::Float(f) => format!("{:?}", f),
            RawValue::Text(s) => s.clone(),
            RawValue::List(_) | RawValue::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, RawValue::Map(_))
    }
}

/// Variables of one host or group, in document order.
pub type VarsDocument = IndexMap<VarKey, RawValue>;

/// One group of a group document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDocument {
    #[serde(default)]
    hosts: Option<IndexMap<HostName, Option<VarsDocument>>>,
    #[serde(default)]
    vars: Option<VarsDocument>,
    #[serde(default)]
    children: Option<IndexMap<GroupName, Option<GroupDocument>>>,
}

impl GroupDocument {
    /// Direct hosts with their variables.
    pub fn hosts(&self) -> impl Iterator<Item = (&HostName, Option<&VarsDocument>)> {
        self.hosts
            .iter()
            .flatten()
            .map(|(name, vars)| (name, vars.as_ref()))
    }

    pub fn vars(&self) -> impl Iterator<Item = (&VarKey, &RawValue)> {
        self.vars.iter().flatten()
    }

    /// Child groups. A bare `child:` entry reads as an empty group.
    pub fn children(&self) -> impl Iterator<Item = (&GroupName, Option<&GroupDocument>)> {
        self.children
            .iter()
            .flatten()
            .map(|(name, doc)| (name, doc.as_ref()))
    }
}

/// Top level of a group document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupsDocument {
    groups: IndexMap<GroupName, Option<GroupDocument>>,
}

impl GroupsDocument {
    /// Parse a YAML (or JSON) group document.
    ///
    /// # Errors
    ///
    /// Returns `ImportError` if the text is not a mapping of group documents.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(ImportError::Empty.into());
        }
        let groups: Option<IndexMap<GroupName, Option<GroupDocument>>> =
            serde_yaml::from_str(text).map_err(ImportError::Parse)?;
        match groups {
            Some(groups) if !groups.is_empty() => Ok(Self { groups }),
            _ => Err(ImportError::Empty.into()),
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = (&GroupName, Option<&GroupDocument>)> {
        self.groups.iter().map(|(name, doc)| (name, doc.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A host document.
#[derive(Debug, Clone, PartialEq)]
pub enum HostDocument {
    /// Variables of a single host named outside the document.
    Flat(VarsDocument),
    /// Variables keyed by host name.
    Hosts(IndexMap<HostName, VarsDocument>),
}

impl HostDocument {
    /// Parse a YAML host document and tell the two shapes apart.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Shape` when scalar variables and host entries
    /// are mixed at the top level.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(ImportError::Empty.into());
        }
        let top: Option<IndexMap<String, RawValue>> =
            serde_yaml::from_str(text).map_err(ImportError::Parse)?;
        let top = match top {
            Some(top) if !top.is_empty() => top,
            _ => return Err(ImportError::Empty.into()),
        };

        // Only mappings mark host entries; an empty host body reads as null.
        if !top.values().any(RawValue::is_map) {
            return Ok(HostDocument::Flat(top));
        }
        let entries = top
            .values()
            .filter(|v| v.is_map() || matches!(v, RawValue::Null))
            .count();
        if entries != top.len() {
            return Err(ImportError::Shape {
                path: "/".to_string(),
                reason: "mixes host entries with top-level variables".to_string(),
            }
            .into());
        }

        let hosts = top
            .into_iter()
            .map(|(name, value)| match value {
                RawValue::Map(vars) => (name, vars),
                _ => (name, VarsDocument::new()),
            })
            .collect();
        Ok(HostDocument::Hosts(hosts))
    }

    /// Host name to variables, naming a flat document's host `name`.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Shape` for a flat document without a name.
    pub fn into_hosts(self, name: Option<&str>) -> Result<IndexMap<HostName, VarsDocument>> {
        match self {
            HostDocument::Hosts(hosts) => Ok(hosts),
            HostDocument::Flat(vars) => {
                let name = name.filter(|n| !n.is_empty()).ok_or_else(|| ImportError::Shape {
                    path: "/".to_string(),
                    reason: "a flat host document needs a host name".to_string(),
                })?;
                Ok(IndexMap::from([(name.to_string(), vars)]))
            }
        }
    }
}
