//! Exported inventory structure.
//!
//! Serializes to the dynamic inventory JSON shape:
//!
//! ```json
//! {
//!   "_meta": { "hostvars": { "h1": { "ansible_host": "10.0.0.5" } } },
//!   "web": { "hosts": ["h1"], "children": [], "vars": { "tier": "front" } }
//! }
//! ```
//!
//! Empty `hosts`, `children` and `vars` fields are omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{GroupName, HostName, VarMap};

/// The full export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(rename = "_meta")]
    pub meta: Meta,
    #[serde(flatten)]
    pub groups: BTreeMap<GroupName, GroupEntry>,
}

/// Reserved top-level entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub hostvars: BTreeMap<HostName, VarMap>,
}

/// One group of the export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<HostName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GroupName>,
    #[serde(default, skip_serializing_if = "VarMap::is_empty")]
    pub vars: VarMap,
}

impl GroupEntry {
    /// Whether the entry carries nothing and is left out of the export.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.children.is_empty() && self.vars.is_empty()
    }
}

impl Inventory {
    pub fn group(&self, name: &str) -> Option<&GroupEntry> {
        self.groups.get(name)
    }

    pub fn hostvars(&self, host: &str) -> Option<&VarMap> {
        self.meta.hostvars.get(host)
    }

    /// Render as JSON, indented when `pretty`.
    pub fn to_json(&self, pretty: bool) -> crate::error::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
