//! Host rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{GroupId, HostId, HostName, RowId};

/// A managed host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    pub name: HostName,
    #[serde(default)]
    pub description: String,
    /// Inactive hosts are kept but never exported.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Direct membership of a host in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostGroup {
    pub id: RowId,
    pub host_id: HostId,
    pub group_id: GroupId,
    pub created_at: DateTime<Utc>,
}

/// Partial update of a host. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct HostPatch {
    pub name: Option<HostName>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl HostPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.active.is_none()
    }
}

/// Listing filter for hosts.
#[derive(Debug, Clone, Default)]
pub struct HostFilter {
    /// Only hosts with this active state
    pub active: Option<bool>,
    /// Only direct members of this group (id or name)
    pub group: Option<String>,
    /// Only hosts whose name contains this substring
    pub name: Option<String>,
}
