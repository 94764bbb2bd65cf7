//! Group rows and per-group schema declarations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::constants;
use crate::core::types::{GroupId, GroupName, RowId, VariableId};

/// A group of hosts. Groups form a forest under the root group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: GroupName,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<GroupId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Whether this is the root group.
    pub fn is_root(&self) -> bool {
        self.name == constants::ROOT_GROUP
    }

    /// Whether this group can be neither renamed nor deleted.
    pub fn is_protected(&self) -> bool {
        constants::is_protected_group(&self.name)
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Declares a variable mandatory or optional for members of a group.
///
/// Consulted by lint only; resolution ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredVariable {
    pub id: RowId,
    pub group_id: GroupId,
    pub variable_id: VariableId,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_override: Option<String>,
}

/// Partial update of a group.
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub name: Option<GroupName>,
    pub description: Option<String>,
    /// New parent reference (id or name)
    pub parent: Option<String>,
}

impl GroupPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.parent.is_none()
    }
}
