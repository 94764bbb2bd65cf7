//! Group operations.

use serde::Serialize;

use super::Repository;
use crate::core::builder::InventoryBuilder;
use crate::core::domain::{Group, GroupPatch, Sealed, VarEntry, Write};
use crate::core::tree::GroupTree;
use crate::core::types::{GroupName, HostName, VarKey};
use crate::error::{CipherError, Entity, Error, Result};

/// A group with its direct neighbourhood.
#[derive(Debug, Clone, Serialize)]
pub struct GroupDetails {
    pub group: Group,
    pub parent: Option<GroupName>,
    pub children: Vec<GroupName>,
    /// Direct members, active or not
    pub hosts: Vec<HostName>,
}

/// A required-variable declaration, by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub key: VarKey,
    pub required: bool,
    pub default: Option<String>,
}

impl Repository {
    /// Create a group under `parent`, or under the root group by default.
    pub fn create_group(
        &self,
        name: &str,
        description: &str,
        parent: Option<&str>,
    ) -> Result<Group> {
        self.database.write(|tables| {
            let parent = match parent {
                Some(reference) => Some(tables.resolve_group(reference)?.id),
                None => tables.root_group().map(|g| g.id),
            };
            let id = tables.insert_group(name, description, parent)?;
            tables
                .group(id)
                .cloned()
                .ok_or_else(|| Error::not_found(Entity::Group, name))
        })
    }

    pub fn group(&self, reference: &str) -> Result<GroupDetails> {
        let tables = self.database.read()?;
        let group = tables.resolve_group(reference)?.clone();
        let parent = group
            .parent_id
            .and_then(|id| tables.group(id))
            .map(|g| g.name.clone());
        let mut children: Vec<GroupName> =
            tables.children_of(group.id).map(|g| g.name.clone()).collect();
        children.sort();
        let mut hosts: Vec<HostName> = tables
            .hosts_in_group(group.id)
            .map(|h| h.name.clone())
            .collect();
        hosts.sort();
        Ok(GroupDetails {
            group,
            parent,
            children,
            hosts,
        })
    }

    /// Every group, by name.
    pub fn groups(&self) -> Result<Vec<Group>> {
        let tables = self.database.read()?;
        let mut groups = tables.groups().to_vec();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    /// The group tree with masked values, for rendering and audits.
    pub fn group_tree(&self) -> Result<GroupTree> {
        let tables = self.database.read()?;
        Ok(InventoryBuilder::new(&tables, self.boundary())
            .masked(true)
            .tree())
    }

    /// Rename, describe or re-parent a group.
    ///
    /// # Errors
    ///
    /// Returns `InvariantError` for a protected rename, a root re-parent or
    /// a parent cycle; nothing is written in that case.
    pub fn update_group(&self, reference: &str, patch: &GroupPatch) -> Result<Group> {
        self.database.write(|tables| {
            let id = tables.resolve_group(reference)?.id;
            if let Some(name) = &patch.name {
                tables.rename_group(id, name)?;
            }
            if let Some(description) = &patch.description {
                tables.describe_group(id, description)?;
            }
            if let Some(parent) = &patch.parent {
                let parent = tables.resolve_group(parent)?.id;
                tables.set_group_parent(id, Some(parent))?;
            }
            tables
                .group(id)
                .cloned()
                .ok_or_else(|| Error::not_found(Entity::Group, reference))
        })
    }

    /// Delete a group and its subtree. Returns the removed groups.
    pub fn delete_group(&self, reference: &str) -> Result<Vec<Group>> {
        self.database.write(|tables| {
            let id = tables.resolve_group(reference)?.id;
            tables.delete_group(id)
        })
    }

    /// Active hosts of a group, direct or aggregated over its subtree.
    pub fn group_hosts(&self, reference: &str, aggregated: bool) -> Result<Vec<HostName>> {
        let tables = self.database.read()?;
        let id = tables.resolve_group(reference)?.id;
        let tree = InventoryBuilder::new(&tables, self.boundary())
            .masked(true)
            .tree();
        let hosts = if aggregated {
            tree.aggregated_hosts(id).cloned().unwrap_or_default()
        } else {
            tree.node(id).map(|n| n.hosts().clone()).unwrap_or_default()
        };
        Ok(hosts.into_iter().collect())
    }

    /// A group's values, local or inherited, masked unless `reveal`.
    pub fn group_variables(
        &self,
        reference: &str,
        inherited: bool,
        reveal: bool,
    ) -> Result<Vec<VarEntry>> {
        let tables = self.database.read()?;
        let group = tables.resolve_group(reference)?.clone();

        if !inherited {
            let mut entries: Vec<VarEntry> = tables
                .variables_of_group(group.id)
                .filter_map(|row| {
                    let variable = tables.variable(row.variable_id)?;
                    Some(self.entry(&variable.key, variable.sensitive, &row.value, reveal))
                })
                .collect();
            entries.sort_by(|a, b| a.key.cmp(&b.key));
            return Ok(entries);
        }

        let vars = InventoryBuilder::new(&tables, self.boundary())
            .masked(!reveal)
            .inherited_vars(&group.name)?;
        Ok(vars
            .into_iter()
            .map(|(key, value)| {
                let sensitive = tables
                    .variable_by_key(&key)
                    .map(|v| v.sensitive)
                    .unwrap_or(false);
                VarEntry {
                    key,
                    value,
                    sensitive,
                }
            })
            .collect())
    }

    /// Upsert a group value. Sensitive entries are encrypted.
    pub fn set_group_var(&self, group: &str, key: &str, value: &str) -> Result<Write> {
        self.database.write(|tables| {
            let group = tables.resolve_group(group)?.id;
            let variable = tables.resolve_variable(key)?;
            let (variable_id, sensitive) = (variable.id, variable.sensitive);
            let current = tables
                .group_variable(group, variable_id)
                .map(|row| &row.value);
            match self.boundary().seal(sensitive, current, value) {
                Sealed::Unchanged => Ok(Write::Unchanged),
                Sealed::Store(stored) => tables.put_group_variable(group, variable_id, stored),
                Sealed::Skipped => Err(CipherError::EncryptionFailed(format!(
                    "value of '{}' is empty or could not be encrypted",
                    key
                ))
                .into()),
            }
        })
    }

    pub fn unset_group_var(&self, group: &str, key: &str) -> Result<()> {
        self.database.write(|tables| {
            let group = tables.resolve_group(group)?.id;
            let variable = tables.resolve_variable(key)?.id;
            tables.delete_group_variable(group, variable)
        })
    }

    /// Declare a variable required (or optional) for a group's members.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the group already declares the variable.
    pub fn require(
        &self,
        group: &str,
        key: &str,
        required: bool,
        default: Option<String>,
    ) -> Result<()> {
        self.database.write(|tables| {
            let group = tables.resolve_group(group)?.id;
            let variable = tables.resolve_variable(key)?.id;
            tables.insert_requirement(group, variable, required, default)?;
            Ok(())
        })
    }

    pub fn unrequire(&self, group: &str, key: &str) -> Result<()> {
        self.database.write(|tables| {
            let group = tables.resolve_group(group)?.id;
            let variable = tables.resolve_variable(key)?.id;
            tables.delete_requirement(group, variable)
        })
    }

    /// Declarations of one group, by key.
    pub fn requirements(&self, group: &str) -> Result<Vec<Requirement>> {
        let tables = self.database.read()?;
        let group = tables.resolve_group(group)?.id;
        let mut requirements: Vec<Requirement> = tables
            .requirements_of_group(group)
            .filter_map(|r| {
                let variable = tables.variable(r.variable_id)?;
                Some(Requirement {
                    key: variable.key.clone(),
                    required: r.required,
                    default: r.default_override.clone(),
                })
            })
            .collect();
        requirements.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(requirements)
    }
}
