//! Relational model.
//!
//! One `Vec` of rows per table and a single id sequence shared by all of
//! them. Every mutation goes through a method here, which enforces unique
//! constraints, foreign-key existence and cascade deletes before touching
//! a row.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::constants;
use crate::core::domain::{
    Group, GroupVariable, Host, HostGroup, HostPatch, HostVariable, RequiredVariable,
    StoredValue, Variable, VariableAlias, VariablePatch, VariableSpec, Write,
};
use crate::core::types::{AliasId, GroupId, HostId, RowId, VariableId};
use crate::error::{Entity, Error, InvariantError, Result};

/// All persisted tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    sequence: RowId,
    #[serde(default)]
    hosts: Vec<Host>,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    variables: Vec<Variable>,
    #[serde(default)]
    aliases: Vec<VariableAlias>,
    #[serde(default)]
    memberships: Vec<HostGroup>,
    #[serde(default)]
    host_variables: Vec<HostVariable>,
    #[serde(default)]
    group_variables: Vec<GroupVariable>,
    #[serde(default)]
    requirements: Vec<RequiredVariable>,
}

fn parse_id(reference: &str) -> Option<RowId> {
    reference.parse::<RowId>().ok()
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> RowId {
        self.sequence += 1;
        self.sequence
    }

    // ---- reads ----

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn aliases(&self) -> &[VariableAlias] {
        &self.aliases
    }

    pub fn memberships(&self) -> &[HostGroup] {
        &self.memberships
    }

    pub fn host_variables(&self) -> &[HostVariable] {
        &self.host_variables
    }

    pub fn group_variables(&self) -> &[GroupVariable] {
        &self.group_variables
    }

    pub fn requirements(&self) -> &[RequiredVariable] {
        &self.requirements
    }

    pub fn host(&self, id: HostId) -> Option<&Host> {
        self.hosts.iter().find(|h| h.id == id)
    }

    pub fn host_by_name(&self, name: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.name == name)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn root_group(&self) -> Option<&Group> {
        self.group_by_name(constants::ROOT_GROUP)
    }

    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id == id)
    }

    pub fn variable_by_key(&self, key: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.key == key)
    }

    pub fn alias(&self, id: AliasId) -> Option<&VariableAlias> {
        self.aliases.iter().find(|a| a.id == id)
    }

    /// Resolve a host reference (numeric id or name).
    pub fn resolve_host(&self, reference: &str) -> Result<&Host> {
        parse_id(reference)
            .and_then(|id| self.host(id))
            .or_else(|| self.host_by_name(reference))
            .ok_or_else(|| Error::not_found(Entity::Host, reference))
    }

    /// Resolve a group reference (numeric id or name).
    pub fn resolve_group(&self, reference: &str) -> Result<&Group> {
        parse_id(reference)
            .and_then(|id| self.group(id))
            .or_else(|| self.group_by_name(reference))
            .ok_or_else(|| Error::not_found(Entity::Group, reference))
    }

    /// Resolve a variable reference (numeric id or key).
    pub fn resolve_variable(&self, reference: &str) -> Result<&Variable> {
        parse_id(reference)
            .and_then(|id| self.variable(id))
            .or_else(|| self.variable_by_key(reference))
            .ok_or_else(|| Error::not_found(Entity::Variable, reference))
    }

    /// Groups a host directly belongs to.
    pub fn groups_of_host(&self, host_id: HostId) -> impl Iterator<Item = &Group> + '_ {
        self.memberships
            .iter()
            .filter(move |m| m.host_id == host_id)
            .filter_map(|m| self.group(m.group_id))
    }

    /// Direct members of a group.
    pub fn hosts_in_group(&self, group_id: GroupId) -> impl Iterator<Item = &Host> + '_ {
        self.memberships
            .iter()
            .filter(move |m| m.group_id == group_id)
            .filter_map(|m| self.host(m.host_id))
    }

    pub fn is_member(&self, host_id: HostId, group_id: GroupId) -> bool {
        self.memberships
            .iter()
            .any(|m| m.host_id == host_id && m.group_id == group_id)
    }

    pub fn children_of(&self, group_id: GroupId) -> impl Iterator<Item = &Group> + '_ {
        self.groups
            .iter()
            .filter(move |g| g.parent_id == Some(group_id))
    }

    pub fn host_variable(&self, host_id: HostId, variable_id: VariableId) -> Option<&HostVariable> {
        self.host_variables
            .iter()
            .find(|hv| hv.host_id == host_id && hv.variable_id == variable_id)
    }

    pub fn group_variable(
        &self,
        group_id: GroupId,
        variable_id: VariableId,
    ) -> Option<&GroupVariable> {
        self.group_variables
            .iter()
            .find(|gv| gv.group_id == group_id && gv.variable_id == variable_id)
    }

    pub fn variables_of_host(&self, host_id: HostId) -> impl Iterator<Item = &HostVariable> + '_ {
        self.host_variables
            .iter()
            .filter(move |hv| hv.host_id == host_id)
    }

    pub fn variables_of_group(
        &self,
        group_id: GroupId,
    ) -> impl Iterator<Item = &GroupVariable> + '_ {
        self.group_variables
            .iter()
            .filter(move |gv| gv.group_id == group_id)
    }

    pub fn requirements_of_group(
        &self,
        group_id: GroupId,
    ) -> impl Iterator<Item = &RequiredVariable> + '_ {
        self.requirements
            .iter()
            .filter(move |r| r.group_id == group_id)
    }

    /// Number of host and group values referencing a catalog entry.
    pub fn value_count(&self, variable_id: VariableId) -> usize {
        self.host_variables
            .iter()
            .filter(|hv| hv.variable_id == variable_id)
            .count()
            + self
                .group_variables
                .iter()
                .filter(|gv| gv.variable_id == variable_id)
                .count()
    }

    /// Ancestors of a group, nearest first.
    pub fn ancestors(&self, group_id: GroupId) -> Vec<GroupId> {
        let mut chain = Vec::new();
        let mut current = self.group(group_id).and_then(|g| g.parent_id);
        while let Some(id) = current {
            if id == group_id || chain.contains(&id) {
                break;
            }
            chain.push(id);
            current = self.group(id).and_then(|g| g.parent_id);
        }
        chain
    }

    /// A group and all of its descendants.
    pub fn subtree(&self, group_id: GroupId) -> BTreeSet<GroupId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![group_id];
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                stack.extend(self.children_of(id).map(|g| g.id));
            }
        }
        seen
    }

    fn require_host(&self, id: HostId) -> Result<&Host> {
        self.host(id)
            .ok_or_else(|| Error::not_found(Entity::Host, id.to_string()))
    }

    fn require_group(&self, id: GroupId) -> Result<&Group> {
        self.group(id)
            .ok_or_else(|| Error::not_found(Entity::Group, id.to_string()))
    }

    fn require_variable(&self, id: VariableId) -> Result<&Variable> {
        self.variable(id)
            .ok_or_else(|| Error::not_found(Entity::Variable, id.to_string()))
    }

    // ---- hosts ----

    pub fn insert_host(&mut self, name: &str, description: &str, active: bool) -> Result<HostId> {
        if self.host_by_name(name).is_some() {
            return Err(Error::conflict(Entity::Host, name));
        }
        let id = self.next_id();
        let now = Utc::now();
        self.hosts.push(Host {
            id,
            name: name.to_string(),
            description: description.to_string(),
            active,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    pub fn update_host(&mut self, id: HostId, patch: &HostPatch) -> Result<()> {
        if let Some(name) = &patch.name {
            if self.hosts.iter().any(|h| h.name == *name && h.id != id) {
                return Err(Error::conflict(Entity::Host, name.as_str()));
            }
        }
        let host = self
            .hosts
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| Error::not_found(Entity::Host, id.to_string()))?;
        if let Some(name) = &patch.name {
            host.name = name.clone();
        }
        if let Some(description) = &patch.description {
            host.description = description.clone();
        }
        if let Some(active) = patch.active {
            host.active = active;
        }
        host.updated_at = Utc::now();
        Ok(())
    }

    /// Delete a host with its memberships and assignments.
    pub fn delete_host(&mut self, id: HostId) -> Result<Host> {
        let index = self
            .hosts
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| Error::not_found(Entity::Host, id.to_string()))?;
        self.memberships.retain(|m| m.host_id != id);
        self.host_variables.retain(|hv| hv.host_id != id);
        Ok(self.hosts.remove(index))
    }

    // ---- groups ----

    pub fn insert_group(
        &mut self,
        name: &str,
        description: &str,
        parent_id: Option<GroupId>,
    ) -> Result<GroupId> {
        reserved_group_name(name)?;
        if self.group_by_name(name).is_some() {
            return Err(Error::conflict(Entity::Group, name));
        }
        if parent_id.is_some() && name == constants::ROOT_GROUP {
            return Err(InvariantError::RootParent(name.to_string()).into());
        }
        if let Some(parent) = parent_id {
            self.require_group(parent)?;
        }
        let id = self.next_id();
        let now = Utc::now();
        self.groups.push(Group {
            id,
            name: name.to_string(),
            description: description.to_string(),
            parent_id,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    pub fn rename_group(&mut self, id: GroupId, name: &str) -> Result<()> {
        let group = self.require_group(id)?;
        if group.name == name {
            return Ok(());
        }
        if group.is_protected() {
            return Err(InvariantError::ProtectedGroup {
                name: group.name.clone(),
                action: "renamed",
            }
            .into());
        }
        reserved_group_name(name)?;
        if self.group_by_name(name).is_some() {
            return Err(Error::conflict(Entity::Group, name));
        }
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == id) {
            group.name = name.to_string();
            group.updated_at = Utc::now();
        }
        Ok(())
    }

    pub fn describe_group(&mut self, id: GroupId, description: &str) -> Result<()> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::not_found(Entity::Group, id.to_string()))?;
        group.description = description.to_string();
        group.updated_at = Utc::now();
        Ok(())
    }

    /// Move a group under `parent_id`.
    ///
    /// Rejects re-parenting the root, self-parenting and any move that
    /// would make a group its own ancestor. Returns whether the link changed.
    pub fn set_group_parent(&mut self, id: GroupId, parent_id: Option<GroupId>) -> Result<bool> {
        let group = self.require_group(id)?;
        if group.parent_id == parent_id {
            return Ok(false);
        }
        if let Some(parent) = parent_id {
            if group.is_root() {
                return Err(InvariantError::RootParent(group.name.clone()).into());
            }
            if parent == id {
                return Err(InvariantError::SelfParent(group.name.clone()).into());
            }
            let parent_group = self.require_group(parent)?;
            if self.ancestors(parent).contains(&id) {
                return Err(InvariantError::ParentCycle {
                    group: group.name.clone(),
                    parent: parent_group.name.clone(),
                }
                .into());
            }
        }
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == id) {
            group.parent_id = parent_id;
            group.updated_at = Utc::now();
        }
        Ok(true)
    }

    /// Delete a group and its whole subtree, with their memberships,
    /// assignments and requirements. Returns the removed groups.
    pub fn delete_group(&mut self, id: GroupId) -> Result<Vec<Group>> {
        self.require_group(id)?;
        let doomed = self.subtree(id);
        if let Some(protected) = doomed
            .iter()
            .filter_map(|gid| self.group(*gid))
            .find(|g| g.is_protected())
        {
            return Err(InvariantError::ProtectedGroup {
                name: protected.name.clone(),
                action: "deleted",
            }
            .into());
        }

        self.memberships.retain(|m| !doomed.contains(&m.group_id));
        self.group_variables.retain(|gv| !doomed.contains(&gv.group_id));
        self.requirements.retain(|r| !doomed.contains(&r.group_id));

        let (removed, kept) = std::mem::take(&mut self.groups)
            .into_iter()
            .partition(|g| doomed.contains(&g.id));
        self.groups = kept;
        Ok(removed)
    }

    // ---- catalog ----

    pub fn insert_variable(&mut self, spec: &VariableSpec) -> Result<VariableId> {
        if self.variable_by_key(&spec.key).is_some() {
            return Err(Error::conflict(Entity::Variable, spec.key.as_str()));
        }
        if let Some(pattern) = &spec.validation {
            check_regex(&spec.key, pattern)?;
        }
        let id = self.next_id();
        let now = Utc::now();
        self.variables.push(Variable {
            id,
            key: spec.key.clone(),
            description: spec.description.clone(),
            sensitive: spec.sensitive,
            var_type: spec.var_type,
            default_value: spec.default_value.clone(),
            validation: spec.validation.clone(),
            builtin: spec.builtin,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    /// Update a catalog entry.
    ///
    /// Flipping sensitivity is rejected while any value references the
    /// entry, since the stored representation would no longer match.
    pub fn update_variable(&mut self, id: VariableId, patch: &VariablePatch) -> Result<()> {
        let variable = self.require_variable(id)?;
        if let Some(sensitive) = patch.sensitive {
            let values = self.value_count(id);
            if sensitive != variable.sensitive && values > 0 {
                return Err(InvariantError::SensitivityLocked {
                    key: variable.key.clone(),
                    values,
                }
                .into());
            }
        }
        if let Some(Some(pattern)) = &patch.validation {
            check_regex(&variable.key, pattern)?;
        }

        let variable = self
            .variables
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| Error::not_found(Entity::Variable, id.to_string()))?;
        if let Some(description) = &patch.description {
            variable.description = description.clone();
        }
        if let Some(sensitive) = patch.sensitive {
            variable.sensitive = sensitive;
        }
        if let Some(var_type) = patch.var_type {
            variable.var_type = var_type;
        }
        if let Some(default_value) = &patch.default_value {
            variable.default_value = default_value.clone();
        }
        if let Some(validation) = &patch.validation {
            variable.validation = validation.clone();
        }
        variable.updated_at = Utc::now();
        Ok(())
    }

    /// Delete a catalog entry with its assignments, requirements and aliases.
    pub fn delete_variable(&mut self, id: VariableId, force: bool) -> Result<Variable> {
        let variable = self.require_variable(id)?;
        if variable.builtin && !force {
            return Err(InvariantError::BuiltinVariable(variable.key.clone()).into());
        }
        self.host_variables.retain(|hv| hv.variable_id != id);
        self.group_variables.retain(|gv| gv.variable_id != id);
        self.requirements.retain(|r| r.variable_id != id);
        self.aliases
            .retain(|a| a.alias_id != id && a.source_id != id);

        let index = self
            .variables
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| Error::not_found(Entity::Variable, id.to_string()))?;
        Ok(self.variables.remove(index))
    }

    // ---- aliases ----

    pub fn insert_alias(
        &mut self,
        alias_id: VariableId,
        source_id: VariableId,
        description: &str,
    ) -> Result<AliasId> {
        let alias = self.require_variable(alias_id)?;
        if alias_id == source_id {
            return Err(InvariantError::SelfAlias(alias.key.clone()).into());
        }
        let source = self.require_variable(source_id)?;
        if self
            .aliases
            .iter()
            .any(|a| a.alias_id == alias_id && a.source_id == source_id)
        {
            return Err(Error::conflict(
                Entity::Alias,
                format!("{} -> {}", alias.key, source.key),
            ));
        }
        let id = self.next_id();
        self.aliases.push(VariableAlias {
            id,
            alias_id,
            source_id,
            description: description.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    pub fn delete_alias(&mut self, id: AliasId) -> Result<VariableAlias> {
        let index = self
            .aliases
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| Error::not_found(Entity::Alias, id.to_string()))?;
        Ok(self.aliases.remove(index))
    }

    // ---- memberships ----

    pub fn insert_membership(&mut self, host_id: HostId, group_id: GroupId) -> Result<RowId> {
        let host = self.require_host(host_id)?;
        let group = self.require_group(group_id)?;
        if self.is_member(host_id, group_id) {
            return Err(Error::conflict(
                Entity::Membership,
                format!("{} in {}", host.name, group.name),
            ));
        }
        let id = self.next_id();
        self.memberships.push(HostGroup {
            id,
            host_id,
            group_id,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    pub fn delete_membership(&mut self, host_id: HostId, group_id: GroupId) -> Result<()> {
        let index = self
            .memberships
            .iter()
            .position(|m| m.host_id == host_id && m.group_id == group_id)
            .ok_or_else(|| {
                Error::not_found(Entity::Membership, format!("{}/{}", host_id, group_id))
            })?;
        self.memberships.remove(index);
        Ok(())
    }

    // ---- assignments ----

    fn check_representation(&self, variable_id: VariableId, value: &StoredValue) -> Result<()> {
        let variable = self.require_variable(variable_id)?;
        if variable.sensitive != value.is_encrypted() {
            return Err(InvariantError::Representation {
                key: variable.key.clone(),
                expected: if variable.sensitive {
                    "encrypted"
                } else {
                    "cleartext"
                },
            }
            .into());
        }
        Ok(())
    }

    /// Upsert a host value. The representation must match the entry's
    /// sensitivity.
    pub fn put_host_variable(
        &mut self,
        host_id: HostId,
        variable_id: VariableId,
        value: StoredValue,
    ) -> Result<Write> {
        self.require_host(host_id)?;
        self.check_representation(variable_id, &value)?;

        let now = Utc::now();
        if let Some(row) = self
            .host_variables
            .iter_mut()
            .find(|hv| hv.host_id == host_id && hv.variable_id == variable_id)
        {
            if row.value == value {
                return Ok(Write::Unchanged);
            }
            row.value = value;
            row.updated_at = now;
            return Ok(Write::Updated);
        }

        let id = self.next_id();
        self.host_variables.push(HostVariable {
            id,
            host_id,
            variable_id,
            value,
            created_at: now,
            updated_at: now,
        });
        Ok(Write::Created)
    }

    pub fn delete_host_variable(&mut self, host_id: HostId, variable_id: VariableId) -> Result<()> {
        let index = self
            .host_variables
            .iter()
            .position(|hv| hv.host_id == host_id && hv.variable_id == variable_id)
            .ok_or_else(|| {
                Error::not_found(Entity::HostVariable, format!("{}/{}", host_id, variable_id))
            })?;
        self.host_variables.remove(index);
        Ok(())
    }

    /// Upsert a group value. The representation must match the entry's
    /// sensitivity.
    pub fn put_group_variable(
        &mut self,
        group_id: GroupId,
        variable_id: VariableId,
        value: StoredValue,
    ) -> Result<Write> {
        self.require_group(group_id)?;
        self.check_representation(variable_id, &value)?;

        let now = Utc::now();
        if let Some(row) = self
            .group_variables
            .iter_mut()
            .find(|gv| gv.group_id == group_id && gv.variable_id == variable_id)
        {
            if row.value == value {
                return Ok(Write::Unchanged);
            }
            row.value = value;
            row.updated_at = now;
            return Ok(Write::Updated);
        }

        let id = self.next_id();
        self.group_variables.push(GroupVariable {
            id,
            group_id,
            variable_id,
            value,
            created_at: now,
            updated_at: now,
        });
        Ok(Write::Created)
    }

    pub fn delete_group_variable(
        &mut self,
        group_id: GroupId,
        variable_id: VariableId,
    ) -> Result<()> {
        let index = self
            .group_variables
            .iter()
            .position(|gv| gv.group_id == group_id && gv.variable_id == variable_id)
            .ok_or_else(|| {
                Error::not_found(
                    Entity::GroupVariable,
                    format!("{}/{}", group_id, variable_id),
                )
            })?;
        self.group_variables.remove(index);
        Ok(())
    }

    // ---- requirements ----

    pub fn insert_requirement(
        &mut self,
        group_id: GroupId,
        variable_id: VariableId,
        required: bool,
        default_override: Option<String>,
    ) -> Result<RowId> {
        let group = self.require_group(group_id)?;
        let variable = self.require_variable(variable_id)?;
        if self
            .requirements
            .iter()
            .any(|r| r.group_id == group_id && r.variable_id == variable_id)
        {
            return Err(Error::conflict(
                Entity::RequiredVariable,
                format!("{} on {}", variable.key, group.name),
            ));
        }
        let id = self.next_id();
        self.requirements.push(RequiredVariable {
            id,
            group_id,
            variable_id,
            required,
            default_override,
        });
        Ok(id)
    }

    pub fn delete_requirement(&mut self, group_id: GroupId, variable_id: VariableId) -> Result<()> {
        let index = self
            .requirements
            .iter()
            .position(|r| r.group_id == group_id && r.variable_id == variable_id)
            .ok_or_else(|| {
                Error::not_found(
                    Entity::RequiredVariable,
                    format!("{}/{}", group_id, variable_id),
                )
            })?;
        self.requirements.remove(index);
        Ok(())
    }
}

fn check_regex(key: &str, pattern: &str) -> Result<()> {
    regex::Regex::new(pattern).map_err(|e| InvariantError::InvalidRegex {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// `_meta` would collide with the export's hostvars entry.
fn reserved_group_name(name: &str) -> Result<()> {
    if name == constants::META_KEY {
        return Err(InvariantError::ReservedGroupName(name.to_string()).into());
    }
    Ok(())
}
