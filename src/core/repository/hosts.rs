//! Host operations.

use serde::Serialize;

use super::Repository;
use crate::core::domain::{Host, HostFilter, HostPatch, Sealed, StoredValue, VarEntry, Write};
use crate::core::store::Tables;
use crate::core::types::{GroupName, HostId};
use crate::error::{CipherError, Entity, Error, Result};

/// A host with its groups and variables.
#[derive(Debug, Clone, Serialize)]
pub struct HostDetails {
    pub host: Host,
    pub groups: Vec<GroupName>,
    pub variables: Vec<VarEntry>,
}

impl Repository {
    /// Create a host, optionally joining it to `groups`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the name is taken, `NotFound` for an unknown group.
    pub fn create_host(
        &self,
        name: &str,
        description: &str,
        active: bool,
        groups: &[String],
    ) -> Result<Host> {
        self.database.write(|tables| {
            let id = tables.insert_host(name, description, active)?;
            for reference in groups {
                let group = tables.resolve_group(reference)?.id;
                tables.insert_membership(id, group)?;
            }
            tables
                .host(id)
                .cloned()
                .ok_or_else(|| Error::not_found(Entity::Host, name))
        })
    }

    /// A host with its groups and variables, masked unless `reveal`.
    pub fn host(&self, reference: &str, reveal: bool) -> Result<HostDetails> {
        let tables = self.database.read()?;
        let host = tables.resolve_host(reference)?.clone();
        let mut groups: Vec<GroupName> = tables
            .groups_of_host(host.id)
            .map(|g| g.name.clone())
            .collect();
        groups.sort();
        let variables = self.entries_of_host(&tables, host.id, reveal);
        Ok(HostDetails {
            host,
            groups,
            variables,
        })
    }

    /// Hosts matching `filter`, by name.
    pub fn hosts(&self, filter: &HostFilter) -> Result<Vec<Host>> {
        let tables = self.database.read()?;
        let group = filter
            .group
            .as_deref()
            .map(|reference| tables.resolve_group(reference).map(|g| g.id))
            .transpose()?;

        let mut hosts: Vec<Host> = tables
            .hosts()
            .iter()
            .filter(|h| filter.active.map_or(true, |active| h.active == active))
            .filter(|h| group.map_or(true, |g| tables.is_member(h.id, g)))
            .filter(|h| {
                filter
                    .name
                    .as_deref()
                    .map_or(true, |needle| h.name.contains(needle))
            })
            .cloned()
            .collect();
        hosts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hosts)
    }

    pub fn update_host(&self, reference: &str, patch: &HostPatch) -> Result<Host> {
        self.database.write(|tables| {
            let id = tables.resolve_host(reference)?.id;
            tables.update_host(id, patch)?;
            tables
                .host(id)
                .cloned()
                .ok_or_else(|| Error::not_found(Entity::Host, reference))
        })
    }

    /// Delete a host with its memberships and values.
    pub fn delete_host(&self, reference: &str) -> Result<Host> {
        self.database.write(|tables| {
            let id = tables.resolve_host(reference)?.id;
            tables.delete_host(id)
        })
    }

    /// Add a direct membership.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the host already belongs to the group.
    pub fn join_group(&self, host: &str, group: &str) -> Result<()> {
        self.database.write(|tables| {
            let host = tables.resolve_host(host)?.id;
            let group = tables.resolve_group(group)?.id;
            tables.insert_membership(host, group)?;
            Ok(())
        })
    }

    /// Remove a direct membership.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the host is not a direct member.
    pub fn leave_group(&self, host: &str, group: &str) -> Result<()> {
        self.database.write(|tables| {
            let host = tables.resolve_host(host)?.id;
            let group = tables.resolve_group(group)?.id;
            tables.delete_membership(host, group)
        })
    }

    /// Upsert a host value. Sensitive entries are encrypted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown host or catalog key, and
    /// `CipherError` if a sensitive value cannot be encrypted.
    pub fn set_host_var(&self, host: &str, key: &str, value: &str) -> Result<Write> {
        self.database.write(|tables| {
            let host = tables.resolve_host(host)?.id;
            let variable = tables.resolve_variable(key)?;
            let (variable_id, sensitive) = (variable.id, variable.sensitive);
            let current = tables.host_variable(host, variable_id).map(|row| &row.value);
            match self.boundary().seal(sensitive, current, value) {
                Sealed::Unchanged => Ok(Write::Unchanged),
                Sealed::Store(stored) => tables.put_host_variable(host, variable_id, stored),
                Sealed::Skipped => Err(CipherError::EncryptionFailed(format!(
                    "value of '{}' is empty or could not be encrypted",
                    key
                ))
                .into()),
            }
        })
    }

    pub fn unset_host_var(&self, host: &str, key: &str) -> Result<()> {
        self.database.write(|tables| {
            let host = tables.resolve_host(host)?.id;
            let variable = tables.resolve_variable(key)?.id;
            tables.delete_host_variable(host, variable)
        })
    }

    /// A host's own values by key, masked unless `reveal`.
    pub fn host_variables(&self, host: &str, reveal: bool) -> Result<Vec<VarEntry>> {
        let tables = self.database.read()?;
        let host = tables.resolve_host(host)?.id;
        Ok(self.entries_of_host(&tables, host, reveal))
    }

    fn entries_of_host(&self, tables: &Tables, host: HostId, reveal: bool) -> Vec<VarEntry> {
        let mut entries: Vec<VarEntry> = tables
            .variables_of_host(host)
            .filter_map(|row| {
                let variable = tables.variable(row.variable_id)?;
                Some(self.entry(&variable.key, variable.sensitive, &row.value, reveal))
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    pub(super) fn entry(
        &self,
        key: &str,
        sensitive: bool,
        value: &StoredValue,
        reveal: bool,
    ) -> VarEntry {
        if sensitive && !reveal {
            return VarEntry::masked(key);
        }
        VarEntry {
            key: key.to_string(),
            value: self.boundary().reveal(value),
            sensitive,
        }
    }
}
