//! Bulk import.
//!
//! An [`Importer`] upserts hosts, groups, catalog entries and assignments
//! into a working copy of the tables. Every `ensure_*` is a lookup first
//! and a create only when absent, and every assignment goes through the
//! encryption boundary's `seal`, so re-running an import over unchanged
//! input performs no writes.
//!
//! The importer never commits. Callers run it inside a transaction and
//! either commit or, for a dry run, roll back.

mod document;

pub use document::{GroupDocument, GroupsDocument, HostDocument, RawValue, VarsDocument};

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::cipher::Boundary;
use crate::core::domain::{Sealed, VariableSpec, Write};
use crate::core::store::Tables;
use crate::core::types::{GroupId, HostId, HostName, VariableId};
use crate::error::Result;

/// Per-category counters of one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub hosts_created: usize,
    pub groups_created: usize,
    pub variables_created: usize,
    pub host_vars_created: usize,
    pub host_vars_updated: usize,
    pub group_vars_created: usize,
    pub group_vars_updated: usize,
    pub memberships_created: usize,
    pub groups_reparented: usize,
    /// Assignments already holding the imported value
    pub unchanged: usize,
    /// Sensitive values that could not be encrypted
    pub skipped: usize,
    pub dry_run: bool,
}

impl ImportStats {
    /// Rows created.
    pub fn created(&self) -> usize {
        self.hosts_created
            + self.groups_created
            + self.variables_created
            + self.host_vars_created
            + self.group_vars_created
            + self.memberships_created
    }

    /// Rows created or modified.
    pub fn writes(&self) -> usize {
        self.created() + self.host_vars_updated + self.group_vars_updated + self.groups_reparented
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} host(s), {} group(s), {} variable(s) created; {} value(s) created, {} updated, {} unchanged, {} skipped",
            self.hosts_created,
            self.groups_created,
            self.variables_created,
            self.host_vars_created + self.group_vars_created,
            self.host_vars_updated + self.group_vars_updated,
            self.unchanged,
            self.skipped,
        )
    }
}

/// Upserts document content into a set of tables.
pub struct Importer<'a> {
    tables: &'a mut Tables,
    boundary: &'a Boundary,
    sensitive: Vec<String>,
    stats: ImportStats,
}

impl<'a> Importer<'a> {
    pub fn new(tables: &'a mut Tables, boundary: &'a Boundary) -> Self {
        Self {
            tables,
            boundary,
            sensitive: Vec::new(),
            stats: ImportStats::default(),
        }
    }

    /// Extra keys to register as sensitive when first seen.
    pub fn with_sensitive_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.sensitive.extend(keys);
        self
    }

    pub fn stats(&self) -> &ImportStats {
        &self.stats
    }

    pub fn finish(self) -> ImportStats {
        info!(summary = %self.stats.summary(), "import finished");
        self.stats
    }

    /// Look up a host by name, creating it if absent.
    pub fn ensure_host(&mut self, name: &str) -> Result<HostId> {
        if let Some(host) = self.tables.host_by_name(name) {
            return Ok(host.id);
        }
        let id = self.tables.insert_host(name, "", true)?;
        self.stats.hosts_created += 1;
        debug!(host = name, "host created");
        Ok(id)
    }

    /// Look up a group by name, creating it if absent.
    ///
    /// An existing group is moved under `parent` when one is given and
    /// differs. A new group without `parent` lands under the root group; the
    /// root group itself never gets a parent.
    pub fn ensure_group(&mut self, name: &str, parent: Option<GroupId>) -> Result<GroupId> {
        if let Some(group) = self.tables.group_by_name(name) {
            let (id, is_root, current) = (group.id, group.is_root(), group.parent_id);
            if let Some(parent) = parent.filter(|p| !is_root && current != Some(*p)) {
                self.tables.set_group_parent(id, Some(parent))?;
                self.stats.groups_reparented += 1;
                debug!(group = name, parent, "group reparented");
            }
            return Ok(id);
        }

        let parent = if name == crate::core::constants::ROOT_GROUP {
            None
        } else {
            parent.or_else(|| self.tables.root_group().map(|g| g.id))
        };
        let id = self.tables.insert_group(name, "", parent)?;
        self.stats.groups_created += 1;
        debug!(group = name, "group created");
        Ok(id)
    }

    /// Look up a catalog entry by key, registering it if absent.
    ///
    /// Classification only happens at creation; existing entries are never
    /// reclassified.
    pub fn ensure_variable(&mut self, key: &str) -> Result<VariableId> {
        if let Some(variable) = self.tables.variable_by_key(key) {
            return Ok(variable.id);
        }
        let spec = VariableSpec::classify(key, &self.sensitive);
        let id = self.tables.insert_variable(&spec)?;
        self.stats.variables_created += 1;
        debug!(key, sensitive = spec.sensitive, builtin = spec.builtin, "variable registered");
        Ok(id)
    }

    /// Make `host` a direct member of `group` if it isn't already.
    pub fn link(&mut self, host: HostId, group: GroupId) -> Result<()> {
        if !self.tables.is_member(host, group) {
            self.tables.insert_membership(host, group)?;
            self.stats.memberships_created += 1;
        }
        Ok(())
    }

    /// Upsert one host value.
    pub fn assign_host_variable(&mut self, host: HostId, key: &str, value: &str) -> Result<()> {
        let variable = self.ensure_variable(key)?;
        let sensitive = self.sensitive_entry(variable);
        let current = self.tables.host_variable(host, variable).map(|row| &row.value);
        match self.boundary.seal(sensitive, current, value) {
            Sealed::Unchanged => self.stats.unchanged += 1,
            Sealed::Skipped => self.skip(key),
            Sealed::Store(stored) => match self.tables.put_host_variable(host, variable, stored)? {
                Write::Created => self.stats.host_vars_created += 1,
                Write::Updated => self.stats.host_vars_updated += 1,
                Write::Unchanged => self.stats.unchanged += 1,
            },
        }
        Ok(())
    }

    /// Upsert one group value.
    pub fn assign_group_variable(&mut self, group: GroupId, key: &str, value: &str) -> Result<()> {
        let variable = self.ensure_variable(key)?;
        let sensitive = self.sensitive_entry(variable);
        let current = self
            .tables
            .group_variable(group, variable)
            .map(|row| &row.value);
        match self.boundary.seal(sensitive, current, value) {
            Sealed::Unchanged => self.stats.unchanged += 1,
            Sealed::Skipped => self.skip(key),
            Sealed::Store(stored) => {
                match self.tables.put_group_variable(group, variable, stored)? {
                    Write::Created => self.stats.group_vars_created += 1,
                    Write::Updated => self.stats.group_vars_updated += 1,
                    Write::Unchanged => self.stats.unchanged += 1,
                }
            }
        }
        Ok(())
    }

    fn sensitive_entry(&self, variable: VariableId) -> bool {
        self.tables
            .variable(variable)
            .map(|v| v.sensitive)
            .unwrap_or(false)
    }

    fn skip(&mut self, key: &str) {
        warn!(key, "sensitive value not stored: empty or could not be encrypted");
        self.stats.skipped += 1;
    }

    /// Import a group document. Top-level groups go under `parent`.
    pub fn import_groups(&mut self, document: &GroupsDocument, parent: Option<GroupId>) -> Result<()> {
        for (name, group) in document.groups() {
            self.import_group(name, group, parent)?;
        }
        Ok(())
    }

    /// Group first, then its hosts, then its variables, then its children,
    /// so a child is never created before its parent.
    fn import_group(
        &mut self,
        name: &str,
        document: Option<&GroupDocument>,
        parent: Option<GroupId>,
    ) -> Result<()> {
        let group = self.ensure_group(name, parent)?;
        let Some(document) = document else {
            return Ok(());
        };

        for (host_name, vars) in document.hosts() {
            let host = self.ensure_host(host_name)?;
            self.link(host, group)?;
            for (key, value) in vars.into_iter().flatten() {
                self.assign_host_variable(host, key, &value.normalize())?;
            }
        }

        for (key, value) in document.vars() {
            self.assign_group_variable(group, key, &value.normalize())?;
        }

        for (child, child_document) in document.children() {
            self.import_group(child, child_document, Some(group))?;
        }
        Ok(())
    }

    /// Import host variables, optionally linking every host to `group`.
    pub fn import_hosts(
        &mut self,
        hosts: &IndexMap<HostName, VarsDocument>,
        group: Option<GroupId>,
    ) -> Result<()> {
        for (name, vars) in hosts {
            let host = self.ensure_host(name)?;
            if let Some(group) = group {
                self.link(host, group)?;
            }
            for (key, value) in vars {
                self.assign_host_variable(host, key, &value.normalize())?;
            }
        }
        Ok(())
    }
}

/// Keys of a document that would be registered sensitive, for reporting.
pub fn sensitive_keys(document: &GroupsDocument, extra: &[String]) -> BTreeSet<String> {
    fn walk(doc: &GroupDocument, extra: &[String], out: &mut BTreeSet<String>) {
        let keys = doc
            .hosts()
            .flat_map(|(_, vars)| vars.into_iter().flat_map(|v| v.keys()))
            .chain(doc.vars().map(|(k, _)| k));
        for key in keys {
            if VariableSpec::classify(key, extra).sensitive {
                out.insert(key.clone());
            }
        }
        for child in doc.children().filter_map(|(_, child)| child) {
            walk(child, extra, out);
        }
    }

    let mut out = BTreeSet::new();
    for group in document.groups().filter_map(|(_, group)| group) {
        walk(group, extra, &mut out);
    }
    out
}
