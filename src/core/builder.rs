//! Inventory resolution.
//!
//! Turns one snapshot of the tables into the exported [`Inventory`]:
//!
//! 1. load the alias table
//! 2. build the [`GroupTree`], one node per group, then attach each group's
//!    own variables
//! 3. attach every active host to its direct groups and resolve its own
//!    variables
//! 4. apply alias substitution to every host map and every group map
//! 5. walk the tree and emit direct hosts, direct children and local vars
//!    per group, leaving out groups with nothing to say
//!
//! Sensitive values are decrypted through the inventory boundary unless the
//! builder is masked. A value that fails to decrypt resolves to an empty
//! string; the rest of the build carries on.

use tracing::debug;

use crate::core::alias::AliasTable;
use crate::core::cipher::Boundary;
use crate::core::constants;
use crate::core::domain::{GroupEntry, Inventory, StoredValue};
use crate::core::store::Tables;
use crate::core::tree::GroupTree;
use crate::core::types::{GroupId, HostId, VarMap};
use crate::error::{Entity, Error, Result};

/// Resolution pass over one snapshot of the tables.
pub struct InventoryBuilder<'a> {
    tables: &'a Tables,
    boundary: &'a Boundary,
    aliases: AliasTable,
    masked: bool,
}

impl<'a> InventoryBuilder<'a> {
    pub fn new(tables: &'a Tables, boundary: &'a Boundary) -> Self {
        Self {
            tables,
            boundary,
            aliases: AliasTable::load(tables),
            masked: false,
        }
    }

    /// Show sensitive values as a mask instead of decrypting them.
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    fn decode(&self, value: &StoredValue) -> String {
        match value {
            StoredValue::Plain(value) => value.clone(),
            StoredValue::Encrypted(_) if self.masked => constants::MASK.to_string(),
            StoredValue::Encrypted(_) => self.boundary.reveal(value),
        }
    }

    /// A host's own variables with aliases applied.
    pub fn host_vars(&self, host_id: HostId) -> VarMap {
        let mut vars: VarMap = self
            .tables
            .variables_of_host(host_id)
            .filter_map(|row| {
                let variable = self.tables.variable(row.variable_id)?;
                Some((variable.key.clone(), self.decode(&row.value)))
            })
            .collect();
        self.aliases.apply(&mut vars);
        vars
    }

    /// A group's own variables with aliases applied.
    pub fn group_vars(&self, group_id: GroupId) -> VarMap {
        let mut vars: VarMap = self
            .tables
            .variables_of_group(group_id)
            .filter_map(|row| {
                let variable = self.tables.variable(row.variable_id)?;
                Some((variable.key.clone(), self.decode(&row.value)))
            })
            .collect();
        self.aliases.apply(&mut vars);
        vars
    }

    /// Build the group tree with local variables and active hosts attached.
    pub fn tree(&self) -> GroupTree {
        let mut tree = GroupTree::new();
        for group in self.tables.groups() {
            tree.add_group(group.id, &group.name, &group.description, group.parent_id);
        }
        for group in self.tables.groups() {
            tree.set_vars(group.id, self.group_vars(group.id));
        }
        for membership in self.tables.memberships() {
            if let Some(host) = self.tables.host(membership.host_id).filter(|h| h.active) {
                tree.add_host(membership.group_id, &host.name);
            }
        }
        tree
    }

    /// Produce the full export.
    pub fn build(&self) -> Inventory {
        let tree = self.tree();
        let mut inventory = Inventory::default();

        for host in self.tables.hosts().iter().filter(|h| h.active) {
            inventory
                .meta
                .hostvars
                .insert(host.name.clone(), self.host_vars(host.id));
        }

        for id in tree.post_order() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            let entry = GroupEntry {
                hosts: node.hosts().iter().cloned().collect(),
                children: tree
                    .children(id)
                    .iter()
                    .map(|child| child.name().to_string())
                    .collect(),
                vars: node.vars().clone(),
            };
            if !entry.is_empty() {
                inventory.groups.insert(node.name().to_string(), entry);
            }
        }

        debug!(
            groups = inventory.groups.len(),
            hosts = inventory.meta.hostvars.len(),
            masked = self.masked,
            "inventory resolved"
        );
        inventory
    }

    /// Resolved variables of one active host.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the host is absent or inactive.
    pub fn resolve_host(&self, name: &str) -> Result<VarMap> {
        let host = self
            .tables
            .host_by_name(name)
            .filter(|h| h.active)
            .ok_or_else(|| Error::not_found(Entity::Host, name))?;
        Ok(self.host_vars(host.id))
    }

    /// A group's variables merged over its ancestors'.
    pub fn inherited_vars(&self, group: &str) -> Result<VarMap> {
        let tree = self.tree();
        let node = tree
            .find(group)
            .ok_or_else(|| Error::not_found(Entity::Group, group))?;
        Ok(tree.effective_vars(node.id()).cloned().unwrap_or_default())
    }

    /// `ansible-inventory --graph` style rendering.
    pub fn graph(&self) -> String {
        self.tree().graph()
    }
}
