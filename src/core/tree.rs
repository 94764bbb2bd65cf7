//! In-memory group tree.
//!
//! An arena of [`GroupNode`]s keyed by group id. Links are id references
//! only, so the tree never owns cycles. Each node memoizes two computed
//! views for the lifetime of one resolution pass:
//!
//! - **effective variables**: the parent's effective variables overridden
//!   by the node's own map (local values win)
//! - **aggregated hosts**: the node's direct hosts plus the aggregated hosts
//!   of every child
//!
//! Nodes may be added in any order. A child naming a parent that is not
//! registered yet waits until the parent arrives; one whose parent never
//! arrives stays unattached.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::warn;

use crate::core::constants;
use crate::core::types::{GroupId, GroupName, HostName, VarMap};

/// One group of a resolution pass.
#[derive(Debug)]
pub struct GroupNode {
    id: GroupId,
    name: GroupName,
    description: String,
    parent: Option<GroupId>,
    children: Vec<GroupId>,
    vars: VarMap,
    hosts: BTreeSet<HostName>,
    effective: OnceCell<VarMap>,
    aggregated: OnceCell<BTreeSet<HostName>>,
}

impl GroupNode {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Linked parent, if attached.
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Local variables only.
    pub fn vars(&self) -> &VarMap {
        &self.vars
    }

    /// Directly assigned hosts only.
    pub fn hosts(&self) -> &BTreeSet<HostName> {
        &self.hosts
    }

    fn clear(&mut self) {
        self.effective.take();
        self.aggregated.take();
    }
}

/// A position in a pre-order walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub id: GroupId,
    pub depth: usize,
    /// Last among its siblings.
    pub last: bool,
}

/// Group forest for one resolution pass.
#[derive(Debug, Default)]
pub struct GroupTree {
    nodes: BTreeMap<GroupId, GroupNode>,
    by_name: HashMap<GroupName, GroupId>,
    root: Option<GroupId>,
    pending: HashMap<GroupId, Vec<GroupId>>,
}

impl GroupTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group.
    ///
    /// The root group is marked as tree root and never linked to a parent.
    pub fn add_group(
        &mut self,
        id: GroupId,
        name: &str,
        description: &str,
        parent: Option<GroupId>,
    ) {
        let is_root = name == constants::ROOT_GROUP;
        self.nodes.insert(
            id,
            GroupNode {
                id,
                name: name.to_string(),
                description: description.to_string(),
                parent: None,
                children: Vec::new(),
                vars: VarMap::new(),
                hosts: BTreeSet::new(),
                effective: OnceCell::new(),
                aggregated: OnceCell::new(),
            },
        );
        self.by_name.insert(name.to_string(), id);
        if is_root {
            self.root = Some(id);
        }

        match parent {
            Some(parent) if !is_root => {
                if self.nodes.contains_key(&parent) {
                    self.link(id, parent);
                } else {
                    self.pending.entry(parent).or_default().push(id);
                }
            }
            _ => {}
        }

        if let Some(waiting) = self.pending.remove(&id) {
            for child in waiting {
                self.link(child, id);
            }
        }
    }

    fn link(&mut self, child: GroupId, parent: GroupId) {
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                warn!(child, parent, "skipping group link that would form a cycle");
                return;
            }
            cursor = self.nodes.get(&id).and_then(|n| n.parent);
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        self.invalidate(child);
    }

    /// Replace a node's local variables.
    pub fn set_vars(&mut self, id: GroupId, vars: VarMap) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.vars = vars;
            self.invalidate(id);
        }
    }

    /// Set one local variable.
    pub fn set_var(&mut self, id: GroupId, key: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.vars.insert(key.to_string(), value.to_string());
            self.invalidate(id);
        }
    }

    /// Assign a host directly to a node.
    pub fn add_host(&mut self, id: GroupId, host: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.hosts.insert(host.to_string()) {
                self.invalidate(id);
            }
        }
    }

    /// Drop memoized views affected by a change at `id`: both views for the
    /// node and every descendant, and the aggregated view of every ancestor.
    pub fn invalidate(&mut self, id: GroupId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                node.clear();
                stack.extend(node.children.iter().copied());
            }
        }

        let mut cursor = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(ancestor) = cursor {
            match self.nodes.get_mut(&ancestor) {
                Some(node) => {
                    node.aggregated.take();
                    cursor = node.parent;
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&GroupNode> {
        self.root.and_then(|id| self.nodes.get(&id))
    }

    pub fn node(&self, id: GroupId) -> Option<&GroupNode> {
        self.nodes.get(&id)
    }

    pub fn find(&self, name: &str) -> Option<&GroupNode> {
        self.by_name.get(name).and_then(|id| self.nodes.get(id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GroupNode> {
        self.nodes.values()
    }

    /// Direct children of a node, sorted by name.
    pub fn children(&self, id: GroupId) -> Vec<&GroupNode> {
        let mut children: Vec<&GroupNode> = self
            .nodes
            .get(&id)
            .map(|n| n.children.iter().filter_map(|c| self.nodes.get(c)).collect())
            .unwrap_or_default();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Ancestors of a node, nearest first.
    pub fn ancestors(&self, id: GroupId) -> Vec<&GroupNode> {
        let mut chain = Vec::new();
        let mut cursor = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(parent) = cursor.and_then(|p| self.nodes.get(&p)) {
            chain.push(parent);
            cursor = parent.parent;
        }
        chain
    }

    /// The node's variables merged over its ancestors' (local values win).
    pub fn effective_vars(&self, id: GroupId) -> Option<&VarMap> {
        let node = self.nodes.get(&id)?;
        Some(node.effective.get_or_init(|| {
            let mut merged = node
                .parent
                .and_then(|parent| self.effective_vars(parent))
                .cloned()
                .unwrap_or_default();
            merged.extend(node.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
            merged
        }))
    }

    /// The node's hosts plus those of every descendant.
    pub fn aggregated_hosts(&self, id: GroupId) -> Option<&BTreeSet<HostName>> {
        let node = self.nodes.get(&id)?;
        Some(node.aggregated.get_or_init(|| {
            let mut hosts = node.hosts.clone();
            for child in &node.children {
                if let Some(child_hosts) = self.aggregated_hosts(*child) {
                    hosts.extend(child_hosts.iter().cloned());
                }
            }
            hosts
        }))
    }

    /// Top-level nodes: the root first, then unattached groups by name.
    fn tops(&self) -> Vec<GroupId> {
        let mut tops: Vec<&GroupNode> = self
            .nodes
            .values()
            .filter(|n| n.parent.is_none() && Some(n.id) != self.root)
            .collect();
        tops.sort_by(|a, b| a.name.cmp(&b.name));
        self.root
            .into_iter()
            .chain(tops.into_iter().map(|n| n.id))
            .collect()
    }

    /// Parent-before-children walk over the whole forest.
    pub fn pre_order(&self) -> Vec<Visit> {
        let tops = self.tops();
        let mut visits = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<Visit> = tops
            .iter()
            .enumerate()
            .rev()
            .map(|(i, id)| Visit {
                id: *id,
                depth: 0,
                last: i + 1 == tops.len(),
            })
            .collect();

        while let Some(visit) = stack.pop() {
            visits.push(visit);
            let children = self.children(visit.id);
            let count = children.len();
            for (i, child) in children.iter().enumerate().rev() {
                stack.push(Visit {
                    id: child.id,
                    depth: visit.depth + 1,
                    last: i + 1 == count,
                });
            }
        }
        visits
    }

    /// Children-before-parent walk over the whole forest.
    pub fn post_order(&self) -> Vec<GroupId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(GroupId, bool)> =
            self.tops().into_iter().rev().map(|id| (id, false)).collect();

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            for child in self.children(id).iter().rev() {
                stack.push((child.id, false));
            }
        }
        order
    }

    /// Groups not reachable from the root.
    pub fn unreachable(&self) -> Vec<&GroupNode> {
        let reachable: BTreeSet<GroupId> = match self.root {
            Some(root) => {
                let mut seen = BTreeSet::new();
                let mut stack = vec![root];
                while let Some(id) = stack.pop() {
                    if seen.insert(id) {
                        if let Some(node) = self.nodes.get(&id) {
                            stack.extend(node.children.iter().copied());
                        }
                    }
                }
                seen
            }
            None => BTreeSet::new(),
        };
        let mut lost: Vec<&GroupNode> = self
            .nodes
            .values()
            .filter(|n| !reachable.contains(&n.id))
            .collect();
        lost.sort_by(|a, b| a.name.cmp(&b.name));
        lost
    }

    /// Render the hierarchy the way `ansible-inventory --graph` does.
    pub fn graph(&self) -> String {
        let mut out = String::new();
        for visit in self.pre_order() {
            let Some(node) = self.nodes.get(&visit.id) else {
                continue;
            };
            if visit.depth == 0 {
                out.push_str(&format!("@{}:\n", node.name));
            } else {
                out.push_str(&format!("{}--@{}:\n", "  |".repeat(visit.depth), node.name));
            }
            let indent = "  |".repeat(visit.depth + 1);
            for host in &node.hosts {
                out.push_str(&format!("{}--{}\n", indent, host));
            }
        }
        out
    }
}
