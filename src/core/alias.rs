//! Alias substitution.
//!
//! An alias pair `(alias, source)` lets `alias` borrow `source`'s value
//! when `alias` has no value of its own. Substitution is one pass and does
//! not chase chains: sources are read from the map as it was before the
//! pass, so with `a <- b <- c` and only `c` set, `b` is filled and `a` is
//! left unset. An alias has at most one source: the newest pair replaces
//! older ones.

use indexmap::IndexMap;

use crate::core::store::Tables;
use crate::core::types::{VarKey, VarMap};

/// Alias to source, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    pairs: IndexMap<VarKey, VarKey>,
}

impl AliasTable {
    /// Build from `(alias, source)` pairs. A later pair for the same alias
    /// replaces the earlier source.
    pub fn new(pairs: impl IntoIterator<Item = (VarKey, VarKey)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Load every alias row, oldest first.
    pub fn load(tables: &Tables) -> Self {
        let mut rows: Vec<_> = tables.aliases().iter().collect();
        rows.sort_by_key(|row| row.id);
        Self::new(rows.into_iter().filter_map(|row| {
            let alias = tables.variable(row.alias_id)?;
            let source = tables.variable(row.source_id)?;
            Some((alias.key.clone(), source.key.clone()))
        }))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&VarKey, &VarKey)> {
        self.pairs.iter()
    }

    /// Fill unset aliases from their sources. Returns how many keys were added.
    pub fn apply(&self, vars: &mut VarMap) -> usize {
        if self.pairs.is_empty() {
            return 0;
        }
        let original = vars.clone();
        let mut added = 0;
        for (alias, source) in &self.pairs {
            if vars.contains_key(alias) {
                continue;
            }
            if let Some(value) = original.get(source) {
                vars.insert(alias.clone(), value.clone());
                added += 1;
            }
        }
        added
    }

    /// Substituted copy of `vars`.
    pub fn applied(&self, vars: &VarMap) -> VarMap {
        let mut out = vars.clone();
        self.apply(&mut out);
        out
    }
}
