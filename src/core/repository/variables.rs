//! Catalog and alias operations.

use serde::Serialize;
use tracing::info;

use super::Repository;
use crate::core::domain::{Variable, VariableFilter, VariablePatch, VariableSpec};
use crate::core::types::{AliasId, VarKey};
use crate::error::{Entity, Error, Result};

/// An alias with both ends resolved to keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasEntry {
    pub id: AliasId,
    pub alias: VarKey,
    pub source: VarKey,
    pub description: String,
}

impl Repository {
    /// Register a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` for a taken key and `InvariantError::InvalidRegex`
    /// for a validation pattern that does not compile.
    pub fn create_variable(&self, spec: &VariableSpec) -> Result<Variable> {
        self.database.write(|tables| {
            let id = tables.insert_variable(spec)?;
            info!(key = %spec.key, sensitive = spec.sensitive, "variable registered");
            tables
                .variable(id)
                .cloned()
                .ok_or_else(|| Error::not_found(Entity::Variable, spec.key.as_str()))
        })
    }

    pub fn variable(&self, reference: &str) -> Result<Variable> {
        let tables = self.database.read()?;
        Ok(tables.resolve_variable(reference)?.clone())
    }

    /// Catalog entries matching `filter`, by key.
    pub fn variables(&self, filter: &VariableFilter) -> Result<Vec<Variable>> {
        let tables = self.database.read()?;
        let mut variables: Vec<Variable> = tables
            .variables()
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        variables.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(variables)
    }

    /// Update a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `InvariantError::SensitivityLocked` when flipping sensitivity
    /// of an entry that already has values.
    pub fn update_variable(&self, reference: &str, patch: &VariablePatch) -> Result<Variable> {
        self.database.write(|tables| {
            let id = tables.resolve_variable(reference)?.id;
            tables.update_variable(id, patch)?;
            tables
                .variable(id)
                .cloned()
                .ok_or_else(|| Error::not_found(Entity::Variable, reference))
        })
    }

    /// Delete a catalog entry and everything that references it.
    /// Builtin entries need `force`.
    pub fn delete_variable(&self, reference: &str, force: bool) -> Result<Variable> {
        self.database.write(|tables| {
            let id = tables.resolve_variable(reference)?.id;
            tables.delete_variable(id, force)
        })
    }

    /// Let `alias` borrow the value of `source` wherever it has none.
    pub fn create_alias(&self, alias: &str, source: &str, description: &str) -> Result<AliasEntry> {
        self.database.write(|tables| {
            let alias = tables.resolve_variable(alias)?.clone();
            let source = tables.resolve_variable(source)?.clone();
            let id = tables.insert_alias(alias.id, source.id, description)?;
            Ok(AliasEntry {
                id,
                alias: alias.key,
                source: source.key,
                description: description.to_string(),
            })
        })
    }

    pub fn delete_alias(&self, id: AliasId) -> Result<()> {
        self.database.write(|tables| {
            tables.delete_alias(id)?;
            Ok(())
        })
    }

    /// Aliases in id order, optionally only those touching `key`.
    pub fn aliases(&self, key: Option<&str>) -> Result<Vec<AliasEntry>> {
        let tables = self.database.read()?;
        let mut entries: Vec<AliasEntry> = tables
            .aliases()
            .iter()
            .filter_map(|a| {
                Some(AliasEntry {
                    id: a.id,
                    alias: tables.variable(a.alias_id)?.key.clone(),
                    source: tables.variable(a.source_id)?.key.clone(),
                    description: a.description.clone(),
                })
            })
            .filter(|e| key.map_or(true, |k| e.alias == k || e.source == k))
            .collect();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }
}
