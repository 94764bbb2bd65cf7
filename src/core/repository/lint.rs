//! Consistency checks over the catalog and assignments.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tracing::debug;

use super::Repository;
use crate::core::builder::InventoryBuilder;
use crate::core::domain::{Finding, Severity, StoredValue, Variable};
use crate::core::store::Tables;
use crate::core::tree::GroupTree;
use crate::core::types::VariableId;
use crate::error::Result;

impl Repository {
    /// Inspect the database and report findings, most severe first.
    ///
    /// Resolution is not affected by anything reported here.
    pub fn lint(&self) -> Result<Vec<Finding>> {
        let tables = self.database.read()?;
        let builder = InventoryBuilder::new(&tables, self.boundary()).masked(true);
        let tree = builder.tree();

        let mut findings = Vec::new();
        findings.extend(missing_required(&tables, &builder, &tree));
        findings.extend(invalid_values(&tables));
        findings.extend(tree.unreachable().into_iter().map(|node| {
            Finding::new(
                Severity::Warning,
                format!("group {}", node.name()),
                "not reachable from the root group",
            )
        }));
        findings.extend(self.undecryptable(&tables));

        findings.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.subject.cmp(&b.subject))
                .then_with(|| a.message.cmp(&b.message))
        });
        debug!(findings = findings.len(), "lint finished");
        Ok(findings)
    }

    fn undecryptable(&self, tables: &Tables) -> Vec<Finding> {
        let host_rows = tables.host_variables().iter().filter_map(|row| {
            let host = tables.host(row.host_id)?;
            Some((format!("host {}", host.name), row.variable_id, &row.value))
        });
        let group_rows = tables.group_variables().iter().filter_map(|row| {
            let group = tables.group(row.group_id)?;
            Some((format!("group {}", group.name), row.variable_id, &row.value))
        });

        host_rows
            .chain(group_rows)
            .filter_map(|(subject, variable_id, value)| match value {
                StoredValue::Encrypted(blob) if self.boundary().decrypt(blob).is_none() => {
                    let key = tables.variable(variable_id)?.key.clone();
                    Some(Finding::new(
                        Severity::Info,
                        subject,
                        format!("'{}' cannot be decrypted with the configured key", key),
                    ))
                }
                _ => None,
            })
            .collect()
    }
}

/// Required declarations of a host's groups and their ancestors that
/// nothing supplies.
fn missing_required(tables: &Tables, builder: &InventoryBuilder<'_>, tree: &GroupTree) -> Vec<Finding> {
    let mut findings = Vec::new();

    for host in tables.hosts().iter().filter(|h| h.active) {
        let mut supplied: BTreeSet<String> = builder.host_vars(host.id).into_keys().collect();
        let mut scope = BTreeSet::new();
        for group in tables.groups_of_host(host.id) {
            if let Some(vars) = tree.effective_vars(group.id) {
                supplied.extend(vars.keys().cloned());
            }
            scope.insert(group.id);
            scope.extend(tables.ancestors(group.id));
        }

        // (required anywhere in scope, defaulted anywhere in scope)
        let mut declared: BTreeMap<VariableId, (bool, bool)> = BTreeMap::new();
        for group in &scope {
            for requirement in tables.requirements_of_group(*group) {
                let entry = declared.entry(requirement.variable_id).or_default();
                entry.0 |= requirement.required;
                entry.1 |= requirement.default_override.is_some();
            }
        }

        for (variable_id, (required, defaulted)) in declared {
            let Some(variable) = tables.variable(variable_id) else {
                continue;
            };
            if !required
                || defaulted
                || variable.default_value.is_some()
                || supplied.contains(&variable.key)
            {
                continue;
            }
            findings.push(Finding::new(
                Severity::Error,
                format!("host {}", host.name),
                format!("required variable '{}' has no value", variable.key),
            ));
        }
    }
    findings
}

/// Cleartext values that fail their entry's type tag or pattern.
fn invalid_values(tables: &Tables) -> Vec<Finding> {
    let patterns: BTreeMap<VariableId, Regex> = tables
        .variables()
        .iter()
        .filter_map(|v| {
            let pattern = v.validation.as_deref()?;
            Regex::new(&format!("^(?:{})$", pattern))
                .ok()
                .map(|re| (v.id, re))
        })
        .collect();

    let check = |subject: String, variable: &Variable, value: &str| -> Option<Finding> {
        if !variable.var_type.accepts(value) {
            return Some(Finding::new(
                Severity::Warning,
                subject,
                format!("'{}' is not a valid {}", variable.key, variable.var_type),
            ));
        }
        match patterns.get(&variable.id) {
            Some(re) if !re.is_match(value) => Some(Finding::new(
                Severity::Warning,
                subject,
                format!("'{}' does not match {}", variable.key, re.as_str()),
            )),
            _ => None,
        }
    };

    let hosts = tables.host_variables().iter().filter_map(|row| {
        let host = tables.host(row.host_id)?;
        let variable = tables.variable(row.variable_id)?;
        check(format!("host {}", host.name), variable, row.value.plain()?)
    });
    let groups = tables.group_variables().iter().filter_map(|row| {
        let group = tables.group(row.group_id)?;
        let variable = tables.variable(row.variable_id)?;
        check(format!("group {}", group.name), variable, row.value.plain()?)
    });
    hosts.chain(groups).collect()
}
