//! Import commands.
//!
//! Reads a YAML document from a file (or stdin for `-`), imports it in one
//! transaction and prints what changed.

use std::io::{self, Read};
use std::path::Path;

use tracing::info;

use crate::cli::{output, ImportAction};
use crate::core::import::{sensitive_keys, GroupsDocument, HostDocument, ImportStats};
use crate::core::repository::{ImportOptions, Repository};
use crate::error::Result;

pub fn execute(repository: &Repository, action: ImportAction) -> Result<()> {
    match action {
        ImportAction::Groups {
            file,
            parent,
            sensitive,
            dry_run,
        } => {
            let document = GroupsDocument::parse(&read(&file)?)?;
            let keys = sensitive_keys(&document, &sensitive);
            if !keys.is_empty() {
                info!(keys = ?keys, "sensitive keys in document");
            }
            let options = ImportOptions {
                parent,
                sensitive,
                dry_run,
                ..Default::default()
            };
            let stats = repository.import_groups(&document, &options)?;
            report(&file, &stats);
            Ok(())
        }
        ImportAction::Hosts {
            file,
            name,
            group,
            sensitive,
            dry_run,
        } => {
            let document = HostDocument::parse(&read(&file)?)?;
            let options = ImportOptions {
                group,
                name: name.or_else(|| stem(&file)),
                sensitive,
                dry_run,
                ..Default::default()
            };
            let stats = repository.import_hosts(document, &options)?;
            report(&file, &stats);
            Ok(())
        }
    }
}

fn read(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(file)?)
}

/// Host name a flat document falls back to. Stdin has none.
fn stem(file: &Path) -> Option<String> {
    if file.as_os_str() == "-" {
        return None;
    }
    file.file_stem().map(|s| s.to_string_lossy().into_owned())
}

fn report(file: &Path, stats: &ImportStats) {
    let source = if file.as_os_str() == "-" {
        "stdin".to_string()
    } else {
        file.display().to_string()
    };

    if stats.dry_run {
        output::warn(&format!("dry run: nothing written from {}", source));
    } else if stats.writes() == 0 {
        output::success(&format!("{} already up to date", source));
    } else {
        output::success(&format!("imported {}", source));
    }

    output::kv("hosts", stats.hosts_created);
    output::kv("groups", stats.groups_created);
    output::kv("variables", stats.variables_created);
    output::kv("memberships", stats.memberships_created);
    output::kv(
        "values",
        format!(
            "{} created, {} updated, {} unchanged",
            stats.host_vars_created + stats.group_vars_created,
            stats.host_vars_updated + stats.group_vars_updated,
            stats.unchanged
        ),
    );
    if stats.groups_reparented > 0 {
        output::kv("moved", stats.groups_reparented);
    }
    if stats.skipped > 0 {
        output::warn(&format!(
            "{} skipped: empty or unencryptable sensitive values",
            output::plural(stats.skipped, "value")
        ));
    }
}
