//! Host commands.

use tracing::info;

use crate::cli::{confirm, output, HostAction};
use crate::core::domain::{HostFilter, HostPatch, VarEntry, Write};
use crate::core::repository::Repository;
use crate::error::Result;

pub fn execute(repository: &Repository, action: HostAction) -> Result<()> {
    match action {
        HostAction::List {
            active,
            inactive,
            group,
            name,
            json,
        } => {
            let filter = HostFilter {
                active: match (active, inactive) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                group,
                name,
            };
            list(repository, &filter, json)
        }
        HostAction::Show { host, reveal, json } => show(repository, &host, reveal, json),
        HostAction::Create {
            name,
            description,
            inactive,
            groups,
        } => {
            let host = repository.create_host(&name, &description, !inactive, &groups)?;
            info!(host = %host.name, "host created");
            output::success(&format!("created host {}", output::key(&host.name)));
            Ok(())
        }
        HostAction::Update {
            host,
            name,
            description,
            active,
        } => {
            let patch = HostPatch {
                name,
                description,
                active,
            };
            if patch.is_empty() {
                output::warn("nothing to update");
                return Ok(());
            }
            let updated = repository.update_host(&host, &patch)?;
            output::success(&format!("updated host {}", output::key(&updated.name)));
            Ok(())
        }
        HostAction::Delete { host, yes } => {
            if !confirm(&format!("Delete host '{}' and its variables?", host), yes)? {
                output::dimmed("aborted");
                return Ok(());
            }
            let removed = repository.delete_host(&host)?;
            output::success(&format!("deleted host {}", output::key(&removed.name)));
            Ok(())
        }
        HostAction::AddGroup { host, group } => {
            repository.join_group(&host, &group)?;
            output::success(&format!(
                "{} joined {}",
                output::key(&host),
                output::key(&group)
            ));
            Ok(())
        }
        HostAction::RemoveGroup { host, group } => {
            repository.leave_group(&host, &group)?;
            output::success(&format!(
                "{} left {}",
                output::key(&host),
                output::key(&group)
            ));
            Ok(())
        }
        HostAction::SetVar { host, key, value } => {
            let write = repository.set_host_var(&host, &key, &value)?;
            report_write(write, &key, &host);
            Ok(())
        }
        HostAction::UnsetVar { host, key } => {
            repository.unset_host_var(&host, &key)?;
            output::success(&format!("removed {} from {}", output::key(&key), host));
            Ok(())
        }
        HostAction::Vars { host, masked } => {
            let vars = repository.host_vars(&host, masked)?;
            output::data(&serde_json::to_string_pretty(&vars)?);
            Ok(())
        }
    }
}

fn list(repository: &Repository, filter: &HostFilter, json: bool) -> Result<()> {
    let hosts = repository.hosts(filter)?;

    if json {
        output::data(&serde_json::to_string_pretty(&hosts)?);
    } else if hosts.is_empty() {
        output::dimmed("no hosts");
    } else {
        output::header(&output::plural(hosts.len(), "host"));
        output::rule();
        for host in &hosts {
            let state = if host.active { "" } else { " (inactive)" };
            output::kv(&host.name, format!("{}{}", host.description, state));
        }
    }
    Ok(())
}

fn show(repository: &Repository, host: &str, reveal: bool, json: bool) -> Result<()> {
    let details = repository.host(host, reveal)?;

    if json {
        output::data(&serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    output::header(&details.host.name);
    output::rule();
    if !details.host.description.is_empty() {
        output::kv("description", &details.host.description);
    }
    output::kv("active", details.host.active);
    output::kv("groups", details.groups.join(", "));
    output::section("Variables");
    print_entries(&details.variables);
    Ok(())
}

/// Variable listing shared by host and group views.
pub(crate) fn print_entries(entries: &[VarEntry]) {
    if entries.is_empty() {
        output::dimmed("no variables");
        return;
    }
    for entry in entries {
        let label = if entry.sensitive {
            format!("{} (sensitive)", entry.key)
        } else {
            entry.key.clone()
        };
        output::kv(&label, &entry.value);
    }
}

/// Outcome of a set-var, shared by host and group views.
pub(crate) fn report_write(write: Write, key: &str, owner: &str) {
    match write {
        Write::Created => output::success(&format!("set {} on {}", output::key(key), owner)),
        Write::Updated => output::success(&format!("updated {} on {}", output::key(key), owner)),
        Write::Unchanged => output::dimmed(&format!("{} on {} unchanged", key, owner)),
    }
}
