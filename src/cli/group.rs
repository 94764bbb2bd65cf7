//! Group commands.

use tracing::info;

use crate::cli::host::{print_entries, report_write};
use crate::cli::{confirm, output, GroupAction};
use crate::core::domain::GroupPatch;
use crate::core::repository::Repository;
use crate::core::tree::GroupTree;
use crate::error::Result;

pub fn execute(repository: &Repository, action: GroupAction) -> Result<()> {
    match action {
        GroupAction::List { tree, json } => list(repository, tree, json),
        GroupAction::Show { group, json } => show(repository, &group, json),
        GroupAction::Create {
            name,
            description,
            parent,
        } => {
            let group = repository.create_group(&name, &description, parent.as_deref())?;
            info!(group = %group.name, "group created");
            output::success(&format!("created group {}", output::key(&group.name)));
            Ok(())
        }
        GroupAction::Update {
            group,
            name,
            description,
            parent,
        } => {
            let patch = GroupPatch {
                name,
                description,
                parent,
            };
            if patch.is_empty() {
                output::warn("nothing to update");
                return Ok(());
            }
            let updated = repository.update_group(&group, &patch)?;
            output::success(&format!("updated group {}", output::key(&updated.name)));
            Ok(())
        }
        GroupAction::Delete { group, yes } => {
            let prompt = format!("Delete group '{}' with all its subgroups?", group);
            if !confirm(&prompt, yes)? {
                output::dimmed("aborted");
                return Ok(());
            }
            let removed = repository.delete_group(&group)?;
            output::success(&format!("deleted {}", output::plural(removed.len(), "group")));
            for group in &removed {
                output::list_item(&group.name);
            }
            Ok(())
        }
        GroupAction::Hosts { group, aggregated } => {
            for host in repository.group_hosts(&group, aggregated)? {
                output::data(&host);
            }
            Ok(())
        }
        GroupAction::Vars {
            group,
            inherited,
            reveal,
            json,
        } => {
            let entries = repository.group_variables(&group, inherited, reveal)?;
            if json {
                output::data(&serde_json::to_string_pretty(&entries)?);
            } else {
                print_entries(&entries);
            }
            Ok(())
        }
        GroupAction::SetVar { group, key, value } => {
            let write = repository.set_group_var(&group, &key, &value)?;
            report_write(write, &key, &group);
            Ok(())
        }
        GroupAction::UnsetVar { group, key } => {
            repository.unset_group_var(&group, &key)?;
            output::success(&format!("removed {} from {}", output::key(&key), group));
            Ok(())
        }
        GroupAction::Require {
            group,
            key,
            optional,
            default,
        } => {
            repository.require(&group, &key, !optional, default)?;
            let kind = if optional { "optional" } else { "required" };
            output::success(&format!("{} is {} in {}", output::key(&key), kind, group));
            Ok(())
        }
        GroupAction::Unrequire { group, key } => {
            repository.unrequire(&group, &key)?;
            output::success(&format!("dropped {} from {}", output::key(&key), group));
            Ok(())
        }
        GroupAction::Requirements { group, json } => {
            let requirements = repository.requirements(&group)?;
            if json {
                output::data(&serde_json::to_string_pretty(&requirements)?);
            } else if requirements.is_empty() {
                output::dimmed("no declarations");
            } else {
                for r in &requirements {
                    let mut detail = String::from(if r.required { "required" } else { "optional" });
                    if let Some(default) = &r.default {
                        detail.push_str(&format!(", default {}", default));
                    }
                    output::kv(&r.key, detail);
                }
            }
            Ok(())
        }
    }
}

fn list(repository: &Repository, tree: bool, json: bool) -> Result<()> {
    if tree {
        let rendered = render_tree(&repository.group_tree()?);
        output::data(rendered.trim_end());
        return Ok(());
    }

    let groups = repository.groups()?;
    if json {
        output::data(&serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }
    output::header(&output::plural(groups.len(), "group"));
    output::rule();
    for group in &groups {
        output::kv(&group.name, &group.description);
    }
    Ok(())
}

fn show(repository: &Repository, group: &str, json: bool) -> Result<()> {
    let details = repository.group(group)?;
    if json {
        output::data(&serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    output::header(&details.group.name);
    output::rule();
    if !details.group.description.is_empty() {
        output::kv("description", &details.group.description);
    }
    output::kv("parent", details.parent.as_deref().unwrap_or("-"));
    output::kv("children", details.children.join(", "));
    output::kv("hosts", details.hosts.join(", "));
    Ok(())
}

/// Box-drawing rendering of the hierarchy with direct host counts.
pub fn render_tree(tree: &GroupTree) -> String {
    let mut out = String::new();
    // Whether the ancestor at each depth was the last of its siblings.
    let mut lasts: Vec<bool> = Vec::new();

    for visit in tree.pre_order() {
        let Some(node) = tree.node(visit.id) else {
            continue;
        };
        lasts.truncate(visit.depth);

        let mut line = String::new();
        if visit.depth > 0 {
            for last in lasts.iter().skip(1) {
                line.push_str(if *last { "    " } else { "│   " });
            }
            line.push_str(if visit.last { "└── " } else { "├── " });
        }
        line.push_str(node.name());
        if !node.hosts().is_empty() {
            line.push_str(&format!(" ({})", node.hosts().len()));
        }
        out.push_str(&line);
        out.push('\n');
        lasts.push(visit.last);
    }
    out
}
