//! Alias commands.

use crate::cli::{output, AliasAction};
use crate::core::repository::Repository;
use crate::error::Result;

pub fn execute(repository: &Repository, action: AliasAction) -> Result<()> {
    match action {
        AliasAction::List { key, json } => {
            let aliases = repository.aliases(key.as_deref())?;
            if json {
                output::data(&serde_json::to_string_pretty(&aliases)?);
            } else if aliases.is_empty() {
                output::dimmed("no aliases");
            } else {
                for alias in &aliases {
                    output::kv(
                        &format!("#{}", alias.id),
                        format!("{} <- {}", alias.alias, alias.source),
                    );
                }
            }
            Ok(())
        }
        AliasAction::Create {
            alias,
            source,
            description,
        } => {
            let entry = repository.create_alias(&alias, &source, &description)?;
            output::success(&format!(
                "{} now falls back to {} (#{})",
                output::key(&entry.alias),
                output::key(&entry.source),
                entry.id
            ));
            Ok(())
        }
        AliasAction::Delete { id } => {
            repository.delete_alias(id)?;
            output::success(&format!("deleted alias #{}", id));
            Ok(())
        }
    }
}
