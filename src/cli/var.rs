//! Variable catalog commands.

use tracing::info;

use crate::cli::{confirm, output, VarAction};
use crate::core::domain::{Variable, VariableFilter, VariablePatch, VariableSpec};
use crate::core::repository::Repository;
use crate::error::Result;

pub fn execute(repository: &Repository, action: VarAction) -> Result<()> {
    match action {
        VarAction::List {
            sensitive,
            builtin,
            var_type,
            json,
        } => {
            let filter = VariableFilter {
                sensitive,
                builtin,
                var_type,
            };
            let variables = repository.variables(&filter)?;
            if json {
                output::data(&serde_json::to_string_pretty(&variables)?);
            } else if variables.is_empty() {
                output::dimmed("no variables");
            } else {
                output::header(&output::plural(variables.len(), "variable"));
                output::rule();
                for variable in &variables {
                    output::kv(&variable.key, flags(variable));
                }
            }
            Ok(())
        }
        VarAction::Show { key, json } => {
            let variable = repository.variable(&key)?;
            if json {
                output::data(&serde_json::to_string_pretty(&variable)?);
                return Ok(());
            }
            output::header(&variable.key);
            output::rule();
            if !variable.description.is_empty() {
                output::kv("description", &variable.description);
            }
            output::kv("type", variable.var_type);
            output::kv("flags", flags(&variable));
            if let Some(default) = &variable.default_value {
                output::kv("default", default);
            }
            if let Some(pattern) = &variable.validation {
                output::kv("validation", pattern);
            }
            Ok(())
        }
        VarAction::Create {
            key,
            description,
            sensitive,
            var_type,
            default,
            regex,
        } => {
            let mut spec = VariableSpec::new(key)
                .description(description)
                .sensitive(sensitive)
                .var_type(var_type);
            spec.default_value = default;
            spec.validation = regex;
            let variable = repository.create_variable(&spec)?;
            output::success(&format!("registered {}", output::key(&variable.key)));
            Ok(())
        }
        VarAction::Update {
            key,
            description,
            sensitive,
            var_type,
            default,
            clear_default,
            regex,
            clear_regex,
        } => {
            let patch = VariablePatch {
                description,
                sensitive,
                var_type,
                default_value: if clear_default { Some(None) } else { default.map(Some) },
                validation: if clear_regex { Some(None) } else { regex.map(Some) },
            };
            let variable = repository.update_variable(&key, &patch)?;
            output::success(&format!("updated {}", output::key(&variable.key)));
            Ok(())
        }
        VarAction::Delete { key, force, yes } => {
            let prompt = format!("Delete '{}' and every value assigned to it?", key);
            if !confirm(&prompt, yes)? {
                output::dimmed("aborted");
                return Ok(());
            }
            let variable = repository.delete_variable(&key, force)?;
            info!(key = %variable.key, "variable deleted");
            output::success(&format!("deleted {}", output::key(&variable.key)));
            Ok(())
        }
    }
}

/// `int, sensitive, builtin` style summary.
fn flags(variable: &Variable) -> String {
    let mut flags = vec![variable.var_type.as_str()];
    if variable.sensitive {
        flags.push("sensitive");
    }
    if variable.builtin {
        flags.push("builtin");
    }
    flags.join(", ")
}
