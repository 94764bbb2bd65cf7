//! Lint command.

use crate::cli::output;
use crate::core::domain::Severity;
use crate::core::repository::Repository;
use crate::error::Result;

/// Print findings. With `strict`, errors end the process with status 1.
pub fn execute(repository: &Repository, json: bool, strict: bool) -> Result<()> {
    let findings = repository.lint()?;
    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();

    if json {
        output::data(&serde_json::to_string_pretty(&findings)?);
    } else if findings.is_empty() {
        output::success("no findings");
    } else {
        for finding in &findings {
            println!(
                "{} {}: {}",
                output::severity(finding.severity),
                output::key(&finding.subject),
                finding.message
            );
        }
        output::blank();
        output::dimmed(&format!(
            "{} finding(s), {} error(s)",
            findings.len(),
            errors
        ));
    }

    if strict && errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
