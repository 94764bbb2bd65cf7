//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (console disables styling for NO_COLOR and pipes):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: names, keys, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info
//!
//! Data meant for other programs (inventory JSON, `--json` listings) goes
//! through [`data`] and is never styled.

use std::fmt::Display;

use console::style;

use crate::core::domain::Severity;

const RULE_WIDTH: usize = 56;

/// Print a success message with checkmark (green).
///
/// Example: `✓ created host web01`
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

/// Print an error message to stderr (red).
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red(), msg);
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    println!("{} {}", style("⚠").yellow(), msg);
}

/// Print a hint to stderr (cyan).
///
/// Example: `→ run: ansibase init`
pub fn hint(msg: &str) {
    eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
}

/// Print a bold section header.
pub fn header(title: &str) {
    println!("{}", style(title).bold());
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  parent:  all`
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", style(label).dim(), style(value).bold());
}

/// Print a list item with bullet.
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

pub fn rule() {
    println!("{}", style("─".repeat(RULE_WIDTH)).dim());
}

pub fn blank() {
    println!();
}

/// Print a dimmed/secondary message.
///
/// Example: `no hosts`
pub fn dimmed(msg: &str) {
    println!("{}", style(msg).dim());
}

/// Print a section header with a separator line.
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}

/// Print unstyled data to stdout.
pub fn data(text: &str) {
    println!("{}", text);
}

/// Format a name (host, group, key) in cyan.
pub fn key(k: &str) -> String {
    style(k).cyan().to_string()
}

/// Format a count in bold.
pub fn count(n: usize) -> String {
    style(n).bold().to_string()
}

/// `1 host`, `2 hosts`.
pub fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", count(n), noun)
    } else {
        format!("{} {}s", count(n), noun)
    }
}

/// Severity tag of a lint finding, colored by level.
pub fn severity(severity: Severity) -> String {
    let label = format!("{:<7}", severity.to_string());
    match severity {
        Severity::Error => style(label).red().bold().to_string(),
        Severity::Warning => style(label).yellow().to_string(),
        Severity::Info => style(label).dim().to_string(),
    }
}
