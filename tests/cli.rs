//! CLI integration tests.

mod support;

#[path = "cli/completions.rs"]
mod completions;
#[path = "cli/errors.rs"]
mod errors;
#[path = "cli/group.rs"]
mod group;
#[path = "cli/host.rs"]
mod host;
#[path = "cli/import.rs"]
mod import;
#[path = "cli/init.rs"]
mod init;
#[path = "cli/inventory.rs"]
mod inventory;
#[path = "cli/lint.rs"]
mod lint;
#[path = "cli/var.rs"]
mod var;
