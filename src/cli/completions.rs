//! Completions command.

use std::io;

use clap::CommandFactory;
use clap_complete::Shell as Target;

use crate::cli::{Cli, Shell};
use crate::error::Result;

/// Write a completion script for `shell` to stdout.
pub fn execute(shell: Shell) -> Result<()> {
    let target = match shell {
        Shell::Bash => Target::Bash,
        Shell::Zsh => Target::Zsh,
        Shell::Fish => Target::Fish,
        Shell::PowerShell => Target::PowerShell,
    };
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(target, &mut command, name, &mut io::stdout().lock());
    Ok(())
}
