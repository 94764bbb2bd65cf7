//! Ansibase - a database-backed Ansible inventory.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ansibase::cli::output;
use ansibase::cli::{execute, Cli};
use ansibase::error::{ConfigError, Error, StoreError};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so inventory JSON on stdout stays clean.
    let filter = EnvFilter::try_from_env("ANSIBASE_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("ansibase=debug")
        } else {
            EnvFilter::new("ansibase=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotFound(_)) => Some("run: ansibase init"),
            Error::Store(StoreError::NotInitialized(_)) => Some("run: ansibase init"),
            Error::Config(ConfigError::AlreadyExists(_)) => {
                Some("pass --config to initialize somewhere else")
            }
            Error::NotFound {
                entity: ansibase::error::Entity::Variable,
                ..
            } => Some("register it first: ansibase var create <key>"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
