//! Command-line interface.

pub mod alias;
pub mod completions;
pub mod group;
pub mod host;
pub mod import;
pub mod init;
pub mod inventory;
pub mod lint;
pub mod output;
pub mod var;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::core::config::Config;
use crate::core::domain::VarType;
use crate::core::repository::Repository;
use crate::error::Result;

/// Ansibase - a database-backed Ansible inventory.
#[derive(Parser)]
#[command(
    name = "ansibase",
    about = "A database-backed Ansible inventory",
    version,
    after_help = "Point ansible at `ansibase inventory` to use it as a dynamic inventory."
)]
pub struct Cli {
    /// Path to ansibase.toml
    #[arg(long, global = true, env = "ANSIBASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create ansibase.toml with fresh keys and a seeded database
    Init {
        /// Database file, relative to the config file
        #[arg(long)]
        database: Option<PathBuf>,
        /// scrypt work factor for new encrypted values
        #[arg(long)]
        work_factor: Option<u8>,
    },

    /// Dynamic inventory output for ansible
    Inventory(InventoryArgs),

    /// Manage hosts
    Host {
        #[command(subcommand)]
        action: HostAction,
    },

    /// Manage groups
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },

    /// Manage the variable catalog
    Var {
        #[command(subcommand)]
        action: VarAction,
    },

    /// Manage variable aliases
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },

    /// Import YAML documents
    Import {
        #[command(subcommand)]
        action: ImportAction,
    },

    /// Check the database for missing and invalid values
    Lint {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Exit with status 1 when errors are found
        #[arg(long)]
        strict: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Arguments of `ansibase inventory`.
#[derive(Args, Debug, Default)]
pub struct InventoryArgs {
    /// Print the whole inventory (default)
    #[arg(long, conflicts_with_all = ["host", "graph"])]
    pub list: bool,
    /// Print the variables of one host
    #[arg(long, value_name = "NAME", conflicts_with = "graph")]
    pub host: Option<String>,
    /// Print the group hierarchy
    #[arg(long)]
    pub graph: bool,
    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,
    /// Show sensitive values as a mask
    #[arg(long)]
    pub masked: bool,
}

/// Host subcommands.
#[derive(Subcommand)]
pub enum HostAction {
    /// List hosts
    List {
        /// Only active hosts
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Only inactive hosts
        #[arg(long)]
        inactive: bool,
        /// Only direct members of a group
        #[arg(long)]
        group: Option<String>,
        /// Only names containing this text
        #[arg(long)]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a host with its groups and variables
    Show {
        host: String,
        /// Decrypt sensitive values
        #[arg(long)]
        reveal: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a host
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Create the host inactive
        #[arg(long)]
        inactive: bool,
        /// Groups to join (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,
    },

    /// Rename, describe or (de)activate a host
    Update {
        host: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a host
    Delete {
        host: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Add the host to a group
    AddGroup { host: String, group: String },

    /// Remove the host from a group
    RemoveGroup { host: String, group: String },

    /// Set a host variable
    SetVar {
        host: String,
        key: String,
        value: String,
    },

    /// Remove a host variable
    UnsetVar { host: String, key: String },

    /// Resolved variables of a host as ansible sees them
    Vars {
        host: String,
        /// Show sensitive values as a mask
        #[arg(long)]
        masked: bool,
    },
}

/// Group subcommands.
#[derive(Subcommand)]
pub enum GroupAction {
    /// List groups
    List {
        /// Render the hierarchy
        #[arg(long)]
        tree: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a group with its parent, children and hosts
    Show {
        group: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a group (under `all` by default)
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Rename, describe or move a group
    Update {
        group: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Delete a group and its subgroups
    Delete {
        group: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Active hosts of a group
    Hosts {
        group: String,
        /// Include hosts of every subgroup
        #[arg(long)]
        aggregated: bool,
    },

    /// Variables of a group
    Vars {
        group: String,
        /// Merge in ancestor values
        #[arg(long)]
        inherited: bool,
        /// Decrypt sensitive values
        #[arg(long)]
        reveal: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a group variable
    SetVar {
        group: String,
        key: String,
        value: String,
    },

    /// Remove a group variable
    UnsetVar { group: String, key: String },

    /// Declare a variable members of the group must have
    Require {
        group: String,
        key: String,
        /// Declare without requiring
        #[arg(long)]
        optional: bool,
        /// Default that satisfies the requirement
        #[arg(long)]
        default: Option<String>,
    },

    /// Drop a requirement declaration
    Unrequire { group: String, key: String },

    /// List requirement declarations
    Requirements {
        group: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Catalog subcommands.
#[derive(Subcommand)]
pub enum VarAction {
    /// List catalog entries
    List {
        #[arg(long)]
        sensitive: Option<bool>,
        #[arg(long)]
        builtin: Option<bool>,
        #[arg(long = "type")]
        var_type: Option<VarType>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a catalog entry
    Show {
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a variable
    Create {
        key: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Store values encrypted
        #[arg(long)]
        sensitive: bool,
        #[arg(long = "type", default_value = "string")]
        var_type: VarType,
        #[arg(long)]
        default: Option<String>,
        /// Validation pattern for values
        #[arg(long)]
        regex: Option<String>,
    },

    /// Update a catalog entry
    Update {
        key: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        sensitive: Option<bool>,
        #[arg(long = "type")]
        var_type: Option<VarType>,
        #[arg(long, conflicts_with = "clear_default")]
        default: Option<String>,
        #[arg(long)]
        clear_default: bool,
        #[arg(long, conflicts_with = "clear_regex")]
        regex: Option<String>,
        #[arg(long)]
        clear_regex: bool,
    },

    /// Delete a catalog entry and every value it holds
    Delete {
        key: String,
        /// Allow deleting builtin entries
        #[arg(long)]
        force: bool,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Alias subcommands.
#[derive(Subcommand)]
pub enum AliasAction {
    /// List aliases
    List {
        /// Only aliases touching this key
        #[arg(long)]
        key: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Let ALIAS borrow the value of SOURCE
    Create {
        alias: String,
        source: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete an alias by id
    Delete { id: i64 },
}

/// Import subcommands. FILE may be `-` for stdin.
#[derive(Subcommand)]
pub enum ImportAction {
    /// Import a nested group document
    Groups {
        file: PathBuf,
        /// Parent of the top-level groups
        #[arg(short, long)]
        parent: Option<String>,
        /// Extra keys to register as sensitive (repeatable)
        #[arg(long)]
        sensitive: Vec<String>,
        /// Report without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Import host variables
    Hosts {
        file: PathBuf,
        /// Host name for a flat document (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,
        /// Group every imported host joins
        #[arg(short, long)]
        group: Option<String>,
        /// Extra keys to register as sensitive (repeatable)
        #[arg(long)]
        sensitive: Vec<String>,
        /// Report without writing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Config path from `--config` or the default.
fn config_path(config: Option<&Path>) -> PathBuf {
    config
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path)
}

/// Load the config and open its database.
pub fn open(config: Option<&Path>) -> Result<Repository> {
    let path = config_path(config);
    debug!(config = %path.display(), "opening");
    let config = Config::load(&path)?;
    Repository::open(&config)
}

/// Ask before a destructive action unless `yes`.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    let config = cli.config.as_deref();
    match cli.command {
        Init {
            database,
            work_factor,
        } => init::execute(&config_path(config), database, work_factor),
        Inventory(args) => inventory::execute(&open(config)?, &args),
        Host { action } => host::execute(&open(config)?, action),
        Group { action } => group::execute(&open(config)?, action),
        Var { action } => var::execute(&open(config)?, action),
        Alias { action } => alias::execute(&open(config)?, action),
        Import { action } => import::execute(&open(config)?, action),
        Lint { json, strict } => lint::execute(&open(config)?, json, strict),
        Completions { shell } => completions::execute(shell),
    }
}
