//! Ansibase - a database-backed Ansible inventory.
//!
//! Hosts, groups and variables live in a small relational store. The
//! library resolves them into the JSON document `ansible-inventory` expects,
//! with group inheritance, variable aliases and encrypted sensitive values.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create config and database
//! │   ├── inventory     # Dynamic inventory script surface
//! │   ├── host          # Host administration
//! │   ├── group         # Group administration
//! │   ├── var           # Variable catalog
//! │   ├── alias         # Variable aliases
//! │   ├── import        # YAML imports
//! │   ├── lint          # Consistency checks
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # ansibase.toml management
//!     ├── cipher/       # Encryption boundary
//!     │   ├── mod         # Cipher trait
//!     │   ├── passphrase  # age scrypt implementation
//!     │   └── boundary    # Encrypt, decrypt and compare at the edge
//!     ├── store/        # Persistence
//!     │   ├── mod       # Store trait, Database, Transaction
//!     │   ├── tables    # Rows and their constraints
//!     │   ├── fs        # TOML file backend
//!     │   └── memory    # In-memory backend
//!     ├── domain/       # Rows and value types
//!     ├── tree          # Group tree with cached inheritance
//!     ├── alias         # Alias substitution
//!     ├── builder       # Inventory resolution
//!     ├── import/       # Import documents and the idempotent importer
//!     └── repository/   # Administrative operations
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ansibase::core::config::Config;
//! use ansibase::core::repository::Repository;
//!
//! let config = Config::load(&Config::default_path())?;
//! let repository = Repository::open(&config)?;
//! println!("{}", repository.inventory(false)?.to_json(true)?);
//! # Ok::<(), ansibase::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
