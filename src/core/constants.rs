//! Constants used throughout ansibase.
//!
//! Centralizes reserved names, file names and the import heuristics.

/// Configuration file name (ansibase.toml).
pub const CONFIG_FILE: &str = "ansibase.toml";

/// Default database file name, relative to the configuration file.
pub const DATABASE_FILE: &str = "ansibase.db.toml";

/// Root group containing every host.
pub const ROOT_GROUP: &str = "all";

/// Group holding hosts not otherwise grouped.
pub const UNGROUPED_GROUP: &str = "ungrouped";

/// Groups that can be neither renamed nor deleted.
pub const PROTECTED_GROUPS: &[&str] = &[ROOT_GROUP, UNGROUPED_GROUP];

/// Reserved top-level key of the exported inventory.
pub const META_KEY: &str = "_meta";

/// Placeholder shown instead of a sensitive value.
pub const MASK: &str = "****";

/// Default scrypt work factor (log2 N) for passphrase encryption.
pub const DEFAULT_WORK_FACTOR: u8 = 12;

/// Highest accepted scrypt work factor.
pub const MAX_WORK_FACTOR: u8 = 22;

/// Keys registered as sensitive when an import creates them.
pub const KNOWN_SENSITIVE_KEYS: &[&str] = &[
    "ansible_password",
    "ansible_become_password",
    "ansible_become_pass",
    "ansible_ssh_pass",
    "ansible_ssh_private_key_file",
];

/// Key prefixes registered as builtin when an import creates them.
pub const BUILTIN_PREFIXES: &[&str] = &["ansible_"];

/// Environment variable overriding the database path.
pub const ENV_DATABASE: &str = "ANSIBASE_DATABASE";

/// Environment variable overriding the inventory encryption key.
pub const ENV_ENCRYPTION_KEY: &str = "ANSIBASE_ENCRYPTION_KEY";

/// Environment variable overriding the credential encryption key.
pub const ENV_SECRET_KEY: &str = "ANSIBASE_SECRET_KEY";

/// Whether a group name is reserved.
pub fn is_protected_group(name: &str) -> bool {
    PROTECTED_GROUPS.contains(&name)
}
