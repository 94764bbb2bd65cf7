//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Low scrypt cost so encrypted values stay fast in tests.
pub const TEST_WORK_FACTOR: &str = "4";

impl Test {
    /// Create an ansibase command isolated to the test directory.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("ansibase").expect("failed to find ansibase binary");
        for var in [
            "ANSIBASE_CONFIG",
            "ANSIBASE_DATABASE",
            "ANSIBASE_ENCRYPTION_KEY",
            "ANSIBASE_SECRET_KEY",
            "ANSIBASE_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run ansibase with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run ansibase")
    }

    /// Shortcut for `ansibase init` with a cheap work factor.
    pub fn init_cmd(&self) -> Output {
        self.run(&["init", "--work-factor", TEST_WORK_FACTOR])
    }

    /// Write `document` to a file and import it as a group document.
    pub fn import_groups(&self, document: &str, extra: &[&str]) -> Output {
        let file = self.path("groups.yml");
        std::fs::write(&file, document).expect("failed to write document");
        let file = file.to_string_lossy().to_string();
        let mut args = vec!["import", "groups", file.as_str()];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    /// Write `document` to a file and import it as a host document.
    pub fn import_hosts(&self, document: &str, extra: &[&str]) -> Output {
        let file = self.path("hosts.yml");
        std::fs::write(&file, document).expect("failed to write document");
        let file = file.to_string_lossy().to_string();
        let mut args = vec!["import", "hosts", file.as_str()];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    /// Shortcut for `ansibase host create`.
    pub fn host_create(&self, name: &str, groups: &[&str]) -> Output {
        let mut args = vec!["host", "create", name];
        for group in groups {
            args.extend_from_slice(&["--group", group]);
        }
        self.run(&args)
    }

    /// Shortcut for `ansibase group create`.
    pub fn group_create(&self, name: &str, parent: Option<&str>) -> Output {
        let mut args = vec!["group", "create", name];
        if let Some(parent) = parent {
            args.extend_from_slice(&["--parent", parent]);
        }
        self.run(&args)
    }

    /// Shortcut for `ansibase var create`.
    pub fn var_create(&self, key: &str, sensitive: bool) -> Output {
        let mut args = vec!["var", "create", key];
        if sensitive {
            args.push("--sensitive");
        }
        self.run(&args)
    }

    /// `ansibase inventory --list` parsed as JSON.
    pub fn inventory(&self) -> serde_json::Value {
        let output = self.run(&["inventory", "--list"]);
        assert!(
            output.status.success(),
            "inventory failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("inventory is not JSON")
    }

    /// `ansibase inventory --host NAME` parsed as JSON.
    pub fn hostvars(&self, host: &str) -> serde_json::Value {
        let output = self.run(&["inventory", "--host", host]);
        assert!(
            output.status.success(),
            "inventory --host failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("hostvars are not JSON")
    }
}
