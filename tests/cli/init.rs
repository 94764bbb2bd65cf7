//! Tests for `ansibase init`.

use crate::support::*;
use std::fs;

#[test]
fn test_init_creates_config_and_database() {
    let t = Test::new();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "initialized");

    let config = fs::read_to_string(t.path("ansibase.toml")).unwrap();
    assert!(config.contains("[encryption]"));
    assert!(config.contains("work_factor = 4"));
    assert!(t.path("ansibase.db.toml").exists());
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init();

    let output = t.init_cmd();
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_init_custom_database_path() {
    let t = Test::new();

    let output = t.run(&["init", "--work-factor", "4", "--database", "data/inv.toml"]);
    assert_success(&output);
    assert!(t.path("data/inv.toml").exists());

    let output = t.run(&["group", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "ungrouped");
}

#[test]
fn test_init_seeds_reserved_groups_and_builtins() {
    let t = Test::init();

    let output = t.run(&["group", "list", "--json"]);
    assert_success(&output);
    let groups: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["all", "ungrouped"]);

    let output = t.run(&["var", "list", "--builtin", "true"]);
    assert_success(&output);
    assert_stdout_contains(&output, "ansible_host");
    assert_stdout_contains(&output, "ansible_password");
}

#[test]
fn test_config_flag_points_elsewhere() {
    let t = Test::new();
    let config = t.path("nested/ansibase.toml");
    fs::create_dir_all(config.parent().unwrap()).unwrap();
    let config = config.to_string_lossy().to_string();

    assert_success(&t.run(&["--config", &config, "init", "--work-factor", "4"]));
    assert!(t.path("nested/ansibase.db.toml").exists());

    let output = t
        .cmd()
        .env("ANSIBASE_CONFIG", &config)
        .args(["host", "list"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "no hosts");
}
