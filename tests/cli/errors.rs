//! Error reporting and exit status.

use crate::support::*;

#[test]
fn test_missing_config_suggests_init() {
    let t = Test::new();

    let output = t.run(&["host", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "config file not found");
    assert_stderr_contains(&output, "ansibase init");
}

#[test]
fn test_missing_database_suggests_init() {
    let t = Test::init();
    std::fs::remove_file(t.path("ansibase.db.toml")).unwrap();

    let output = t.run(&["group", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not initialized");
}

#[test]
fn test_unknown_host_is_not_found() {
    let t = Test::init();

    let output = t.run(&["host", "show", "ghost"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "host not found: ghost");
}

#[test]
fn test_unknown_variable_hints_at_catalog() {
    let t = Test::init();
    assert_success(&t.host_create("h1", &[]));

    let output = t.run(&["host", "set-var", "h1", "region", "eu"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "variable not found: region");
    assert_stderr_contains(&output, "var create");
}

#[test]
fn test_corrupt_database() {
    let t = Test::init();
    std::fs::write(t.path("ansibase.db.toml"), "hosts = 3\n[[").unwrap();

    let output = t.run(&["host", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "corrupt database");
}

#[test]
fn test_invalid_type_rejected_by_parser() {
    let t = Test::init();

    let output = t.run(&["var", "create", "x", "--type", "float"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid variable type");
}
