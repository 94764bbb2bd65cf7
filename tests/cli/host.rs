//! Tests for `ansibase host`.

use crate::support::*;

#[test]
fn test_create_list_show() {
    let t = Test::init();

    let output = t.host_create("web01", &["ungrouped"]);
    assert_success(&output);
    assert_stdout_contains(&output, "created host web01");

    let output = t.run(&["host", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "1 host");
    assert_stdout_contains(&output, "web01");

    let output = t.run(&["host", "show", "web01"]);
    assert_success(&output);
    assert_stdout_contains(&output, "ungrouped");
}

#[test]
fn test_duplicate_host_conflicts() {
    let t = Test::init();
    assert_success(&t.host_create("web01", &[]));

    let output = t.host_create("web01", &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "host already exists: web01");
}

#[test]
fn test_list_json_filters_inactive() {
    let t = Test::init();
    assert_success(&t.host_create("web01", &[]));
    assert_success(&t.run(&["host", "create", "web02", "--inactive"]));

    let output = t.run(&["host", "list", "--active", "--json"]);
    assert_success(&output);
    let hosts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let hosts = hosts.as_array().unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0]["name"], "web01");
}

#[test]
fn test_sensitive_value_masked_unless_revealed() {
    let t = Test::init();
    assert_success(&t.host_create("db01", &[]));
    assert_success(&t.run(&["host", "set-var", "db01", "ansible_password", "hunter2"]));

    let output = t.run(&["host", "show", "db01"]);
    assert_success(&output);
    assert_stdout_contains(&output, "****");
    assert_stdout_excludes(&output, "hunter2");

    let output = t.run(&["host", "show", "db01", "--reveal"]);
    assert_success(&output);
    assert_stdout_contains(&output, "hunter2");

    let database = std::fs::read_to_string(t.path("ansibase.db.toml")).unwrap();
    assert!(!database.contains("hunter2"));
    assert!(database.contains("AGE ENCRYPTED FILE"));
}

#[test]
fn test_set_var_twice_is_unchanged() {
    let t = Test::init();
    assert_success(&t.host_create("db01", &[]));
    assert_success(&t.run(&["host", "set-var", "db01", "ansible_password", "pw"]));

    let output = t.run(&["host", "set-var", "db01", "ansible_password", "pw"]);
    assert_success(&output);
    assert_stdout_contains(&output, "unchanged");
}

#[test]
fn test_membership_and_delete() {
    let t = Test::init();
    assert_success(&t.host_create("web01", &[]));
    assert_success(&t.run(&["host", "add-group", "web01", "ungrouped"]));

    let output = t.run(&["host", "add-group", "web01", "ungrouped"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");

    assert_success(&t.run(&["host", "remove-group", "web01", "ungrouped"]));
    assert_success(&t.run(&["host", "delete", "web01", "--yes"]));

    let output = t.run(&["host", "show", "web01"]);
    assert_failure(&output);
}

#[test]
fn test_deactivate_removes_from_inventory() {
    let t = Test::init();
    assert_success(&t.host_create("web01", &["ungrouped"]));
    assert_success(&t.run(&["host", "update", "web01", "--active", "false"]));

    let inventory = t.inventory();
    assert!(inventory["_meta"]["hostvars"].get("web01").is_none());
    assert!(inventory.get("ungrouped").is_none());
}

#[test]
fn test_alias_fills_unset_variable() {
    let t = Test::init();
    assert_success(&t.var_create("legacy_pw", false));
    assert_success(&t.host_create("h1", &[]));
    assert_success(&t.run(&["host", "set-var", "h1", "legacy_pw", "secret1"]));
    assert_success(&t.run(&["alias", "create", "ansible_password", "legacy_pw"]));

    let vars = t.hostvars("h1");
    assert_eq!(vars["ansible_password"], "secret1");
    assert_eq!(vars["legacy_pw"], "secret1");
}
