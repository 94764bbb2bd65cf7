//! Tests for `ansibase var` and `ansibase alias`.

use crate::support::*;

#[test]
fn test_create_show_update() {
    let t = Test::init();

    let output = t.run(&[
        "var", "create", "http_port", "--type", "int", "--default", "80", "--regex", "[0-9]+",
    ]);
    assert_success(&output);

    let output = t.run(&["var", "show", "http_port"]);
    assert_success(&output);
    assert_stdout_contains(&output, "int");
    assert_stdout_contains(&output, "80");

    assert_success(&t.run(&["var", "update", "http_port", "--clear-default"]));
    let output = t.run(&["var", "show", "http_port", "--json"]);
    let variable: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(variable["default_value"], serde_json::Value::Null);
    assert_eq!(variable["validation"], "[0-9]+");
}

#[test]
fn test_invalid_regex_rejected() {
    let t = Test::init();

    let output = t.run(&["var", "create", "bad", "--regex", "("]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid validation regex");
}

#[test]
fn test_sensitivity_locked_while_values_exist() {
    let t = Test::init();
    assert_success(&t.var_create("region", false));
    assert_success(&t.run(&["group", "set-var", "all", "region", "eu"]));

    let output = t.run(&["var", "update", "region", "--sensitive", "true"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot change sensitivity");
}

#[test]
fn test_builtin_delete_needs_force() {
    let t = Test::init();

    let output = t.run(&["var", "delete", "ansible_port", "--yes"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "builtin");

    assert_success(&t.run(&["var", "delete", "ansible_port", "--yes", "--force"]));
}

#[test]
fn test_alias_lifecycle() {
    let t = Test::init();
    assert_success(&t.var_create("ip", false));

    let output = t.run(&["alias", "create", "ansible_host", "ip"]);
    assert_success(&output);

    let output = t.run(&["alias", "list", "--json"]);
    let aliases: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let aliases = aliases.as_array().unwrap();
    assert_eq!(aliases.len(), 1);
    assert_eq!(aliases[0]["alias"], "ansible_host");
    let id = aliases[0]["id"].as_i64().unwrap().to_string();

    let output = t.run(&["alias", "create", "ip", "ip"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "alias of itself");

    assert_success(&t.run(&["alias", "delete", &id]));
    let output = t.run(&["alias", "list"]);
    assert_stdout_contains(&output, "no aliases");
}
