//! Tests for `ansibase inventory`, the surface ansible calls.

use crate::support::*;
use serde_json::json;

#[test]
fn test_list_shape() {
    let t = Test::with_groups(WEB_DOCUMENT);
    let inventory = t.inventory();

    assert_eq!(inventory["webservers"]["hosts"], json!(["web01", "web02"]));
    assert_eq!(inventory["webservers"]["children"], json!(["canary"]));
    assert_eq!(inventory["webservers"]["vars"], json!({ "http_port": "80" }));
    assert_eq!(inventory["canary"]["hosts"], json!(["web03"]));
    assert!(inventory["canary"].get("children").is_none());
    assert_eq!(
        inventory["_meta"]["hostvars"]["web01"],
        json!({ "ansible_host": "10.0.0.5", "ansible_user": "deploy" })
    );

    // Empty groups are left out but still listed as children.
    assert!(inventory.get("ungrouped").is_none());
    assert_eq!(inventory["all"]["children"], json!(["ungrouped", "webservers"]));
}

#[test]
fn test_default_is_list() {
    let t = Test::with_groups(SINGLE_HOST_DOCUMENT);

    let output = t.run(&["inventory"]);
    assert_success(&output);
    let inventory: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(inventory["webservers"]["hosts"], json!(["h2"]));
}

#[test]
fn test_host_and_unknown_host() {
    let t = Test::with_groups(SINGLE_HOST_DOCUMENT);

    assert_eq!(t.hostvars("h2"), json!({ "ansible_host": "10.0.0.5" }));
    assert_eq!(t.hostvars("nope"), json!({}));
}

#[test]
fn test_masked_output() {
    let t = Test::with_groups(SECRET_DOCUMENT);

    assert_eq!(t.hostvars("db01")["ansible_password"], "hunter2");

    let output = t.run(&["inventory", "--host", "db01", "--masked"]);
    assert_success(&output);
    let vars: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(vars["ansible_password"], "****");
}

#[test]
fn test_wrong_key_yields_empty_value() {
    let t = Test::with_groups(SECRET_DOCUMENT);

    let output = t
        .cmd()
        .env("ANSIBASE_ENCRYPTION_KEY", "some-other-key")
        .args(["inventory", "--host", "db01"])
        .output()
        .unwrap();
    assert_success(&output);
    let vars: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(vars["ansible_password"], "");
    assert_eq!(vars["ansible_host"], "10.0.1.1");
}

#[test]
fn test_graph() {
    let t = Test::with_groups(WEB_DOCUMENT);

    let output = t.run(&["inventory", "--graph"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.starts_with("@all:\n"), "got: {}", out);
    assert!(out.contains("  |--@webservers:\n"), "got: {}", out);
    assert!(out.contains("  |  |--web01\n"), "got: {}", out);
    assert!(out.contains("  |  |--@canary:\n"), "got: {}", out);
    assert!(out.contains("  |  |  |--web03\n"), "got: {}", out);
}

#[test]
fn test_pretty_is_indented() {
    let t = Test::with_groups(SINGLE_HOST_DOCUMENT);

    let output = t.run(&["inventory", "--list", "--pretty"]);
    assert_success(&output);
    assert_stdout_contains(&output, "\n  \"_meta\": {");
}

#[test]
fn test_list_conflicts_with_host() {
    let t = Test::init();

    let output = t.run(&["inventory", "--list", "--host", "h1"]);
    assert_failure(&output);
}
