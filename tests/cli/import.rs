//! Tests for `ansibase import`.

use crate::support::*;

#[test]
fn test_import_twice_is_idempotent() {
    let t = Test::init();

    let output = t.import_groups(SINGLE_HOST_DOCUMENT, &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "imported");
    let before = std::fs::read_to_string(t.path("ansibase.db.toml")).unwrap();

    let output = t.import_groups(SINGLE_HOST_DOCUMENT, &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "already up to date");
    let after = std::fs::read_to_string(t.path("ansibase.db.toml")).unwrap();
    assert_eq!(before, after);

    let output = t.run(&["host", "list", "--json"]);
    let hosts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hosts.as_array().unwrap().len(), 1);
}

#[test]
fn test_import_with_secret_is_idempotent() {
    let t = Test::init();
    assert_success(&t.import_groups(SECRET_DOCUMENT, &[]));

    let output = t.import_groups(SECRET_DOCUMENT, &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "already up to date");
    assert_eq!(t.hostvars("db01")["ansible_password"], "hunter2");
}

#[test]
fn test_dry_run_writes_nothing() {
    let t = Test::init();

    let output = t.import_groups(WEB_DOCUMENT, &["--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "dry run");

    let inventory = t.inventory();
    assert!(inventory.get("webservers").is_none());
    assert_eq!(inventory["_meta"]["hostvars"], serde_json::json!({}));
}

#[test]
fn test_import_under_parent() {
    let t = Test::init();
    assert_success(&t.group_create("prod", None));

    assert_success(&t.import_groups(SINGLE_HOST_DOCUMENT, &["--parent", "prod"]));
    let output = t.run(&["group", "show", "webservers", "--json"]);
    let details: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(details["parent"], "prod");
}

#[test]
fn test_extra_sensitive_keys() {
    let t = Test::init();
    let document = "web:\n  vars:\n    api_token: abc123\n";

    assert_success(&t.import_groups(document, &["--sensitive", "api_token"]));
    let output = t.run(&["var", "show", "api_token", "--json"]);
    let variable: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(variable["sensitive"], true);

    let database = std::fs::read_to_string(t.path("ansibase.db.toml")).unwrap();
    assert!(!database.contains("abc123"));
}

#[test]
fn test_malformed_document_rejected_before_writes() {
    let t = Test::init();

    let output = t.import_groups("web:\n  hosts: [a, b]\n", &[]);
    assert_failure(&output);
    assert!(t.inventory().get("web").is_none());

    let output = t.import_groups("web:\n  hostz: {}\n", &[]);
    assert_failure(&output);
}

#[test]
fn test_import_hosts_document() {
    let t = Test::init();

    let output = t.import_hosts(HOSTS_DOCUMENT, &["--group", "ungrouped"]);
    assert_success(&output);

    let vars = t.hostvars("app01");
    assert_eq!(vars["ansible_host"], "10.0.2.1");
    assert_eq!(vars["roles"], r#"["web","api"]"#);

    let inventory = t.inventory();
    assert_eq!(
        inventory["ungrouped"]["hosts"],
        serde_json::json!(["app01", "app02"])
    );
}

#[test]
fn test_flat_host_document_names() {
    let t = Test::init();
    let document = "ansible_host: 10.0.3.1\n";

    // Without --name the file stem names the host.
    assert_success(&t.import_hosts(document, &[]));
    assert_eq!(t.hostvars("hosts")["ansible_host"], "10.0.3.1");

    assert_success(&t.import_hosts(document, &["--name", "solo"]));
    assert_eq!(t.hostvars("solo")["ansible_host"], "10.0.3.1");

    let output = t
        .cmd()
        .args(["import", "hosts", "-"])
        .write_stdin(document)
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "host name");
}

#[test]
fn test_import_from_stdin() {
    let t = Test::init();

    let output = t
        .cmd()
        .args(["import", "groups", "-"])
        .write_stdin(SINGLE_HOST_DOCUMENT)
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "stdin");
    assert_eq!(t.hostvars("h2")["ansible_host"], "10.0.0.5");
}

#[test]
fn test_meta_group_name_rejected() {
    let t = Test::init();

    let output = t.import_groups("_meta:\n  hosts:\n    h1:\n      ansible_host: a\n", &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "reserved");

    let output = t.group_create("_meta", None);
    assert_failure(&output);

    let inventory = t.inventory();
    assert_eq!(inventory["_meta"], serde_json::json!({ "hostvars": {} }));
}
