//! Tests for `ansibase lint`.

use crate::support::*;

#[test]
fn test_clean_import_has_no_findings() {
    let t = Test::with_groups(WEB_DOCUMENT);

    let output = t.run(&["lint"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no findings");
}

#[test]
fn test_missing_required_variable() {
    let t = Test::init();
    assert_success(&t.host_create("bare", &["ungrouped"]));

    let output = t.run(&["lint", "--json"]);
    assert_success(&output);
    let findings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let findings = findings.as_array().unwrap();
    assert_eq!(findings.len(), 2);
    assert!(findings.iter().all(|f| f["severity"] == "error"));

    let output = t.run(&["lint", "--strict"]);
    assert_failure(&output);
    assert_stdout_contains(&output, "ansible_host");
}

#[test]
fn test_type_mismatch_is_warning() {
    let t = Test::init();
    assert_success(&t.run(&["var", "create", "workers", "--type", "int"]));
    assert_success(&t.run(&["group", "set-var", "all", "workers", "many"]));

    let output = t.run(&["lint", "--strict"]);
    assert_success(&output);
    assert_stdout_contains(&output, "warning");
    assert_stdout_contains(&output, "not a valid int");
}
