//! Tests for `ansibase group`.

use crate::support::*;

#[test]
fn test_protected_groups() {
    let t = Test::init();

    let output = t.run(&["group", "delete", "ungrouped", "--yes"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "protected");

    let output = t.run(&["group", "update", "all", "--name", "everything"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "protected");

    let output = t.run(&["group", "update", "all", "--parent", "ungrouped"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot have a parent");
}

#[test]
fn test_cycle_rejected() {
    let t = Test::init();
    assert_success(&t.group_create("web", None));
    assert_success(&t.group_create("front", Some("web")));

    let output = t.run(&["group", "update", "web", "--parent", "front"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "ancestor");

    let output = t.run(&["group", "update", "web", "--parent", "web"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "its own parent");
}

#[test]
fn test_tree_rendering() {
    let t = Test::with_groups(WEB_DOCUMENT);

    let output = t.run(&["group", "list", "--tree"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.starts_with("all\n"), "got: {}", out);
    assert!(out.contains("├── ungrouped\n"), "got: {}", out);
    assert!(out.contains("└── webservers (2)\n"), "got: {}", out);
    assert!(out.contains("    └── canary (1)\n"), "got: {}", out);
}

#[test]
fn test_inherited_variables() {
    let t = Test::init();
    assert_success(&t.var_create("region", false));
    assert_success(&t.var_create("tier", false));
    assert_success(&t.group_create("web", None));
    assert_success(&t.run(&["group", "set-var", "all", "region", "eu"]));
    assert_success(&t.run(&["group", "set-var", "web", "tier", "front"]));

    let output = t.run(&["group", "vars", "web", "--inherited", "--json"]);
    assert_success(&output);
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pairs: Vec<(String, String)> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["key"].as_str().unwrap().to_string(),
                e["value"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("region".to_string(), "eu".to_string()),
            ("tier".to_string(), "front".to_string()),
        ]
    );

    // The export carries local vars only.
    let inventory = t.inventory();
    assert_eq!(inventory["web"]["vars"], serde_json::json!({ "tier": "front" }));
}

#[test]
fn test_aggregated_hosts() {
    let t = Test::with_groups(WEB_DOCUMENT);

    let output = t.run(&["group", "hosts", "webservers"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "web01\nweb02\n");

    let output = t.run(&["group", "hosts", "webservers", "--aggregated"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "web01\nweb02\nweb03\n");
}

#[test]
fn test_delete_cascades_to_children() {
    let t = Test::with_groups(WEB_DOCUMENT);

    let output = t.run(&["group", "delete", "webservers", "--yes"]);
    assert_success(&output);
    assert_stdout_contains(&output, "deleted 2 groups");

    let output = t.run(&["group", "show", "canary"]);
    assert_failure(&output);
}

#[test]
fn test_requirements() {
    let t = Test::init();
    assert_success(&t.group_create("web", None));
    assert_success(&t.run(&["group", "require", "web", "ansible_port", "--default", "2222"]));

    let output = t.run(&["group", "requirements", "web"]);
    assert_success(&output);
    assert_stdout_contains(&output, "ansible_port");
    assert_stdout_contains(&output, "default 2222");

    assert_success(&t.run(&["group", "unrequire", "web", "ansible_port"]));
    let output = t.run(&["group", "requirements", "web"]);
    assert_stdout_contains(&output, "no declarations");
}
