//! Library-level tests against an in-memory repository.

use ansibase::core::cipher::{Boundary, Keyring};
use ansibase::core::domain::{GroupPatch, HostFilter, StoredValue, VariableSpec};
use ansibase::core::import::GroupsDocument;
use ansibase::core::repository::{ImportOptions, Repository};
use ansibase::core::store::Database;
use std::collections::BTreeMap;

fn repository() -> Repository {
    let database = Database::memory();
    database
        .initialize(&Repository::seed().unwrap())
        .unwrap();
    let keyring = Keyring {
        inventory: Boundary::passphrase("inventory", "k1", 4).unwrap(),
        credentials: Boundary::passphrase("credentials", "k2", 4).unwrap(),
    };
    Repository::new(database, keyring)
}

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_inherited_view_and_local_export() {
    let repo = repository();
    for key in ["region", "tier"] {
        repo.create_variable(&VariableSpec::new(key)).unwrap();
    }
    repo.create_group("web", "", Some("all")).unwrap();
    repo.create_host("h1", "", true, &["web".to_string()]).unwrap();
    repo.set_group_var("all", "region", "eu").unwrap();
    repo.set_group_var("web", "tier", "front").unwrap();

    let inherited: BTreeMap<String, String> = repo
        .group_variables("web", true, true)
        .unwrap()
        .into_iter()
        .map(|e| (e.key, e.value))
        .collect();
    assert_eq!(inherited, map(&[("region", "eu"), ("tier", "front")]));

    let inventory = repo.inventory(false).unwrap();
    assert_eq!(inventory.group("web").unwrap().vars, map(&[("tier", "front")]));
    assert_eq!(inventory.group("all").unwrap().vars, map(&[("region", "eu")]));
}

#[test]
fn test_alias_fills_password() {
    let repo = repository();
    repo.create_variable(&VariableSpec::new("legacy_pw").sensitive(true))
        .unwrap();
    repo.create_alias("ansible_password", "legacy_pw", "").unwrap();
    repo.create_host("h1", "", true, &["ungrouped".to_string()])
        .unwrap();
    repo.set_host_var("h1", "legacy_pw", "secret1").unwrap();

    let vars = repo.host_vars("h1", false).unwrap();
    assert_eq!(vars["ansible_password"], "secret1");
    assert_eq!(vars["legacy_pw"], "secret1");

    let inventory = repo.inventory(false).unwrap();
    assert_eq!(
        inventory.hostvars("h1").unwrap()["ansible_password"],
        "secret1"
    );
}

// Substitution is one pass and never chases chains, so running it again
// over its own output can fill `a` here. Idempotency only holds when no
// alias is also a source.
#[test]
fn test_chained_aliases_do_not_resolve() {
    let repo = repository();
    for key in ["a", "b", "c"] {
        repo.create_variable(&VariableSpec::new(key)).unwrap();
    }
    repo.create_alias("a", "b", "").unwrap();
    repo.create_alias("b", "c", "").unwrap();
    repo.create_host("h1", "", true, &[]).unwrap();
    repo.set_host_var("h1", "c", "3").unwrap();

    let vars = repo.host_vars("h1", false).unwrap();
    assert_eq!(vars.get("b").map(String::as_str), Some("3"));
    assert_eq!(vars.get("a"), None);
}

#[test]
fn test_protected_groups_untouched() {
    let repo = repository();
    let before = repo.database().read().unwrap();

    let err = repo.delete_group("ungrouped").unwrap_err();
    assert!(err.is_invariant(), "got {err}");

    let rename = GroupPatch {
        name: Some("everything".to_string()),
        ..Default::default()
    };
    let err = repo.update_group("all", &rename).unwrap_err();
    assert!(err.is_invariant(), "got {err}");

    let after = repo.database().read().unwrap();
    assert_eq!(before.groups(), after.groups());
}

#[test]
fn test_import_twice() {
    let repo = repository();
    let document = GroupsDocument::parse(
        r#"{webservers: {hosts: {h2: {ansible_host: "10.0.0.5"}}}}"#,
    )
    .unwrap();
    let options = ImportOptions::default();

    let first = repo.import_groups(&document, &options).unwrap();
    assert_eq!(first.hosts_created, 1);
    assert_eq!(first.groups_created, 1);
    assert_eq!(first.host_vars_created, 1);

    let second = repo.import_groups(&document, &options).unwrap();
    assert_eq!(second.created(), 0);
    assert_eq!(second.writes(), 0);
    assert_eq!(second.unchanged, 1);

    let tables = repo.database().read().unwrap();
    assert_eq!(tables.hosts().len(), 1);
    assert_eq!(tables.hosts()[0].name, "h2");
    assert_eq!(tables.host_variables().len(), 1);
}

#[test]
fn test_dry_run_rolls_back() {
    let repo = repository();
    let document = GroupsDocument::parse("web:\n  hosts:\n    h1: {}\n").unwrap();
    let options = ImportOptions {
        dry_run: true,
        ..Default::default()
    };

    let stats = repo.import_groups(&document, &options).unwrap();
    assert!(stats.dry_run);
    assert_eq!(stats.hosts_created, 1);
    assert!(repo.hosts(&HostFilter::default()).unwrap().is_empty());
}

#[test]
fn test_sensitive_rows_hold_one_representation() {
    let repo = repository();
    repo.create_host("db01", "", true, &["ungrouped".to_string()])
        .unwrap();
    repo.set_host_var("db01", "ansible_password", "hunter2")
        .unwrap();
    repo.set_host_var("db01", "ansible_host", "10.0.1.1").unwrap();

    let tables = repo.database().read().unwrap();
    let host = tables.host_by_name("db01").unwrap().id;
    let password = tables.variable_by_key("ansible_password").unwrap().id;
    let address = tables.variable_by_key("ansible_host").unwrap().id;

    assert!(matches!(
        tables.host_variable(host, password).unwrap().value,
        StoredValue::Encrypted(_)
    ));
    assert!(matches!(
        tables.host_variable(host, address).unwrap().value,
        StoredValue::Plain(_)
    ));

    assert_eq!(repo.host_vars("db01", false).unwrap()["ansible_password"], "hunter2");
    assert_eq!(repo.host_vars("db01", true).unwrap()["ansible_password"], "****");
}

#[test]
fn test_wrong_key_reads_empty_string() {
    let database = Database::memory();
    database
        .initialize(&Repository::seed().unwrap())
        .unwrap();
    let writer = Repository::new(
        database,
        Keyring {
            inventory: Boundary::passphrase("inventory", "k1", 4).unwrap(),
            credentials: Boundary::passphrase("credentials", "k2", 4).unwrap(),
        },
    );
    writer
        .create_host("db01", "", true, &["ungrouped".to_string()])
        .unwrap();
    writer
        .set_host_var("db01", "ansible_password", "hunter2")
        .unwrap();

    let tables = writer.database().read().unwrap();
    let reader_db = Database::memory();
    reader_db.initialize(&tables).unwrap();
    let reader = Repository::new(
        reader_db,
        Keyring {
            inventory: Boundary::passphrase("inventory", "other", 4).unwrap(),
            credentials: Boundary::passphrase("credentials", "k2", 4).unwrap(),
        },
    );

    assert_eq!(reader.host_vars("db01", false).unwrap()["ansible_password"], "");
}

#[test]
fn test_cycle_rejected() {
    let repo = repository();
    repo.create_group("a", "", None).unwrap();
    repo.create_group("b", "", Some("a")).unwrap();

    let patch = GroupPatch {
        parent: Some("b".to_string()),
        ..Default::default()
    };
    let err = repo.update_group("a", &patch).unwrap_err();
    assert!(err.is_invariant(), "got {err}");
}

#[test]
fn test_duplicate_names_conflict() {
    let repo = repository();
    repo.create_host("h1", "", true, &[]).unwrap();
    assert!(repo.create_host("h1", "", true, &[]).unwrap_err().is_conflict());
    assert!(repo.create_group("all", "", None).unwrap_err().is_conflict());
}

#[test]
fn test_newest_alias_source_wins() {
    let repo = repository();
    for key in ["old_ip", "new_ip"] {
        repo.create_variable(&VariableSpec::new(key)).unwrap();
    }
    repo.create_alias("ansible_host", "old_ip", "").unwrap();
    repo.create_alias("ansible_host", "new_ip", "").unwrap();
    repo.create_host("h1", "", true, &[]).unwrap();
    repo.set_host_var("h1", "old_ip", "10.0.0.1").unwrap();
    repo.set_host_var("h1", "new_ip", "10.0.0.2").unwrap();

    assert_eq!(repo.host_vars("h1", false).unwrap()["ansible_host"], "10.0.0.2");
}

#[test]
fn test_unknown_or_inactive_host_is_not_found() {
    let repo = repository();
    repo.create_host("idle", "", false, &[]).unwrap();

    assert!(repo.host_vars("missing", false).unwrap_err().is_not_found());
    assert!(repo.host_vars("idle", false).unwrap_err().is_not_found());
}

#[test]
fn test_meta_is_not_a_group_name() {
    let repo = repository();
    let document = GroupsDocument::parse("_meta:\n  hosts:\n    h1: {}\n").unwrap();

    let err = repo
        .import_groups(&document, &ImportOptions::default())
        .unwrap_err();
    assert!(err.is_invariant(), "got {err}");
    assert!(repo.hosts(&HostFilter::default()).unwrap().is_empty());

    repo.create_group("web", "", None).unwrap();
    let rename = GroupPatch {
        name: Some("_meta".to_string()),
        ..Default::default()
    };
    assert!(repo.update_group("web", &rename).unwrap_err().is_invariant());
}
