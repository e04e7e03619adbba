//! Configuration-driven reload, file to registry.
//!
//! Exercises the full reconfiguration-signal path: parse a config file,
//! build the incoming registry, reconcile the active one.

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use rule_tables::config::{build_registry, load_config_str, reload_from_file};
use rule_tables::{ConfigError, Registry, RuleTablesError};

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn initial_load_and_reload_preserve_identity() {
    let mut active = Registry::new();

    let v1 = config_file(
        r#"{
            "tables": [
                {"name": "internal", "rules": ["\\.corp\\.example\\.com$"]},
                {"rules": [".*"]}
            ]
        }"#,
    );
    reload_from_file(&mut active, v1.path()).unwrap();
    assert_eq!(active.len(), 2);

    // A connection resolves and retains its governing table
    let internal = active.lookup(Some("internal")).unwrap();
    assert!(internal.lookup_rule("db.corp.example.com").is_some());

    // New configuration drops the default table and rewrites "internal"
    let v2 = config_file(
        r#"{
            "tables": [
                {"name": "internal", "rules": ["\\.lan\\.example\\.com$"]}
            ]
        }"#,
    );
    reload_from_file(&mut active, v2.path()).unwrap();

    assert_eq!(active.len(), 1);
    assert!(active.lookup(None).is_none());

    // The retained handle survived and observes the new rules
    assert!(Arc::ptr_eq(&internal, &active.lookup(Some("internal")).unwrap()));
    assert!(internal.lookup_rule("db.lan.example.com").is_some());
    assert!(internal.lookup_rule("db.corp.example.com").is_none());
}

#[test]
fn build_registry_defers_compilation() {
    let config = load_config_str(r#"{"tables": [{"name": "t", "rules": ["^api\\."]}]}"#).unwrap();
    let incoming = build_registry(&config).unwrap();

    // Patterns are compiled during reload, not during construction
    let table = incoming.lookup(Some("t")).unwrap();
    assert!(table.lookup_rule("api.example.com").is_none());

    let mut active = Registry::new();
    active.reload(incoming);
    assert!(active
        .lookup(Some("t"))
        .unwrap()
        .lookup_rule("api.example.com")
        .is_some());
}

#[test]
fn duplicate_table_names_rejected_at_file_boundary() {
    let result = load_config_str(
        r#"{"tables": [{"name": "dup", "rules": []}, {"name": "dup", "rules": []}]}"#,
    );
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn failed_reload_leaves_active_registry_intact() {
    let mut active = Registry::new();
    let v1 = config_file(r#"{"tables": [{"name": "keep", "rules": ["x"]}]}"#);
    reload_from_file(&mut active, v1.path()).unwrap();
    let keep = active.lookup(Some("keep")).unwrap();

    // Unparseable file: the error surfaces before reload is invoked
    let broken = config_file("{ not json");
    let err = reload_from_file(&mut active, broken.path()).unwrap_err();
    assert!(matches!(err, RuleTablesError::Config(_)));
    assert!(!err.is_recoverable());

    assert!(Arc::ptr_eq(&keep, &active.lookup(Some("keep")).unwrap()));
    assert_eq!(active.len(), 1);
}
