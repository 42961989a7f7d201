//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global → Local: later layer wins per field when specified
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use treestore::application::ApplicationError;
use treestore::config::Settings;

fn write_local_config(dir: &Path, content: &str) {
    fs::write(dir.join(".treestore.toml"), content).expect("write local config");
}

#[test]
fn given_local_config_with_all_fields_when_load_then_values_applied() {
    let dir = TempDir::new().unwrap();
    write_local_config(
        dir.path(),
        r#"
data_file = "projects/items.json"
backup = true
sort_siblings = false
"#,
    );

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.data_file, PathBuf::from("projects/items.json"));
    assert!(settings.backup);
    assert!(!settings.sort_siblings);
}

#[test]
fn given_partial_local_config_when_load_then_unspecified_fields_keep_defaults() {
    let dir = TempDir::new().unwrap();
    write_local_config(dir.path(), "backup = true\n");

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert!(settings.backup, "specified field comes from local config");
    assert_eq!(settings.data_file, PathBuf::from("items.json"));
    assert!(settings.sort_siblings);
}

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    write_local_config(dir.path(), "backup = \"definitely\"\n");

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_unknown_keys_in_local_config_when_load_then_ignored() {
    let dir = TempDir::new().unwrap();
    write_local_config(
        dir.path(),
        r#"
backup = true
future_option = "whatever"
"#,
    );

    let settings = Settings::load(Some(dir.path())).expect("load settings");
    assert!(settings.backup);
}

#[test]
fn given_tilde_in_configured_data_file_when_load_then_expanded_to_home() {
    let dir = TempDir::new().unwrap();
    write_local_config(dir.path(), "data_file = \"~/datasets/items.json\"\n");

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    let home = std::env::var("HOME").expect("HOME should be set");
    assert!(
        settings.data_file.to_string_lossy().starts_with(&home),
        "tilde should expand to home: {}",
        settings.data_file.display()
    );
}
