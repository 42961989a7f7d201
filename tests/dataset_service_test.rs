//! Tests for DatasetService: load, save, backup and init against real files

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

use treestore::application::{ApplicationError, DatasetService};
use treestore::infrastructure::traits::RealFileSystem;
use treestore::util::testing::init_test_setup;
use treestore::{Item, ItemId, StoreError};

fn service(backup: bool) -> DatasetService {
    DatasetService::new(Arc::new(RealFileSystem), backup)
}

fn write_dataset(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write dataset fixture");
    path
}

#[fixture]
fn temp_dir() -> TempDir {
    init_test_setup();
    TempDir::new().expect("create temp dir")
}

// ============================================================
// load
// ============================================================

#[rstest]
fn given_valid_dataset_when_loading_then_store_is_indexed(temp_dir: TempDir) {
    let path = write_dataset(
        &temp_dir,
        "items.json",
        r#"[
            {"id": 1, "label": "root"},
            {"id": "2", "parentId": 1, "label": "child", "weight": 3},
            {"id": 3, "parent": "2", "label": "leaf"}
        ]"#,
    );

    let store = service(false).load(&path).unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(
        store.get_item(&ItemId::Text("2".to_string())).unwrap().extra["weight"],
        json!(3)
    );
    let leaf = store.get_item(&ItemId::Int(3)).unwrap();
    assert_eq!(leaf.parent_id, Some(ItemId::Text("2".to_string())));
}

#[rstest]
fn given_missing_file_when_loading_then_dataset_not_found(temp_dir: TempDir) {
    let path = temp_dir.path().join("absent.json");

    let err = service(false).load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::DatasetNotFound(p) if p == path));
}

#[rstest]
fn given_malformed_json_when_loading_then_invalid_dataset(temp_dir: TempDir) {
    let path = write_dataset(&temp_dir, "broken.json", "[{\"id\": 1,");

    let err = service(false).load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidDataset { .. }));
}

#[rstest]
fn given_duplicate_ids_in_file_when_loading_then_store_error_passes_through(temp_dir: TempDir) {
    let path = write_dataset(
        &temp_dir,
        "dupes.json",
        r#"[{"id": 1, "label": "a"}, {"id": 1, "label": "b"}]"#,
    );

    let err = service(false).load(&path).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Store(StoreError::DuplicateId(ItemId::Int(1)))
    ));
}

#[rstest]
fn given_cyclic_parent_links_in_file_when_loading_then_store_error_passes_through(
    temp_dir: TempDir,
) {
    let path = write_dataset(
        &temp_dir,
        "cycle.json",
        r#"[
            {"id": 1, "parentId": 2, "label": "a"},
            {"id": 2, "parentId": 1, "label": "b"}
        ]"#,
    );

    let err = service(false).load(&path).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Store(StoreError::CycleDetected(_))
    ));
}

// ============================================================
// save
// ============================================================

#[rstest]
fn given_mutated_store_when_saving_and_reloading_then_changes_survive(temp_dir: TempDir) {
    let path = temp_dir.path().join("items.json");
    let datasets = service(false);
    datasets.init(&path, false).unwrap();

    let mut store = datasets.load(&path).unwrap();
    store
        .add_item(Item::new(9, Some(ItemId::Int(3)), "Item 9"))
        .unwrap();
    datasets.save(&path, &store).unwrap();

    let reloaded = datasets.load(&path).unwrap();
    assert_eq!(reloaded.len(), 9);
    assert_eq!(reloaded.get_item(&ItemId::Int(9)).unwrap().label, "Item 9");
    // new record keeps its insertion position
    assert_eq!(reloaded.get_all().last().unwrap().id, ItemId::Int(9));
}

#[rstest]
fn given_extra_fields_and_mixed_id_types_when_round_tripping_then_written_verbatim(
    temp_dir: TempDir,
) {
    let path = write_dataset(
        &temp_dir,
        "items.json",
        r#"[
            {"id": 1, "label": "root", "weight": 2.5},
            {"id": "2", "parentId": 1, "label": "child", "active": true, "tags": ["a", "b"]}
        ]"#,
    );
    let datasets = service(false);

    let store = datasets.load(&path).unwrap();
    let copy = temp_dir.path().join("copy.json");
    datasets.save(&copy, &store).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&copy).unwrap()).unwrap();
    assert_eq!(
        written,
        json!([
            {"id": 1, "parentId": null, "label": "root", "weight": 2.5},
            {"id": "2", "parentId": 1, "label": "child", "active": true, "tags": ["a", "b"]}
        ])
    );
}

#[rstest]
fn given_backups_enabled_when_overwriting_then_previous_content_kept(temp_dir: TempDir) {
    let path = temp_dir.path().join("items.json");
    let datasets = service(true);
    datasets.init(&path, false).unwrap();
    let original = fs::read_to_string(&path).unwrap();

    let mut store = datasets.load(&path).unwrap();
    store.remove_item(&ItemId::Int(3)).unwrap();
    datasets.save(&path, &store).unwrap();

    let backup = temp_dir.path().join("items.json.bak");
    assert_eq!(fs::read_to_string(&backup).unwrap(), original);
    assert_ne!(fs::read_to_string(&path).unwrap(), original);
}

#[rstest]
fn given_backups_disabled_when_overwriting_then_no_bak_file(temp_dir: TempDir) {
    let path = temp_dir.path().join("items.json");
    let datasets = service(false);
    datasets.init(&path, false).unwrap();

    let store = datasets.load(&path).unwrap();
    datasets.save(&path, &store).unwrap();

    assert!(!temp_dir.path().join("items.json.bak").exists());
}

#[rstest]
fn given_missing_parent_directory_when_saving_then_created(temp_dir: TempDir) {
    let path = temp_dir.path().join("nested/deep/items.json");
    let datasets = service(false);

    datasets.init(&path, false).unwrap();

    assert!(path.exists());
}

// ============================================================
// init
// ============================================================

#[rstest]
fn given_fresh_path_when_initializing_then_starter_dataset_written(temp_dir: TempDir) {
    let path = temp_dir.path().join("items.json");
    let datasets = service(false);

    datasets.init(&path, false).unwrap();

    let store = datasets.load(&path).unwrap();
    assert_eq!(store.len(), 8);
    assert_eq!(store.get_children(&ItemId::Text("2".to_string())).len(), 3);
    assert_eq!(store.get_all_parents(&ItemId::Int(7)).len(), 4);
}

#[rstest]
fn given_existing_file_when_initializing_without_force_then_refused(temp_dir: TempDir) {
    let path = write_dataset(&temp_dir, "items.json", "[]");

    let err = service(false).init(&path, false).unwrap_err();

    assert!(matches!(err, ApplicationError::DatasetExists(p) if p == path));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[rstest]
fn given_existing_file_when_initializing_with_force_then_overwritten(temp_dir: TempDir) {
    let path = write_dataset(&temp_dir, "items.json", "[]");
    let datasets = service(false);

    datasets.init(&path, true).unwrap();

    let store = datasets.load(&path).unwrap();
    assert_eq!(store.len(), 8);
}
