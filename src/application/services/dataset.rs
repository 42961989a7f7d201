//! Dataset service
//!
//! Loads JSON datasets into a validated `TreeStore` and writes mutated
//! stores back, optionally keeping a `.bak` copy of the previous file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Item, ItemId, TreeStore};
use crate::infrastructure::traits::FileSystem;

/// Service for reading and writing item datasets.
///
/// A dataset is a JSON array of records; the file format is exactly what
/// `TreeStore::get_all` yields, so a load/save round trip is stable.
pub struct DatasetService {
    fs: Arc<dyn FileSystem>,
    /// Copy the previous file to `<file>.bak` before overwriting
    backup: bool,
}

impl DatasetService {
    pub fn new(fs: Arc<dyn FileSystem>, backup: bool) -> Self {
        Self { fs, backup }
    }

    /// Load a dataset file into a validated store.
    ///
    /// Fails with `DatasetNotFound` for a missing file, `InvalidDataset` for
    /// malformed JSON, and passes store validation errors (duplicates,
    /// cycles) through untouched.
    pub fn load(&self, path: &Path) -> ApplicationResult<TreeStore> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::DatasetNotFound(path.to_path_buf()));
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read dataset", path)?;
        let records = Self::parse(path, &content)?;
        debug!("load: {} records from {}", records.len(), path.display());

        Ok(TreeStore::new(records)?)
    }

    /// Parse dataset content without touching the filesystem.
    pub fn parse(path: &Path, content: &str) -> ApplicationResult<Vec<Item>> {
        serde_json::from_str(content).map_err(|source| ApplicationError::InvalidDataset {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize records in dataset format (pretty JSON).
    pub fn to_json(records: &[Item]) -> ApplicationResult<String> {
        serde_json::to_string_pretty(records)
            .map_err(|source| ApplicationError::Serialize { source })
    }

    /// Write the store's records back, in insertion order.
    ///
    /// With backups enabled and an existing target, the previous content is
    /// copied to `<file>.bak` first.
    pub fn save(&self, path: &Path, store: &TreeStore) -> ApplicationResult<()> {
        if self.backup && self.fs.exists(path) {
            let backup = Self::backup_path(path);
            self.fs
                .copy(path, &backup)
                .with_path_context("back up dataset", path)?;
            debug!("save: previous dataset kept at {}", backup.display());
        }

        let records = store.get_all();
        let json = Self::to_json(&records)?;
        self.fs.ensure_parent(path).with_path_context("create dataset directory", path)?;
        self.fs
            .write(path, &(json + "\n"))
            .with_path_context("write dataset", path)?;
        debug!("save: {} records to {}", records.len(), path.display());
        Ok(())
    }

    /// Write the starter dataset.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn init(&self, path: &Path, force: bool) -> ApplicationResult<()> {
        if self.fs.exists(path) && !force {
            return Err(ApplicationError::DatasetExists(path.to_path_buf()));
        }
        let store = TreeStore::new(sample_items())?;
        self.save(path, &store)
    }

    /// `<file>.bak`, next to the dataset.
    fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }
}

/// The starter dataset: three levels, mixed integer and text ids.
pub fn sample_items() -> Vec<Item> {
    vec![
        Item::new(1, None, "Item 1"),
        Item::new("2", Some(ItemId::Int(1)), "Item 2"),
        Item::new(3, Some(ItemId::Int(1)), "Item 3"),
        Item::new(4, Some(ItemId::Text("2".to_string())), "Item 4"),
        Item::new(5, Some(ItemId::Text("2".to_string())), "Item 5"),
        Item::new(6, Some(ItemId::Text("2".to_string())), "Item 6"),
        Item::new(7, Some(ItemId::Int(4)), "Item 7"),
        Item::new(8, Some(ItemId::Int(4)), "Item 8"),
    ]
}
