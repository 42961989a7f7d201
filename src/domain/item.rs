//! Domain entities: the record stored in the hierarchy

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ident::ItemId;

/// A record in the hierarchy: an identifier, an optional parent link, a
/// label, and arbitrary further fields carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// `None` marks a root record. Serialized as `parentId`; datasets written
    /// with the shorter `parent` key are accepted on input.
    #[serde(rename = "parentId", alias = "parent", default)]
    pub parent_id: Option<ItemId>,
    pub label: String,
    /// Fields beyond id/parent/label, preserved on round trips but never
    /// interpreted.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, parent_id: Option<ItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id,
            label: label.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Attach an extra field, builder style.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// True when the record carries no parent link.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
