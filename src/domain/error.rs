//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::ident::ItemId;

/// Store errors represent hierarchy-rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("cycle detected in hierarchy starting at item {0}")]
    CycleDetected(ItemId),

    #[error("item {0} already exists")]
    DuplicateId(ItemId),

    #[error("item {0} not found")]
    NotFound(ItemId),
}

pub type StoreResult<T> = Result<T, StoreError>;
