//! Domain layer: the record store and its entities
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod ident;
pub mod item;
pub mod store;

pub use arena::{build_forest, TreeArena, TreeNode};
pub use error::{StoreError, StoreResult};
pub use ident::ItemId;
pub use item::Item;
pub use store::TreeStore;
