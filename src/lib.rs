//! treestore: a hierarchical record store over flat JSON datasets
//!
//! A [`TreeStore`] indexes a flat list of parent-referencing records for O(1)
//! id lookup, direct-children lookup, and iterative ancestor/descendant
//! traversal. Mutations keep the indexes consistent and the parent graph
//! acyclic; integer and text record ids never coerce into each other. The
//! accompanying CLI operates on a JSON dataset file and renders hierarchies
//! in the terminal.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_forest, Item, ItemId, StoreError, StoreResult, TreeArena, TreeStore};
