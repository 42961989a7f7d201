//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Selector) but are
//! themselves concrete structs, not traits.

mod dataset;

pub use dataset::{sample_items, DatasetService};
