//! Sparse cache module
//!
//! One `SparseStore` per collection type holds what is known of that
//! collection: position → `Slot::Materialized(item)` or `Slot::Unknown`.
//! Reads are all-or-nothing per window; merges never drop a materialized
//! item unless the collection shrank below its position.

mod store;

pub use store::{Slot, SparseStore};
