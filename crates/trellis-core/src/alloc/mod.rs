//! Collections shared by the attribute crates.
//!
//! Hashing goes through ahash everywhere; object storage uses the
//! generational [`sparse_set::SparseSet`].

pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet};
