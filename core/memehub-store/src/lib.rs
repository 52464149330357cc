//! Storage layer for MemeHub.
//!
//! Defines the [`DocumentStore`] contract the query core runs against and
//! ships [`MemoryStore`], an in-memory engine that evaluates every pipeline
//! stage variant.
//!
//! # Memory store semantics
//!
//! - Values order as null < numbers < strings < objects < arrays < booleans
//! - Missing fields read as null; dotted paths address nested objects
//! - A comparison against an array field matches when any element does
//! - Sorts are stable and groups keep first-seen key order

mod error;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::{DocumentStore, DocumentUpdate};
