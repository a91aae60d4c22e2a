//! Typed access to the tables behind a [`TableStore`](blogstore_core::storage::TableStore).
//!
//! - [`TableRepository`]: get, save, delete, update, query, scan, batches and
//!   transactions for one entity type
//! - [`IndexReader`]: keys-only reads from a global secondary index
//! - [`BatchRehydrator`]: full entities for the sort keys an index returned
//!
//! Every operation takes a `CancellationToken`. A cancelled single call fails
//! with `RepositoryError::Cancelled`; a cancelled paged read stops fetching
//! and returns what it already has.

// The CLI drives only part of the repository surface.
#![allow(dead_code)]

mod index;
mod paging;
mod rehydrate;
mod table;
#[cfg(test)]
mod testing;

pub use index::IndexReader;
pub use rehydrate::BatchRehydrator;
pub use table::{BatchGetOutput, TableRepository};
