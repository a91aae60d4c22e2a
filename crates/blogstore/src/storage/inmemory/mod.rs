//! In-memory storage backend.
//!
//! Keeps every table in a `BTreeMap` behind `Arc<RwLock<_>>`. Data is not
//! persisted and is lost when the store is dropped. Also drives the test
//! suite of the repository and service layers.
//!
//! # Example
//!
//! ```rust,ignore
//! use blogstore_core::storage::blog_table_definition;
//!
//! let store = InMemoryStore::new([blog_table_definition()]);
//! ```

mod store;

pub use store::InMemoryStore;
