//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `TableStore` trait
//! defined in `blogstore_core::storage`. The active backend is selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): process-local tables, nothing is persisted
//! - `dynamodb`: AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! The in-memory backend is always compiled for tests.
//!
//! # Examples
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p blogstore --no-default-features --features dynamodb
//! ```

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
