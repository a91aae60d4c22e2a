//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of `TableStore`
//! using `aws-sdk-dynamodb`, plus client setup and table provisioning.

mod client;
mod conversions;
mod error;
mod schema;
mod store;

pub use client::create_client;
pub use schema::{ensure_table, Provisioning};
pub use store::DynamoDbStore;
