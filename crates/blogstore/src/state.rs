//! Application state with repository-based storage.
//!
//! Both services share one `TableStore` handle. The backend is chosen by
//! feature flag.

use std::sync::Arc;

use blogstore_core::keys;
use blogstore_core::storage::{
    blog_table_definition, physical_table_name, TableDefinition, TableStore,
};

use crate::config::Config;
use crate::services::{AuthorService, BlogService};

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "dynamodb", feature = "inmemory"))]
compile_error!("Cannot enable both 'dynamodb' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'dynamodb'");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authors: AuthorService,
    pub blogs: BlogService,
}

impl AppState {
    /// Creates the services over an existing store.
    pub fn from_store(store: Arc<dyn TableStore>, table_prefix: &str) -> Self {
        let authors = AuthorService::new(Arc::clone(&store), table_prefix);

        Self {
            blogs: BlogService::new(store, table_prefix, authors.clone()),
            authors,
        }
    }
}

/// The blog table under its prefixed physical name.
pub fn table_definition(config: &Config) -> TableDefinition {
    blog_table_definition().with_table_name(&physical_table_name(
        &config.table_prefix,
        keys::BLOG_TABLE,
    ))
}

// ============================================================================
// Backend-specific constructors
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryStore;

    impl AppState {
        /// Creates AppState over process-local tables.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryStore::new([table_definition(config)]));
            Ok(Self::from_store(store, &config.table_prefix))
        }

        /// In-memory tables exist as soon as the store does.
        pub async fn ensure_tables(config: &Config) -> Result<(), anyhow::Error> {
            tracing::info!(
                table = %table_definition(config).table_name,
                "In-memory table is created with the store"
            );
            Ok(())
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb {
    use super::*;
    use crate::storage::dynamodb::{create_client, ensure_table, Provisioning};
    use crate::storage::DynamoDbStore;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let client = create_client(config).await;
            let store = Arc::new(DynamoDbStore::new(client));
            Ok(Self::from_store(store, &config.table_prefix))
        }

        /// Creates the blog table and its indexes when missing.
        pub async fn ensure_tables(config: &Config) -> Result<(), anyhow::Error> {
            let client = create_client(config).await;
            let definition = table_definition(config);

            match ensure_table(&client, &definition).await? {
                Provisioning::Created => {
                    tracing::info!(table = %definition.table_name, "Table created")
                }
                Provisioning::AlreadyExists => {
                    tracing::info!(table = %definition.table_name, "Table already provisioned")
                }
            }
            Ok(())
        }
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use chrono::NaiveDate;
    use tokio_util::sync::CancellationToken;

    use blogstore_core::blog::{Author, Blog};

    use super::*;

    fn config(prefix: &str) -> Config {
        Config {
            table_prefix: prefix.to_string(),
            local_mode: false,
            local_service_url: "http://localhost:8000".to_string(),
            region: "us-east-1".to_string(),
        }
    }

    #[test]
    fn test_table_definition_uses_prefix() {
        let definition = table_definition(&config("test-"));

        assert_eq!(definition.table_name, "test-Blogs");
        assert_eq!(definition.indexes.len(), 2);
    }

    #[tokio::test]
    async fn test_services_share_the_store() {
        let state = AppState::new(&config("test-")).await.unwrap();
        let cancel = CancellationToken::new();

        state
            .authors
            .save(&Author::new("A1", "Jane", "jane@example.com"), &cancel)
            .await
            .unwrap();
        let blog = Blog::new("B1", "Hello", "A1", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        state.blogs.save(&blog, &cancel).await.unwrap();
        assert_eq!(state.blogs.list_all(&cancel).await.unwrap(), vec![blog]);
    }
}
