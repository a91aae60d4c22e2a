use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use blogstore_core::blog::{author_key, Author};
use blogstore_core::keys;
use blogstore_core::storage::{KeyCondition, QueryRequest, Result, TableStore};

use crate::repository::TableRepository;

/// Author operations.
#[derive(Clone)]
pub struct AuthorService {
    repository: TableRepository<Author>,
}

impl AuthorService {
    pub fn new(store: Arc<dyn TableStore>, table_prefix: &str) -> Self {
        Self {
            repository: TableRepository::new(store, table_prefix),
        }
    }

    pub async fn save(&self, author: &Author, cancel: &CancellationToken) -> Result<()> {
        tracing::debug!(author_id = %author.id, "Saving author");
        self.repository.save(author, cancel).await
    }

    /// Deleting an author that does not exist succeeds. Their blogs are kept.
    pub async fn delete(&self, author_id: &str, cancel: &CancellationToken) -> Result<()> {
        tracing::debug!(author_id = %author_id, "Deleting author");
        self.repository
            .delete_key(&author_key(author_id), cancel)
            .await
    }

    pub async fn get_by_id(
        &self,
        author_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Author>> {
        self.repository.get(&author_key(author_id), cancel).await
    }

    /// All authors, ordered by sort key.
    pub async fn list(&self, cancel: &CancellationToken) -> Result<Vec<Author>> {
        let request = QueryRequest::new(KeyCondition::partition(keys::PK, keys::AUTHOR_TYPE));
        self.repository.query(&request, cancel).await
    }
}
