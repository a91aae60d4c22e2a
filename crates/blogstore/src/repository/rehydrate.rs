//! Turns index sort keys back into full entities.

use tokio_util::sync::CancellationToken;

use blogstore_core::storage::{Entity, PrimaryKey, RepositoryError, Result, BATCH_GET_LIMIT};

use super::table::TableRepository;

/// Batch-gets full entities for sort keys that share one partition value.
#[derive(Clone)]
pub struct BatchRehydrator<E> {
    repository: TableRepository<E>,
    partition_value: String,
}

impl<E: Entity> BatchRehydrator<E> {
    pub fn new(repository: TableRepository<E>, partition_value: impl Into<String>) -> Self {
        Self {
            repository,
            partition_value: partition_value.into(),
        }
    }

    /// Fetches the entities in chunks of at most 100 keys, one chunk at a time.
    ///
    /// Keys with no stored item are skipped. The result order is not
    /// meaningful. Keys the store leaves unprocessed fail the whole call with
    /// `PartialBatchFailure`.
    pub async fn rehydrate(
        &self,
        sort_keys: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<E>> {
        let keys: Vec<PrimaryKey> = sort_keys
            .iter()
            .map(|sort_key| E::KEY_SCHEMA.composite(self.partition_value.as_str(), sort_key))
            .collect();

        let mut entities = Vec::with_capacity(keys.len());
        let mut unprocessed = Vec::new();

        for chunk in keys.chunks(BATCH_GET_LIMIT) {
            let output = self.repository.batch_get(chunk, cancel).await?;
            entities.extend(output.items);
            unprocessed.extend(output.unprocessed_keys);
        }

        tracing::debug!(
            table = %self.repository.table_name(),
            requested = keys.len(),
            found = entities.len(),
            "Rehydrated entities"
        );

        if !unprocessed.is_empty() {
            return Err(RepositoryError::PartialBatchFailure { unprocessed });
        }

        Ok(entities)
    }
}
