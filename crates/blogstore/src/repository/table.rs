//! Generic entity repository over one physical table.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use blogstore_core::storage::{
    physical_table_name, Condition, Entity, PrimaryKey, QueryRequest, RepositoryError, Result,
    ScanRequest, TableStore, TransactWriteAction, Update, BATCH_GET_LIMIT, BATCH_WRITE_LIMIT,
    TRANSACTION_LIMIT,
};

use super::paging::{cancellable, read_all_pages, PagedRead};

/// Entities returned by [`TableRepository::batch_get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchGetOutput<E> {
    /// Found entities, in no particular order.
    pub items: Vec<E>,
    /// Keys the store did not get to.
    pub unprocessed_keys: Vec<PrimaryKey>,
}

impl<E> Default for BatchGetOutput<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            unprocessed_keys: Vec::new(),
        }
    }
}

/// Repository for one entity type, bound to `<prefix><E::TABLE_NAME>`.
pub struct TableRepository<E> {
    store: Arc<dyn TableStore>,
    table_name: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for TableRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table_name: self.table_name.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> TableRepository<E> {
    /// Creates a repository. The table name is resolved here, once.
    pub fn new(store: Arc<dyn TableStore>, table_prefix: &str) -> Self {
        Self {
            store,
            table_name: physical_table_name(table_prefix, E::TABLE_NAME),
            _entity: PhantomData,
        }
    }

    /// The physical table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn get(&self, key: &PrimaryKey, cancel: &CancellationToken) -> Result<Option<E>> {
        tracing::debug!(table = %self.table_name, key = %key, "Getting item");

        let item = cancellable(cancel, self.store.get_item(&self.table_name, key)).await?;
        item.as_ref().map(E::from_item).transpose()
    }

    /// Unconditional upsert.
    pub async fn save(&self, entity: &E, cancel: &CancellationToken) -> Result<()> {
        tracing::debug!(table = %self.table_name, key = %entity.primary_key(), "Saving item");

        cancellable(
            cancel,
            self.store.put_item(&self.table_name, entity.to_item(), None),
        )
        .await
    }

    /// Writes the entity only when `condition` holds for the stored item.
    pub async fn save_if(
        &self,
        entity: &E,
        condition: &Condition,
        cancel: &CancellationToken,
    ) -> Result<()> {
        tracing::debug!(
            table = %self.table_name,
            key = %entity.primary_key(),
            "Saving item conditionally"
        );

        cancellable(
            cancel,
            self.store
                .put_item(&self.table_name, entity.to_item(), Some(condition)),
        )
        .await
    }

    pub async fn delete(&self, entity: &E, cancel: &CancellationToken) -> Result<()> {
        self.delete_key(&entity.primary_key(), cancel).await
    }

    /// Deletes by key. Missing items are not an error.
    pub async fn delete_key(&self, key: &PrimaryKey, cancel: &CancellationToken) -> Result<()> {
        tracing::debug!(table = %self.table_name, key = %key, "Deleting item");

        cancellable(cancel, self.store.delete_item(&self.table_name, key, None)).await
    }

    /// Edits attributes in place and returns the updated entity.
    pub async fn update(
        &self,
        key: &PrimaryKey,
        updates: &[Update],
        condition: Option<&Condition>,
        cancel: &CancellationToken,
    ) -> Result<Option<E>> {
        tracing::debug!(
            table = %self.table_name,
            key = %key,
            updates = updates.len(),
            "Updating item"
        );

        let item = cancellable(
            cancel,
            self.store
                .update_item(&self.table_name, key, updates, condition),
        )
        .await?;
        item.as_ref().map(E::from_item).transpose()
    }

    /// Runs a query and drains every page.
    pub async fn query(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<E>> {
        let items = read_all_pages(
            self.store.as_ref(),
            &self.table_name,
            PagedRead::Query(request),
            cancel,
        )
        .await?;
        items.iter().map(E::from_item).collect()
    }

    /// Runs a scan and drains every page.
    pub async fn scan(
        &self,
        request: &ScanRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<E>> {
        let items = read_all_pages(
            self.store.as_ref(),
            &self.table_name,
            PagedRead::Scan(request),
            cancel,
        )
        .await?;
        items.iter().map(E::from_item).collect()
    }

    /// Gets up to 100 entities in one call.
    pub async fn batch_get(
        &self,
        keys: &[PrimaryKey],
        cancel: &CancellationToken,
    ) -> Result<BatchGetOutput<E>> {
        if keys.len() > BATCH_GET_LIMIT {
            return Err(RepositoryError::BatchTooLarge {
                limit: BATCH_GET_LIMIT,
                requested: keys.len(),
            });
        }
        if keys.is_empty() {
            return Ok(BatchGetOutput::default());
        }

        let page = cancellable(
            cancel,
            self.store.batch_get_items(&self.table_name, keys, None),
        )
        .await?;

        if !page.unprocessed_keys.is_empty() {
            tracing::warn!(
                table = %self.table_name,
                requested = keys.len(),
                unprocessed = page.unprocessed_keys.len(),
                "Batch get left keys unprocessed"
            );
        }

        let items = page
            .items
            .iter()
            .map(E::from_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchGetOutput {
            items,
            unprocessed_keys: page.unprocessed_keys,
        })
    }

    /// Saves and deletes up to 25 entities in one call.
    ///
    /// Not atomic. Requests the store did not get to are reported as
    /// `PartialBatchFailure`; the others are applied.
    pub async fn batch_write(
        &self,
        to_save: &[E],
        to_delete: &[PrimaryKey],
        cancel: &CancellationToken,
    ) -> Result<()> {
        let requested = to_save.len() + to_delete.len();
        if requested > BATCH_WRITE_LIMIT {
            return Err(RepositoryError::BatchTooLarge {
                limit: BATCH_WRITE_LIMIT,
                requested,
            });
        }
        if requested == 0 {
            return Ok(());
        }

        let puts = to_save.iter().map(Entity::to_item).collect();
        let page = cancellable(
            cancel,
            self.store
                .batch_write_items(&self.table_name, puts, to_delete.to_vec()),
        )
        .await?;

        if page.is_complete() {
            return Ok(());
        }

        let mut unprocessed = page
            .unprocessed_puts
            .iter()
            .map(|item| E::KEY_SCHEMA.key_of(item))
            .collect::<Result<Vec<_>>>()?;
        unprocessed.extend(page.unprocessed_deletes);

        tracing::warn!(
            table = %self.table_name,
            requested,
            unprocessed = unprocessed.len(),
            "Batch write left requests unprocessed"
        );

        Err(RepositoryError::PartialBatchFailure { unprocessed })
    }

    /// Applies all actions or none of them.
    pub async fn run_transaction(
        &self,
        actions: Vec<TransactWriteAction>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if actions.len() > TRANSACTION_LIMIT {
            return Err(RepositoryError::BatchTooLarge {
                limit: TRANSACTION_LIMIT,
                requested: actions.len(),
            });
        }
        if actions.is_empty() {
            return Ok(());
        }

        tracing::debug!(actions = actions.len(), "Running transaction");

        cancellable(cancel, self.store.transact_write(actions)).await
    }

    // ========================================================================
    // Transaction action builders
    // ========================================================================

    pub fn put_action(&self, entity: &E, condition: Option<Condition>) -> TransactWriteAction {
        TransactWriteAction::Put {
            table_name: self.table_name.clone(),
            item: entity.to_item(),
            condition,
        }
    }

    pub fn delete_action(
        &self,
        key: PrimaryKey,
        condition: Option<Condition>,
    ) -> TransactWriteAction {
        TransactWriteAction::Delete {
            table_name: self.table_name.clone(),
            key,
            condition,
        }
    }

    pub fn condition_check_action(
        &self,
        key: PrimaryKey,
        condition: Condition,
    ) -> TransactWriteAction {
        TransactWriteAction::ConditionCheck {
            table_name: self.table_name.clone(),
            key,
            condition,
        }
    }
}
