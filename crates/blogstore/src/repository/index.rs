//! Reads keys-only projections from a global secondary index.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use blogstore_core::storage::{
    physical_table_name, IndexProjection, KeyCondition, QueryRequest, Result, SortOrder,
    TableStore,
};

use super::paging::{read_all_pages, PagedRead};

/// Queries the index `P::INDEX_NAME` by partition value.
pub struct IndexReader<P> {
    store: Arc<dyn TableStore>,
    table_name: String,
    _projection: PhantomData<fn() -> P>,
}

impl<P> Clone for IndexReader<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table_name: self.table_name.clone(),
            _projection: PhantomData,
        }
    }
}

impl<P: IndexProjection> IndexReader<P> {
    pub fn new(store: Arc<dyn TableStore>, table_prefix: &str) -> Self {
        Self {
            store,
            table_name: physical_table_name(table_prefix, P::TABLE_NAME),
            _projection: PhantomData,
        }
    }

    /// Every projection under `partition_value`, ordered by the index sort key.
    pub async fn read(
        &self,
        partition_value: &str,
        order: SortOrder,
        cancel: &CancellationToken,
    ) -> Result<Vec<P>> {
        tracing::debug!(
            table = %self.table_name,
            index = P::INDEX_NAME,
            partition = %partition_value,
            "Reading index"
        );

        let request = QueryRequest::new(KeyCondition::partition(
            P::PARTITION_ATTRIBUTE,
            partition_value,
        ))
        .index(P::INDEX_NAME)
        .order(order)
        .project(P::ATTRIBUTES);

        let items = read_all_pages(
            self.store.as_ref(),
            &self.table_name,
            PagedRead::Query(&request),
            cancel,
        )
        .await?;

        items.iter().map(P::from_item).collect()
    }
}
