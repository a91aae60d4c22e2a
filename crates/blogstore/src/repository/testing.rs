//! Store wrapper for repository tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use blogstore_core::storage::{
    BatchGetPage, BatchWritePage, Condition, Item, Page, PrimaryKey, QueryRequest, Result,
    ScanRequest, TableStore, TransactWriteAction, Update,
};

use crate::storage::InMemoryStore;

/// Forwards to an in-memory store, counting query pages and batch gets.
///
/// With [`RecordingStore::cancel_after_first_page`] the token is cancelled as
/// soon as the first query page has been served.
pub(crate) struct RecordingStore {
    inner: InMemoryStore,
    query_pages: AtomicUsize,
    batch_gets: AtomicUsize,
    cancel_after_first_page: Option<CancellationToken>,
}

impl RecordingStore {
    pub(crate) fn new(inner: InMemoryStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            query_pages: AtomicUsize::new(0),
            batch_gets: AtomicUsize::new(0),
            cancel_after_first_page: None,
        })
    }

    pub(crate) fn cancel_after_first_page(
        inner: InMemoryStore,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner,
            query_pages: AtomicUsize::new(0),
            batch_gets: AtomicUsize::new(0),
            cancel_after_first_page: Some(cancel),
        })
    }

    pub(crate) fn query_pages(&self) -> usize {
        self.query_pages.load(Ordering::SeqCst)
    }

    pub(crate) fn batch_gets(&self) -> usize {
        self.batch_gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableStore for RecordingStore {
    async fn get_item(&self, table_name: &str, key: &PrimaryKey) -> Result<Option<Item>> {
        self.inner.get_item(table_name, key).await
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: Item,
        condition: Option<&Condition>,
    ) -> Result<()> {
        self.inner.put_item(table_name, item, condition).await
    }

    async fn delete_item(
        &self,
        table_name: &str,
        key: &PrimaryKey,
        condition: Option<&Condition>,
    ) -> Result<()> {
        self.inner.delete_item(table_name, key, condition).await
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: &PrimaryKey,
        updates: &[Update],
        condition: Option<&Condition>,
    ) -> Result<Option<Item>> {
        self.inner
            .update_item(table_name, key, updates, condition)
            .await
    }

    async fn query_page(
        &self,
        table_name: &str,
        request: &QueryRequest,
        start: Option<Item>,
    ) -> Result<Page> {
        let page = self.inner.query_page(table_name, request, start).await;
        self.query_pages.fetch_add(1, Ordering::SeqCst);
        if let Some(cancel) = &self.cancel_after_first_page {
            cancel.cancel();
        }
        page
    }

    async fn scan_page(
        &self,
        table_name: &str,
        request: &ScanRequest,
        start: Option<Item>,
    ) -> Result<Page> {
        self.inner.scan_page(table_name, request, start).await
    }

    async fn batch_get_items(
        &self,
        table_name: &str,
        keys: &[PrimaryKey],
        projection: Option<&[String]>,
    ) -> Result<BatchGetPage> {
        self.batch_gets.fetch_add(1, Ordering::SeqCst);
        self.inner
            .batch_get_items(table_name, keys, projection)
            .await
    }

    async fn batch_write_items(
        &self,
        table_name: &str,
        puts: Vec<Item>,
        deletes: Vec<PrimaryKey>,
    ) -> Result<BatchWritePage> {
        self.inner.batch_write_items(table_name, puts, deletes).await
    }

    async fn transact_write(&self, actions: Vec<TransactWriteAction>) -> Result<()> {
        self.inner.transact_write(actions).await
    }
}
