use async_trait::async_trait;

use super::expression::{Condition, Update};
use super::item::{Item, PrimaryKey};
use super::types::{
    BatchGetPage, BatchWritePage, Page, QueryRequest, ScanRequest, TransactWriteAction,
};
use super::Result;

/// Raw item operations of a key-value table store.
///
/// One call maps to one request against the store. Paging, batching limits
/// and entity mapping live above this trait.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Gets an item by its full primary key.
    async fn get_item(&self, table_name: &str, key: &PrimaryKey) -> Result<Option<Item>>;

    /// Writes an item, replacing any existing item with the same key.
    ///
    /// When `condition` is given it is evaluated against the stored item (or
    /// its absence) and a failed check yields `PreconditionFailed`.
    async fn put_item(
        &self,
        table_name: &str,
        item: Item,
        condition: Option<&Condition>,
    ) -> Result<()>;

    /// Deletes an item. Deleting a missing item succeeds.
    async fn delete_item(
        &self,
        table_name: &str,
        key: &PrimaryKey,
        condition: Option<&Condition>,
    ) -> Result<()>;

    /// Applies attribute edits to an item, creating it when missing.
    /// Returns the item after the update.
    async fn update_item(
        &self,
        table_name: &str,
        key: &PrimaryKey,
        updates: &[Update],
        condition: Option<&Condition>,
    ) -> Result<Option<Item>>;

    /// Reads one page of a query, starting after `exclusive_start_key`.
    async fn query_page(
        &self,
        table_name: &str,
        request: &QueryRequest,
        exclusive_start_key: Option<Item>,
    ) -> Result<Page>;

    /// Reads one page of a scan, starting after `exclusive_start_key`.
    async fn scan_page(
        &self,
        table_name: &str,
        request: &ScanRequest,
        exclusive_start_key: Option<Item>,
    ) -> Result<Page>;

    /// Gets many items in one call. Missing items are omitted and result order
    /// is unspecified.
    async fn batch_get_items(
        &self,
        table_name: &str,
        keys: &[PrimaryKey],
        projection: Option<&[String]>,
    ) -> Result<BatchGetPage>;

    /// Puts and deletes many items in one call. Not atomic.
    async fn batch_write_items(
        &self,
        table_name: &str,
        puts: Vec<Item>,
        deletes: Vec<PrimaryKey>,
    ) -> Result<BatchWritePage>;

    /// Applies all actions or none of them.
    async fn transact_write(&self, actions: Vec<TransactWriteAction>) -> Result<()>;
}
