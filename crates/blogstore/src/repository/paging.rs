//! Cancellation and page-draining helpers shared by the repository types.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use blogstore_core::storage::{
    Item, Page, QueryRequest, RepositoryError, Result, ScanRequest, TableStore,
};

/// Races a single store call against the token.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RepositoryError::Cancelled),
        result = operation => result,
    }
}

/// A paged read: query or scan.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PagedRead<'a> {
    Query(&'a QueryRequest),
    Scan(&'a ScanRequest),
}

async fn fetch_page(
    store: &dyn TableStore,
    table_name: &str,
    read: PagedRead<'_>,
    start: Option<Item>,
) -> Result<Page> {
    match read {
        PagedRead::Query(request) => store.query_page(table_name, request, start).await,
        PagedRead::Scan(request) => store.scan_page(table_name, request, start).await,
    }
}

/// Follows `last_evaluated_key` until the last page and returns every item.
///
/// Once the token fires no further page is requested and the items gathered
/// so far are returned.
pub(crate) async fn read_all_pages(
    store: &dyn TableStore,
    table_name: &str,
    read: PagedRead<'_>,
    cancel: &CancellationToken,
) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut start: Option<Item> = None;
    let mut pages = 0usize;

    loop {
        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!(
                    table = %table_name,
                    pages,
                    items = items.len(),
                    "Paged read cancelled, returning partial results"
                );
                break;
            }
            page = fetch_page(store, table_name, read, start.take()) => page?,
        };

        pages += 1;
        items.extend(page.items);

        match page.last_evaluated_key {
            Some(key) => start = Some(key),
            None => break,
        }
    }

    tracing::debug!(table = %table_name, pages, items = items.len(), "Paged read finished");
    Ok(items)
}
