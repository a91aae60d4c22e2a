//! In-memory table store implementation.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blogstore_core::storage::{
    apply_updates, BatchGetPage, BatchWritePage, Condition, Item, KeySchema, Page, PrimaryKey,
    QueryRequest, RepositoryError, Result, ScanRequest, SortOrder, TableDefinition, TableStore,
    TransactWriteAction, Update, BATCH_GET_LIMIT, BATCH_WRITE_LIMIT, TRANSACTION_LIMIT,
};

/// In-memory table store for testing and local runs.
///
/// Only the tables given at construction exist. Secondary indexes are
/// keys-only and sparse: an item shows up in an index only when it carries
/// the index key attributes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    batch_capacity: Option<usize>,
}

#[derive(Debug)]
struct Table {
    definition: TableDefinition,
    items: BTreeMap<PrimaryKey, Item>,
}

impl InMemoryStore {
    /// Creates a store holding one empty table per definition.
    pub fn new(definitions: impl IntoIterator<Item = TableDefinition>) -> Self {
        let tables = definitions
            .into_iter()
            .map(|definition| {
                (
                    definition.table_name.clone(),
                    Table {
                        definition,
                        items: BTreeMap::new(),
                    },
                )
            })
            .collect();

        Self {
            tables: Arc::new(RwLock::new(tables)),
            batch_capacity: None,
        }
    }

    /// Caps how many requests a single batch call processes. The rest come
    /// back unprocessed, as they do when the real store throttles.
    pub fn with_batch_capacity(mut self, capacity: usize) -> Self {
        self.batch_capacity = Some(capacity);
        self
    }

    fn capacity(&self) -> usize {
        self.batch_capacity.unwrap_or(usize::MAX)
    }
}

fn table_not_found(table_name: &str) -> RepositoryError {
    RepositoryError::StoreOperationFailed(format!("Table not found: {}", table_name))
}

fn get_table<'a>(tables: &'a HashMap<String, Table>, table_name: &str) -> Result<&'a Table> {
    tables
        .get(table_name)
        .ok_or_else(|| table_not_found(table_name))
}

fn get_table_mut<'a>(
    tables: &'a mut HashMap<String, Table>,
    table_name: &str,
) -> Result<&'a mut Table> {
    tables
        .get_mut(table_name)
        .ok_or_else(|| table_not_found(table_name))
}

fn condition_failed(key: &PrimaryKey) -> RepositoryError {
    RepositoryError::PreconditionFailed(format!("Condition not met for {}", key))
}

fn has_key_attributes(item: &Item, schema: &KeySchema) -> bool {
    item.contains_key(schema.partition_key)
        && schema.sort_key.is_none_or(|sk| item.contains_key(sk))
}

/// Key attributes of the base table followed by those of `schema`.
fn key_names(base: &KeySchema, schema: &KeySchema) -> Vec<&'static str> {
    let candidates = [
        Some(base.partition_key),
        base.sort_key,
        Some(schema.partition_key),
        schema.sort_key,
    ];

    let mut names = Vec::with_capacity(4);
    for name in candidates.into_iter().flatten() {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn retain_attributes(item: &Item, names: &[&str]) -> Item {
    item.iter()
        .filter(|(name, _)| names.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn project(item: Item, projection: Option<&[String]>) -> Item {
    match projection {
        None => item,
        Some(attributes) => item
            .into_iter()
            .filter(|(name, _)| attributes.contains(name))
            .collect(),
    }
}

impl Table {
    /// Rejects keys whose attribute names differ from the table's key schema.
    fn validate_key(&self, key: &PrimaryKey) -> Result<()> {
        let schema = self.definition.key_schema;
        let sort_matches = match (&key.sort, schema.sort_key) {
            (Some(sort), Some(name)) => sort.name == name,
            (None, None) => true,
            _ => false,
        };

        if key.partition.name == schema.partition_key && sort_matches {
            Ok(())
        } else {
            Err(RepositoryError::StoreOperationFailed(format!(
                "Key {} does not match the key schema of {}",
                key, self.definition.table_name
            )))
        }
    }

    fn check(&self, key: &PrimaryKey, condition: Option<&Condition>) -> Result<()> {
        match condition {
            Some(condition) if !condition.evaluate(self.items.get(key)) => {
                Err(condition_failed(key))
            }
            _ => Ok(()),
        }
    }

    /// Resolves the key schema of the base table or one of its indexes.
    fn schema(&self, index_name: Option<&str>) -> Result<KeySchema> {
        match index_name {
            None => Ok(self.definition.key_schema),
            Some(name) => self
                .definition
                .index(name)
                .map(|index| index.key_schema)
                .ok_or_else(|| {
                    RepositoryError::StoreOperationFailed(format!(
                        "Index {} not found on {}",
                        name, self.definition.table_name
                    ))
                }),
        }
    }

    /// Items visible through the base table or an index, in base key order.
    /// Index items only carry key attributes.
    fn view(&self, index_name: Option<&str>, schema: &KeySchema) -> Vec<Item> {
        if index_name.is_none() {
            return self.items.values().cloned().collect();
        }

        let key_names = key_names(&self.definition.key_schema, schema);

        self.items
            .values()
            .filter(|item| has_key_attributes(item, schema))
            .map(|item| retain_attributes(item, &key_names))
            .collect()
    }

    /// Cuts one page out of `items`, starting after `start`.
    fn paginate(
        &self,
        items: Vec<Item>,
        schema: &KeySchema,
        start: Option<Item>,
        page_size: Option<u32>,
    ) -> Result<(Vec<Item>, Option<Item>)> {
        let base = self.definition.key_schema;

        let offset = match start {
            None => 0,
            Some(start) => {
                let start_key = base.key_of(&start)?;
                // A start key that no longer matches an item ends the listing.
                items
                    .iter()
                    .position(|item| start_key.matches(item))
                    .map_or(items.len(), |position| position + 1)
            }
        };

        let limit = page_size.map_or(usize::MAX, |size| size.max(1) as usize);
        let remaining = items.len().saturating_sub(offset);
        let page: Vec<Item> = items.into_iter().skip(offset).take(limit).collect();

        let last_evaluated_key = if remaining > page.len() {
            page.last()
                .map(|last| retain_attributes(last, &key_names(&base, schema)))
        } else {
            None
        };

        Ok((page, last_evaluated_key))
    }
}

#[async_trait]
impl TableStore for InMemoryStore {
    async fn get_item(&self, table_name: &str, key: &PrimaryKey) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        let table = get_table(&tables, table_name)?;
        table.validate_key(key)?;
        Ok(table.items.get(key).cloned())
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: Item,
        condition: Option<&Condition>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = get_table_mut(&mut tables, table_name)?;
        let key = table.definition.key_schema.key_of(&item)?;

        table.check(&key, condition)?;
        table.items.insert(key, item);
        Ok(())
    }

    async fn delete_item(
        &self,
        table_name: &str,
        key: &PrimaryKey,
        condition: Option<&Condition>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = get_table_mut(&mut tables, table_name)?;

        table.validate_key(key)?;
        table.check(key, condition)?;
        table.items.remove(key);
        Ok(())
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: &PrimaryKey,
        updates: &[Update],
        condition: Option<&Condition>,
    ) -> Result<Option<Item>> {
        let mut tables = self.tables.write().await;
        let table = get_table_mut(&mut tables, table_name)?;

        table.validate_key(key)?;
        table.check(key, condition)?;

        let mut item = table
            .items
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_item());
        apply_updates(&mut item, updates)?;
        table.items.insert(key.clone(), item.clone());

        Ok(Some(item))
    }

    async fn query_page(
        &self,
        table_name: &str,
        request: &QueryRequest,
        exclusive_start_key: Option<Item>,
    ) -> Result<Page> {
        let tables = self.tables.read().await;
        let table = get_table(&tables, table_name)?;
        let schema = table.schema(request.index_name.as_deref())?;

        if request.key_condition.partition_key != schema.partition_key {
            return Err(RepositoryError::StoreOperationFailed(format!(
                "Query key condition must target {}",
                schema.partition_key
            )));
        }

        let key_condition = request.key_condition.to_condition();
        let mut matching: Vec<Item> = table
            .view(request.index_name.as_deref(), &schema)
            .into_iter()
            .filter(|item| key_condition.evaluate(Some(item)))
            .collect();

        if let Some(sort_key) = schema.sort_key {
            matching.sort_by(|a, b| match (a.get(sort_key), b.get(sort_key)) {
                (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            });
        }
        if request.order == SortOrder::Descending {
            matching.reverse();
        }

        let (page, last_evaluated_key) =
            table.paginate(matching, &schema, exclusive_start_key, request.page_size)?;

        let items = page
            .into_iter()
            .filter(|item| request.filter.as_ref().is_none_or(|f| f.evaluate(Some(item))))
            .map(|item| project(item, request.projection.as_deref()))
            .collect();

        Ok(Page {
            items,
            last_evaluated_key,
        })
    }

    async fn scan_page(
        &self,
        table_name: &str,
        request: &ScanRequest,
        exclusive_start_key: Option<Item>,
    ) -> Result<Page> {
        let tables = self.tables.read().await;
        let table = get_table(&tables, table_name)?;
        let schema = table.schema(request.index_name.as_deref())?;

        let all = table.view(request.index_name.as_deref(), &schema);
        let (page, last_evaluated_key) =
            table.paginate(all, &schema, exclusive_start_key, request.page_size)?;

        let items = page
            .into_iter()
            .filter(|item| request.filter.as_ref().is_none_or(|f| f.evaluate(Some(item))))
            .map(|item| project(item, request.projection.as_deref()))
            .collect();

        Ok(Page {
            items,
            last_evaluated_key,
        })
    }

    async fn batch_get_items(
        &self,
        table_name: &str,
        keys: &[PrimaryKey],
        projection: Option<&[String]>,
    ) -> Result<BatchGetPage> {
        if keys.len() > BATCH_GET_LIMIT {
            return Err(RepositoryError::StoreOperationFailed(format!(
                "Too many items requested for BatchGetItem: {}",
                keys.len()
            )));
        }

        let tables = self.tables.read().await;
        let table = get_table(&tables, table_name)?;
        for key in keys {
            table.validate_key(key)?;
        }

        let processed = keys.len().min(self.capacity());
        let items = keys[..processed]
            .iter()
            .filter_map(|key| table.items.get(key))
            .map(|item| project(item.clone(), projection))
            .collect();

        Ok(BatchGetPage {
            items,
            unprocessed_keys: keys[processed..].to_vec(),
        })
    }

    async fn batch_write_items(
        &self,
        table_name: &str,
        puts: Vec<Item>,
        deletes: Vec<PrimaryKey>,
    ) -> Result<BatchWritePage> {
        let requested = puts.len() + deletes.len();
        if requested > BATCH_WRITE_LIMIT {
            return Err(RepositoryError::StoreOperationFailed(format!(
                "Too many items requested for BatchWriteItem: {}",
                requested
            )));
        }

        let mut tables = self.tables.write().await;
        let table = get_table_mut(&mut tables, table_name)?;

        // Validate every put before writing anything.
        let puts = puts
            .into_iter()
            .map(|item| Ok((table.definition.key_schema.key_of(&item)?, item)))
            .collect::<Result<Vec<_>>>()?;
        for key in &deletes {
            table.validate_key(key)?;
        }

        let mut budget = self.capacity();
        let mut outcome = BatchWritePage::default();

        for (key, item) in puts {
            if budget == 0 {
                outcome.unprocessed_puts.push(item);
                continue;
            }
            budget -= 1;
            table.items.insert(key, item);
        }
        for key in deletes {
            if budget == 0 {
                outcome.unprocessed_deletes.push(key);
                continue;
            }
            budget -= 1;
            table.items.remove(&key);
        }

        Ok(outcome)
    }

    async fn transact_write(&self, actions: Vec<TransactWriteAction>) -> Result<()> {
        if actions.len() > TRANSACTION_LIMIT {
            return Err(RepositoryError::StoreOperationFailed(format!(
                "Too many actions in TransactWriteItems: {}",
                actions.len()
            )));
        }

        let mut tables = self.tables.write().await;

        // Resolve keys and check every condition before applying anything.
        let mut resolved = Vec::with_capacity(actions.len());
        for action in actions {
            let table = get_table(&tables, action.table_name())?;
            let (key, condition) = match &action {
                TransactWriteAction::Put {
                    item, condition, ..
                } => (table.definition.key_schema.key_of(item)?, condition.as_ref()),
                TransactWriteAction::Delete { key, condition, .. } => {
                    (key.clone(), condition.as_ref())
                }
                TransactWriteAction::ConditionCheck { key, condition, .. } => {
                    (key.clone(), Some(condition))
                }
            };
            table.validate_key(&key)?;

            if table.check(&key, condition).is_err() {
                return Err(RepositoryError::TransactionFailed(format!(
                    "Transaction cancelled, condition failed for {} on {}",
                    key,
                    action.table_name()
                )));
            }
            resolved.push((key, action));
        }

        for (key, action) in resolved {
            match action {
                TransactWriteAction::Put {
                    table_name, item, ..
                } => {
                    get_table_mut(&mut tables, &table_name)?
                        .items
                        .insert(key, item);
                }
                TransactWriteAction::Delete { table_name, .. } => {
                    get_table_mut(&mut tables, &table_name)?.items.remove(&key);
                }
                TransactWriteAction::ConditionCheck { .. } => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use blogstore_core::storage::{
        blog_table_definition, AttributeValue, Comparator, KeyCondition, SortKeyCondition,
    };

    use super::*;

    fn store() -> InMemoryStore {
        InMemoryStore::new([blog_table_definition()])
    }

    fn item(pk: &str, sk: &str) -> Item {
        let mut item = Item::new();
        item.insert("PK".to_string(), pk.into());
        item.insert("SK".to_string(), sk.into());
        item
    }

    fn blog_item(id: &str, author: &str, date: &str) -> Item {
        let mut item = item("BLOG", &format!("BLOG#{}", id));
        item.insert("Title".to_string(), format!("Title {}", id).into());
        item.insert("GSI1PK".to_string(), format!("AUTHOR#{}", author).into());
        item.insert("GSI1SK".to_string(), date.into());
        item.insert("GSI2PK".to_string(), "BLOG".into());
        item.insert("GSI2SK".to_string(), date.into());
        item
    }

    fn key(pk: &str, sk: &str) -> PrimaryKey {
        KeySchema::pk_sk().composite(pk, sk)
    }

    fn sort_keys(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .map(|i| i.get("SK").and_then(AttributeValue::as_s).unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = store();
        store
            .put_item("Blogs", item("AUTHOR", "AUTHOR#A1"), None)
            .await
            .unwrap();

        let found = store
            .get_item("Blogs", &key("AUTHOR", "AUTHOR#A1"))
            .await
            .unwrap();
        assert_eq!(found, Some(item("AUTHOR", "AUTHOR#A1")));

        let missing = store
            .get_item("Blogs", &key("AUTHOR", "AUTHOR#A2"))
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let store = store();
        let result = store.get_item("Other", &key("AUTHOR", "AUTHOR#A1")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::StoreOperationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_key_shape_must_match_schema() {
        let store = store();
        store
            .put_item("Blogs", item("AUTHOR", "AUTHOR#A1"), None)
            .await
            .unwrap();

        let partition_only = PrimaryKey::new("PK", "AUTHOR");
        let wrong_sort_name = PrimaryKey::new("PK", "AUTHOR").with_sort("GSI1SK", "AUTHOR#A1");

        for bad in [&partition_only, &wrong_sort_name] {
            assert!(matches!(
                store.get_item("Blogs", bad).await,
                Err(RepositoryError::StoreOperationFailed(_))
            ));
            assert!(matches!(
                store.delete_item("Blogs", bad, None).await,
                Err(RepositoryError::StoreOperationFailed(_))
            ));
            assert!(matches!(
                store.update_item("Blogs", bad, &[], None).await,
                Err(RepositoryError::StoreOperationFailed(_))
            ));
        }
        assert!(matches!(
            store
                .batch_get_items("Blogs", &[key("AUTHOR", "AUTHOR#A1"), partition_only], None)
                .await,
            Err(RepositoryError::StoreOperationFailed(_))
        ));
        assert!(store
            .get_item("Blogs", &key("AUTHOR", "AUTHOR#A1"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_conditional_put() {
        let store = store();
        let not_exists = Condition::not_exists("PK");

        store
            .put_item("Blogs", item("AUTHOR", "AUTHOR#A1"), Some(&not_exists))
            .await
            .unwrap();

        let mut changed = item("AUTHOR", "AUTHOR#A1");
        changed.insert("Name".to_string(), "Changed".into());
        let result = store.put_item("Blogs", changed, Some(&not_exists)).await;

        assert!(matches!(result, Err(RepositoryError::PreconditionFailed(_))));
        let stored = store
            .get_item("Blogs", &key("AUTHOR", "AUTHOR#A1"))
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.contains_key("Name"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = store();
        store
            .delete_item("Blogs", &key("AUTHOR", "AUTHOR#NOPE"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_item() {
        let store = store();
        store
            .put_item("Blogs", blog_item("B1", "A1", "2024-01-01"), None)
            .await
            .unwrap();

        let updated = store
            .update_item(
                "Blogs",
                &key("BLOG", "BLOG#B1"),
                &[Update::Add("ViewCount".to_string(), AttributeValue::number(1))],
                Some(&Condition::exists("PK")),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.get("ViewCount"), Some(&AttributeValue::number(1)));

        let result = store
            .update_item(
                "Blogs",
                &key("BLOG", "BLOG#B2"),
                &[Update::Add("ViewCount".to_string(), AttributeValue::number(1))],
                Some(&Condition::exists("PK")),
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::PreconditionFailed(_))));
    }

    #[tokio::test]
    async fn test_query_index_is_keys_only_and_ordered() {
        let store = store();
        for (id, date) in [("B1", "2024-02-01"), ("B2", "2024-01-01"), ("B3", "2024-03-01")] {
            store
                .put_item("Blogs", blog_item(id, "A1", date), None)
                .await
                .unwrap();
        }
        store
            .put_item("Blogs", item("AUTHOR", "AUTHOR#A1"), None)
            .await
            .unwrap();

        let request = QueryRequest::new(KeyCondition::partition("GSI2PK", "BLOG"))
            .index("BlogsByCreatedDate")
            .descending();
        let page = store.query_page("Blogs", &request, None).await.unwrap();

        assert_eq!(sort_keys(&page.items), vec!["BLOG#B3", "BLOG#B1", "BLOG#B2"]);
        assert!(page.items.iter().all(|i| !i.contains_key("Title")));
        assert_eq!(page.last_evaluated_key, None);
    }

    #[tokio::test]
    async fn test_query_sort_condition_and_projection() {
        let store = store();
        for (id, date) in [("B1", "2024-02-01"), ("B2", "2024-01-01"), ("B3", "2024-03-01")] {
            store
                .put_item("Blogs", blog_item(id, "A1", date), None)
                .await
                .unwrap();
        }

        let request = QueryRequest::new(
            KeyCondition::partition("GSI1PK", "AUTHOR#A1").and_sort(
                "GSI1SK",
                SortKeyCondition::Ge(AttributeValue::from("2024-02-01")),
            ),
        )
        .index("BlogsByAuthor")
        .project(&["SK"]);
        let page = store.query_page("Blogs", &request, None).await.unwrap();

        assert_eq!(sort_keys(&page.items), vec!["BLOG#B1", "BLOG#B3"]);
        assert!(page.items.iter().all(|i| i.len() == 1));
    }

    #[tokio::test]
    async fn test_query_with_wrong_partition_attribute() {
        let store = store();
        let request = QueryRequest::new(KeyCondition::partition("GSI1PK", "AUTHOR#A1"));
        let result = store.query_page("Blogs", &request, None).await;

        assert!(matches!(
            result,
            Err(RepositoryError::StoreOperationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_query_pagination() {
        let store = store();
        for n in 1..=5 {
            store
                .put_item("Blogs", item("AUTHOR", &format!("AUTHOR#A{}", n)), None)
                .await
                .unwrap();
        }

        let request = QueryRequest::new(KeyCondition::partition("PK", "AUTHOR")).page_size(2);

        let first = store.query_page("Blogs", &request, None).await.unwrap();
        assert_eq!(sort_keys(&first.items), vec!["AUTHOR#A1", "AUTHOR#A2"]);

        let second = store
            .query_page("Blogs", &request, first.last_evaluated_key)
            .await
            .unwrap();
        assert_eq!(sort_keys(&second.items), vec!["AUTHOR#A3", "AUTHOR#A4"]);

        let third = store
            .query_page("Blogs", &request, second.last_evaluated_key)
            .await
            .unwrap();
        assert_eq!(sort_keys(&third.items), vec!["AUTHOR#A5"]);
        assert_eq!(third.last_evaluated_key, None);
    }

    #[tokio::test]
    async fn test_scan_with_filter() {
        let store = store();
        store
            .put_item("Blogs", item("AUTHOR", "AUTHOR#A1"), None)
            .await
            .unwrap();
        store
            .put_item("Blogs", blog_item("B1", "A1", "2024-01-01"), None)
            .await
            .unwrap();

        let request =
            ScanRequest::new().filter(Condition::compare("PK", Comparator::Eq, "BLOG"));
        let page = store.scan_page("Blogs", &request, None).await.unwrap();

        assert_eq!(sort_keys(&page.items), vec!["BLOG#B1"]);
    }

    #[tokio::test]
    async fn test_batch_get_limit_and_capacity() {
        let store = store().with_batch_capacity(2);
        for n in 1..=3 {
            store
                .put_item("Blogs", item("AUTHOR", &format!("AUTHOR#A{}", n)), None)
                .await
                .unwrap();
        }

        let keys: Vec<PrimaryKey> = (1..=3)
            .map(|n| key("AUTHOR", &format!("AUTHOR#A{}", n)))
            .collect();
        let page = store.batch_get_items("Blogs", &keys, None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.unprocessed_keys, vec![key("AUTHOR", "AUTHOR#A3")]);

        let too_many: Vec<PrimaryKey> = (0..101)
            .map(|n| key("AUTHOR", &format!("AUTHOR#A{}", n)))
            .collect();
        let result = store.batch_get_items("Blogs", &too_many, None).await;
        assert!(matches!(
            result,
            Err(RepositoryError::StoreOperationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_write_reports_unprocessed() {
        let store = store().with_batch_capacity(1);
        store
            .put_item("Blogs", item("AUTHOR", "AUTHOR#OLD"), None)
            .await
            .unwrap();

        let outcome = store
            .batch_write_items(
                "Blogs",
                vec![item("AUTHOR", "AUTHOR#A1")],
                vec![key("AUTHOR", "AUTHOR#OLD")],
            )
            .await
            .unwrap();

        assert!(outcome.unprocessed_puts.is_empty());
        assert_eq!(
            outcome.unprocessed_deletes,
            vec![key("AUTHOR", "AUTHOR#OLD")]
        );
    }

    #[tokio::test]
    async fn test_transaction_is_all_or_nothing() {
        let store = store();
        let actions = vec![
            TransactWriteAction::Put {
                table_name: "Blogs".to_string(),
                item: item("AUTHOR", "AUTHOR#A1"),
                condition: None,
            },
            TransactWriteAction::ConditionCheck {
                table_name: "Blogs".to_string(),
                key: key("AUTHOR", "AUTHOR#MISSING"),
                condition: Condition::exists("PK"),
            },
        ];

        let result = store.transact_write(actions).await;
        assert!(matches!(result, Err(RepositoryError::TransactionFailed(_))));

        let stored = store
            .get_item("Blogs", &key("AUTHOR", "AUTHOR#A1"))
            .await
            .unwrap();
        assert_eq!(stored, None);
    }
}
