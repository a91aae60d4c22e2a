use super::expression::{Condition, KeyCondition};
use super::item::{Item, PrimaryKey};

/// Maximum number of keys in one batch-get call.
pub const BATCH_GET_LIMIT: usize = 100;

/// Maximum number of put/delete requests in one batch-write call.
pub const BATCH_WRITE_LIMIT: usize = 25;

/// Maximum number of actions in one transaction.
pub const TRANSACTION_LIMIT: usize = 100;

/// Direction of a query over the sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Parameters of a query against the table or one of its indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub key_condition: KeyCondition,
    pub filter: Option<Condition>,
    pub index_name: Option<String>,
    pub order: SortOrder,
    /// Attribute allow-list. `None` returns whole items.
    pub projection: Option<Vec<String>>,
    pub page_size: Option<u32>,
}

impl QueryRequest {
    pub fn new(key_condition: KeyCondition) -> Self {
        Self {
            key_condition,
            filter: None,
            index_name: None,
            order: SortOrder::Ascending,
            projection: None,
            page_size: None,
        }
    }

    /// Runs the query against a secondary index instead of the base table.
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn descending(self) -> Self {
        self.order(SortOrder::Descending)
    }

    pub fn project<S: AsRef<str>>(mut self, attributes: &[S]) -> Self {
        self.projection = Some(attributes.iter().map(|a| a.as_ref().to_string()).collect());
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }
}

/// Parameters of a full scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    pub filter: Option<Condition>,
    pub index_name: Option<String>,
    pub projection: Option<Vec<String>>,
    pub page_size: Option<u32>,
}

impl ScanRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn project<S: AsRef<str>>(mut self, attributes: &[S]) -> Self {
        self.projection = Some(attributes.iter().map(|a| a.as_ref().to_string()).collect());
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }
}

/// One page of a query or scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Item>,
    /// Where the next page starts. `None` on the last page.
    pub last_evaluated_key: Option<Item>,
}

/// Result of a single batch-get call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchGetPage {
    pub items: Vec<Item>,
    pub unprocessed_keys: Vec<PrimaryKey>,
}

/// Result of a single batch-write call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchWritePage {
    pub unprocessed_puts: Vec<Item>,
    pub unprocessed_deletes: Vec<PrimaryKey>,
}

impl BatchWritePage {
    pub fn is_complete(&self) -> bool {
        self.unprocessed_puts.is_empty() && self.unprocessed_deletes.is_empty()
    }
}

/// One action of a transactional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactWriteAction {
    Put {
        table_name: String,
        item: Item,
        condition: Option<Condition>,
    },
    Delete {
        table_name: String,
        key: PrimaryKey,
        condition: Option<Condition>,
    },
    ConditionCheck {
        table_name: String,
        key: PrimaryKey,
        condition: Condition,
    },
}

impl TransactWriteAction {
    pub fn table_name(&self) -> &str {
        match self {
            TransactWriteAction::Put { table_name, .. }
            | TransactWriteAction::Delete { table_name, .. }
            | TransactWriteAction::ConditionCheck { table_name, .. } => table_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_defaults_to_ascending_full_items() {
        let request = QueryRequest::new(KeyCondition::partition("PK", "AUTHOR"));

        assert_eq!(request.order, SortOrder::Ascending);
        assert_eq!(request.index_name, None);
        assert_eq!(request.projection, None);
    }

    #[test]
    fn test_query_request_builder() {
        let request = QueryRequest::new(KeyCondition::partition("GSI2PK", "BLOG"))
            .index("BlogsByCreatedDate")
            .descending()
            .project(&["PK", "SK"])
            .page_size(10);

        assert_eq!(request.index_name.as_deref(), Some("BlogsByCreatedDate"));
        assert_eq!(request.order, SortOrder::Descending);
        assert_eq!(
            request.projection,
            Some(vec!["PK".to_string(), "SK".to_string()])
        );
        assert_eq!(request.page_size, Some(10));
    }

    #[test]
    fn test_batch_write_page_completeness() {
        assert!(BatchWritePage::default().is_complete());

        let page = BatchWritePage {
            unprocessed_puts: vec![],
            unprocessed_deletes: vec![PrimaryKey::new("PK", "BLOG")],
        };
        assert!(!page.is_complete());
    }
}
