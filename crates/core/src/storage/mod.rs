mod entity;
mod error;
mod expression;
mod item;
mod table;
mod traits;
mod types;

pub use entity::{Entity, IndexProjection};
pub use error::{RepositoryError, Result};
pub use expression::{
    apply_updates, render_updates, Comparator, Condition, ExpressionAttributes, KeyCondition,
    SortKeyCondition, Update,
};
pub use item::{
    get_bool, get_date, get_optional_string, get_string, get_string_or_default, get_u64_or_default,
    AttributeValue, Item, KeyAttribute, KeySchema, PrimaryKey,
};
pub use table::{blog_table_definition, physical_table_name, IndexDefinition, TableDefinition};
pub use traits::TableStore;
pub use types::{
    BatchGetPage, BatchWritePage, Page, QueryRequest, ScanRequest, SortOrder,
    TransactWriteAction, BATCH_GET_LIMIT, BATCH_WRITE_LIMIT, TRANSACTION_LIMIT,
};
