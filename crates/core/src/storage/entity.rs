use super::error::Result;
use super::item::{Item, KeySchema, PrimaryKey};

/// A record stored in a table.
///
/// Implementors declare the table they live in, the key schema of that table
/// and the mapping to and from raw items. The repository layer is generic over
/// this trait.
pub trait Entity: Sized + Send + Sync {
    /// Declared table name, before any deployment prefix.
    const TABLE_NAME: &'static str;
    const KEY_SCHEMA: KeySchema;
    /// Human-readable type name used in errors and logs.
    const ENTITY_TYPE: &'static str;

    fn primary_key(&self) -> PrimaryKey;

    fn to_item(&self) -> Item;

    fn from_item(item: &Item) -> Result<Self>;
}

/// A partial record read from a keys-only secondary index.
///
/// Only the attributes in [`IndexProjection::ATTRIBUTES`] are requested; the
/// full record is fetched afterwards from the base table.
pub trait IndexProjection: Sized + Send + Sync {
    /// Declared name of the base table the index belongs to.
    const TABLE_NAME: &'static str;
    const INDEX_NAME: &'static str;
    /// Partition key attribute of the index.
    const PARTITION_ATTRIBUTE: &'static str;
    /// Attributes requested from the index.
    const ATTRIBUTES: &'static [&'static str];

    fn from_item(item: &Item) -> Result<Self>;

    /// Sort key of the base-table item this projection points to.
    fn base_sort_key(&self) -> &str;
}
