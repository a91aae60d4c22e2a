//! Table schema definitions (pure data).

use super::item::KeySchema;
use crate::keys;

/// Schema of a physical table and its global secondary indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub table_name: String,
    pub key_schema: KeySchema,
    pub indexes: Vec<IndexDefinition>,
}

/// A global secondary index. Projection is always keys-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: String,
    pub key_schema: KeySchema,
}

impl TableDefinition {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }

    /// Looks up an index by name.
    pub fn index(&self, name: &str) -> Option<&IndexDefinition> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Every attribute that takes part in a table or index key.
    pub fn key_attributes(&self) -> Vec<&'static str> {
        let mut attributes = Vec::new();
        let schemas =
            std::iter::once(&self.key_schema).chain(self.indexes.iter().map(|i| &i.key_schema));

        for schema in schemas {
            for name in std::iter::once(schema.partition_key).chain(schema.sort_key) {
                if !attributes.contains(&name) {
                    attributes.push(name);
                }
            }
        }
        attributes
    }
}

/// Resolves a declared table name against a deployment prefix.
pub fn physical_table_name(prefix: &str, declared: &str) -> String {
    format!("{prefix}{declared}")
}

/// Returns the canonical definition of the blog table.
/// This is a pure function - no I/O.
pub fn blog_table_definition() -> TableDefinition {
    TableDefinition {
        table_name: keys::BLOG_TABLE.to_string(),
        key_schema: KeySchema::pk_sk(),
        indexes: vec![
            IndexDefinition {
                name: keys::BLOGS_BY_AUTHOR_INDEX.to_string(),
                key_schema: KeySchema::new(keys::GSI1PK, Some(keys::GSI1SK)),
            },
            IndexDefinition {
                name: keys::BLOGS_BY_CREATED_DATE_INDEX.to_string(),
                key_schema: KeySchema::new(keys::GSI2PK, Some(keys::GSI2SK)),
            },
        ],
    }
}
