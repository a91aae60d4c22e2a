//! Store-agnostic item model.
//!
//! An [`Item`] is a flat map of attribute names to scalar values. Backends
//! translate it to and from their native representation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use super::error::{RepositoryError, Result};
use crate::keys;

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// String value.
    S(String),
    /// Number, kept in its decimal string form as the store does.
    N(String),
    Bool(bool),
    Null,
}

impl AttributeValue {
    /// Builds a number value from anything that prints as a number.
    pub fn number(value: impl fmt::Display) -> Self {
        AttributeValue::N(value.to_string())
    }

    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Orders two values of the same kind. Strings compare by bytes, numbers
    /// numerically. Mixed kinds are unordered.
    pub fn compare(&self, other: &AttributeValue) -> Option<Ordering> {
        match (self, other) {
            (AttributeValue::S(a), AttributeValue::S(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (AttributeValue::N(a), AttributeValue::N(b)) => {
                let a: f64 = a.parse().ok()?;
                let b: f64 = b.parse().ok()?;
                a.partial_cmp(&b)
            }
            (AttributeValue::Bool(a), AttributeValue::Bool(b)) if a == b => Some(Ordering::Equal),
            (AttributeValue::Null, AttributeValue::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::S(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::S(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::number(value)
    }
}

/// A stored record: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Primary keys
// ============================================================================

/// One component of a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyAttribute {
    pub name: String,
    pub value: String,
}

/// A primary key: partition component plus an optional sort component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimaryKey {
    pub partition: KeyAttribute,
    pub sort: Option<KeyAttribute>,
}

impl PrimaryKey {
    /// Creates a partition-only key.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            partition: KeyAttribute {
                name: name.into(),
                value: value.into(),
            },
            sort: None,
        }
    }

    /// Adds the sort component.
    pub fn with_sort(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.sort = Some(KeyAttribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// The key as an item holding only the key attributes.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(
            self.partition.name.clone(),
            AttributeValue::S(self.partition.value.clone()),
        );
        if let Some(sort) = &self.sort {
            item.insert(sort.name.clone(), AttributeValue::S(sort.value.clone()));
        }
        item
    }

    /// Whether `item` carries exactly this key.
    pub fn matches(&self, item: &Item) -> bool {
        let component_matches = |attr: &KeyAttribute| {
            item.get(&attr.name).and_then(AttributeValue::as_s) == Some(attr.value.as_str())
        };

        component_matches(&self.partition) && self.sort.as_ref().is_none_or(component_matches)
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.partition.name, self.partition.value)?;
        if let Some(sort) = &self.sort {
            write!(f, ", {}={}", sort.name, sort.value)?;
        }
        Ok(())
    }
}

/// Names of the key attributes of a table or index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySchema {
    pub partition_key: &'static str,
    pub sort_key: Option<&'static str>,
}

impl KeySchema {
    pub const fn new(partition_key: &'static str, sort_key: Option<&'static str>) -> Self {
        Self {
            partition_key,
            sort_key,
        }
    }

    /// The `PK`/`SK` schema shared by every entity in the blog table.
    pub const fn pk_sk() -> Self {
        Self::new(keys::PK, Some(keys::SK))
    }

    /// A partition-only key.
    pub fn partition(&self, value: impl Into<String>) -> PrimaryKey {
        PrimaryKey::new(self.partition_key, value)
    }

    /// A partition + sort key. The sort value is dropped when the schema has
    /// no sort key.
    pub fn composite(&self, partition: impl Into<String>, sort: impl Into<String>) -> PrimaryKey {
        let key = self.partition(partition);
        match self.sort_key {
            Some(name) => key.with_sort(name, sort),
            None => key,
        }
    }

    /// Extracts the key of a stored item.
    pub fn key_of(&self, item: &Item) -> Result<PrimaryKey> {
        let key = self.partition(get_string(item, self.partition_key)?);
        match self.sort_key {
            Some(name) => Ok(key.with_sort(name, get_string(item, name)?)),
            None => Ok(key),
        }
    }
}

// ============================================================================
// Attribute accessors
// ============================================================================

/// Reads a required string attribute.
pub fn get_string(item: &Item, key: &str) -> Result<String> {
    item.get(key)
        .and_then(AttributeValue::as_s)
        .map(str::to_string)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Reads an optional string attribute.
pub fn get_optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(AttributeValue::as_s)
        .map(str::to_string)
}

/// Reads a required boolean attribute.
pub fn get_bool(item: &Item, key: &str) -> Result<bool> {
    item.get(key)
        .and_then(AttributeValue::as_bool)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Reads a string attribute, defaulting to empty when absent.
pub fn get_string_or_default(item: &Item, key: &str) -> Result<String> {
    match item.get(key) {
        None => Ok(String::new()),
        Some(_) => get_string(item, key),
    }
}

/// Reads a non-negative integer attribute, defaulting to zero when absent.
pub fn get_u64_or_default(item: &Item, key: &str) -> Result<u64> {
    match item.get(key) {
        None => Ok(0),
        Some(value) => value
            .as_n()
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| RepositoryError::InvalidData(format!("Invalid number {}", key))),
    }
}

/// Reads a `yyyy-MM-dd` date attribute.
pub fn get_date(item: &Item, key: &str) -> Result<NaiveDate> {
    let value = get_string(item, key)?;
    keys::parse_date(&value)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid date {}: {}", key, e)))
}
