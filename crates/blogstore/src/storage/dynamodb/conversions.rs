//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between SDK attribute maps and the
//! store-agnostic item model. Testable without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as DynamoValue;
use blogstore_core::storage::{
    AttributeValue, ExpressionAttributes, Item, PrimaryKey, RepositoryError, Result,
};

pub type DynamoItem = HashMap<String, DynamoValue>;

// ============================================================================
// Values
// ============================================================================

pub fn to_dynamo_value(value: &AttributeValue) -> DynamoValue {
    match value {
        AttributeValue::S(s) => DynamoValue::S(s.clone()),
        AttributeValue::N(n) => DynamoValue::N(n.clone()),
        AttributeValue::Bool(b) => DynamoValue::Bool(*b),
        AttributeValue::Null => DynamoValue::Null(true),
    }
}

pub fn from_dynamo_value(name: &str, value: &DynamoValue) -> Result<AttributeValue> {
    match value {
        DynamoValue::S(s) => Ok(AttributeValue::S(s.clone())),
        DynamoValue::N(n) => Ok(AttributeValue::N(n.clone())),
        DynamoValue::Bool(b) => Ok(AttributeValue::Bool(*b)),
        DynamoValue::Null(_) => Ok(AttributeValue::Null),
        other => Err(RepositoryError::InvalidData(format!(
            "Unsupported attribute type for {}: {:?}",
            name, other
        ))),
    }
}

// ============================================================================
// Items and keys
// ============================================================================

pub fn to_dynamo_item(item: &Item) -> DynamoItem {
    item.iter()
        .map(|(name, value)| (name.clone(), to_dynamo_value(value)))
        .collect()
}

pub fn from_dynamo_item(item: DynamoItem) -> Result<Item> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), from_dynamo_value(name, value)?)))
        .collect()
}

pub fn from_dynamo_items(items: Option<Vec<DynamoItem>>) -> Result<Vec<Item>> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(from_dynamo_item)
        .collect()
}

pub fn key_to_dynamo(key: &PrimaryKey) -> DynamoItem {
    to_dynamo_item(&key.to_item())
}

/// Reads a key map back into a [`PrimaryKey`] shaped like `template`.
pub fn key_from_dynamo(key: &DynamoItem, template: &PrimaryKey) -> Result<PrimaryKey> {
    let component = |name: &str| -> Result<String> {
        key.get(name)
            .and_then(|value| value.as_s().ok())
            .cloned()
            .ok_or_else(|| RepositoryError::InvalidData(format!("Missing key attribute: {}", name)))
    };

    let mut parsed = PrimaryKey::new(
        template.partition.name.clone(),
        component(&template.partition.name)?,
    );
    if let Some(sort) = &template.sort {
        parsed = parsed.with_sort(sort.name.clone(), component(&sort.name)?);
    }
    Ok(parsed)
}

// ============================================================================
// Expressions
// ============================================================================

/// Splits collected placeholders into the optional maps the SDK expects.
/// Empty maps are rejected by DynamoDB, so they become `None`.
pub fn expression_parts(
    attrs: ExpressionAttributes,
) -> (Option<HashMap<String, String>>, Option<DynamoItem>) {
    let (names, values) = attrs.into_parts();

    let names = (!names.is_empty()).then_some(names);
    let values = (!values.is_empty()).then(|| {
        values
            .iter()
            .map(|(placeholder, value)| (placeholder.clone(), to_dynamo_value(value)))
            .collect()
    });

    (names, values)
}

#[cfg(test)]
mod tests {
    use blogstore_core::storage::Condition;

    use super::*;

    #[test]
    fn test_value_conversions() {
        let values = [
            AttributeValue::from("BLOG"),
            AttributeValue::number(42),
            AttributeValue::Bool(true),
            AttributeValue::Null,
        ];

        for value in values {
            let converted = from_dynamo_value("X", &to_dynamo_value(&value)).unwrap();
            assert_eq!(converted, value);
        }
    }

    #[test]
    fn test_unsupported_value_is_invalid_data() {
        let value = DynamoValue::Ss(vec!["a".to_string()]);
        assert!(matches!(
            from_dynamo_value("Tags", &value),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_key_to_dynamo() {
        let key = PrimaryKey::new("PK", "AUTHOR").with_sort("SK", "AUTHOR#A1");
        let item = key_to_dynamo(&key);

        assert_eq!(item.get("PK"), Some(&DynamoValue::S("AUTHOR".to_string())));
        assert_eq!(
            item.get("SK"),
            Some(&DynamoValue::S("AUTHOR#A1".to_string()))
        );
        assert_eq!(key_from_dynamo(&item, &key).unwrap(), key);
    }

    #[test]
    fn test_key_from_dynamo_missing_sort() {
        let template = PrimaryKey::new("PK", "BLOG").with_sort("SK", "BLOG#B1");
        let mut item = key_to_dynamo(&template);
        item.remove("SK");

        assert!(matches!(
            key_from_dynamo(&item, &template),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_expression_parts_empty_maps_are_none() {
        let (names, values) = expression_parts(ExpressionAttributes::new());
        assert!(names.is_none());
        assert!(values.is_none());
    }

    #[test]
    fn test_expression_parts() {
        let mut attrs = ExpressionAttributes::new();
        Condition::eq("PK", "BLOG").render(&mut attrs);

        let (names, values) = expression_parts(attrs);
        assert_eq!(names.unwrap().get("#n0").map(String::as_str), Some("PK"));
        assert_eq!(
            values.unwrap().get(":v0"),
            Some(&DynamoValue::S("BLOG".to_string()))
        );
    }
}
