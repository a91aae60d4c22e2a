//! Typed condition, key-condition and update expressions.
//!
//! Expressions are built as values so that each backend can both render them
//! (DynamoDB expression strings with `#name`/`:value` placeholders) and
//! evaluate them against an item (in-memory backend).

use std::cmp::Ordering;
use std::collections::HashMap;

use super::error::{RepositoryError, Result};
use super::item::{AttributeValue, Item};

/// Comparison operators usable in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "<>",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }

    fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Comparator::Ne, None) => true,
            (_, None) => false,
            (Comparator::Eq, Some(o)) => o == Ordering::Equal,
            (Comparator::Ne, Some(o)) => o != Ordering::Equal,
            (Comparator::Lt, Some(o)) => o == Ordering::Less,
            (Comparator::Le, Some(o)) => o != Ordering::Greater,
            (Comparator::Gt, Some(o)) => o == Ordering::Greater,
            (Comparator::Ge, Some(o)) => o != Ordering::Less,
        }
    }
}

/// A predicate over a raw item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    AttributeExists(String),
    AttributeNotExists(String),
    Compare {
        attribute: String,
        op: Comparator,
        value: AttributeValue,
    },
    BeginsWith {
        attribute: String,
        prefix: String,
    },
    Between {
        attribute: String,
        low: AttributeValue,
        high: AttributeValue,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn exists(attribute: impl Into<String>) -> Self {
        Condition::AttributeExists(attribute.into())
    }

    pub fn not_exists(attribute: impl Into<String>) -> Self {
        Condition::AttributeNotExists(attribute.into())
    }

    pub fn compare(
        attribute: impl Into<String>,
        op: Comparator,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Condition::Compare {
            attribute: attribute.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::compare(attribute, Comparator::Eq, value)
    }

    pub fn begins_with(attribute: impl Into<String>, prefix: impl Into<String>) -> Self {
        Condition::BeginsWith {
            attribute: attribute.into(),
            prefix: prefix.into(),
        }
    }

    pub fn between(
        attribute: impl Into<String>,
        low: impl Into<AttributeValue>,
        high: impl Into<AttributeValue>,
    ) -> Self {
        Condition::Between {
            attribute: attribute.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Conjunction, flattening nested `And`s.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut conditions) => {
                conditions.push(other);
                Condition::And(conditions)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut conditions) => {
                conditions.push(other);
                Condition::Or(conditions)
            }
            first => Condition::Or(vec![first, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Condition::Not(Box::new(self))
    }

    /// Evaluates the condition. A missing item behaves like an empty one.
    pub fn evaluate(&self, item: Option<&Item>) -> bool {
        let get = |name: &str| item.and_then(|i| i.get(name));

        match self {
            Condition::AttributeExists(name) => get(name).is_some(),
            Condition::AttributeNotExists(name) => get(name).is_none(),
            Condition::Compare {
                attribute,
                op,
                value,
            } => match get(attribute) {
                Some(current) => op.holds(current.compare(value)),
                None => false,
            },
            Condition::BeginsWith { attribute, prefix } => get(attribute)
                .and_then(AttributeValue::as_s)
                .is_some_and(|s| s.starts_with(prefix.as_str())),
            Condition::Between {
                attribute,
                low,
                high,
            } => get(attribute).is_some_and(|current| {
                Comparator::Ge.holds(current.compare(low))
                    && Comparator::Le.holds(current.compare(high))
            }),
            Condition::And(conditions) => conditions.iter().all(|c| c.evaluate(item)),
            Condition::Or(conditions) => conditions.iter().any(|c| c.evaluate(item)),
            Condition::Not(condition) => !condition.evaluate(item),
        }
    }

    /// Renders the condition, registering placeholders in `attrs`.
    pub fn render(&self, attrs: &mut ExpressionAttributes) -> String {
        match self {
            Condition::AttributeExists(name) => format!("attribute_exists({})", attrs.name(name)),
            Condition::AttributeNotExists(name) => {
                format!("attribute_not_exists({})", attrs.name(name))
            }
            Condition::Compare {
                attribute,
                op,
                value,
            } => format!(
                "{} {} {}",
                attrs.name(attribute),
                op.symbol(),
                attrs.value(value.clone())
            ),
            Condition::BeginsWith { attribute, prefix } => format!(
                "begins_with({}, {})",
                attrs.name(attribute),
                attrs.value(AttributeValue::S(prefix.clone()))
            ),
            Condition::Between {
                attribute,
                low,
                high,
            } => format!(
                "{} BETWEEN {} AND {}",
                attrs.name(attribute),
                attrs.value(low.clone()),
                attrs.value(high.clone())
            ),
            Condition::And(conditions) => join(conditions, " AND ", attrs),
            Condition::Or(conditions) => join(conditions, " OR ", attrs),
            Condition::Not(condition) => format!("NOT ({})", condition.render(attrs)),
        }
    }
}

fn join(conditions: &[Condition], separator: &str, attrs: &mut ExpressionAttributes) -> String {
    let parts: Vec<String> = conditions
        .iter()
        .map(|c| format!("({})", c.render(attrs)))
        .collect();
    parts.join(separator)
}

// ============================================================================
// Key conditions
// ============================================================================

/// Condition on the sort key of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKeyCondition {
    Eq(AttributeValue),
    Lt(AttributeValue),
    Le(AttributeValue),
    Gt(AttributeValue),
    Ge(AttributeValue),
    Between(AttributeValue, AttributeValue),
    BeginsWith(String),
}

/// Query key condition: partition equality plus an optional sort condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCondition {
    pub partition_key: String,
    pub partition_value: AttributeValue,
    pub sort: Option<(String, SortKeyCondition)>,
}

impl KeyCondition {
    /// `partition_key = value`.
    pub fn partition(partition_key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            partition_key: partition_key.into(),
            partition_value: value.into(),
            sort: None,
        }
    }

    pub fn and_sort(mut self, sort_key: impl Into<String>, condition: SortKeyCondition) -> Self {
        self.sort = Some((sort_key.into(), condition));
        self
    }

    /// The same predicate as a general [`Condition`].
    pub fn to_condition(&self) -> Condition {
        let partition = Condition::eq(self.partition_key.clone(), self.partition_value.clone());

        let Some((name, sort)) = &self.sort else {
            return partition;
        };

        let sort = match sort {
            SortKeyCondition::Eq(v) => Condition::compare(name.clone(), Comparator::Eq, v.clone()),
            SortKeyCondition::Lt(v) => Condition::compare(name.clone(), Comparator::Lt, v.clone()),
            SortKeyCondition::Le(v) => Condition::compare(name.clone(), Comparator::Le, v.clone()),
            SortKeyCondition::Gt(v) => Condition::compare(name.clone(), Comparator::Gt, v.clone()),
            SortKeyCondition::Ge(v) => Condition::compare(name.clone(), Comparator::Ge, v.clone()),
            SortKeyCondition::Between(low, high) => {
                Condition::between(name.clone(), low.clone(), high.clone())
            }
            SortKeyCondition::BeginsWith(prefix) => {
                Condition::begins_with(name.clone(), prefix.clone())
            }
        };

        partition.and(sort)
    }

    /// Renders a key condition expression.
    pub fn render(&self, attrs: &mut ExpressionAttributes) -> String {
        match self.to_condition() {
            Condition::And(parts) => parts
                .iter()
                .map(|c| c.render(attrs))
                .collect::<Vec<_>>()
                .join(" AND "),
            single => single.render(attrs),
        }
    }
}

// ============================================================================
// Updates
// ============================================================================

/// A single attribute edit of an update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Set (or create) an attribute.
    Set(String, AttributeValue),
    /// Delete an attribute.
    Remove(String),
    /// Add to a number attribute, treating a missing attribute as zero.
    Add(String, AttributeValue),
}

/// Renders an update expression grouped by clause (`SET`, `REMOVE`, `ADD`).
pub fn render_updates(updates: &[Update], attrs: &mut ExpressionAttributes) -> String {
    let mut set = Vec::new();
    let mut remove = Vec::new();
    let mut add = Vec::new();

    for update in updates {
        match update {
            Update::Set(name, value) => {
                set.push(format!("{} = {}", attrs.name(name), attrs.value(value.clone())))
            }
            Update::Remove(name) => remove.push(attrs.name(name)),
            Update::Add(name, value) => {
                add.push(format!("{} {}", attrs.name(name), attrs.value(value.clone())))
            }
        }
    }

    let mut clauses = Vec::new();
    if !set.is_empty() {
        clauses.push(format!("SET {}", set.join(", ")));
    }
    if !remove.is_empty() {
        clauses.push(format!("REMOVE {}", remove.join(", ")));
    }
    if !add.is_empty() {
        clauses.push(format!("ADD {}", add.join(", ")));
    }
    clauses.join(" ")
}

/// Applies updates to an item in place.
pub fn apply_updates(item: &mut Item, updates: &[Update]) -> Result<()> {
    for update in updates {
        match update {
            Update::Set(name, value) => {
                item.insert(name.clone(), value.clone());
            }
            Update::Remove(name) => {
                item.remove(name);
            }
            Update::Add(name, value) => {
                let increment = value.as_n().ok_or_else(|| {
                    RepositoryError::InvalidData(format!("ADD requires a number for {}", name))
                })?;
                let current = match item.get(name) {
                    None => "0",
                    Some(existing) => existing.as_n().ok_or_else(|| {
                        RepositoryError::InvalidData(format!("{} is not a number", name))
                    })?,
                };
                let sum = add_numbers(current, increment).ok_or_else(|| {
                    RepositoryError::InvalidData(format!("Invalid number {}", name))
                })?;
                item.insert(name.clone(), AttributeValue::N(sum));
            }
        }
    }
    Ok(())
}

fn add_numbers(a: &str, b: &str) -> Option<String> {
    if let (Ok(a), Ok(b)) = (a.parse::<i64>(), b.parse::<i64>()) {
        return a.checked_add(b).map(|sum| sum.to_string());
    }
    let a: f64 = a.parse().ok()?;
    let b: f64 = b.parse().ok()?;
    Some((a + b).to_string())
}

// ============================================================================
// Placeholders
// ============================================================================

/// Collects `#nN` name and `:vN` value placeholders while rendering.
#[derive(Debug, Default, Clone)]
pub struct ExpressionAttributes {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl ExpressionAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder for an attribute name. Repeated names share a placeholder.
    pub fn name(&mut self, attribute: &str) -> String {
        if let Some((placeholder, _)) = self.names.iter().find(|(_, name)| *name == attribute) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.names.len());
        self.names.insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    /// Placeholder for a value.
    pub fn value(&mut self, value: AttributeValue) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        placeholder
    }

    /// Renders a projection expression for the given attributes.
    pub fn projection(&mut self, attributes: &[String]) -> String {
        attributes
            .iter()
            .map(|a| self.name(a))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    pub fn values(&self) -> &HashMap<String, AttributeValue> {
        &self.values
    }

    pub fn into_parts(self) -> (HashMap<String, String>, HashMap<String, AttributeValue>) {
        (self.names, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_item() -> Item {
        let mut item = Item::new();
        item.insert("PK".to_string(), "AUTHOR".into());
        item.insert("SK".to_string(), "AUTHOR#A1".into());
        item.insert("Name".to_string(), "Jane".into());
        item
    }

    #[test]
    fn test_exists_conditions_on_missing_item() {
        assert!(Condition::not_exists("PK").evaluate(None));
        assert!(!Condition::exists("PK").evaluate(None));
        assert!(!Condition::eq("Name", "Jane").evaluate(None));
    }

    #[test]
    fn test_compare_and_begins_with() {
        let item = author_item();
        assert!(Condition::eq("Name", "Jane").evaluate(Some(&item)));
        assert!(!Condition::eq("Name", "John").evaluate(Some(&item)));
        assert!(Condition::begins_with("SK", "AUTHOR#").evaluate(Some(&item)));
        assert!(Condition::compare("Name", Comparator::Ne, "John").evaluate(Some(&item)));
    }

    #[test]
    fn test_between_is_inclusive() {
        let mut item = Item::new();
        item.insert("GSI1SK".to_string(), "2024-02-01".into());

        assert!(Condition::between("GSI1SK", "2024-02-01", "2024-03-01").evaluate(Some(&item)));
        assert!(!Condition::between("GSI1SK", "2024-02-02", "2024-03-01").evaluate(Some(&item)));
    }

    #[test]
    fn test_and_or_not() {
        let item = author_item();
        let both = Condition::exists("PK").and(Condition::eq("Name", "Jane"));
        let either = Condition::eq("Name", "John").or(Condition::eq("Name", "Jane"));

        assert!(both.evaluate(Some(&item)));
        assert!(either.evaluate(Some(&item)));
        assert!(!both.clone().not().evaluate(Some(&item)));
    }

    #[test]
    fn test_render_condition_uses_placeholders() {
        let mut attrs = ExpressionAttributes::new();
        let expr = Condition::exists("PK")
            .and(Condition::eq("Name", "Jane"))
            .render(&mut attrs);

        assert_eq!(expr, "(attribute_exists(#n0)) AND (#n1 = :v0)");
        assert_eq!(attrs.names().get("#n0").unwrap(), "PK");
        assert_eq!(attrs.names().get("#n1").unwrap(), "Name");
        assert_eq!(attrs.values().get(":v0").unwrap(), &AttributeValue::from("Jane"));
    }

    #[test]
    fn test_render_key_condition() {
        let mut attrs = ExpressionAttributes::new();
        let expr = KeyCondition::partition("GSI1PK", "AUTHOR#A1")
            .and_sort("GSI1SK", SortKeyCondition::BeginsWith("2024".to_string()))
            .render(&mut attrs);

        assert_eq!(expr, "#n0 = :v0 AND begins_with(#n1, :v1)");
    }

    #[test]
    fn test_repeated_names_share_placeholder() {
        let mut attrs = ExpressionAttributes::new();
        let first = attrs.name("PK");
        let second = attrs.name("PK");
        assert_eq!(first, second);
        assert_eq!(attrs.names().len(), 1);
    }

    #[test]
    fn test_render_updates_groups_clauses() {
        let mut attrs = ExpressionAttributes::new();
        let expr = render_updates(
            &[
                Update::Add("ViewCount".to_string(), AttributeValue::number(1)),
                Update::Set("Title".to_string(), "New".into()),
                Update::Remove("Draft".to_string()),
            ],
            &mut attrs,
        );
        assert_eq!(expr, "SET #n1 = :v1 REMOVE #n2 ADD #n0 :v0");
    }

    #[test]
    fn test_apply_updates() {
        let mut item = author_item();
        apply_updates(
            &mut item,
            &[
                Update::Add("ViewCount".to_string(), AttributeValue::number(1)),
                Update::Add("ViewCount".to_string(), AttributeValue::number(2)),
                Update::Set("Name".to_string(), "Janet".into()),
                Update::Remove("SK".to_string()),
            ],
        )
        .unwrap();

        assert_eq!(item.get("ViewCount"), Some(&AttributeValue::number(3)));
        assert_eq!(item.get("Name"), Some(&AttributeValue::from("Janet")));
        assert!(!item.contains_key("SK"));
    }

    #[test]
    fn test_add_to_string_is_invalid() {
        let mut item = author_item();
        let result = apply_updates(
            &mut item,
            &[Update::Add("Name".to_string(), AttributeValue::number(1))],
        );
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }
}
