//! Table provisioning.
//!
//! Builds `CreateTable` requests from a [`TableDefinition`] and waits for the
//! table and its indexes to become active.

use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, IndexStatus, KeySchemaElement,
    KeyType, Projection, ProjectionType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;

use blogstore_core::storage::{KeySchema, RepositoryError, Result, TableDefinition};

use super::error::{map_build_error, map_create_table_error, map_describe_table_error};

const MAX_ACTIVATION_ATTEMPTS: u32 = 60;
const ACTIVATION_POLL_DELAY: Duration = Duration::from_secs(2);

/// Outcome of [`ensure_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioning {
    Created,
    AlreadyExists,
}

/// Key schema elements, hash key first.
pub fn key_schema_elements(schema: &KeySchema) -> Result<Vec<KeySchemaElement>> {
    let mut elements = vec![KeySchemaElement::builder()
        .attribute_name(schema.partition_key)
        .key_type(KeyType::Hash)
        .build()
        .map_err(map_build_error)?];

    if let Some(sort_key) = schema.sort_key {
        elements.push(
            KeySchemaElement::builder()
                .attribute_name(sort_key)
                .key_type(KeyType::Range)
                .build()
                .map_err(map_build_error)?,
        );
    }

    Ok(elements)
}

/// One string attribute definition per key attribute of the table and its
/// indexes.
pub fn attribute_definitions(definition: &TableDefinition) -> Result<Vec<AttributeDefinition>> {
    definition
        .key_attributes()
        .into_iter()
        .map(|name| {
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(map_build_error)
        })
        .collect()
}

/// Keys-only global secondary indexes.
pub fn global_secondary_indexes(
    definition: &TableDefinition,
) -> Result<Vec<GlobalSecondaryIndex>> {
    definition
        .indexes
        .iter()
        .map(|index| {
            GlobalSecondaryIndex::builder()
                .index_name(&index.name)
                .set_key_schema(Some(key_schema_elements(&index.key_schema)?))
                .projection(
                    Projection::builder()
                        .projection_type(ProjectionType::KeysOnly)
                        .build(),
                )
                .build()
                .map_err(map_build_error)
        })
        .collect()
}

/// Creates the table when it does not exist yet and waits until it is usable.
pub async fn ensure_table(client: &Client, definition: &TableDefinition) -> Result<Provisioning> {
    let table_name = definition.table_name.as_str();

    if table_exists(client, table_name).await? {
        tracing::info!(table = %table_name, "Table already exists");
        return Ok(Provisioning::AlreadyExists);
    }

    tracing::info!(
        table = %table_name,
        indexes = definition.indexes.len(),
        "Creating table"
    );

    client
        .create_table()
        .table_name(table_name)
        .set_key_schema(Some(key_schema_elements(&definition.key_schema)?))
        .set_attribute_definitions(Some(attribute_definitions(definition)?))
        .set_global_secondary_indexes(Some(global_secondary_indexes(definition)?))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(|e| map_create_table_error(e, table_name))?;

    wait_for_table_active(client, table_name).await?;

    tracing::info!(table = %table_name, "Table is active");
    Ok(Provisioning::Created)
}

async fn table_exists(client: &Client, table_name: &str) -> Result<bool> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => Ok(true),
        Err(err) => map_describe_table_error(err).map(|()| false),
    }
}

/// Whether the table and all of its indexes are active. `None` when the table
/// does not exist.
async fn is_active(client: &Client, table_name: &str) -> Result<Option<bool>> {
    let response = match client.describe_table().table_name(table_name).send().await {
        Ok(response) => response,
        Err(err) => return map_describe_table_error(err).map(|()| None),
    };

    let Some(table) = response.table() else {
        return Ok(None);
    };

    let table_active = table.table_status() == Some(&TableStatus::Active);
    let indexes_active = table
        .global_secondary_indexes()
        .iter()
        .all(|index| index.index_status() == Some(&IndexStatus::Active));

    Ok(Some(table_active && indexes_active))
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    for attempt in 1..=MAX_ACTIVATION_ATTEMPTS {
        if is_active(client, table_name).await? == Some(true) {
            return Ok(());
        }
        tracing::debug!(table = %table_name, attempt, "Waiting for table to become active");
        tokio::time::sleep(ACTIVATION_POLL_DELAY).await;
    }

    Err(RepositoryError::StoreOperationFailed(format!(
        "Table {} did not become active in time",
        table_name
    )))
}
