//! DynamoDB table store implementation.
//!
//! Implements `TableStore` from `blogstore_core::storage` with one SDK call
//! per trait method.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    ConditionCheck, Delete, DeleteRequest, KeysAndAttributes, Put, PutRequest, ReturnValue,
    TransactWriteItem, WriteRequest,
};
use aws_sdk_dynamodb::Client;

use blogstore_core::storage::{
    render_updates, BatchGetPage, BatchWritePage, Condition, ExpressionAttributes, Item, Page,
    PrimaryKey, QueryRequest, Result, ScanRequest, SortOrder, TableStore, TransactWriteAction,
    Update,
};

use super::conversions::{
    expression_parts, from_dynamo_item, from_dynamo_items, key_from_dynamo, key_to_dynamo,
    to_dynamo_item,
};
use super::error::{
    map_batch_get_error, map_batch_write_error, map_build_error, map_delete_item_error,
    map_get_item_error, map_put_item_error, map_query_error, map_scan_error,
    map_transact_write_error, map_update_item_error,
};

/// DynamoDB-based table store.
///
/// The SDK client is cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn page_limit(page_size: Option<u32>) -> Option<i32> {
    page_size.map(|size| i32::try_from(size).unwrap_or(i32::MAX))
}

/// Renders an optional condition into an expression plus placeholders.
fn render_condition(
    condition: Option<&Condition>,
    attrs: &mut ExpressionAttributes,
) -> Option<String> {
    condition.map(|condition| condition.render(attrs))
}

fn transact_item(action: TransactWriteAction) -> Result<TransactWriteItem> {
    let mut attrs = ExpressionAttributes::new();

    let item = match action {
        TransactWriteAction::Put {
            table_name,
            item,
            condition,
        } => {
            let expression = render_condition(condition.as_ref(), &mut attrs);
            let (names, values) = expression_parts(attrs);
            let put = Put::builder()
                .table_name(table_name)
                .set_item(Some(to_dynamo_item(&item)))
                .set_condition_expression(expression)
                .set_expression_attribute_names(names)
                .set_expression_attribute_values(values)
                .build()
                .map_err(map_build_error)?;
            TransactWriteItem::builder().put(put).build()
        }
        TransactWriteAction::Delete {
            table_name,
            key,
            condition,
        } => {
            let expression = render_condition(condition.as_ref(), &mut attrs);
            let (names, values) = expression_parts(attrs);
            let delete = Delete::builder()
                .table_name(table_name)
                .set_key(Some(key_to_dynamo(&key)))
                .set_condition_expression(expression)
                .set_expression_attribute_names(names)
                .set_expression_attribute_values(values)
                .build()
                .map_err(map_build_error)?;
            TransactWriteItem::builder().delete(delete).build()
        }
        TransactWriteAction::ConditionCheck {
            table_name,
            key,
            condition,
        } => {
            let expression = condition.render(&mut attrs);
            let (names, values) = expression_parts(attrs);
            let check = ConditionCheck::builder()
                .table_name(table_name)
                .set_key(Some(key_to_dynamo(&key)))
                .condition_expression(expression)
                .set_expression_attribute_names(names)
                .set_expression_attribute_values(values)
                .build()
                .map_err(map_build_error)?;
            TransactWriteItem::builder().condition_check(check).build()
        }
    };

    Ok(item)
}

#[async_trait]
impl TableStore for DynamoDbStore {
    async fn get_item(&self, table_name: &str, key: &PrimaryKey) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(key_to_dynamo(key)))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, table_name))?;

        result.item.map(from_dynamo_item).transpose()
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: Item,
        condition: Option<&Condition>,
    ) -> Result<()> {
        let mut attrs = ExpressionAttributes::new();
        let expression = render_condition(condition, &mut attrs);
        let (names, values) = expression_parts(attrs);

        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(to_dynamo_item(&item)))
            .set_condition_expression(expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table_name))?;

        Ok(())
    }

    async fn delete_item(
        &self,
        table_name: &str,
        key: &PrimaryKey,
        condition: Option<&Condition>,
    ) -> Result<()> {
        let mut attrs = ExpressionAttributes::new();
        let expression = render_condition(condition, &mut attrs);
        let (names, values) = expression_parts(attrs);

        self.client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(key_to_dynamo(key)))
            .set_condition_expression(expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, table_name))?;

        Ok(())
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: &PrimaryKey,
        updates: &[Update],
        condition: Option<&Condition>,
    ) -> Result<Option<Item>> {
        let mut attrs = ExpressionAttributes::new();
        let update_expression = render_updates(updates, &mut attrs);
        let condition_expression = render_condition(condition, &mut attrs);
        let (names, values) = expression_parts(attrs);

        let result = self
            .client
            .update_item()
            .table_name(table_name)
            .set_key(Some(key_to_dynamo(key)))
            .update_expression(update_expression)
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, table_name))?;

        result.attributes.map(from_dynamo_item).transpose()
    }

    async fn query_page(
        &self,
        table_name: &str,
        request: &QueryRequest,
        exclusive_start_key: Option<Item>,
    ) -> Result<Page> {
        let mut attrs = ExpressionAttributes::new();
        let key_condition = request.key_condition.render(&mut attrs);
        let filter = render_condition(request.filter.as_ref(), &mut attrs);
        let projection = request
            .projection
            .as_ref()
            .map(|attributes| attrs.projection(attributes));
        let (names, values) = expression_parts(attrs);

        let result = self
            .client
            .query()
            .table_name(table_name)
            .set_index_name(request.index_name.clone())
            .key_condition_expression(key_condition)
            .set_filter_expression(filter)
            .set_projection_expression(projection)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .scan_index_forward(request.order == SortOrder::Ascending)
            .set_limit(page_limit(request.page_size))
            .set_exclusive_start_key(exclusive_start_key.as_ref().map(to_dynamo_item))
            .send()
            .await
            .map_err(|e| map_query_error(e, table_name))?;

        Ok(Page {
            items: from_dynamo_items(result.items)?,
            last_evaluated_key: result.last_evaluated_key.map(from_dynamo_item).transpose()?,
        })
    }

    async fn scan_page(
        &self,
        table_name: &str,
        request: &ScanRequest,
        exclusive_start_key: Option<Item>,
    ) -> Result<Page> {
        let mut attrs = ExpressionAttributes::new();
        let filter = render_condition(request.filter.as_ref(), &mut attrs);
        let projection = request
            .projection
            .as_ref()
            .map(|attributes| attrs.projection(attributes));
        let (names, values) = expression_parts(attrs);

        let result = self
            .client
            .scan()
            .table_name(table_name)
            .set_index_name(request.index_name.clone())
            .set_filter_expression(filter)
            .set_projection_expression(projection)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_limit(page_limit(request.page_size))
            .set_exclusive_start_key(exclusive_start_key.as_ref().map(to_dynamo_item))
            .send()
            .await
            .map_err(|e| map_scan_error(e, table_name))?;

        Ok(Page {
            items: from_dynamo_items(result.items)?,
            last_evaluated_key: result.last_evaluated_key.map(from_dynamo_item).transpose()?,
        })
    }

    async fn batch_get_items(
        &self,
        table_name: &str,
        keys: &[PrimaryKey],
        projection: Option<&[String]>,
    ) -> Result<BatchGetPage> {
        let Some(template) = keys.first() else {
            return Ok(BatchGetPage::default());
        };

        let mut attrs = ExpressionAttributes::new();
        let projection = projection.map(|attributes| attrs.projection(attributes));
        let (names, _) = expression_parts(attrs);

        let request = KeysAndAttributes::builder()
            .set_keys(Some(keys.iter().map(key_to_dynamo).collect()))
            .set_projection_expression(projection)
            .set_expression_attribute_names(names)
            .build()
            .map_err(map_build_error)?;

        let result = self
            .client
            .batch_get_item()
            .request_items(table_name, request)
            .send()
            .await
            .map_err(|e| map_batch_get_error(e, table_name))?;

        let items = from_dynamo_items(result.responses.and_then(|mut r| r.remove(table_name)))?;

        let unprocessed_keys = result
            .unprocessed_keys
            .and_then(|mut unprocessed| unprocessed.remove(table_name))
            .map(|keys_and_attributes| keys_and_attributes.keys)
            .unwrap_or_default()
            .iter()
            .map(|key| key_from_dynamo(key, template))
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchGetPage {
            items,
            unprocessed_keys,
        })
    }

    async fn batch_write_items(
        &self,
        table_name: &str,
        puts: Vec<Item>,
        deletes: Vec<PrimaryKey>,
    ) -> Result<BatchWritePage> {
        if puts.is_empty() && deletes.is_empty() {
            return Ok(BatchWritePage::default());
        }

        let mut write_ops: Vec<WriteRequest> = Vec::with_capacity(puts.len() + deletes.len());

        for item in &puts {
            let put_request = PutRequest::builder()
                .set_item(Some(to_dynamo_item(item)))
                .build()
                .map_err(map_build_error)?;
            write_ops.push(WriteRequest::builder().put_request(put_request).build());
        }

        for key in &deletes {
            let delete_request = DeleteRequest::builder()
                .set_key(Some(key_to_dynamo(key)))
                .build()
                .map_err(map_build_error)?;
            write_ops.push(
                WriteRequest::builder()
                    .delete_request(delete_request)
                    .build(),
            );
        }

        let result = self
            .client
            .batch_write_item()
            .request_items(table_name, write_ops)
            .send()
            .await
            .map_err(|e| map_batch_write_error(e, table_name))?;

        let mut outcome = BatchWritePage::default();
        let unprocessed = result
            .unprocessed_items
            .and_then(|mut unprocessed| unprocessed.remove(table_name))
            .unwrap_or_default();

        for request in unprocessed {
            if let Some(put_request) = request.put_request {
                outcome
                    .unprocessed_puts
                    .push(from_dynamo_item(put_request.item)?);
            }
            if let Some(delete_request) = request.delete_request {
                if let Some(template) = deletes.first() {
                    outcome
                        .unprocessed_deletes
                        .push(key_from_dynamo(&delete_request.key, template)?);
                }
            }
        }

        Ok(outcome)
    }

    async fn transact_write(&self, actions: Vec<TransactWriteAction>) -> Result<()> {
        if actions.is_empty() {
            return Ok(());
        }

        let items = actions
            .into_iter()
            .map(transact_item)
            .collect::<Result<Vec<_>>>()?;

        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
            .map_err(map_transact_write_error)?;

        Ok(())
    }
}
