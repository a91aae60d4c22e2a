//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `blogstore_core::storage`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::batch_get_item::BatchGetItemError;
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use blogstore_core::storage::RepositoryError;

/// Requests that never got a response are connection failures.
fn connection_failure<E, R>(err: &SdkError<E, R>, operation: &str) -> Option<RepositoryError> {
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => Some(
            RepositoryError::ConnectionFailed(format!("{} could not reach DynamoDB", operation)),
        ),
        _ => None,
    }
}

fn table_not_found(table_name: &str) -> RepositoryError {
    RepositoryError::StoreOperationFailed(format!("Table not found: {}", table_name))
}

fn throttled() -> RepositoryError {
    RepositoryError::StoreOperationFailed("Throughput exceeded, please retry".to_string())
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "GetItem") {
        return failure;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        GetItemError::ProvisionedThroughputExceededException(_) => throttled(),
        err => RepositoryError::StoreOperationFailed(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "PutItem") {
        return failure;
    }
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => {
            RepositoryError::PreconditionFailed(format!(
                "Conditional put rejected on {}",
                table_name
            ))
        }
        PutItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        PutItemError::ProvisionedThroughputExceededException(_) => throttled(),
        PutItemError::TransactionConflictException(_) => {
            RepositoryError::StoreOperationFailed("Transaction conflict, please retry".to_string())
        }
        err => RepositoryError::StoreOperationFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "DeleteItem") {
        return failure;
    }
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => RepositoryError::PreconditionFailed(
            format!("Conditional delete rejected on {}", table_name),
        ),
        DeleteItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        DeleteItemError::ProvisionedThroughputExceededException(_) => throttled(),
        err => RepositoryError::StoreOperationFailed(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to RepositoryError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "UpdateItem") {
        return failure;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => RepositoryError::PreconditionFailed(
            format!("Conditional update rejected on {}", table_name),
        ),
        UpdateItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        UpdateItemError::ProvisionedThroughputExceededException(_) => throttled(),
        err => RepositoryError::StoreOperationFailed(format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "Query") {
        return failure;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => table_not_found(table_name),
        QueryError::ProvisionedThroughputExceededException(_) => throttled(),
        err => RepositoryError::StoreOperationFailed(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "Scan") {
        return failure;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => table_not_found(table_name),
        ScanError::ProvisionedThroughputExceededException(_) => throttled(),
        err => RepositoryError::StoreOperationFailed(format!("Scan failed: {:?}", err)),
    }
}

/// Map a BatchGetItem SDK error to RepositoryError.
pub fn map_batch_get_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<BatchGetItemError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "BatchGetItem") {
        return failure;
    }
    match err.into_service_error() {
        BatchGetItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        BatchGetItemError::ProvisionedThroughputExceededException(_) => throttled(),
        err => RepositoryError::StoreOperationFailed(format!("BatchGetItem failed: {:?}", err)),
    }
}

/// Map a BatchWriteItem SDK error to RepositoryError.
pub fn map_batch_write_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<BatchWriteItemError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "BatchWriteItem") {
        return failure;
    }
    match err.into_service_error() {
        BatchWriteItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        BatchWriteItemError::ProvisionedThroughputExceededException(_) => throttled(),
        err => RepositoryError::StoreOperationFailed(format!("BatchWriteItem failed: {:?}", err)),
    }
}

/// Map a TransactWriteItems SDK error to RepositoryError.
///
/// Cancellations carry one reason code per action; they are kept in the
/// message in action order.
pub fn map_transact_write_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<TransactWriteItemsError, R>,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "TransactWriteItems") {
        return failure;
    }
    match err.into_service_error() {
        TransactWriteItemsError::TransactionCanceledException(e) => {
            let reasons: Vec<&str> = e
                .cancellation_reasons()
                .iter()
                .map(|reason| reason.code().unwrap_or("None"))
                .collect();
            RepositoryError::TransactionFailed(format!(
                "Transaction cancelled, reasons [{}]",
                reasons.join(", ")
            ))
        }
        TransactWriteItemsError::TransactionInProgressException(_) => {
            RepositoryError::TransactionFailed("Transaction already in progress".to_string())
        }
        err => RepositoryError::TransactionFailed(format!("TransactWriteItems failed: {:?}", err)),
    }
}

/// Map a DescribeTable SDK error. `Ok(())` means the table does not exist.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
) -> Result<(), RepositoryError> {
    if let Some(failure) = connection_failure(&err, "DescribeTable") {
        return Err(failure);
    }
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => Ok(()),
        err => Err(RepositoryError::StoreOperationFailed(format!(
            "DescribeTable failed: {:?}",
            err
        ))),
    }
}

/// Map a CreateTable SDK error to RepositoryError.
pub fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
    table_name: &str,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err, "CreateTable") {
        return failure;
    }
    match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => {
            RepositoryError::StoreOperationFailed(format!("Table {} is already in use", table_name))
        }
        err => RepositoryError::StoreOperationFailed(format!("CreateTable failed: {:?}", err)),
    }
}

/// Map a builder validation error to RepositoryError.
pub fn map_build_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::StoreOperationFailed(format!("Invalid request: {}", err))
}
