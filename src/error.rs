//! Error types for running operations and batches.
//!
//! `ItemError` is what a single item can fail with; whether it aborts the
//! batch depends on the batch's failure mode. `BatchError` is what actually
//! stops a batch.

use ibkr_broker::{BrokerError, ValidationError};

use crate::operation::UnknownOperation;

/// Failure of a single batch item.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] serde_json::Error),
    #[error("Item must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl From<ValidationError> for ItemError {
    fn from(err: ValidationError) -> Self {
        Self::Broker(BrokerError::Validation(err))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    UnknownOperation(#[from] UnknownOperation),
    #[error("No operation given for item {index} and no default operation configured")]
    MissingOperation { index: usize },
    #[error("Item {index} failed: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: ItemError,
    },
}
