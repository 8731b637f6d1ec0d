//! Runs a list of workflow items through the gateway, one at a time and in
//! input order.
//!
//! Each item picks its operation from its own `operation` field, falling
//! back to the runner's default. A failing item either aborts the batch or,
//! with [`FailureMode::Continue`], is recorded as `{"error": ...}` in its
//! slot while the remaining items still run. An item that is not a JSON
//! object fails on its own without reaching the gateway. An unknown or
//! missing operation always aborts: it describes a broken batch, not a
//! failed item.

use ibkr_broker::Gateway;
use serde::Serialize;
use serde_json::Value;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::error::{BatchError, ItemError};
use crate::operation::{OperationKind, OperationOutput, UnknownOperation};
use crate::params::value_kind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    #[default]
    Abort,
    Continue,
}

impl FailureMode {
    pub const fn from_continue_on_fail(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            Self::Continue
        } else {
            Self::Abort
        }
    }
}

/// Lifecycle of a single item. Items start `Pending`, are `Dispatched` to
/// the gateway and end either `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    Dispatched,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordPayload {
    Output(OperationOutput),
    Error { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One output slot, paired with the index of the input item it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    pub json: RecordPayload,
    pub paired_item: PairedItem,
}

impl BatchRecord {
    fn success(index: usize, output: OperationOutput) -> Self {
        Self {
            json: RecordPayload::Output(output),
            paired_item: PairedItem { item: index },
        }
    }

    fn failure(index: usize, error: &ItemError) -> Self {
        Self {
            json: RecordPayload::Error {
                error: error.to_string(),
            },
            paired_item: PairedItem { item: index },
        }
    }

    pub const fn state(&self) -> ItemState {
        match self.json {
            RecordPayload::Output(_) => ItemState::Succeeded,
            RecordPayload::Error { .. } => ItemState::Failed,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.json {
            RecordPayload::Error { error } => Some(error),
            RecordPayload::Output(_) => None,
        }
    }

    pub const fn output(&self) -> Option<&OperationOutput> {
        match &self.json {
            RecordPayload::Output(output) => Some(output),
            RecordPayload::Error { .. } => None,
        }
    }
}

pub struct BatchRunner<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
    failure_mode: FailureMode,
    default_operation: Option<OperationKind>,
}

impl<'a, G: Gateway + ?Sized> BatchRunner<'a, G> {
    pub const fn new(gateway: &'a G, failure_mode: FailureMode) -> Self {
        Self {
            gateway,
            failure_mode,
            default_operation: None,
        }
    }

    /// Operation for items that don't name one.
    #[must_use]
    pub const fn with_default_operation(mut self, operation: Option<OperationKind>) -> Self {
        self.default_operation = operation;
        self
    }

    pub async fn run(&self, items: &[Value]) -> Result<Vec<BatchRecord>, BatchError> {
        let mut records = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            debug!(index, state = ?ItemState::Pending, "Item queued");

            let outcome = if item.is_object() {
                let operation = self.operation_for(index, item)?;

                async {
                    debug!(state = ?ItemState::Dispatched, "Dispatching to gateway");
                    operation.execute(self.gateway, item).await
                }
                .instrument(info_span!("batch_item", index, %operation))
                .await
            } else {
                Err(ItemError::NotAnObject(value_kind(item)))
            };

            match outcome {
                Ok(output) => {
                    debug!(index, state = ?ItemState::Succeeded, "Item completed");
                    records.push(BatchRecord::success(index, output));
                }
                Err(e) => match self.failure_mode {
                    FailureMode::Continue => {
                        warn!(index, state = ?ItemState::Failed, "Item failed, continuing: {e}");
                        records.push(BatchRecord::failure(index, &e));
                    }
                    FailureMode::Abort => {
                        error!(index, state = ?ItemState::Failed, "Item failed, aborting batch: {e}");
                        return Err(BatchError::ItemFailed { index, source: e });
                    }
                },
            }
        }

        let failed = records
            .iter()
            .filter(|record| record.state() == ItemState::Failed)
            .count();
        info!("Batch finished: {} items, {failed} failed", records.len());

        Ok(records)
    }

    fn operation_for(&self, index: usize, item: &Value) -> Result<OperationKind, BatchError> {
        match item.get("operation") {
            Some(Value::String(name)) => Ok(name.parse()?),
            None | Some(Value::Null) => self
                .default_operation
                .ok_or(BatchError::MissingOperation { index }),
            Some(other) => Err(UnknownOperation(other.to_string()).into()),
        }
    }
}
