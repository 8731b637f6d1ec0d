pub mod batch;
pub mod cli;
pub mod env;
pub mod error;
pub mod operation;
pub mod params;
mod telemetry;

#[cfg(test)]
pub mod test_utils;

pub use batch::{BatchRecord, BatchRunner, FailureMode, ItemState, PairedItem, RecordPayload};
pub use env::{Env, LogLevel, setup_tracing};
pub use error::{BatchError, ItemError};
pub use operation::{OperationKind, OperationOutput, UnknownOperation, place_order};
pub use params::OrderParams;
pub use telemetry::{TelemetryError, TelemetryGuard};
