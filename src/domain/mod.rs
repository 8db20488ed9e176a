//! Domain layer for cloudwatch-log-forwarder.
//!
//! Contains the canonical types shared across all modules:
//! - `LogBatch` / `RawLogLine`: decoded subscription input
//! - `FieldValue` / `Fields`: dynamically-typed field bags
//! - `NormalizedEvent`: the pipeline's output
//! - `ForwarderError`: Top-level error type

pub mod error;
pub mod event;
pub mod log_batch;
pub mod value;

pub use error::ForwarderError;
pub use event::{CloudwatchMetadata, NormalizedEvent, RESERVED_KEY, TIMESTAMP_FIELD};
pub use log_batch::{LogBatch, LogBatchMetadata, RawLogLine};
pub use value::{FieldValue, Fields};
