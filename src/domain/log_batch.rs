use serde::{Deserialize, Serialize};

/// One physical log line of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLogLine {
    pub id: String,
    /// Opaque text, possibly JSON.
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl RawLogLine {
    pub fn new(id: impl Into<String>, message: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            timestamp,
        }
    }
}

/// Metadata shared by every line of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBatchMetadata {
    pub log_group: String,
    pub log_stream: String,
    pub message_type: String,
    pub owner: String,
    #[serde(default)]
    pub subscription_filters: Vec<String>,
}

/// A decoded CloudWatch Logs subscription payload.
///
/// Field names follow the wire format, so a gunzipped payload deserializes
/// directly into this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBatch {
    #[serde(flatten)]
    pub metadata: LogBatchMetadata,
    #[serde(default)]
    pub log_events: Vec<RawLogLine>,
}

impl LogBatch {
    pub fn new(metadata: LogBatchMetadata, log_events: Vec<RawLogLine>) -> Self {
        Self {
            metadata,
            log_events,
        }
    }

    pub fn len(&self) -> usize {
        self.log_events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log_events.is_empty()
    }
}
