//! CloudWatch Logs subscription envelope.
//!
//! The trigger delivers `{"awslogs":{"data":"<base64>"}}` where the base64
//! text is a gzip-compressed JSON document describing one [`LogBatch`].

use crate::domain::LogBatch;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Subscription event carries no awslogs.data payload")]
    MissingData,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to decompress payload: {0}")]
    Decompress(#[source] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SubscriptionEvent {
    #[serde(default)]
    awslogs: Option<AwsLogs>,
}

#[derive(Debug, Deserialize)]
struct AwsLogs {
    #[serde(default)]
    data: Option<String>,
}

pub fn decode_subscription_event(raw: &str) -> Result<LogBatch, EnvelopeError> {
    let event: SubscriptionEvent = serde_json::from_str(raw)?;
    let data = event
        .awslogs
        .and_then(|logs| logs.data)
        .filter(|data| !data.trim().is_empty())
        .ok_or(EnvelopeError::MissingData)?;

    let compressed = STANDARD.decode(data.trim())?;
    decode_payload(&compressed)
}

/// Gunzip and deserialize the inner document.
pub fn decode_payload(compressed: &[u8]) -> Result<LogBatch, EnvelopeError> {
    let mut json = Vec::new();
    GzDecoder::new(compressed)
        .read_to_end(&mut json)
        .map_err(EnvelopeError::Decompress)?;
    Ok(serde_json::from_slice(&json)?)
}
