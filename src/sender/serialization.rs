use crate::domain::NormalizedEvent;
use flate2::{Compression, write::GzEncoder};
use std::io::Write;
use thiserror::Error;

/// Content type of every ingest body: one JSON array of events.
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Rough per-event size used to pre-size the output buffer
const ESTIMATED_EVENT_SIZE: usize = 512;
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024; // 16MB

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON serialization failed: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error during serialization: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Batch is empty")]
    EmptyBatch,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSerializer;

impl BatchSerializer {
    pub fn new() -> Self {
        Self
    }

    pub fn serialize_json_array(
        &self,
        events: &[NormalizedEvent],
    ) -> Result<Vec<u8>, SerializationError> {
        if events.is_empty() {
            return Err(SerializationError::EmptyBatch);
        }

        let mut buffer = Vec::with_capacity(Self::estimate_serialized_size(events));
        serde_json::to_writer(&mut buffer, events)?;
        Ok(buffer)
    }

    /// Gzip-compressed JSON array.
    pub fn serialize_compressed(
        &self,
        events: &[NormalizedEvent],
    ) -> Result<Vec<u8>, SerializationError> {
        let data = self.serialize_json_array(events)?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(&data)?;
        let compressed = encoder.finish()?;

        Ok(compressed)
    }

    pub fn estimate_serialized_size(events: &[NormalizedEvent]) -> usize {
        events
            .len()
            .saturating_mul(ESTIMATED_EVENT_SIZE)
            .min(MAX_PREALLOCATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CloudwatchMetadata, FieldValue, Fields};
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn event(id: &str) -> NormalizedEvent {
        let mut fields = Fields::new();
        fields.insert("message".to_string(), FieldValue::from("hello"));
        NormalizedEvent {
            fields,
            cloudwatch: CloudwatchMetadata {
                id: id.to_string(),
                format: "unknown".to_string(),
                ..CloudwatchMetadata::default()
            },
            timestamp: 42,
        }
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let serializer = BatchSerializer::new();
        assert!(matches!(
            serializer.serialize_json_array(&[]),
            Err(SerializationError::EmptyBatch)
        ));
        assert!(matches!(
            serializer.serialize_compressed(&[]),
            Err(SerializationError::EmptyBatch)
        ));
    }

    #[test]
    fn test_json_array() {
        let bytes = BatchSerializer::new()
            .serialize_json_array(&[event("1"), event("2")])
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["cloudwatch"]["id"], "2");
        assert_eq!(items[0]["_time"], 42);
    }

    #[test]
    fn test_single_event_is_still_an_array() {
        let bytes = BatchSerializer::new()
            .serialize_json_array(&[event("1")])
            .unwrap();

        assert_eq!(bytes.first(), Some(&b'['));
        assert_eq!(bytes.last(), Some(&b']'));
    }

    #[test]
    fn test_compressed_matches_plain_after_gunzip() {
        let serializer = BatchSerializer::new();
        let plain = serializer.serialize_json_array(&[event("1")]).unwrap();
        let compressed = serializer.serialize_compressed(&[event("1")]).unwrap();

        let mut decoded = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, plain);
    }
}
