use super::value::Fields;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Reserved top-level key holding the CloudWatch metadata block.
pub const RESERVED_KEY: &str = "cloudwatch";
/// Prefix of keys that would collide with the metadata block once flattened.
pub const RESERVED_PREFIX: &str = "cloudwatch.";
/// Timestamp key understood by the ingestion backend.
pub const TIMESTAMP_FIELD: &str = "_time";

/// Returns true when a payload key must not reach the top level of an event.
pub fn is_reserved_key(key: &str) -> bool {
    key == RESERVED_KEY || key.starts_with(RESERVED_PREFIX)
}

/// The `cloudwatch` block attached to every normalized event.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CloudwatchMetadata {
    pub id: String,
    pub group: String,
    pub stream: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub format: String,
}

/// A fully normalized event, ready for ingestion.
///
/// Serializes as one flat JSON object: the payload fields, the `cloudwatch`
/// block and the `_time` timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub fields: Fields,
    pub cloudwatch: CloudwatchMetadata,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl NormalizedEvent {
    pub fn field(&self, key: &str) -> Option<&super::FieldValue> {
        self.fields.get(key)
    }
}

impl Serialize for NormalizedEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        for (key, value) in &self.fields {
            if is_reserved_key(key) || key == TIMESTAMP_FIELD {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(RESERVED_KEY, &self.cloudwatch)?;
        map.serialize_entry(TIMESTAMP_FIELD, &self.timestamp)?;
        map.end()
    }
}
