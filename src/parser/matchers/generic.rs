//! JSON-first matcher with raw-text fallback.

use super::{FormatTag, MatchResult, Matcher};
use crate::domain::value::fields_from_object;
use crate::domain::{FieldValue, Fields};
use serde_json::Value;

/// Decodes JSON objects; anything else is kept as a raw `message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericMatcher {
    max_json_depth: Option<u8>,
}

impl GenericMatcher {
    pub fn new(max_json_depth: Option<u8>) -> Self {
        Self { max_json_depth }
    }

    /// Decode `message` as a JSON object, applying the depth limit if any.
    pub fn decode_object(&self, message: &str) -> Option<Fields> {
        let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(message) else {
            return None;
        };
        let fields = fields_from_object(obj);

        Some(match self.max_json_depth {
            Some(depth) => shrink_fields(fields, depth),
            None => fields,
        })
    }
}

impl Matcher for GenericMatcher {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn match_message(&self, message: &str) -> MatchResult {
        match self.decode_object(message) {
            Some(fields) => MatchResult::new(fields, FormatTag::Json),
            None => MatchResult::raw_message(message),
        }
    }
}

/// Keep `max_depth` levels of containers structured (the top-level object
/// counts as the first); deeper objects and lists become compact JSON text.
pub fn shrink_fields(fields: Fields, max_depth: u8) -> Fields {
    let remaining = max_depth.saturating_sub(1);
    fields
        .into_iter()
        .map(|(key, value)| (key, shrink_value(value, remaining)))
        .collect()
}

fn shrink_value(value: FieldValue, remaining: u8) -> FieldValue {
    match value {
        FieldValue::Map(_) | FieldValue::List(_) if remaining == 0 => {
            FieldValue::String(value.to_json_string())
        }
        FieldValue::Map(map) => FieldValue::Map(
            map.into_iter()
                .map(|(k, v)| (k, shrink_value(v, remaining - 1)))
                .collect(),
        ),
        FieldValue::List(items) => FieldValue::List(
            items
                .into_iter()
                .map(|v| shrink_value(v, remaining - 1))
                .collect(),
        ),
        scalar => scalar,
    }
}
