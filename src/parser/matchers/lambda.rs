//! Lambda lifecycle line matcher (`START`, `END`, `REPORT`).

use super::{FormatTag, GenericMatcher, MatchResult, Matcher};
use crate::domain::{FieldValue, Fields};
use crate::parser::named_groups::{NamedCaptures, extract_named_groups};
use crate::parser::regex_patterns::{PATTERNS, pattern_name};

const FLOAT_FIELDS: &[&str] = &["duration_ms"];
const INTEGER_FIELDS: &[&str] = &["duration_billed_ms", "memory_size_mb", "memory_size_max_mb"];

/// Matcher for output of the Lambda runtime itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleMatcher {
    fallback: GenericMatcher,
}

impl LifecycleMatcher {
    pub fn new(fallback: GenericMatcher) -> Self {
        Self { fallback }
    }

    fn extract(pattern: &str, message: &str) -> Option<NamedCaptures> {
        let regex = PATTERNS.get_by_name(pattern).ok()?;
        extract_named_groups(regex, pattern, message).ok()
    }

    fn lifecycle_line(pattern: &str, line_type: &str, message: &str) -> MatchResult {
        let Some(groups) = Self::extract(pattern, message) else {
            return MatchResult::raw_message(message);
        };

        let mut fields: Fields = groups
            .into_iter()
            .map(|(k, v)| (k, FieldValue::String(v)))
            .collect();
        fields.insert("type".to_string(), FieldValue::from(line_type));
        MatchResult::new(fields, FormatTag::LambdaInfo)
    }

    fn report_line(message: &str) -> MatchResult {
        Self::extract(pattern_name::LAMBDA_REPORT, message)
            .and_then(coerce_report)
            .map(|fields| MatchResult::new(fields, FormatTag::LambdaInfo))
            .unwrap_or_else(|| MatchResult::raw_message(message))
    }
}

/// Type the numeric REPORT fields. A single malformed number rejects the
/// whole line.
fn coerce_report(groups: NamedCaptures) -> Option<Fields> {
    let mut fields = Fields::new();
    for (key, raw) in groups {
        let value = if FLOAT_FIELDS.contains(&key.as_str()) {
            let parsed = raw.parse::<f64>().ok().filter(|n| n.is_finite())?;
            FieldValue::Float(parsed)
        } else if INTEGER_FIELDS.contains(&key.as_str()) {
            FieldValue::Integer(raw.parse::<i64>().ok()?)
        } else {
            FieldValue::String(raw)
        };
        fields.insert(key, value);
    }
    fields.insert("type".to_string(), FieldValue::from("report"));
    Some(fields)
}

impl Matcher for LifecycleMatcher {
    fn name(&self) -> &'static str {
        "lambda"
    }

    fn match_message(&self, message: &str) -> MatchResult {
        if message.starts_with("START") {
            Self::lifecycle_line(pattern_name::LAMBDA_START, "start", message)
        } else if message.starts_with("END") {
            Self::lifecycle_line(pattern_name::LAMBDA_END, "end", message)
        } else if message.starts_with("REPORT") {
            Self::report_line(message)
        } else {
            self.fallback.match_message(message)
        }
    }
}
