//! Turns a decoded log batch into normalized events.
//!
//! For every line: build the `cloudwatch` metadata block, run the matcher
//! selected for the batch's service, namespace non-JSON output under the
//! service name and merge the result without touching reserved keys.

use crate::domain::event::is_reserved_key;
use crate::domain::{
    CloudwatchMetadata, FieldValue, Fields, LogBatch, LogBatchMetadata, NormalizedEvent,
    RawLogLine, TIMESTAMP_FIELD,
};
use crate::parser::{BatchMatcher, FormatTag, MatchResult, Matcher, MatcherOptions, ServiceIdentity};

/// Stateless normalizer; one instance can serve any number of batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventNormalizer {
    options: MatcherOptions,
}

impl EventNormalizer {
    pub fn new(options: MatcherOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> MatcherOptions {
        self.options
    }

    /// Normalize every line of `batch`, preserving order.
    pub fn normalize_batch(&self, batch: &LogBatch) -> Vec<NormalizedEvent> {
        let context = BatchContext::new(&batch.metadata, self.options);
        batch
            .log_events
            .iter()
            .map(|line| context.normalize_line(line))
            .collect()
    }
}

/// Per-batch state: the resolved identity and the matcher chosen for it.
#[derive(Debug, Clone)]
pub struct BatchContext<'a> {
    metadata: &'a LogBatchMetadata,
    identity: ServiceIdentity,
    matcher: BatchMatcher,
}

impl<'a> BatchContext<'a> {
    pub fn new(metadata: &'a LogBatchMetadata, options: MatcherOptions) -> Self {
        let identity = ServiceIdentity::from_log_group(&metadata.log_group);
        let matcher = BatchMatcher::for_identity(&identity, options);
        Self {
            metadata,
            identity,
            matcher,
        }
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn normalize_line(&self, line: &RawLogLine) -> NormalizedEvent {
        let MatchResult { fields, format } = self.matcher.match_message(&line.message);

        let mut cloudwatch = CloudwatchMetadata {
            id: line.id.clone(),
            group: self.metadata.log_group.clone(),
            stream: self.metadata.log_stream.clone(),
            message_type: self.metadata.message_type.clone(),
            owner: self.metadata.owner.clone(),
            service: None,
            group_name: None,
            format: format.as_str().to_string(),
        };
        if self.identity.resolved() {
            cloudwatch.service = Some(self.identity.service_name().to_string());
            cloudwatch.group_name = Some(self.identity.group.clone());
        }

        let fields = namespace_fields(fields, format, self.identity.service_name());

        NormalizedEvent {
            fields: merge_fields(fields),
            cloudwatch,
            timestamp: line.timestamp,
        }
    }
}

/// Nest non-JSON matcher output one level down under the service name so
/// lifecycle and raw-text fields stay out of the top-level namespace.
pub fn namespace_fields(fields: Fields, format: FormatTag, service: &str) -> Fields {
    if format == FormatTag::Json || service.is_empty() {
        return fields;
    }
    let mut wrapped = Fields::new();
    wrapped.insert(service.to_string(), FieldValue::Map(fields));
    wrapped
}

/// Drop keys that would clobber the metadata block or the event timestamp.
pub fn merge_fields(fields: Fields) -> Fields {
    fields
        .into_iter()
        .filter(|(key, _)| !is_reserved_key(key) && key != TIMESTAMP_FIELD)
        .collect()
}
