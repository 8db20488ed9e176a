//! Format matchers, one per producing service.
//!
//! - Lifecycle matcher for Lambda `START` / `END` / `REPORT` lines
//! - Container matcher for EKS container output
//! - Generic JSON-first matcher, also the terminal fallback of the others

mod eks;
mod generic;
mod lambda;

use super::service_group::{Service, ServiceIdentity};
use crate::domain::{FieldValue, Fields};
use serde::Serialize;
use std::fmt;

pub use eks::ContainerMatcher;
pub use generic::GenericMatcher;
pub use lambda::LifecycleMatcher;

/// How a line's payload was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    LambdaInfo,
    Json,
    Unknown,
}

impl FormatTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::LambdaInfo => "lambda_info",
            FormatTag::Json => "json",
            FormatTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from one message plus the format they were found in.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub fields: Fields,
    pub format: FormatTag,
}

impl MatchResult {
    pub fn new(fields: Fields, format: FormatTag) -> Self {
        Self { fields, format }
    }

    /// Wrap an unparsed line as `{"message": <line>}`.
    pub fn raw_message(message: &str) -> Self {
        let mut fields = Fields::new();
        fields.insert("message".to_string(), FieldValue::from(message));
        Self::new(fields, FormatTag::Unknown)
    }
}

/// Options shared by every matcher of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Levels of nested JSON objects kept structured; deeper containers are
    /// rendered as JSON text. `None` keeps payloads as decoded.
    pub max_json_depth: Option<u8>,
}

/// Matches one raw message string.
pub trait Matcher {
    /// Short identifier of the matcher (e.g. "lambda", "eks", "generic").
    fn name(&self) -> &'static str;

    /// Classify and extract a single message. Never fails: unrecognised
    /// input comes back as a raw `message` field.
    fn match_message(&self, message: &str) -> MatchResult;
}

/// Which matcher handles a given service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherKind {
    Lambda,
    Eks,
    Generic,
}

impl MatcherKind {
    pub fn for_service(service: Option<Service>) -> Self {
        match service {
            Some(Service::Lambda) => MatcherKind::Lambda,
            Some(Service::Eks) => MatcherKind::Eks,
            Some(Service::ApiGateway | Service::Rds) | None => MatcherKind::Generic,
        }
    }
}

/// The matcher selected for one batch.
#[derive(Debug, Clone)]
pub enum BatchMatcher {
    Lambda(LifecycleMatcher),
    Eks(ContainerMatcher),
    Generic(GenericMatcher),
}

impl BatchMatcher {
    pub fn for_identity(identity: &ServiceIdentity, options: MatcherOptions) -> Self {
        let generic = GenericMatcher::new(options.max_json_depth);
        match MatcherKind::for_service(identity.service) {
            MatcherKind::Lambda => BatchMatcher::Lambda(LifecycleMatcher::new(generic)),
            MatcherKind::Eks => BatchMatcher::Eks(ContainerMatcher::new(&identity.group, generic)),
            MatcherKind::Generic => BatchMatcher::Generic(generic),
        }
    }

    pub fn kind(&self) -> MatcherKind {
        match self {
            BatchMatcher::Lambda(_) => MatcherKind::Lambda,
            BatchMatcher::Eks(_) => MatcherKind::Eks,
            BatchMatcher::Generic(_) => MatcherKind::Generic,
        }
    }
}

impl Matcher for BatchMatcher {
    fn name(&self) -> &'static str {
        match self {
            BatchMatcher::Lambda(m) => m.name(),
            BatchMatcher::Eks(m) => m.name(),
            BatchMatcher::Generic(m) => m.name(),
        }
    }

    fn match_message(&self, message: &str) -> MatchResult {
        match self {
            BatchMatcher::Lambda(m) => m.match_message(message),
            BatchMatcher::Eks(m) => m.match_message(message),
            BatchMatcher::Generic(m) => m.match_message(message),
        }
    }
}
