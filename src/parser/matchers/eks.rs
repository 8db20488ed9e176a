//! EKS container output matcher.

use super::{GenericMatcher, MatchResult, Matcher};
use crate::domain::FieldValue;

/// JSON-first matcher that tags every line with the application derived
/// from the log group.
#[derive(Debug, Clone)]
pub struct ContainerMatcher {
    app: String,
    inner: GenericMatcher,
}

impl ContainerMatcher {
    pub fn new(group: &str, inner: GenericMatcher) -> Self {
        Self {
            app: Self::derive_app(group).to_string(),
            inner,
        }
    }

    /// Drop the last hyphen-delimited segment: `my-app-prod` -> `my-app`.
    /// A group without hyphens is its own app name.
    pub fn derive_app(group: &str) -> &str {
        group.rsplit_once('-').map_or(group, |(app, _)| app)
    }

    pub fn app(&self) -> &str {
        &self.app
    }
}

impl Matcher for ContainerMatcher {
    fn name(&self) -> &'static str {
        "eks"
    }

    fn match_message(&self, message: &str) -> MatchResult {
        let mut result = self.inner.match_message(message);
        result
            .fields
            .insert("app".to_string(), FieldValue::from(self.app.as_str()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::matchers::FormatTag;

    #[test]
    fn test_derive_app() {
        assert_eq!(ContainerMatcher::derive_app("my-app-prod"), "my-app");
        assert_eq!(ContainerMatcher::derive_app("web-7d9f"), "web");
        assert_eq!(ContainerMatcher::derive_app("standalone"), "standalone");
        assert_eq!(ContainerMatcher::derive_app(""), "");
        assert_eq!(ContainerMatcher::derive_app("trailing-"), "trailing");
    }

    #[test]
    fn test_json_line_gets_app() {
        let matcher = ContainerMatcher::new("my-app-prod", GenericMatcher::default());

        let result = matcher.match_message(r#"{"level":"info","msg":"ready"}"#);

        assert_eq!(result.format, FormatTag::Json);
        assert_eq!(result.fields["level"], FieldValue::from("info"));
        assert_eq!(result.fields["msg"], FieldValue::from("ready"));
        assert_eq!(result.fields["app"], FieldValue::from("my-app"));
    }

    #[test]
    fn test_raw_line_gets_app() {
        let matcher = ContainerMatcher::new("api-prod", GenericMatcher::default());

        let result = matcher.match_message("listening on :8080");

        assert_eq!(result.format, FormatTag::Unknown);
        assert_eq!(result.fields["message"], FieldValue::from("listening on :8080"));
        assert_eq!(result.fields["app"], FieldValue::from("api"));
        assert_eq!(result.fields.len(), 2);
    }
}
