pub mod matchers;
pub mod named_groups;
pub mod regex_error;
pub mod regex_patterns;
pub mod service_group;

pub use matchers::{
    BatchMatcher, ContainerMatcher, FormatTag, GenericMatcher, LifecycleMatcher, MatchResult,
    Matcher, MatcherKind, MatcherOptions,
};
pub use named_groups::{NamedCaptures, extract_named_groups};
pub use regex_error::RegexError;
pub use service_group::{Service, ServiceIdentity};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _generic = GenericMatcher::default();
        let _lambda = LifecycleMatcher::default();
        let _eks = ContainerMatcher::new("app-prod", GenericMatcher::default());
        let _identity = ServiceIdentity::unresolved();
    }
}
