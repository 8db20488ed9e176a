use cloudwatch_log_forwarder::domain::{
    FieldValue, LogBatch, LogBatchMetadata, RESERVED_KEY, RawLogLine, TIMESTAMP_FIELD,
};
use cloudwatch_log_forwarder::normalizer::EventNormalizer;
use cloudwatch_log_forwarder::parser::{
    ContainerMatcher, FormatTag, GenericMatcher, MatchResult, Matcher, Service, ServiceIdentity,
};
use proptest::prelude::*;

fn service_strategy() -> impl Strategy<Value = Service> {
    prop_oneof![
        Just(Service::Lambda),
        Just(Service::ApiGateway),
        Just(Service::Rds),
        Just(Service::Eks),
    ]
}

fn normalize_one(log_group: &str, message: &str) -> serde_json::Value {
    let batch = LogBatch::new(
        LogBatchMetadata {
            log_group: log_group.to_string(),
            log_stream: "stream".to_string(),
            message_type: "DATA_MESSAGE".to_string(),
            owner: "1".to_string(),
            subscription_filters: vec![],
        },
        vec![RawLogLine::new("id", message, 7)],
    );
    let events = EventNormalizer::default().normalize_batch(&batch);
    serde_json::to_value(&events[0]).unwrap()
}

proptest! {
    #[test]
    fn prop_resolver_recovers_service_and_group(
        service in service_strategy(),
        group in "[a-zA-Z0-9_./-]{0,40}",
    ) {
        let identity = ServiceIdentity::from_log_group(&format!("/aws/{service}/{group}"));

        prop_assert_eq!(identity.service, Some(service));
        prop_assert_eq!(identity.group, group);
    }

    #[test]
    fn prop_other_prefixes_are_unresolved(path in "/(ecs|aws/ecs|aws/lambdas|var)/[a-z0-9-]{0,20}") {
        let identity = ServiceIdentity::from_log_group(&path);

        prop_assert!(!identity.resolved());
        prop_assert_eq!(identity.service_name(), "");
    }

    #[test]
    fn prop_non_json_text_is_wrapped_verbatim(text in "[a-zA-Z ][^{}]{0,80}") {
        let result = GenericMatcher::default().match_message(&text);

        prop_assert_eq!(result, MatchResult::raw_message(&text));
    }

    #[test]
    fn prop_container_matcher_always_sets_app(
        app in "[a-z]{1,10}",
        suffix in "[a-z0-9]{1,6}",
        text in "[^{]{0,40}",
    ) {
        let matcher = ContainerMatcher::new(&format!("{app}-{suffix}"), GenericMatcher::default());

        let result = matcher.match_message(&text);

        prop_assert_eq!(result.format, FormatTag::Unknown);
        prop_assert_eq!(&result.fields["app"], &FieldValue::from(app.as_str()));
    }

    #[test]
    fn prop_reserved_keys_never_leak(suffix in "[a-z_]{0,10}", value in "[a-z]{0,10}") {
        let key = if suffix.is_empty() {
            RESERVED_KEY.to_string()
        } else {
            format!("{RESERVED_KEY}.{suffix}")
        };
        let mut payload = serde_json::Map::new();
        payload.insert(key.clone(), serde_json::Value::String(value));
        payload.insert(TIMESTAMP_FIELD.to_string(), serde_json::json!("spoofed"));
        let message = serde_json::Value::Object(payload).to_string();

        let event = normalize_one("/ecs/worker", &message);

        prop_assert!(event.get(&key).is_none() || key == RESERVED_KEY);
        prop_assert_eq!(&event[RESERVED_KEY]["id"], &serde_json::json!("id"));
        prop_assert_eq!(&event[TIMESTAMP_FIELD], &serde_json::json!(7));
    }

    #[test]
    fn prop_non_json_output_is_namespaced(
        service in prop_oneof![Just(Service::ApiGateway), Just(Service::Rds)],
        text in "[a-zA-Z][^{}]{0,40}",
    ) {
        let event = normalize_one(&format!("/aws/{service}/group"), &text);
        let name = service.as_str();

        prop_assert_eq!(&event[name]["message"], &serde_json::json!(text));
        prop_assert!(event.get("message").is_none());
        prop_assert_eq!(&event["cloudwatch"]["format"], &serde_json::json!("unknown"));
    }
}
