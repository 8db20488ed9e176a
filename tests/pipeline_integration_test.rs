use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cloudwatch_log_forwarder::app::{Config, build_driver, decode_subscription_event};
use cloudwatch_log_forwarder::domain::ForwarderError;
use flate2::{Compression, write::GzEncoder};
use serde_json::{Value, json};
use std::io::Write;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn subscription_event(payload: &Value) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(payload.to_string().as_bytes())
        .unwrap();
    let data = STANDARD.encode(encoder.finish().unwrap());
    json!({"awslogs": {"data": data}}).to_string()
}

fn eks_payload() -> Value {
    json!({
        "messageType": "DATA_MESSAGE",
        "owner": "123456789012",
        "logGroup": "/aws/eks/payments-prod",
        "logStream": "kube-apiserver-audit",
        "subscriptionFilters": ["axiom"],
        "logEvents": [
            {"id": "e1", "timestamp": 1_700_000_000_001i64, "message": "{\"level\":\"info\",\"msg\":\"ready\"}"},
            {"id": "e2", "timestamp": 1_700_000_000_002i64, "message": "plain output"}
        ]
    })
}

fn config_for(server: &MockServer) -> Config {
    Config {
        dataset: "cloudwatch".to_string(),
        url: server.uri(),
        token: Some("xaat-test".to_string()),
        ..Config::default()
    }
}

#[test]
fn test_envelope_fixture_decodes() {
    let batch = decode_subscription_event(&subscription_event(&eks_payload())).unwrap();

    assert_eq!(batch.metadata.log_group, "/aws/eks/payments-prod");
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.log_events[1].message, "plain output");
}

#[tokio::test]
async fn test_subscription_event_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/datasets/cloudwatch/ingest"))
        .and(header("authorization", "Bearer xaat-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ingested": 2,
            "failed": 0,
            "failures": [],
            "processedBytes": 600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let driver = build_driver(&config_for(&mock_server)).unwrap();
    let status = driver
        .handle_subscription_event(&subscription_event(&eks_payload()))
        .await
        .unwrap();

    assert_eq!(status.ingested, 2);

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body[0],
        json!({
            "level": "info",
            "msg": "ready",
            "app": "payments",
            "cloudwatch": {
                "id": "e1",
                "group": "/aws/eks/payments-prod",
                "stream": "kube-apiserver-audit",
                "type": "DATA_MESSAGE",
                "owner": "123456789012",
                "service": "eks",
                "group_name": "payments-prod",
                "format": "json"
            },
            "_time": 1_700_000_000_001i64
        })
    );
    assert_eq!(
        body[1]["eks"],
        json!({"message": "plain output", "app": "payments"})
    );
}

#[tokio::test]
async fn test_partial_failures_are_reported_not_raised() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ingested": 1,
            "failed": 1,
            "failures": [{"timestamp": "2023-11-14T22:13:20.002Z", "error": "invalid field"}],
            "processedBytes": 300
        })))
        .mount(&mock_server)
        .await;

    let driver = build_driver(&config_for(&mock_server)).unwrap();
    let status = driver
        .handle_subscription_event(&subscription_event(&eks_payload()))
        .await
        .unwrap();

    assert_eq!(status.failed, 1);
    assert_eq!(status.failures[0].error, "invalid field");
}

#[tokio::test]
async fn test_forward_lines() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ingested": 2,
            "failed": 0
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut empty = eks_payload();
    empty["logEvents"] = json!([]);
    let input = format!(
        "{}\n\n{}\n{}\n",
        subscription_event(&eks_payload()),
        subscription_event(&empty),
        subscription_event(&eks_payload())
    );

    let driver = build_driver(&config_for(&mock_server)).unwrap();
    let handled = driver.forward_lines(input.as_bytes()).await.unwrap();

    assert_eq!(handled, 3);
    assert_eq!(driver.client().connection_stats().events_sent, 4);
}

#[tokio::test]
async fn test_rejected_ingest_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let input = format!(
        "{}\n{}\n",
        subscription_event(&eks_payload()),
        subscription_event(&eks_payload())
    );

    let driver = build_driver(&config_for(&mock_server)).unwrap();
    let error = driver.forward_lines(input.as_bytes()).await.unwrap_err();

    assert!(matches!(error, ForwarderError::Ingest(_)));
    assert!(!error.is_retryable());
}
