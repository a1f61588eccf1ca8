//! End-to-end routing against a mocked OpenAI-compatible endpoint

use generation_sdk::config::MemoryConfigProvider;
use generation_sdk::openai::OpenAIClient;
use generation_sdk::ServiceError;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{AppConfig, FeedbackRouter, RouterError, Sentiment, TemplateId};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-feedback",
        "object": "chat.completion",
        "created": 1677858242,
        "model": "gpt-3.5-turbo",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    }))
}

fn config_for(server: &MockServer, extra: &[(&str, &str)]) -> AppConfig {
    let mut provider = MemoryConfigProvider::new();
    provider.set("openai_api_key", "sk-feedback-test");
    provider.set("openai_base_url", server.uri());
    provider.set("openai_timeout_seconds", "2");
    provider.set("openai_max_retries", "0");
    for (key, value) in extra {
        provider.set(*key, *value);
    }
    AppConfig::from_provider(&provider).unwrap()
}

fn router_for(config: &AppConfig) -> FeedbackRouter {
    let client = OpenAIClient::builder()
        .config(config.openai.clone())
        .build()
        .unwrap();
    FeedbackRouter::from_config(config, client)
}

#[tokio::test]
async fn test_delegated_sentiment_then_rendered_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-feedback-test"))
        .and(body_string_contains("Classify the sentiment"))
        .respond_with(completion(" Positive. "))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("positive experience with the airline"))
        .respond_with(completion("Thank you for flying with us!\n"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("sentiment_mode", "delegated")]);
    let router = router_for(&config);

    let response = router.route("Lovely crew and on time").await.unwrap();

    assert_eq!(response.sentiment, Sentiment::Positive);
    assert_eq!(response.template, TemplateId::Positive);
    assert_eq!(response.text, "Thank you for flying with us!");
}

#[tokio::test]
async fn test_provider_outage_is_generation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "message": "Service unavailable", "type": "server_error" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[]);
    let router = router_for(&config);

    match router.route("My flight was delayed due to a snowstorm").await {
        Err(RouterError::Generation(cause)) => {
            assert!(matches!(cause.root(), ServiceError::Service(_)));
            assert_eq!(cause.status_code(), Some(503));
        }
        other => panic!("expected generation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_credential_is_generation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, &[("openai_max_retries", "3")]);
    let router = router_for(&config);

    let err = router.route("great flight").await.unwrap_err();
    match err {
        RouterError::Generation(cause) => {
            assert!(matches!(cause.root(), ServiceError::Authentication(_)))
        }
        other => panic!("expected generation error, got {:?}", other),
    }
}
