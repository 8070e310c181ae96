use llm::{AiRelay, GenerationSettings, GoogleProvider, LlmError, LlmProvider, LlmRequest, RelayOutcome};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn provider_for(server: &Server) -> GoogleProvider {
    GoogleProvider::new("test-key".to_string(), "gemini-pro".to_string())
        .expect("provider should build")
        .with_timeout(Duration::from_secs(5))
        .expect("client should rebuild")
        .with_base_url(server.url())
}

#[tokio::test]
async fn test_generate_content_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1beta/models/gemini-pro:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": { "maxOutputTokens": 200 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [{"text": "Alice closed "}, {"text": "$120,000."}],
                        "role": "model"
                    },
                    "finishReason": "STOP",
                    "index": 0
                }],
                "usageMetadata": {
                    "promptTokenCount": 5,
                    "candidatesTokenCount": 9,
                    "totalTokenCount": 14
                }
            }"#,
        )
        .create_async()
        .await;

    let provider = provider_for(&server);
    let response = provider
        .complete(LlmRequest::new("Who closed the most?").with_parameters(Some(200), Some(0.5)))
        .await
        .expect("completion should succeed");

    assert_eq!(response.content, "Alice closed $120,000.");
    assert_eq!(response.usage.total_tokens, 14);
    assert_eq!(response.finish_reason, "stop");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_is_typed() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/v1beta/models/gemini-pro:generateContent")
        .with_status(403)
        .with_body(r#"{"error": {"message": "API key not valid"}}"#)
        .create_async()
        .await;

    let provider = provider_for(&server);
    let err = provider
        .complete(LlmRequest::new("hello"))
        .await
        .unwrap_err();

    match err {
        LlmError::Http { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("API key not valid"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_blocked_prompt_is_empty_response() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/v1beta/models/gemini-pro:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
        .create_async()
        .await;

    let err = provider_for(&server)
        .complete(LlmRequest::new("hello"))
        .await
        .unwrap_err();
    assert_eq!(err, LlmError::EmptyResponse("SAFETY".to_string()));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/v1beta/models/gemini-pro:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let err = provider_for(&server)
        .complete(LlmRequest::new("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_count_tokens() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1beta/models/gemini-pro:countTokens")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"totalTokens": 3}"#)
        .create_async()
        .await;

    let tokens = provider_for(&server).count_tokens("ping").await.unwrap();
    assert_eq!(tokens, 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let provider = GoogleProvider::new("test-key".to_string(), "gemini-pro".to_string())
        .unwrap()
        .with_base_url("http://127.0.0.1:1");

    let err = provider.count_tokens("ping").await.unwrap_err();
    assert!(
        matches!(err, LlmError::Network(_) | LlmError::Timeout(_)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_relay_end_to_end_against_mock() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1beta/models/gemini-pro:generateContent")
        .match_body(Matcher::Regex("Bruno Silva".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Bruno works in Europe."}]}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let relay = AiRelay::new(
        Some(Arc::new(provider_for(&server))),
        "Bruno Silva - Account Manager, Europe",
        GenerationSettings::default(),
    );

    let outcome = relay.answer("Where does Bruno work?").await;
    assert_eq!(
        outcome,
        RelayOutcome::Answered("Bruno works in Europe.".to_string())
    );

    // a blank question never reaches the server, so the call count stays at one
    assert_eq!(relay.answer("  ").await, RelayOutcome::EmptyQuestion);
    mock.assert_async().await;
}
