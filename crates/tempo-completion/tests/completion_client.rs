//! Integration tests for the completion client using wiremock.
//!
//! Mock the OpenAI-compatible endpoint to verify request shape and error
//! handling without hitting a real API.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tempo_completion::{Completion, CompletionClient, CompletionError};
use tempo_core::config::LlmConfig;
use tempo_core::Turn;

fn client_for(server: &MockServer) -> CompletionClient {
    let config = LlmConfig {
        api_base: server.uri(),
        ..LlmConfig::default()
    };
    CompletionClient::new(config, "test-key".to_string()).unwrap()
}

#[tokio::test]
async fn test_complete_returns_reply_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "llama3-70b-8192",
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "Hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hi there!"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let reply = client.complete(&[], "Hello").await.unwrap();
    assert_eq!(reply, "Hi there!");
}

#[tokio::test]
async fn test_complete_sends_history_in_insertion_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system"},
                {"role": "assistant", "content": "What would you like to talk about?"},
                {"role": "user", "content": "Food."},
                {"role": "user", "content": "I like pasta."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Pasta is great!"}, "finish_reason": "stop"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let history = vec![
        Turn::assistant("What would you like to talk about?"),
        Turn::user("Food."),
    ];
    let client = client_for(&mock_server);
    let reply = client.complete(&history, "I like pasta.").await.unwrap();
    assert_eq!(reply, "Pasta is great!");
}

#[tokio::test]
async fn test_non_success_status_surfaces_upstream_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "invalid api key", "type": "invalid_request_error"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.complete(&[], "Hello").await.unwrap_err();
    match err {
        CompletionError::Upstream { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("expected Upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_success_without_error_body_uses_status_reason() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.complete(&[], "Hello").await.unwrap_err();
    match err {
        CompletionError::Upstream { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected Upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.complete(&[], "Hello").await.unwrap_err();
    assert!(matches!(err, CompletionError::Parse(_)));
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.complete(&[], "Hello").await.unwrap_err();
    assert!(matches!(err, CompletionError::EmptyChoices));
}

#[tokio::test]
async fn test_connection_failure_is_request_error() {
    // Bind-and-drop to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = LlmConfig {
        api_base: format!("http://{}", addr),
        ..LlmConfig::default()
    };
    let client = CompletionClient::new(config, "test-key".to_string()).unwrap();
    let err = client.complete(&[], "Hello").await.unwrap_err();
    assert!(matches!(err, CompletionError::Request(_)));
}
