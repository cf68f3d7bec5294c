use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use typewire::{CompletionError, ModelParams, OllamaProvider, OpenAiProvider, Provider, Turn};

fn prompt_turns() -> Vec<Turn> {
    vec![
        Turn::system("You are a test system prompt"),
        Turn::user("approve the party"),
    ]
}

#[tokio::test]
async fn openai_posts_exact_chat_completion_body() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "model": "gpt-4o",
        "messages": [
            {"role": "system", "content": "You are a test system prompt"},
            {"role": "user", "content": "approve the party"}
        ],
        "temperature": 0.0,
        "max_tokens": 1024
    });

    let response_body = json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-4o-2024-08-06",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "{\"vote\": \"approve\"}"}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", Some(&server.uri()));
    let reply = provider
        .complete(&prompt_turns(), &ModelParams::new("gpt-4o"), None)
        .await
        .unwrap();

    assert_eq!(reply.text, "{\"vote\": \"approve\"}");
    assert_eq!(reply.prompt_tokens, Some(42));
    assert_eq!(reply.completion_tokens, Some(7));
    assert_eq!(reply.total_tokens(), Some(49));
    assert_eq!(reply.model.as_deref(), Some("gpt-4o-2024-08-06"));
    server.verify().await;
}

#[tokio::test]
async fn openai_reasoning_model_swaps_token_budget_field() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "model": "o3-mini",
        "messages": [
            {"role": "system", "content": "You are a test system prompt"},
            {"role": "user", "content": "approve the party"}
        ],
        "temperature": 0.0,
        "max_completion_tokens": 1024
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", Some(&server.uri()));
    let reply = provider
        .complete(&prompt_turns(), &ModelParams::new("o3-mini"), None)
        .await
        .unwrap();

    assert_eq!(reply.text, "ok");
    assert_eq!(reply.total_tokens(), None);
    server.verify().await;
}

#[tokio::test]
async fn openai_json_mode_requests_json_object() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "model": "gpt-4o",
        "messages": [
            {"role": "system", "content": "You are a test system prompt"},
            {"role": "user", "content": "approve the party"}
        ],
        "temperature": 0.0,
        "max_tokens": 1024,
        "response_format": {"type": "json_object"}
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = ModelParams::new("gpt-4o");
    params.json_mode = true;

    let provider = OpenAiProvider::new("test-key", Some(&server.uri()));
    let reply = provider.complete(&prompt_turns(), &params, None).await.unwrap();

    assert_eq!(reply.text, "{}");
    server.verify().await;
}

#[tokio::test]
async fn openai_error_body_is_truncated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("x".repeat(500)))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", Some(&server.uri()));
    let error = provider
        .complete(&prompt_turns(), &ModelParams::new("gpt-4o"), None)
        .await
        .unwrap_err();

    match error {
        CompletionError::Api {
            provider, status, body,
        } => {
            assert_eq!(provider, "openai");
            assert_eq!(status, 503);
            assert_eq!(body.chars().count(), 203);
            assert!(body.ends_with("..."));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn openai_reply_without_choices_is_missing_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("test-key", Some(&server.uri()));
    let error = provider
        .complete(&prompt_turns(), &ModelParams::new("gpt-4o"), None)
        .await
        .unwrap_err();

    assert!(matches!(error, CompletionError::MissingContent { .. }));
}

#[tokio::test]
async fn ollama_posts_exact_chat_body() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "model": "llama3",
        "messages": [
            {"role": "system", "content": "You are a test system prompt"},
            {"role": "user", "content": "approve the party"}
        ],
        "stream": false,
        "options": {"temperature": 0.0, "num_predict": 1024}
    });

    let response_body = json!({
        "model": "llama3",
        "message": {"role": "assistant", "content": "{\"vote\": \"disapprove\"}"},
        "done": true,
        "prompt_eval_count": 96,
        "eval_count": 12
    });

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(Some(&server.uri()));
    let reply = provider
        .complete(&prompt_turns(), &ModelParams::new("llama3"), None)
        .await
        .unwrap();

    assert_eq!(reply.text, "{\"vote\": \"disapprove\"}");
    assert_eq!(reply.total_tokens(), Some(108));
    assert_eq!(reply.model.as_deref(), Some("llama3"));
    server.verify().await;
}

#[tokio::test]
async fn ollama_json_mode_adds_format_field() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "model": "llama3",
        "messages": [
            {"role": "system", "content": "You are a test system prompt"},
            {"role": "user", "content": "approve the party"}
        ],
        "stream": false,
        "format": "json",
        "options": {"temperature": 0.0, "num_predict": 1024}
    });

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "{}"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = ModelParams::new("llama3");
    params.json_mode = true;

    let provider = OllamaProvider::new(Some(&server.uri()));
    let reply = provider.complete(&prompt_turns(), &params, None).await.unwrap();

    assert_eq!(reply.text, "{}");
    assert_eq!(reply.total_tokens(), None);
    server.verify().await;
}

#[tokio::test]
async fn ollama_error_carries_provider_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(Some(&server.uri()));
    let error = provider
        .complete(&prompt_turns(), &ModelParams::new("missing-model"), None)
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "ollama API error (404): model not found"
    );
}
