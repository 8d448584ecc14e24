use std::time::Duration;

use serde_json::json;
use study_notes::{
    gemini::{GeminiClient, GeminiError},
    GenerationFailure, TextGenerator,
};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const GENERATE_PATH: &str = "/models/gemini-pro:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key").with_base_url(server.uri())
}

fn text_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2}
    })
}

async fn failure_for(status: u16, body: &str) -> GenerationFailure {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;

    client(&server)
        .generate("prompt")
        .await
        .expect_err("Non-2xx must fail")
        .into()
}

#[tokio::test]
async fn test_generate_sends_prompt_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"contents": [{"parts": [{"text": "Explain graphs"}]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Graphs are...")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server)
        .generate("Explain graphs")
        .await
        .expect("Generation should succeed");

    assert_eq!(text, "Graphs are...");
}

#[tokio::test]
async fn test_generate_uses_configured_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server)
        .with_model("gemini-1.5-flash")
        .generate("p")
        .await
        .unwrap();

    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_api_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let err = client(&server).generate("p").await.unwrap_err();
    match err {
        GeminiError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "bad request");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_and_server_errors_are_transient() {
    let failure = failure_for(429, "quota exceeded").await;
    assert!(failure.is_transient());
    assert!(failure.message.contains("429"));

    let failure = failure_for(500, "boom").await;
    assert!(failure.is_transient());
    assert_eq!(failure.message, "API error: 500 - boom");
}

#[tokio::test]
async fn test_forbidden_is_permanent() {
    let failure = failure_for(403, "API key not valid").await;
    assert!(!failure.is_transient());
    assert!(failure.message.contains("API key not valid"));
}

#[tokio::test]
async fn test_blocked_prompt_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
        )
        .mount(&server)
        .await;

    let err = client(&server).generate("p").await.unwrap_err();
    assert!(matches!(&err, GeminiError::EmptyResponse(reason) if reason == "SAFETY"));

    let failure: GenerationFailure = err.into();
    assert!(!failure.is_transient());
}

#[tokio::test]
async fn test_timeout_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response("late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client(&server).with_client(http).generate("p").await.unwrap_err();
    assert!(matches!(&err, GeminiError::Request(e) if e.is_timeout()));

    let failure: GenerationFailure = err.into();
    assert!(failure.is_transient());
}
