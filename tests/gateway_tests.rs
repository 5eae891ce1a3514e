//! Gemini gateway behavior against a mock backend.

use ai_image_gallery::{AppError, ChatGateway, GeminiAuth, GeminiGateway};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-1.5-flash";

fn ready_gateway(server: &MockServer) -> GeminiGateway {
    GeminiGateway::new(MODEL, GeminiAuth::ApiKey("test-key".to_string()))
        .with_base_url(server.uri())
}

fn success_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
}

#[tokio::test]
async fn generate_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:generateContent")))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("a cat")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = ready_gateway(&server);
    let image = STANDARD.encode(b"jpeg bytes");
    let out = gateway
        .generate("What is this?", &image, "image/jpeg")
        .await
        .unwrap();
    assert_eq!(out, "a cat");
}

#[tokio::test]
async fn concatenates_multiple_text_parts() {
    let server = MockServer::start().await;
    let body = json!({
        "candidates": [{
            "content": { "parts": [{ "text": "a " }, { "text": "cat" }] }
        }]
    });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let gateway = ready_gateway(&server);
    let image = STANDARD.encode(b"img");
    let out = gateway.generate("describe", &image, "image/jpeg").await.unwrap();
    assert_eq!(out, "a cat");
}

#[tokio::test]
async fn data_uri_and_bare_payloads_send_the_same_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = ready_gateway(&server);
    let bare = STANDARD.encode(b"same bytes");
    let data_uri = format!("data:image/jpeg;base64,{bare}");

    gateway.generate("q", &bare, "image/jpeg").await.unwrap();
    gateway.generate("q", &data_uri, "image/jpeg").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);

    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["contents"][0]["parts"][0]["text"], "q");
    assert_eq!(
        sent["contents"][0]["parts"][1]["inline_data"]["data"],
        serde_json::Value::String(bare)
    );
}

#[tokio::test]
async fn malformed_base64_fails_before_any_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("never")))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = ready_gateway(&server);
    let err = gateway
        .generate("q", "definitely not base64!!", "image/jpeg")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)), "got {err:?}");
}

#[tokio::test]
async fn empty_inputs_are_invalid() {
    let server = MockServer::start().await;
    let gateway = ready_gateway(&server);
    let image = STANDARD.encode(b"img");

    let err = gateway.generate("", &image, "image/jpeg").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    let err = gateway.generate("q", "", "image/jpeg").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unconfigured_gateway_fails_without_network() {
    let gateway = GeminiGateway::unconfigured();
    let image = STANDARD.encode(b"img");

    let err = gateway.generate("q", &image, "image/jpeg").await.unwrap_err();
    assert!(matches!(err, AppError::NotConfigured), "got {err:?}");
}

#[tokio::test]
async fn backend_failure_surfaces_as_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let gateway = ready_gateway(&server);
    let image = STANDARD.encode(b"img");
    let err = gateway.generate("q", &image, "image/jpeg").await.unwrap_err();
    match err {
        AppError::Gateway(msg) => assert!(msg.contains("quota exceeded"), "got {msg}"),
        other => panic!("expected Gateway error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_candidate_list_is_a_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let gateway = ready_gateway(&server);
    let image = STANDARD.encode(b"img");
    let err = gateway.generate("q", &image, "image/jpeg").await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)), "got {err:?}");
}
