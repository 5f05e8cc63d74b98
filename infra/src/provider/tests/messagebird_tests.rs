//! Unit tests for the MessageBird provider request format and response handling

use std::collections::HashMap;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use pv_core::errors::ProviderErrorKind;
use pv_core::services::verification::{RequestOptions, VerificationProvider};
use pv_core::{MessageTemplate, VerificationId};
use pv_shared::ProviderConfig;

use crate::provider::messagebird::{
    classify_error, interpret_check_status, parse_verification_id, MessageBirdConfig,
    MessageBirdVerifyProvider, Operation,
};
use crate::InfrastructureError;

fn error_body(code: i64, description: &str) -> String {
    serde_json::json!({
        "errors": [{ "code": code, "description": description, "parameter": "token" }]
    })
    .to_string()
}

fn messagebird_settings(base_url: &str) -> ProviderConfig {
    ProviderConfig {
        provider: "messagebird".to_string(),
        access_key: "test_key".to_string(),
        base_url: base_url.to_string(),
        request_timeout_secs: 2,
        ..ProviderConfig::default()
    }
}

fn options(template: &str) -> RequestOptions {
    RequestOptions {
        template: MessageTemplate::new(template).unwrap(),
    }
}

fn provider_at(base_url: &str) -> MessageBirdVerifyProvider {
    let config = MessageBirdConfig::from_provider_config(&messagebird_settings(base_url)).unwrap();
    MessageBirdVerifyProvider::new(config).unwrap()
}

/// Request as seen by the test server
struct CapturedRequest {
    request_line: String,
    headers: HashMap<String, String>,
    body: String,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    fn form(&self) -> Vec<(String, String)> {
        let url = reqwest::Url::parse(&format!("http://localhost/?{}", self.body)).unwrap();
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// Answer exactly one HTTP request with `status` and a JSON `body`
async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        request
    });

    (base_url, handle)
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before request headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap().to_string();
    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .map(|v| v.parse::<usize>().unwrap())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before request body");
        body.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        request_line,
        headers,
        body: String::from_utf8(body).unwrap(),
    }
}

#[tokio::test]
async fn test_request_code_sends_verify_form() {
    let (base_url, server) = serve_once(200, r#"{"id":"verif_abc","status":"sent"}"#).await;
    let provider = provider_at(&base_url);

    let id = provider
        .request_code("+15551234567", &options("Your code: %token"))
        .await
        .unwrap();
    assert_eq!(id.as_str(), "verif_abc");

    let request = server.await.unwrap();
    assert_eq!(request.request_line, "POST /verify HTTP/1.1");
    assert_eq!(request.header("authorization"), Some("AccessKey test_key"));
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );

    let expected: Vec<(String, String)> = [
        ("recipient", "+15551234567"),
        ("originator", "Verify"),
        ("template", "Your code: %token"),
        ("type", "sms"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(request.form(), expected);
}

#[tokio::test]
async fn test_request_code_keeps_base_path() {
    let (base_url, server) = serve_once(200, r#"{"id":"verif_abc"}"#).await;
    let provider = provider_at(&format!("{}/api/", base_url));

    provider
        .request_code("+15551234567", &options("Code %token"))
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert_eq!(request.request_line, "POST /api/verify HTTP/1.1");
}

#[tokio::test]
async fn test_request_code_error_body_is_classified() {
    let body = error_body(21, "recipient is not a valid phone number");
    let (base_url, server) = serve_once(422, &body).await;
    let provider = provider_at(&base_url);

    let err = provider
        .request_code("+15551234567", &options("Code %token"))
        .await
        .unwrap_err();
    server.await.unwrap();

    assert_eq!(err.kind, ProviderErrorKind::InputRejected);
    assert_eq!(err.code, "21");
    assert_eq!(err.description, "recipient is not a valid phone number");
}

#[tokio::test]
async fn test_check_code_sends_token_query() {
    let (base_url, server) = serve_once(200, r#"{"id":"verif_abc","status":"verified"}"#).await;
    let provider = provider_at(&base_url);
    let id = VerificationId::new("verif_abc").unwrap();

    provider.check_code(&id, "123456").await.unwrap();

    let request = server.await.unwrap();
    assert_eq!(
        request.request_line,
        "GET /verify/verif_abc?token=123456 HTTP/1.1"
    );
    assert_eq!(request.header("authorization"), Some("AccessKey test_key"));
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn test_check_code_expired_status() {
    let (base_url, server) = serve_once(200, r#"{"id":"verif_abc","status":"expired"}"#).await;
    let provider = provider_at(&base_url);
    let id = VerificationId::new("verif_abc").unwrap();

    let err = provider.check_code(&id, "123456").await.unwrap_err();
    server.await.unwrap();

    assert_eq!(err.kind, ProviderErrorKind::CodeExpired);
}

#[tokio::test]
async fn test_check_code_error_body_is_classified() {
    let body = error_body(10, "The token is invalid.");
    let (base_url, server) = serve_once(422, &body).await;
    let provider = provider_at(&base_url);
    let id = VerificationId::new("verif_abc").unwrap();

    let err = provider.check_code(&id, "000000").await.unwrap_err();
    server.await.unwrap();

    assert_eq!(err.kind, ProviderErrorKind::CodeRejected);
    assert_eq!(err.code, "10");
    assert_eq!(err.description, "The token is invalid.");
}

#[test]
fn test_parse_verification_id() {
    let body = r#"{"id":"verif_abc","status":"sent","recipient":15551234567}"#;
    let id = parse_verification_id(body).unwrap();
    assert_eq!(id.as_str(), "verif_abc");
}

#[test]
fn test_parse_verification_id_rejects_garbage() {
    let err = parse_verification_id("<html>oops</html>").unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Unclassified);
    assert_eq!(err.code, "invalid_response");

    let err = parse_verification_id(r#"{"id":"  "}"#).unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Unclassified);
}

#[test]
fn test_interpret_check_status() {
    assert!(interpret_check_status(r#"{"id":"a","status":"verified"}"#).is_ok());

    let err = interpret_check_status(r#"{"id":"a","status":"expired"}"#).unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::CodeExpired);

    let err = interpret_check_status(r#"{"id":"a","status":"failed"}"#).unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::IdentifierInvalid);

    let err = interpret_check_status(r#"{"id":"a","status":"sent"}"#).unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::CodeRejected);
    assert_eq!(err.description, "The verification is sent");
}

#[test]
fn test_classify_invalid_recipient_on_request() {
    let body = error_body(21, "recipient is not a valid phone number");
    let err = classify_error(Operation::RequestCode, 422, &body);

    assert_eq!(err.kind, ProviderErrorKind::InputRejected);
    assert_eq!(err.code, "21");
    assert_eq!(err.description, "recipient is not a valid phone number");
}

#[test]
fn test_classify_wrong_token_on_check() {
    let body = error_body(10, "The token is invalid.");
    let err = classify_error(Operation::CheckCode, 422, &body);

    assert_eq!(err.kind, ProviderErrorKind::CodeRejected);
    assert!(!err.is_terminal());
}

#[test]
fn test_classify_expired_on_check() {
    let body = error_body(20, "The verification has expired.");
    let err = classify_error(Operation::CheckCode, 422, &body);

    assert_eq!(err.kind, ProviderErrorKind::CodeExpired);
    assert!(err.is_terminal());
}

#[test]
fn test_classify_unknown_id_on_check() {
    let body = error_body(20, "verify object could not be found");
    let err = classify_error(Operation::CheckCode, 404, &body);

    assert_eq!(err.kind, ProviderErrorKind::IdentifierInvalid);
    assert!(err.is_terminal());
}

#[test]
fn test_classify_uses_first_error_only() {
    let body = serde_json::json!({
        "errors": [
            { "code": 21, "description": "first problem" },
            { "code": 2, "description": "second problem" }
        ]
    })
    .to_string();
    let err = classify_error(Operation::RequestCode, 422, &body);

    assert_eq!(err.kind, ProviderErrorKind::InputRejected);
    assert_eq!(err.description, "first problem");
}

#[test]
fn test_classify_auth_and_server_failures() {
    let err = classify_error(
        Operation::RequestCode,
        401,
        &error_body(2, "Request not allowed (incorrect access_key)"),
    );
    assert_eq!(err.kind, ProviderErrorKind::Unclassified);

    let err = classify_error(Operation::CheckCode, 503, "Service Unavailable");
    assert_eq!(err.kind, ProviderErrorKind::TransportFailure);
    assert_eq!(err.code, "503");
    assert_eq!(err.description, "Provider responded with HTTP 503");

    let err = classify_error(Operation::RequestCode, 429, "");
    assert_eq!(err.kind, ProviderErrorKind::TransportFailure);
}

#[test]
fn test_config_requires_access_key() {
    let settings = ProviderConfig {
        access_key: String::new(),
        ..messagebird_settings("https://rest.messagebird.com")
    };

    let result = MessageBirdConfig::from_provider_config(&settings);
    assert!(matches!(result, Err(InfrastructureError::Config(_))));
}

#[test]
fn test_provider_rejects_invalid_base_url() {
    let config =
        MessageBirdConfig::from_provider_config(&messagebird_settings("not a url")).unwrap();

    let result = MessageBirdVerifyProvider::new(config);
    assert!(matches!(result, Err(InfrastructureError::Config(_))));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_failure() {
    // Grab a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = MessageBirdConfig::from_provider_config(&messagebird_settings(&format!(
        "http://127.0.0.1:{}",
        port
    )))
    .unwrap();
    let provider = MessageBirdVerifyProvider::new(config).unwrap();
    let options = RequestOptions {
        template: MessageTemplate::default(),
    };

    let err = provider
        .request_code("+15551234567", &options)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::TransportFailure);

    let id = VerificationId::new("verif_abc").unwrap();
    let err = provider.check_code(&id, "123456").await.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::TransportFailure);
}
