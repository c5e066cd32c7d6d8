//! Integration tests for `ApiClient` against a raw TCP canned-response server.
//!
//! Run with: `cargo test -p tether-api --test completion_integration -- --ignored`

use tether_api::ApiClient;
use tether_types::{ApiError, ChatMessage, ChatRequest};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve exactly one connection: consume the request, send `response`, close.
async fn start_test_server(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        // Read until the full request (headers + content-length body) arrived.
        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(header_end) = find_header_end(&buf) {
                let content_length = parse_content_length(&buf[..header_end]).unwrap_or(0);
                if buf.len() >= header_end + content_length {
                    break;
                }
            }
        }
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}")
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn parse_content_length(headers: &[u8]) -> Option<usize> {
    let text = std::str::from_utf8(headers).ok()?;
    text.lines()
        .find(|line| line.to_ascii_lowercase().starts_with("content-length:"))
        .and_then(|line| line.split(':').nth(1))
        .and_then(|v| v.trim().parse().ok())
}

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    )
}

fn request() -> ChatRequest {
    ChatRequest {
        model: "llama-3.3-70b-versatile".into(),
        max_tokens: 500,
        messages: vec![ChatMessage::user("hello")],
        tools: None,
        stop: None,
    }
}

#[tokio::test]
#[ignore]
async fn complete_parses_a_text_reply() {
    let body = r#"{
        "id": "chatcmpl-1",
        "model": "llama-3.3-70b-versatile",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello there"}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 5, "completion_tokens": 3, "total_tokens": 8}
    }"#;
    let base_url = start_test_server(http_response("200 OK", body)).await;

    let client = ApiClient::new("test-key", &base_url).unwrap();
    let response = client.complete(&request()).await.unwrap();
    assert_eq!(response.message().unwrap().text(), "Hello there");
}

#[tokio::test]
#[ignore]
async fn complete_parses_a_tool_call_reply() {
    let body = r#"{
        "id": "chatcmpl-2",
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "echo", "arguments": "{\"msg\":\"hi\"}"}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    }"#;
    let base_url = start_test_server(http_response("200 OK", body)).await;

    let client = ApiClient::new("test-key", &base_url).unwrap();
    let response = client.complete(&request()).await.unwrap();
    let calls = response.message().unwrap().tool_calls.clone().unwrap();
    assert_eq!(calls[0].function.name, "echo");
}

#[tokio::test]
#[ignore]
async fn auth_failure_is_classified() {
    let body = r#"{"error":{"message":"invalid api key"}}"#;
    let base_url = start_test_server(http_response("401 Unauthorized", body)).await;

    let client = ApiClient::new("bad-key", &base_url).unwrap();
    match client.complete(&request()).await {
        Err(ApiError::Auth { message }) => assert_eq!(message, "invalid api key"),
        other => panic!("expected Auth error, got {other:?}"),
    }
}

#[tokio::test]
#[ignore]
async fn garbage_success_body_is_malformed() {
    let base_url = start_test_server(http_response("200 OK", "not json at all")).await;

    let client = ApiClient::new("test-key", &base_url).unwrap();
    let result = client.complete(&request()).await;
    assert!(matches!(result, Err(ApiError::MalformedResponse(_))));
}
