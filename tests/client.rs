//! Drives the OpenAI client and a file-backed session against a local stub server.

use dalle_studio::{
    Credential, FileStore, GenerationError, GenerationRequest, HistoryStore, ImageGenerator,
    ImageModel, ImageSize, OpenAiImageClient, Session, SessionError, SessionState,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the stub server saw.
#[derive(Debug)]
struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

/// Serves exactly one HTTP response, returning the origin to point the client at.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_header_end(&buf) {
                break end;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body =
            String::from_utf8_lossy(&buf[header_end..header_end + content_length]).to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        CapturedRequest {
            request_line,
            headers,
            body: request_body,
        }
    });

    (origin, handle)
}

fn client_for(origin: &str) -> OpenAiImageClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    OpenAiImageClient::builder()
        .base_url(origin)
        .http_client(http)
        .build()
}

#[tokio::test]
async fn test_successful_generation_sends_expected_request() {
    let (origin, server) = serve_once(
        "200 OK",
        r#"{"created": 1700000000, "data": [{"url": "https://example/img1.png", "revised_prompt": "a red fox in snow"}]}"#,
    )
    .await;

    let request = GenerationRequest::new("a red fox")
        .with_model(ImageModel::DallE3)
        .with_size(ImageSize::Square);
    let image = client_for(&origin)
        .generate(&Credential::new("sk-test"), &request)
        .await
        .unwrap();

    assert_eq!(image.url, "https://example/img1.png");
    assert_eq!(image.metadata.model.as_deref(), Some("dall-e-3"));
    assert_eq!(
        image.metadata.revised_prompt.as_deref(),
        Some("a red fox in snow")
    );

    let captured = server.await.unwrap();
    assert_eq!(
        captured.request_line,
        "POST /v1/images/generations HTTP/1.1"
    );
    assert_eq!(captured.header("authorization"), Some("Bearer sk-test"));
    assert_eq!(captured.header("content-type"), Some("application/json"));

    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "model": "dall-e-3",
            "prompt": "a red fox",
            "n": 1,
            "size": "1024x1024"
        })
    );
}

#[tokio::test]
async fn test_error_status_is_generation_failed() {
    let (origin, server) = serve_once(
        "401 Unauthorized",
        r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#,
    )
    .await;

    let err = client_for(&origin)
        .generate(&Credential::new("sk-bad"), &GenerationRequest::new("a red fox"))
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::GenerationFailed);
    server.await.unwrap();
}

#[tokio::test]
async fn test_empty_result_list_is_generation_failed() {
    let (origin, server) = serve_once("200 OK", r#"{"data": []}"#).await;

    let err = client_for(&origin)
        .generate(&Credential::new("sk-test"), &GenerationRequest::new("a red fox"))
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::GenerationFailed);
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_generation_failed() {
    let (origin, server) = serve_once("200 OK", "<html>gateway</html>").await;

    let err = client_for(&origin)
        .generate(&Credential::new("sk-test"), &GenerationRequest::new("a red fox"))
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::GenerationFailed);
    server.await.unwrap();
}

#[tokio::test]
async fn test_session_persists_history_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");
    HistoryStore::new(FileStore::new(&state)).append("https://example/old.png");

    let (origin, server) =
        serve_once("200 OK", r#"{"data": [{"url": "https://example/img1.png"}]}"#).await;

    let mut session = Session::new(FileStore::new(&state));
    assert_eq!(session.state(), SessionState::NeedsCredential);
    session.submit_credential("sk-test");
    session.form_mut().set_prompt("a red fox");

    let image = session.generate(&client_for(&origin)).await.unwrap();
    assert_eq!(image.url, "https://example/img1.png");
    server.await.unwrap();

    let reopened = Session::new(FileStore::new(&state));
    assert_eq!(reopened.state(), SessionState::Idle);
    assert_eq!(
        reopened.history(),
        ["https://example/img1.png", "https://example/old.png"]
    );
    assert!(reopened.current_image().is_none());
}

#[tokio::test]
async fn test_missing_credential_makes_no_connection() {
    let dir = tempfile::tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());

    let mut session = Session::new(FileStore::new(dir.path().join("state.json")));
    session.form_mut().set_prompt("a red fox");
    let err = session.generate(&client_for(&origin)).await.unwrap_err();

    assert_eq!(
        err,
        SessionError::Generation(GenerationError::MissingCredential)
    );
    assert!(session.credential_prompt_visible());

    let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
    assert!(accepted.is_err(), "client connected without a credential");
}
