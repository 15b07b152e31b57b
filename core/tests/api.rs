//! `DiaryApi` against a recording transport.
//!
//! The transport answers every request with a canned response and keeps a
//! copy of what it was asked to send, so each test can check exactly which
//! requests went out.

use std::collections::VecDeque;
use std::sync::Mutex;

use diary_core::{
    ApiError, ClientConfig, Diary, DiaryApi, HttpMethod, HttpRequest, HttpResponse, ImageFile, Transport,
};

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<HttpRequest>>,
    replies: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
}

impl RecordingTransport {
    fn replying(replies: Vec<Result<HttpResponse, ApiError>>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
        }
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no reply queued for request")
    }
}

fn ok(body: &str) -> Result<HttpResponse, ApiError> {
    status(200, body)
}

fn status(status: u16, body: &str) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body: body.as_bytes().to_vec(),
    })
}

fn redirect(status: u16, location: &str) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        headers: vec![("location".to_string(), location.to_string())],
        body: Vec::new(),
    })
}

fn api(replies: Vec<Result<HttpResponse, ApiError>>) -> DiaryApi<RecordingTransport> {
    let config = ClientConfig::new("http://127.0.0.1:8080").unwrap();
    DiaryApi::new(&config, RecordingTransport::replying(replies))
}

fn json_body(req: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(req.body.as_deref().unwrap()).unwrap()
}

const ALICE_DIARY: &str =
    r#"{"id":1,"author":"alice","content":"hello","created_at":"2024-01-01T00:00:00Z","comments":[]}"#;

#[tokio::test]
async fn exchange_diary_sends_one_post_and_returns_diary() {
    let api = api(vec![ok(ALICE_DIARY)]);

    let diary = api.exchange_diary("alice", "hello").await.unwrap();
    assert_eq!(
        diary,
        Diary {
            id: 1,
            author: "alice".to_string(),
            content: "hello".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            comments: Vec::new(),
        }
    );

    let sent = api.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Post);
    assert_eq!(sent[0].url, "http://127.0.0.1:8080/diary/exchange");
    assert_eq!(json_body(&sent[0]), serde_json::json!({"author": "alice", "content": "hello"}));
}

#[tokio::test]
async fn post_comment_sends_diary_id() {
    let api = api(vec![ok(
        r#"{"id":5,"author":"bob","content":"nice entry","created_at":"2024-01-01T00:01:00"}"#,
    )]);

    let comment = api.post_comment(1, "bob", "nice entry").await.unwrap();
    assert_eq!(comment.id, 5);

    let sent = api.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "http://127.0.0.1:8080/diary/add-comments/");
    assert_eq!(
        json_body(&sent[0]),
        serde_json::json!({"author": "bob", "content": "nice entry", "diary_id": 1})
    );
}

#[tokio::test]
async fn post_comment_follows_307_with_same_post() {
    let api = api(vec![
        redirect(307, "http://127.0.0.1:8080/diary/add-comments"),
        ok(r#"{"id":5,"author":"bob","content":"nice entry","created_at":"2024-01-01T00:01:00"}"#),
    ]);

    let comment = api.post_comment(1, "bob", "nice entry").await.unwrap();
    assert_eq!(comment.id, 5);

    let sent = api.transport().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].method, HttpMethod::Post);
    assert_eq!(sent[1].url, "http://127.0.0.1:8080/diary/add-comments");
    assert_eq!(sent[1].body, sent[0].body);
    assert_eq!(sent[1].header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn redirect_loop_stops_at_the_limit() {
    let replies = (0..=diary_core::api::MAX_REDIRECTS)
        .map(|_| redirect(308, "/diary/exchange"))
        .collect();
    let api = api(replies);

    let err = api.exchange_diary("alice", "hello").await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 308, .. }));
    assert_eq!(api.transport().sent().len(), diary_core::api::MAX_REDIRECTS + 1);
}

#[tokio::test]
async fn upload_uses_multipart_only_for_that_call() {
    let api = api(vec![ok(r#"{"url":"/resources/images/abc.png"}"#), ok(ALICE_DIARY)]);

    let file = ImageFile::new("cat.png", vec![0x89, b'P', b'N', b'G', 0, 255]);
    let uploaded = api.upload_image(&file).await.unwrap();
    assert_eq!(uploaded.url, "/resources/images/abc.png");

    api.exchange_diary("alice", "hello").await.unwrap();

    let sent = api.transport().sent();
    assert_eq!(sent.len(), 2);

    let upload = &sent[0];
    assert_eq!(upload.url, "http://127.0.0.1:8080/upload/image");
    let content_type = upload.header("content-type").unwrap();
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .expect("multipart content type");
    let body = upload.body.as_deref().unwrap();
    let head = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cat.png\"\r\nContent-Type: image/png\r\n\r\n"
    );
    let tail = format!("\r\n--{boundary}--\r\n");
    assert!(body.starts_with(head.as_bytes()));
    assert!(body.ends_with(tail.as_bytes()));
    assert_eq!(&body[head.len()..body.len() - tail.len()], &file.bytes[..]);

    assert_eq!(sent[1].header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn fetch_image_resolves_against_base_url() {
    let api = api(vec![Ok(HttpResponse {
        status: 200,
        headers: vec![("content-type".to_string(), "image/png".to_string())],
        body: vec![1, 2, 3],
    })]);

    let bytes = api.fetch_image("/resources/images/abc.png").await.unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);

    let sent = api.transport().sent();
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].url, "http://127.0.0.1:8080/resources/images/abc.png");
    assert!(sent[0].body.is_none());
}

#[tokio::test]
async fn non_success_statuses_reject() {
    let api = api(vec![
        status(404, r#"{"detail":"diary does not exist"}"#),
        status(500, "boom"),
        status(413, "too large"),
        status(404, "missing"),
    ]);

    let err = api.post_comment(999, "bob", "hi").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    let err = api.exchange_diary("alice", "hello").await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 500, .. }));

    let err = api.upload_image(&ImageFile::new("big.jpg", vec![0; 16])).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 413, .. }));

    let err = api.fetch_image("/resources/images/gone.png").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    assert_eq!(api.transport().sent().len(), 4);
}

#[tokio::test]
async fn transport_failure_propagates_without_retry() {
    let api = api(vec![
        Err(ApiError::Transport("connection refused".to_string())),
        ok(ALICE_DIARY),
    ]);

    let err = api.exchange_diary("alice", "hello").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(ref msg) if msg == "connection refused"));
    assert_eq!(api.transport().sent().len(), 1);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let api = api(vec![
        ok(r#"{"id":1,"author":"bob","content":"one","created_at":"t"}"#),
        ok(r#"{"id":2,"author":"bob","content":"two","created_at":"t"}"#),
    ]);

    let (first, second) = tokio::join!(api.post_comment(1, "bob", "one"), api.post_comment(1, "bob", "two"));
    let mut ids = vec![first.unwrap().id, second.unwrap().id];
    ids.sort();
    assert_eq!(ids, vec![1, 2]);

    let mut contents: Vec<String> = api
        .transport()
        .sent()
        .iter()
        .map(|req| json_body(req)["content"].as_str().unwrap().to_string())
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["one", "two"]);
}
