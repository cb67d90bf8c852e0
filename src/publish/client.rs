use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Clone, Debug)]
pub struct PublisherConfig {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout: Duration,
    /// Pause between consecutive posts.
    pub delay: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            endpoint: std::env::var("POROROCA_PUBLISH_ENDPOINT").ok(),
            token: std::env::var("POROROCA_PUBLISH_TOKEN").ok(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl PublisherConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(timeout) = std::env::var("POROROCA_PUBLISH_TIMEOUT_SECS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                cfg.timeout = Duration::from_secs(parsed);
            }
        }
        if let Ok(delay) = std::env::var("POROROCA_PUBLISH_DELAY_MS") {
            if let Ok(parsed) = delay.parse::<u64>() {
                cfg.delay = Duration::from_millis(parsed);
            }
        }
        cfg
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Post {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub id: String,
}

#[derive(Debug)]
pub enum PublishError {
    MissingEndpoint,
    Http(reqwest::Error),
    Timeout,
    Api { status: StatusCode, body: String },
    Decode(reqwest::Error),
    MockQueueEmpty,
}

impl PublishError {
    fn http(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PublishError::Timeout
        } else {
            PublishError::Http(err)
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            PublishError::Timeout => true,
            PublishError::Http(_) => true,
            PublishError::Api { status, .. } => status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS,
            PublishError::MissingEndpoint
            | PublishError::Decode(_)
            | PublishError::MockQueueEmpty => false,
        }
    }
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishError::MissingEndpoint => {
                write!(f, "no publish endpoint (set --endpoint or POROROCA_PUBLISH_ENDPOINT)")
            }
            PublishError::Http(err) => write!(f, "http error: {err}"),
            PublishError::Timeout => write!(f, "request timed out"),
            PublishError::Api { status, body } => write!(f, "api error {status}: {body}"),
            PublishError::Decode(err) => write!(f, "decode error: {err}"),
            PublishError::MockQueueEmpty => write!(f, "mock publisher response queue is empty"),
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::Http(err) | PublishError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, post: &Post) -> Result<PostReceipt, PublishError>;
}

/// Posts each chunk as JSON to a single endpoint, authenticating with an
/// optional bearer token.
#[derive(Clone)]
pub struct HttpPublisher {
    http: HttpClient,
    endpoint: String,
    token: Option<String>,
}

impl HttpPublisher {
    pub fn new(cfg: &PublisherConfig) -> Result<Self, PublishError> {
        let endpoint = cfg.endpoint.clone().ok_or(PublishError::MissingEndpoint)?;
        let http = HttpClient::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(PublishError::http)?;
        Ok(Self { http, endpoint, token: cfg.token.clone() })
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(&self, post: &Post) -> Result<PostReceipt, PublishError> {
        let mut req = self.http.post(&self.endpoint).json(post);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(PublishError::http)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PublishError::Api { status, body });
        }
        resp.json::<PostReceipt>().await.map_err(PublishError::Decode)
    }
}

/// Test double: replays queued responses and records every post.
#[derive(Default)]
pub struct MockPublisher {
    responses: Mutex<VecDeque<Result<PostReceipt, PublishError>>>,
    calls: Mutex<Vec<Post>>,
}

impl MockPublisher {
    pub fn new() -> Self { Self::default() }

    pub fn push_response(&self, response: Result<PostReceipt, PublishError>) {
        self.responses.lock().expect("mock mutex poisoned").push_back(response);
    }

    pub fn push_ids<'a>(&self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids { self.push_response(Ok(PostReceipt { id: id.to_string() })); }
    }

    pub fn calls(&self) -> Vec<Post> {
        self.calls.lock().expect("mock mutex poisoned").clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, post: &Post) -> Result<PostReceipt, PublishError> {
        self.calls.lock().expect("mock mutex poisoned").push(post.clone());
        self.responses
            .lock()
            .expect("mock mutex poisoned")
            .pop_front()
            .unwrap_or(Err(PublishError::MockQueueEmpty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{request_body, request_header, serve_once};

    fn local_publisher(endpoint: String, token: Option<&str>) -> HttpPublisher {
        let http = HttpClient::builder().no_proxy().build().unwrap();
        HttpPublisher { http, endpoint, token: token.map(str::to_string) }
    }

    #[test]
    fn post_serializes_reply_only_when_present() {
        let first = Post { text: "1/2 hi".into(), reply_to: None };
        assert_eq!(serde_json::to_value(&first).unwrap(), serde_json::json!({"text": "1/2 hi"}));
        let next = Post { text: "2/2 there".into(), reply_to: Some("42".into()) };
        assert_eq!(serde_json::to_value(&next).unwrap()["reply_to"], "42");
    }

    #[test]
    fn http_publisher_requires_endpoint() {
        let cfg = PublisherConfig { endpoint: None, token: None, timeout: Duration::from_secs(1), delay: Duration::ZERO };
        assert!(matches!(HttpPublisher::new(&cfg), Err(PublishError::MissingEndpoint)));
    }

    #[test]
    fn api_error_display_and_retry() {
        let err = PublishError::Api { status: StatusCode::TOO_MANY_REQUESTS, body: "slow down".into() };
        assert_eq!(format!("{err}"), "api error 429 Too Many Requests: slow down");
        assert!(err.is_retryable());
        let bad = PublishError::Api { status: StatusCode::BAD_REQUEST, body: String::new() };
        assert!(!bad.is_retryable());
        assert!(!PublishError::MissingEndpoint.is_retryable());
    }

    #[tokio::test]
    async fn mock_replays_and_records() {
        let mock = MockPublisher::new();
        mock.push_ids(["a"]);
        let post = Post { text: "x".into(), reply_to: None };
        assert_eq!(mock.publish(&post).await.unwrap().id, "a");
        assert!(matches!(mock.publish(&post).await, Err(PublishError::MockQueueEmpty)));
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn http_publisher_posts_json_with_bearer_token() {
        let (base, server) = serve_once("200 OK", r#"{"id":"9001"}"#).await;
        let publisher = local_publisher(format!("{base}/posts"), Some("s3cret"));

        let post = Post { text: "2/2 there".into(), reply_to: Some("42".into()) };
        let receipt = publisher.publish(&post).await.unwrap();
        assert_eq!(receipt.id, "9001");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /posts "), "{raw}");
        assert_eq!(request_header(&raw, "authorization"), Some("Bearer s3cret"));
        let body: serde_json::Value = serde_json::from_str(request_body(&raw)).unwrap();
        assert_eq!(body, serde_json::json!({"text": "2/2 there", "reply_to": "42"}));
    }

    #[tokio::test]
    async fn http_publisher_omits_auth_without_token() {
        let (base, server) = serve_once("200 OK", r#"{"id":"1"}"#).await;
        let publisher = local_publisher(base, None);

        publisher.publish(&Post { text: "1/1 hi".into(), reply_to: None }).await.unwrap();
        let raw = server.await.unwrap();
        assert_eq!(request_header(&raw, "authorization"), None);
        let body: serde_json::Value = serde_json::from_str(request_body(&raw)).unwrap();
        assert_eq!(body, serde_json::json!({"text": "1/1 hi"}));
    }

    #[tokio::test]
    async fn http_publisher_maps_error_status_to_api_error() {
        let (base, server) = serve_once("500 Internal Server Error", "boom").await;
        let publisher = local_publisher(base, None);

        let err = publisher.publish(&Post { text: "x".into(), reply_to: None }).await.unwrap_err();
        server.await.unwrap();
        match err {
            PublishError::Api { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
