//! Mock upstream provider for endpoint tests.
//!
//! One server doubles as the challenge verification endpoint and the
//! chat-completion provider, with per-endpoint hit counters so tests can
//! assert which outbound calls were (not) made.

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use futures::stream;

#[derive(Clone)]
pub struct MockProviderConfig {
    /// Whether the verification endpoint reports `success`.
    pub verify_success: bool,
    /// Status returned by the completion endpoint; `OK` streams lines.
    pub completion_status: StatusCode,
    /// Lines streamed by the completion endpoint, one network chunk each
    /// (a newline is appended to every line).
    pub completion_lines: Vec<String>,
}

impl Default for MockProviderConfig {
    fn default() -> Self {
        Self {
            verify_success: true,
            completion_status: StatusCode::OK,
            completion_lines: vec![
                r#"data: {"choices":[{"delta":{"content":"It rains."}}]}"#.to_string(),
                "data: [DONE]".to_string(),
            ],
        }
    }
}

pub struct MockProvider {
    pub addr: SocketAddr,
    pub verify_hits: Arc<AtomicUsize>,
    pub completion_hits: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn verify_count(&self) -> usize {
        self.verify_hits.load(Ordering::SeqCst)
    }

    pub fn completion_count(&self) -> usize {
        self.completion_hits.load(Ordering::SeqCst)
    }
}

pub async fn spawn_provider(config: MockProviderConfig) -> MockProvider {
    let verify_hits = Arc::new(AtomicUsize::new(0));
    let completion_hits = Arc::new(AtomicUsize::new(0));

    let verify_success = config.verify_success;
    let verify_counter = verify_hits.clone();
    let completion_counter = completion_hits.clone();

    let app = Router::new()
        .route(
            "/siteverify",
            post(move || {
                let counter = verify_counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({ "success": verify_success }))
                }
            }),
        )
        .route(
            "/v1/chat/completions",
            post(move || {
                let counter = completion_counter.clone();
                let config = config.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    completion_response(&config)
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockProvider {
        addr,
        verify_hits,
        completion_hits,
    }
}

fn completion_response(config: &MockProviderConfig) -> Response {
    if config.completion_status != StatusCode::OK {
        return (
            config.completion_status,
            "upstream exploded: quota exceeded for key sk-internal",
        )
            .into_response();
    }

    let chunks: Vec<Result<Bytes, Infallible>> = config
        .completion_lines
        .iter()
        .map(|line| Ok(Bytes::from(format!("{line}\n"))))
        .collect();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(stream::iter(chunks)))
        .unwrap()
}
