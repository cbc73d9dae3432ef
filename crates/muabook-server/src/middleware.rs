use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter protecting the public submission endpoint. One
/// window is shared across all clients; a single artist's booking form does
/// not see enough traffic to justify per-client buckets.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    /// Counts one request against the current window, rolling the window
    /// over first if it has expired. Returns `false` when the window is full.
    pub async fn try_acquire(&self) -> bool {
        let mut window = self.state.lock().await;

        if window.started_at.elapsed() >= self.window {
            window.started_at = Instant::now();
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return false;
        }

        window.count += 1;
        true
    }
}

#[derive(Debug, Serialize)]
struct RateLimitBody {
    error: &'static str,
}

/// The request's ID: the caller-provided `x-request-id` header when present
/// and readable, otherwise a fresh `UUIDv4`.
fn incoming_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Axum middleware that extracts or generates a request ID.
///
/// The ID is inserted into request extensions as [`RequestId`] and echoed on
/// the response as the `x-request-id` header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_request_id(req.headers());

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if !rate_limit.try_acquire().await {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RateLimitBody {
                error: "Too many requests. Please try again shortly.",
            }),
        )
            .into_response();
    }

    next.run(req).await
}
