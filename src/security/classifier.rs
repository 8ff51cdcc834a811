//! Request classification.
//!
//! # Responsibilities
//! - Inspect inbound requests before any business handler runs
//! - Reject injection attempts, scanner user agents, oversized bodies,
//!   unexpected methods and media types
//! - Enforce the per-key rate limit (client + method + path)
//!
//! # Design Decisions
//! - Checks run in a fixed order; the first match wins
//! - The rate counter is consulted last, so a rejected request does not
//!   consume quota for its key
//! - Signatures match against the raw (encoded) URL, lower-cased

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::observability::metrics;
use crate::security::rate_limit::RateCounter;

/// URL signatures for directory traversal, SQL injection, script injection
/// and code execution. Matched as substrings of the lower-cased URL.
const FORBIDDEN_PATTERNS: &[&str] = &[
    "..",
    "'",
    "\"",
    "union select",
    "<script",
    "</script",
    "<iframe",
    "<object",
    "<embed",
    "<svg",
    "onerror=",
    "onload=",
    "onclick=",
    "onmouseover=",
    "javascript:",
    "vbscript:",
    "data:",
    "eval(",
    "exec(",
    "system(",
    "passthru(",
    "shell_exec(",
    "base64_decode(",
];

/// Known scanning and exploitation tool names, matched case-insensitively
/// against the User-Agent header.
const FORBIDDEN_AGENTS: &[&str] = &[
    "sqlmap",
    "nikto",
    "nmap",
    "masscan",
    "metasploit",
    "havij",
    "acunetix",
    "nessus",
    "curl",
    "wget",
    "python-requests",
    "go-http-client",
];

const ALLOWED_METHODS: &[Method] = &[
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    ForbiddenPattern,
    ForbiddenAgent,
    MethodNotAllowed,
    EntityTooLarge,
    UnsupportedMediaType,
    TooManyRequests,
}

impl RejectReason {
    /// Message placed in the JSON error body.
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::ForbiddenPattern => "forbidden pattern",
            RejectReason::ForbiddenAgent => "forbidden agent",
            RejectReason::MethodNotAllowed => "method not allowed",
            RejectReason::EntityTooLarge => "entity too large",
            RejectReason::UnsupportedMediaType => "unsupported media type",
            RejectReason::TooManyRequests => "too many requests",
        }
    }

    /// HTTP status returned to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            RejectReason::ForbiddenPattern | RejectReason::ForbiddenAgent => {
                StatusCode::FORBIDDEN
            }
            RejectReason::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RejectReason::EntityTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RejectReason::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RejectReason::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Short label for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RejectReason::ForbiddenPattern => "pattern",
            RejectReason::ForbiddenAgent => "agent",
            RejectReason::MethodNotAllowed => "method",
            RejectReason::EntityTooLarge => "size",
            RejectReason::UnsupportedMediaType => "type",
            RejectReason::TooManyRequests => "rate",
        }
    }
}

impl IntoResponse for RejectReason {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Outcome of classifying a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Reject(RejectReason),
}

/// State required by the classifier middleware.
#[derive(Clone)]
pub struct ClassifierState {
    /// Per-key rate counter, shared with nothing else.
    pub counter: Arc<RateCounter>,
    /// Maximum declared body size for POST/PUT, in bytes.
    pub max_body_bytes: u64,
}

/// True when the lower-cased URL contains any forbidden signature.
pub fn contains_forbidden_pattern(url: &str) -> bool {
    FORBIDDEN_PATTERNS.iter().any(|p| url.contains(p))
}

/// True when the user agent names a known scanning tool.
pub fn is_forbidden_agent(agent: &str) -> bool {
    let agent = agent.to_lowercase();
    FORBIDDEN_AGENTS.iter().any(|a| agent.contains(a))
}

/// Classify a request, recording it against its rate key when all other
/// checks pass. The rate decision uses the post-update count.
pub fn classify(
    request: &Request<Body>,
    client: &str,
    counter: &RateCounter,
    max_body_bytes: u64,
) -> Decision {
    let url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path())
        .to_lowercase();

    if contains_forbidden_pattern(&url) {
        return Decision::Reject(RejectReason::ForbiddenPattern);
    }

    if let Some(agent) = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        if is_forbidden_agent(agent) {
            return Decision::Reject(RejectReason::ForbiddenAgent);
        }
    }

    let method = request.method();
    if !ALLOWED_METHODS.contains(method) {
        return Decision::Reject(RejectReason::MethodNotAllowed);
    }

    if method == Method::POST || method == Method::PUT {
        let declared_length = request
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        if let Some(length) = declared_length {
            if length > max_body_bytes {
                return Decision::Reject(RejectReason::EntityTooLarge);
            }
        }

        let is_json = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            return Decision::Reject(RejectReason::UnsupportedMediaType);
        }
    }

    // Every request that reaches this check counts toward its window,
    // including the ones ultimately allowed.
    let key = format!("{}:{}:{}", client, method, url);
    let count = counter.hit(&key);
    if count > counter.limit() {
        return Decision::Reject(RejectReason::TooManyRequests);
    }

    Decision::Allow
}

/// Middleware applying [`classify`] to every request.
pub async fn classify_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<ClassifierState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = addr.ip().to_string();
    match classify(&request, &client, &state.counter, state.max_body_bytes) {
        Decision::Allow => next.run(request).await,
        Decision::Reject(reason) => {
            tracing::warn!(
                client = %client,
                method = %request.method(),
                path = %request.uri().path(),
                reason = reason.as_label(),
                "Request rejected"
            );
            metrics::record_rejection(reason.as_label());
            if reason == RejectReason::TooManyRequests {
                metrics::record_rate_limited("per_key");
            }
            reason.into_response()
        }
    }
}
