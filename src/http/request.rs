//! Request identification.
//!
//! # Responsibilities
//! - Attach a unique request ID as early as possible for tracing
//! - Echo the ID back on the response
//!
//! # Design Decisions
//! - An inbound x-request-id from the client is trusted and reused
//! - UUID v4; no coordination needed across processes

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Correlation header name.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID attached to request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Middleware assigning (or propagating) the request ID.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}
