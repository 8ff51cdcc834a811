//! Fixed-window rate counting.
//!
//! # Responsibilities
//! - Track request counts per key over a rolling window
//! - Back both limiters: per-key (client+method+path, 60 s) and
//!   global (source address, 15 min)
//!
//! # Design Decisions
//! - Fixed window, reset on first request after expiry
//! - Counting is a single locked-entry update; no await while holding a guard
//! - State is process-local and lost on restart

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::observability::metrics;

/// Fixed response body for the global limiter.
pub const GLOBAL_LIMIT_MESSAGE: &str = "Too many requests, please retry later.";

/// Count of requests for one key within the current window.
#[derive(Debug, Clone, Copy)]
struct RateRecord {
    count: u32,
    window_start: Instant,
}

/// A fixed-window request counter keyed by string.
///
/// Every call to [`RateCounter::hit`] counts toward the key's window, even
/// when the caller ultimately allows the request.
pub struct RateCounter {
    records: DashMap<String, RateRecord>,
    window: Duration,
    limit: u32,
}

impl RateCounter {
    /// Create a counter with the given window and per-window limit.
    pub fn new(window: Duration, limit: u32) -> Self {
        Self {
            records: DashMap::new(),
            window,
            limit,
        }
    }

    /// Record one request for `key` and return the post-update count.
    pub fn hit(&self, key: &str) -> u32 {
        self.hit_at(key, Instant::now())
    }

    /// Record one request for `key` at an explicit instant.
    ///
    /// The window resets (count back to 1) when more than one full window
    /// has elapsed since the recorded window start.
    pub fn hit_at(&self, key: &str, now: Instant) -> u32 {
        let mut record = self.records.entry(key.to_string()).or_insert(RateRecord {
            count: 0,
            window_start: now,
        });

        if now.saturating_duration_since(record.window_start) > self.window {
            record.count = 1;
            record.window_start = now;
        } else {
            record.count += 1;
        }
        record.count
    }

    /// The per-window request limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Middleware enforcing the global per-source-address limit.
///
/// Independent of, and stacked outside, the per-key limit applied by the
/// classifier. Exceeding it returns a fixed plain-text 429, not the JSON
/// error shape the classifier uses.
pub async fn global_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<Arc<RateCounter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    metrics::record_request();

    let key = addr.ip().to_string();
    let count = limiter.hit(&key);

    if count > limiter.limit() {
        tracing::warn!(client = %key, count, "Global rate limit exceeded");
        metrics::record_rate_limited("global");
        let mut response = Response::new(Body::from(GLOBAL_LIMIT_MESSAGE));
        *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
        response
    } else {
        next.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_within_window() {
        let counter = RateCounter::new(Duration::from_secs(60), 60);
        let t0 = Instant::now();

        for expected in 1..=60 {
            assert_eq!(counter.hit_at("k", t0), expected);
        }
        // 61st request in the same window exceeds the limit.
        assert!(counter.hit_at("k", t0) > counter.limit());
    }

    #[test]
    fn window_resets_after_expiry() {
        let counter = RateCounter::new(Duration::from_secs(60), 60);
        let t0 = Instant::now();

        for _ in 0..61 {
            counter.hit_at("k", t0);
        }
        // At 61 seconds the window has elapsed; count resets to 1.
        assert_eq!(counter.hit_at("k", t0 + Duration::from_secs(61)), 1);
    }

    #[test]
    fn boundary_of_window_still_counts() {
        let counter = RateCounter::new(Duration::from_secs(60), 60);
        let t0 = Instant::now();

        counter.hit_at("k", t0);
        // Exactly 60 s later is still inside the window (reset requires > window).
        assert_eq!(counter.hit_at("k", t0 + Duration::from_secs(60)), 2);
    }

    #[test]
    fn keys_are_independent() {
        let counter = RateCounter::new(Duration::from_secs(60), 2);
        let t0 = Instant::now();

        assert_eq!(counter.hit_at("a", t0), 1);
        assert_eq!(counter.hit_at("b", t0), 1);
        assert_eq!(counter.hit_at("a", t0), 2);
        assert_eq!(counter.len(), 2);
    }
}
