//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! Allowed request
//!     → key = canonical URL (path + query, method-agnostic)
//!     → live entry?  yes → serve stored JSON body, handler skipped
//!                    no  → run handler, buffer JSON body, store with TTL
//! ```
//!
//! # Design Decisions
//! - Only successful JSON responses are cached
//! - Expiry is lazy on access plus a periodic background sweep
//! - No invalidation on writes; TTL is the only eviction policy
//! - An entry is committed only after the downstream body buffered fully,
//!   so an aborted handler never leaves a partial entry

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, Request, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::observability::metrics;

/// A cached response body with its expiry instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    body: Bytes,
    expires_at: Instant,
}

/// Time-expiring store of JSON response bodies, keyed by canonical URL.
///
/// Owned by the server state and injected into the middleware chain;
/// process-local, lost on restart.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create an empty cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a live entry, removing it if found expired.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.get_at(key, Instant::now())
    }

    /// Look up a live entry at an explicit instant.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Bytes> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.body.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Store a body under `key`, expiring one TTL from now.
    pub fn insert(&self, key: String, body: Bytes) {
        self.insert_at(key, body, Instant::now());
    }

    /// Store a body under `key` at an explicit instant.
    pub fn insert_at(&self, key: String, body: Bytes, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                body,
                expires_at: now + self.ttl,
            },
        );
        metrics::record_cache_entries(self.entries.len());
    }

    /// Drop every expired entry.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    /// Drop every entry expired as of `now`.
    pub fn sweep_at(&self, now: Instant) {
        self.entries.retain(|_, entry| entry.expires_at > now);
        metrics::record_cache_entries(self.entries.len());
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical cache key for a request URI: path plus query, method-agnostic.
pub fn canonical_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Middleware serving live entries and storing fresh JSON responses.
pub async fn cache_middleware(
    State(cache): State<Arc<ResponseCache>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = canonical_key(request.uri());

    if let Some(body) = cache.get(&key) {
        metrics::record_cache_hit();
        tracing::debug!(key = %key, "Cache hit");
        return cached_response(body);
    }
    metrics::record_cache_miss();

    let response = next.run(request).await;

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);

    if !response.status().is_success() || !is_json {
        return response;
    }

    let (parts, body) = response.into_parts();
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            cache.insert(key, bytes.clone());
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(error) => {
            // Body never buffered fully; nothing was committed to the cache.
            tracing::error!(key = %key, error = %error, "Failed to buffer downstream body");
            let mut response = Response::new(Body::from("upstream body error"));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

fn cached_response(body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
        .headers_mut()
        .insert("x-cache", HeaderValue::from_static("HIT"));
    response
}

/// Spawn the periodic sweep task; stops when the shutdown signal fires.
pub fn spawn_sweeper(
    cache: Arc<ResponseCache>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    cache.sweep();
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Cache sweeper stopping");
                    break;
                }
            }
        }
    })
}
