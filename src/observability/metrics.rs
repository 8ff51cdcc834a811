//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_total` (counter): every inbound request
//! - `gate_rejections_total{reason}` (counter): classifier rejections
//! - `gate_rate_limited_total{scope}` (counter): per_key vs global
//! - `gate_cache_hits_total` / `gate_cache_misses_total` (counters)
//! - `gate_cache_entries` (gauge): current cache size

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(error) => tracing::error!(error = %error, "Failed to install metrics exporter"),
    }
}

/// Count one inbound request.
pub fn record_request() {
    counter!("gate_requests_total").increment(1);
}

/// Count a classifier rejection by reason label.
pub fn record_rejection(reason: &'static str) {
    counter!("gate_rejections_total", "reason" => reason).increment(1);
}

/// Count a rate-limited request; scope is "per_key" or "global".
pub fn record_rate_limited(scope: &'static str) {
    counter!("gate_rate_limited_total", "scope" => scope).increment(1);
}

/// Count a response served from the cache.
pub fn record_cache_hit() {
    counter!("gate_cache_hits_total").increment(1);
}

/// Count a request that missed the cache.
pub fn record_cache_miss() {
    counter!("gate_cache_misses_total").increment(1);
}

/// Update the cache size gauge.
pub fn record_cache_entries(entries: usize) {
    gauge!("gate_cache_entries").set(entries as f64);
}
