//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request filtering limits.
    pub security: SecurityConfig,

    /// Rate limiting windows (per-key and global).
    pub rate_limit: RateLimitConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Session gate settings for the dashboard shell.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Request filtering limits enforced by the classifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum declared body size for POST/PUT requests, in bytes.
    pub max_body_bytes: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Rate limiting configuration.
///
/// Two independent limiters stack: the per-key limiter counts requests per
/// (client address, method, path) tuple, the global limiter counts every
/// request per source address over a longer window. Both apply.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Per-key window length in seconds.
    pub per_key_window_secs: u64,

    /// Maximum requests per key within one window.
    pub per_key_max_requests: u32,

    /// Global window length in seconds.
    pub global_window_secs: u64,

    /// Maximum requests per source address within one global window.
    pub global_max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_key_window_secs: 60,
            per_key_max_requests: 60,
            global_window_secs: 900,
            global_max_requests: 100,
        }
    }
}

impl RateLimitConfig {
    /// Per-key window as a Duration.
    pub fn per_key_window(&self) -> Duration {
        Duration::from_secs(self.per_key_window_secs)
    }

    /// Global window as a Duration.
    pub fn global_window(&self) -> Duration {
        Duration::from_secs(self.global_window_secs)
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live for cached responses, in seconds.
    pub ttl_secs: u64,

    /// Interval between background sweeps of expired entries, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            sweep_interval_secs: 60,
        }
    }
}

impl CacheConfig {
    /// Entry TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Session gate configuration for the dashboard shell.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path an unauthenticated session is redirected to.
    pub login_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: "/auth".to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Address the metrics endpoint binds to.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
