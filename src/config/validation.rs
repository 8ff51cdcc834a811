//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (windows > 0, limits > 0, parsable bind address)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GateConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            "not a valid socket address",
        ));
    }

    if config.security.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "security.max_body_bytes",
            "must be greater than zero",
        ));
    }

    if config.rate_limit.per_key_window_secs == 0 {
        errors.push(ValidationError::new(
            "rate_limit.per_key_window_secs",
            "window must be greater than zero",
        ));
    }
    if config.rate_limit.per_key_max_requests == 0 {
        errors.push(ValidationError::new(
            "rate_limit.per_key_max_requests",
            "limit must be greater than zero",
        ));
    }
    if config.rate_limit.global_window_secs == 0 {
        errors.push(ValidationError::new(
            "rate_limit.global_window_secs",
            "window must be greater than zero",
        ));
    }
    if config.rate_limit.global_max_requests == 0 {
        errors.push(ValidationError::new(
            "rate_limit.global_max_requests",
            "limit must be greater than zero",
        ));
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::new(
            "cache.ttl_secs",
            "TTL must be greater than zero",
        ));
    }
    if config.cache.sweep_interval_secs == 0 {
        errors.push(ValidationError::new(
            "cache.sweep_interval_secs",
            "sweep interval must be greater than zero",
        ));
    }

    if !config.session.login_path.starts_with('/') {
        errors.push(ValidationError::new(
            "session.login_path",
            "must be an absolute path",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a valid socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
