//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware chain produces:
//!     → tracing events (structured fields: client, method, path, reason)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Metric updates are cheap atomic increments
//! - The exporter is optional; recording without it is a no-op

pub mod metrics;
