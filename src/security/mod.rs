//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (global per-source limit, long window)
//!     → classifier.rs (pattern/agent/method/size/type checks + per-key limit)
//!     → headers.rs (decorate response with security and CORS headers)
//!     → Pass to response cache, then business handlers
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - First match wins: checks short-circuit in a fixed order
//! - Rejections are normal control flow, encoded as HTTP responses
//! - No trust in client input

pub mod classifier;
pub mod headers;
pub mod rate_limit;

pub use classifier::{classify, Decision, RejectReason};
pub use rate_limit::RateCounter;
