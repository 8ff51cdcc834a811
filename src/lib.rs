//! Security and caching gateway for the studio management API.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod session;

pub use config::GateConfig;
pub use http::GateServer;
pub use lifecycle::Shutdown;
