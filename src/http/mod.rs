//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware chain)
//!     → request.rs (request ID for correlation)
//!     → security (global limit → classifier → headers)
//!     → cache (serve or store JSON responses)
//!     → inner application router (business handlers, out of scope here)
//! ```

pub mod request;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use server::GateServer;
