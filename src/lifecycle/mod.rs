//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup: load config → validate → construct services → bind → serve
//! Shutdown: Ctrl+C or trigger → stop accepting → background tasks drain
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
