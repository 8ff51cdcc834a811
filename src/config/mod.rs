//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so a missing file still yields a working gate
//! - Defaults encode the production limits (60 req/60 s per key,
//!   100 req/15 min per source, 300 s cache TTL, 1 MiB bodies)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::CacheConfig;
pub use schema::GateConfig;
pub use schema::ListenerConfig;
pub use schema::RateLimitConfig;
pub use schema::SecurityConfig;
