//! Session gating for the dashboard shell.
//!
//! # Data Flow
//! ```text
//! Authentication collaborator
//!     → SessionState { user, is_loading }
//!     → gate.rs (phase machine, edge-triggered redirect)
//!     → RenderPlan consumed by the view layer
//! ```
//!
//! # Design Decisions
//! - The gate is a pure state machine; navigation is a collaborator trait
//! - Redirect fires on the edge into Unauthenticated, never per render
//! - Protected views never render while loading or without a user

pub mod gate;

pub use gate::{AuthPhase, Navigator, RenderPlan, RouteGuard, SessionGate, SessionState, UserSummary};
