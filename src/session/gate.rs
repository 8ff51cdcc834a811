//! Protected-route gate.
//!
//! # States
//! - Loading: authentication check in flight, show a busy indicator
//! - Unauthenticated: redirect to the login view, render nothing
//! - Authenticated: render the requested view
//!
//! # State Transitions
//! ```text
//! Loading → Authenticated | Unauthenticated
//! Authenticated | Unauthenticated → Loading (fresh check, e.g. reload)
//! ```
//!
//! # Design Decisions
//! - Navigation fires at most once per transition into Unauthenticated
//! - If the collaborator never resolves is_loading, the gate stays in
//!   Loading; liveness is the collaborator's responsibility

use serde::{Deserialize, Serialize};

/// Minimal identity of the signed-in user, as supplied by the
/// authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub display_name: String,
}

/// Snapshot of the authentication collaborator's state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<UserSummary>,
    pub is_loading: bool,
}

impl SessionState {
    /// Collapse the snapshot into a phase.
    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Loading
        } else if self.user.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }
}

/// The three phases the gate distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// What the view layer should render for the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPlan {
    /// Neutral busy indicator; no navigation side effect.
    LoadingIndicator,
    /// Render nothing while the redirect is in flight.
    Blank,
    /// Render the requested view, optionally inside the shared chrome.
    View { with_chrome: bool },
}

/// Navigation collaborator the gate redirects through.
pub trait Navigator {
    fn navigate_to(&mut self, path: &str);
}

/// Per-route gating flags.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    /// Wrap the view in the shared navigation frame.
    pub with_chrome: bool,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self { with_chrome: true }
    }
}

/// Edge-triggered gate in front of protected views.
///
/// Feed it every state snapshot the authentication collaborator emits;
/// it decides what to render and drives the login redirect exactly once
/// per transition into [`AuthPhase::Unauthenticated`].
pub struct SessionGate<N: Navigator> {
    navigator: N,
    login_path: String,
    last_phase: Option<AuthPhase>,
}

impl<N: Navigator> SessionGate<N> {
    /// Create a gate redirecting to `login_path`.
    pub fn new(navigator: N, login_path: impl Into<String>) -> Self {
        Self {
            navigator,
            login_path: login_path.into(),
            last_phase: None,
        }
    }

    /// Observe a state snapshot and return the render plan for `route`.
    pub fn observe(&mut self, state: &SessionState, route: &RouteGuard) -> RenderPlan {
        let phase = state.phase();
        let entered = self.last_phase != Some(phase);
        self.last_phase = Some(phase);

        match phase {
            AuthPhase::Loading => RenderPlan::LoadingIndicator,
            AuthPhase::Unauthenticated => {
                if entered {
                    tracing::debug!(path = %self.login_path, "Session gate redirecting");
                    self.navigator.navigate_to(&self.login_path);
                }
                RenderPlan::Blank
            }
            AuthPhase::Authenticated => RenderPlan::View {
                with_chrome: route.with_chrome,
            },
        }
    }

    /// The phase observed most recently, if any.
    pub fn phase(&self) -> Option<AuthPhase> {
        self.last_phase
    }

    /// Consume the gate and return the navigator.
    pub fn into_navigator(self) -> N {
        self.navigator
    }
}
