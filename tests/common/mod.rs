//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use gymgate::{GateConfig, GateServer, Shutdown};

/// State shared by the stand-in business handlers.
#[derive(Clone)]
struct InnerState {
    handler_calls: Arc<AtomicUsize>,
}

/// Spawn a gate around a small stand-in for the business API.
///
/// Returns the bound address, a counter of inner-handler invocations
/// (proving when the cache short-circuits) and the shutdown handle.
pub async fn spawn_gate(config: GateConfig) -> (SocketAddr, Arc<AtomicUsize>, Shutdown) {
    let handler_calls = Arc::new(AtomicUsize::new(0));
    let state = InnerState {
        handler_calls: handler_calls.clone(),
    };

    let inner = Router::new()
        .route("/api/members", get(list_members).post(create_member))
        .route("/api/invoices", get(list_invoices))
        .route("/plain", get(plain))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = GateServer::new(config, inner);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(200)).await;

    (addr, handler_calls, shutdown)
}

async fn list_members(State(state): State<InnerState>) -> Json<Value> {
    state.handler_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "members": [
            { "id": 1, "name": "Ada Fox", "plan": "strength-12w" },
            { "id": 2, "name": "Lin Moreau", "plan": "conditioning-8w" }
        ]
    }))
}

async fn create_member(
    State(state): State<InnerState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.handler_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "created": body }))
}

async fn list_invoices(State(state): State<InnerState>) -> Json<Value> {
    state.handler_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "invoices": [] }))
}

async fn plain(State(state): State<InnerState>) -> &'static str {
    state.handler_calls.fetch_add(1, Ordering::SeqCst);
    "pong"
}
