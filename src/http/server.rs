//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Own the process-wide services (rate counters, response cache)
//! - Wire the middleware chain around the inner application router
//! - Bind the server to a listener and serve with graceful shutdown
//!
//! # Middleware order (outermost first)
//! ```text
//! trace → timeout → request ID → global limiter → classifier
//!       → security headers → response cache → inner router
//! ```
//! The global limiter and classifier run before header decoration, so
//! their rejections carry no security headers; this mirrors the order
//! the handlers were registered in upstream.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::cache::{self, cache_middleware, ResponseCache};
use crate::config::GateConfig;
use crate::http::request::request_id_middleware;
use crate::lifecycle::Shutdown;
use crate::security::classifier::{classify_middleware, ClassifierState};
use crate::security::headers::security_headers_middleware;
use crate::security::rate_limit::{global_limit_middleware, RateCounter};

/// HTTP server wrapping an inner application router with the gate's
/// middleware chain.
pub struct GateServer {
    router: Router,
    config: GateConfig,
    cache: Arc<ResponseCache>,
}

impl GateServer {
    /// Create a server around `inner`, constructing the process-wide
    /// services once and injecting them into the middleware chain.
    pub fn new(config: GateConfig, inner: Router) -> Self {
        let per_key = Arc::new(RateCounter::new(
            config.rate_limit.per_key_window(),
            config.rate_limit.per_key_max_requests,
        ));
        let global = Arc::new(RateCounter::new(
            config.rate_limit.global_window(),
            config.rate_limit.global_max_requests,
        ));
        let cache = Arc::new(ResponseCache::new(config.cache.ttl()));

        let router = Self::build_router(&config, inner, per_key, global, cache.clone());
        Self {
            router,
            config,
            cache,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &GateConfig,
        inner: Router,
        per_key: Arc<RateCounter>,
        global: Arc<RateCounter>,
        cache: Arc<ResponseCache>,
    ) -> Router {
        let classifier = ClassifierState {
            counter: per_key,
            max_body_bytes: config.security.max_body_bytes,
        };

        // Layers added later sit further out on the request path.
        inner
            .layer(middleware::from_fn_with_state(cache, cache_middleware))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(middleware::from_fn_with_state(
                classifier,
                classify_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                global,
                global_limit_middleware,
            ))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on Ctrl+C or when `shutdown` is triggered; the cache sweeper
    /// follows the same signal.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway starting");

        cache::spawn_sweeper(
            self.cache.clone(),
            self.config.cache.sweep_interval(),
            shutdown.subscribe(),
        );

        let mut rx = shutdown.subscribe();
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = rx.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
