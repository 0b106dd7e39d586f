//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, request span)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::faults::{FaultInjector, RandomSource};
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::observability::RequestMetrics;
use crate::users::UserStore;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<UserStore>,
    pub faults: FaultInjector,
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    /// Build state from configuration. Faults use the configured seed, if any.
    pub fn new(config: AppConfig, metrics: RequestMetrics) -> Self {
        let faults = FaultInjector::from_seed(config.faults.seed);
        Self {
            config: Arc::new(config),
            users: Arc::new(UserStore::seeded()),
            faults,
            metrics: Arc::new(metrics),
        }
    }

    /// Replace the random source driving fault injection.
    pub fn with_random_source(mut self, source: Arc<dyn RandomSource>) -> Self {
        self.faults = FaultInjector::new(source);
        self
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/{user_id}", get(handlers::get_user))
        .route("/api/slow", get(handlers::slow))
        .route("/api/error", get(handlers::always_error))
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health))
        .route("/logs", get(handlers::generate_logs))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(propagate_request_id_layer()),
        )
}

/// HTTP server for the sample API.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, metrics: RequestMetrics) -> Self {
        Self::from_state(AppState::new(config, metrics))
    }

    pub fn from_state(state: AppState) -> Self {
        let config = state.config.clone();
        Self {
            router: build_router(state),
            config,
        }
    }

    /// Serve on `listener` until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service.name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
