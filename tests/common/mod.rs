//! Shared utilities for integration tests.

pub mod capture;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use sample_api::config::{AppConfig, FaultConfig};
use sample_api::faults::RandomSource;
use sample_api::http::{build_router, AppState, HttpServer};
use sample_api::lifecycle::Shutdown;
use sample_api::observability::RequestMetrics;

/// Default config with OTLP export turned off.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.observability.otlp.enabled = false;
    config
}

/// Default config with every delay and failure removed.
#[allow(dead_code)]
pub fn instant_config() -> AppConfig {
    let mut config = test_config();
    config.faults = FaultConfig::disabled();
    config
}

pub fn state_with(config: AppConfig, source: Option<Arc<dyn RandomSource>>) -> AppState {
    let metrics = RequestMetrics::new(&config.observability.histogram_buckets).unwrap();
    let state = AppState::new(config, metrics);
    match source {
        Some(source) => state.with_random_source(source),
        None => state,
    }
}

#[allow(dead_code)]
pub fn router_with(config: AppConfig, source: Option<Arc<dyn RandomSource>>) -> Router {
    build_router(state_with(config, source))
}

/// Send a GET through the router in-process.
#[allow(dead_code)]
pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Start a real server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(config: AppConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::from_state(state_with(config, None));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
