//! Sample observability API.
//!
//! A small HTTP service that serves a fixed user dataset, injects artificial
//! latency and failures, and emits logs, Prometheus metrics and OTLP traces
//! for every request. It exists to feed an observability stack with
//! realistic-looking traffic.

// Core subsystems
pub mod config;
pub mod http;
pub mod users;

// Fault injection
pub mod faults;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
