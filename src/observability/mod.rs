//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers produce:
//!     → logging.rs (structured log events, JSON by default)
//!     → metrics.rs (request counter + latency histogram)
//!     → tracing.rs (spans and metrics pushed over OTLP)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape of /metrics)
//!     → OpenTelemetry collector (OTLP/HTTP push)
//! ```
//!
//! # Design Decisions
//! - Telemetry objects are built once in main and injected, never global
//! - Request ID flows through the request span
//! - Export failures never affect request handling

use thiserror::Error;

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::metrics::RequestMetrics;
pub use self::tracing::OtlpPipeline;

/// Errors raised while initializing observability.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// Failed to build an OTLP exporter.
    #[error("failed to build OTLP exporter: {0}")]
    OtlpExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// Failed to initialize tracing subscriber.
    #[error("failed to initialize tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),

    /// Invalid histogram configuration.
    #[error("failed to build Prometheus recorder: {0}")]
    Prometheus(#[from] metrics_exporter_prometheus::BuildError),
}
