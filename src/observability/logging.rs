//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - JSON format for production, pretty format for development
//! - Bridge spans to OpenTelemetry when an exporter is configured
//!
//! `RUST_LOG` takes precedence over the configured log level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::tracing::OtlpTracer;
use crate::observability::ObservabilityError;

/// Build the env filter, preferring `RUST_LOG` over the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig, tracer: Option<OtlpTracer>) -> Result<(), ObservabilityError> {
    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };
    let otel_layer = tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(env_filter(config))
        .try_init()?;

    Ok(())
}
