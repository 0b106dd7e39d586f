//! Distributed tracing and metric push over OTLP.
//!
//! # Responsibilities
//! - Build the tracer and meter providers for the configured collector
//! - Hand out a tracer for the `tracing` bridge and a meter for metrics
//! - Flush and close both providers at shutdown
//!
//! Providers use the blocking HTTP client and their own export threads, so
//! they are built before the Tokio runtime starts and shut down after it
//! stops.

use std::time::Duration;

use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;

use crate::config::OtlpConfig;
use crate::observability::ObservabilityError;

/// Instrumentation scope for every tracer and meter of this crate.
const SCOPE: &str = env!("CARGO_PKG_NAME");

/// Tracer handed to the `tracing-opentelemetry` layer.
pub type OtlpTracer = <SdkTracerProvider as TracerProvider>::Tracer;

/// Tracer and meter providers exporting to an OTLP/HTTP collector.
pub struct OtlpPipeline {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl OtlpPipeline {
    /// Build the pipeline, or `None` when export is disabled.
    pub fn build(config: &OtlpConfig, service_name: &str) -> Result<Option<Self>, ObservabilityError> {
        if !config.enabled {
            return Ok(None);
        }

        let resource = Resource::builder()
            .with_service_name(service_name.to_string())
            .build();

        let span_exporter = SpanExporter::builder()
            .with_http()
            .with_endpoint(config.traces_endpoint())
            .build()?;
        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .with_resource(resource.clone())
            .build();

        let metric_exporter = MetricExporter::builder()
            .with_http()
            .with_endpoint(config.metrics_endpoint())
            .build()?;
        let reader = PeriodicReader::builder(metric_exporter)
            .with_interval(Duration::from_secs(config.export_interval_secs))
            .build();
        let meter_provider = SdkMeterProvider::builder()
            .with_reader(reader)
            .with_resource(resource)
            .build();

        Ok(Some(Self {
            tracer_provider,
            meter_provider,
        }))
    }

    pub fn tracer(&self) -> OtlpTracer {
        self.tracer_provider.tracer(SCOPE)
    }

    pub fn meter(&self) -> Meter {
        self.meter_provider.meter(SCOPE)
    }

    /// Flush pending spans and metrics, then close both providers.
    pub fn shutdown(self) {
        if let Err(e) = self.tracer_provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
        if let Err(e) = self.meter_provider.shutdown() {
            tracing::warn!(error = %e, "Meter provider shutdown failed");
        }
    }
}
