//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, endpoint, status
//! - `http_request_duration_seconds` (histogram): latency of successful requests
//!
//! The Prometheus recorder is owned by [`RequestMetrics`] rather than
//! installed as the process-wide recorder, so each server (and each test) has
//! its own registry. When OTLP export is enabled, the same observations are
//! mirrored to OpenTelemetry instruments.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram, with_local_recorder};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use opentelemetry::metrics::{Counter, Histogram, Meter};
use opentelemetry::KeyValue;

use crate::observability::ObservabilityError;

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

struct OtelInstruments {
    requests: Counter<u64>,
    duration: Histogram<f64>,
}

/// Request counters and latency histograms for the HTTP handlers.
pub struct RequestMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    otel: Option<OtelInstruments>,
}

impl RequestMetrics {
    /// Create a recorder whose latency histogram uses `buckets` (seconds).
    pub fn new(buckets: &[f64]) -> Result<Self, ObservabilityError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), buckets)?
            .build_recorder();
        let handle = recorder.handle();

        with_local_recorder(&recorder, || {
            describe_counter!(REQUESTS_TOTAL, "Total HTTP requests");
            describe_histogram!(REQUEST_DURATION, "HTTP request latency");
        });

        Ok(Self {
            recorder,
            handle,
            otel: None,
        })
    }

    /// Mirror every observation to instruments created from `meter`.
    pub fn with_meter(mut self, meter: &Meter) -> Self {
        self.otel = Some(OtelInstruments {
            requests: meter
                .u64_counter("http.server.requests")
                .with_description("Total HTTP requests")
                .build(),
            duration: meter
                .f64_histogram("http.server.request.duration")
                .with_description("HTTP request latency")
                .with_unit("s")
                .build(),
        });
        self
    }

    /// Count one request outcome.
    pub fn record_request(&self, method: &str, endpoint: &'static str, status: u16) {
        with_local_recorder(&self.recorder, || {
            counter!(
                REQUESTS_TOTAL,
                "method" => method.to_string(),
                "endpoint" => endpoint,
                "status" => status.to_string()
            )
            .increment(1);
        });

        if let Some(otel) = &self.otel {
            otel.requests.add(
                1,
                &[
                    KeyValue::new("http.request.method", method.to_string()),
                    KeyValue::new("http.route", endpoint),
                    KeyValue::new("http.response.status_code", i64::from(status)),
                ],
            );
        }
    }

    /// Record the latency of one request.
    pub fn observe_latency(&self, method: &str, endpoint: &'static str, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        with_local_recorder(&self.recorder, || {
            histogram!(
                REQUEST_DURATION,
                "method" => method.to_string(),
                "endpoint" => endpoint
            )
            .record(secs);
        });

        if let Some(otel) = &self.otel {
            otel.duration.record(
                secs,
                &[
                    KeyValue::new("http.request.method", method.to_string()),
                    KeyValue::new("http.route", endpoint),
                ],
            );
        }
    }

    /// Render all series in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for RequestMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestMetrics")
            .field("otlp", &self.otel.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCKETS: &[f64] = &[0.05, 0.1, 0.5, 1.0];

    #[test]
    fn test_render_contains_series() {
        let metrics = RequestMetrics::new(BUCKETS).unwrap();
        metrics.record_request("GET", "/api/users", 200);
        metrics.record_request("GET", "/api/users", 200);
        metrics.record_request("GET", "/api/users", 500);
        metrics.observe_latency("GET", "/api/users", Duration::from_millis(70));

        let text = metrics.render();
        assert!(text.contains("# TYPE http_requests_total counter"));
        assert!(text.contains("# TYPE http_request_duration_seconds histogram"));
        assert!(text.contains("http_request_duration_seconds_bucket"));
        assert!(text.contains("le=\"0.1\""));

        let ok_line = text
            .lines()
            .find(|l| l.starts_with("http_requests_total{") && l.contains("status=\"200\""))
            .expect("200 series");
        assert!(ok_line.ends_with(" 2"), "{ok_line}");
        assert!(ok_line.contains("endpoint=\"/api/users\""));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = RequestMetrics::new(BUCKETS).unwrap();
        let b = RequestMetrics::new(BUCKETS).unwrap();
        a.record_request("GET", "/api/error", 500);

        assert!(a.render().contains("/api/error"));
        assert!(!b.render().contains("/api/error"));
    }

    #[test]
    fn test_rejects_empty_buckets() {
        assert!(RequestMetrics::new(&[]).is_err());
    }
}
