//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Service identity reported by `/` and in telemetry.
    pub service: ServiceConfig,

    /// Per-endpoint latency and failure injection.
    pub faults: FaultConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "sample-api".to_string(),
        }
    }
}

/// Delay range and failure probability applied to one endpoint.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FaultProfile {
    /// Lower bound of the injected delay.
    pub min_delay_ms: u64,

    /// Upper bound of the injected delay.
    pub max_delay_ms: u64,

    /// Probability in [0, 1] that a request fails after the delay.
    pub failure_rate: f64,
}

impl FaultProfile {
    pub const fn new(min_delay_ms: u64, max_delay_ms: u64, failure_rate: f64) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms,
            failure_rate,
        }
    }

    /// No delay, no failures.
    pub const fn none() -> Self {
        Self::new(0, 0, 0.0)
    }
}

/// A `[faults.<endpoint>]` table as written in the file. Keys left out keep
/// that endpoint's default.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct FaultProfileTable {
    min_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
    failure_rate: Option<f64>,
}

impl FaultProfileTable {
    fn over(self, base: FaultProfile) -> FaultProfile {
        FaultProfile {
            min_delay_ms: self.min_delay_ms.unwrap_or(base.min_delay_ms),
            max_delay_ms: self.max_delay_ms.unwrap_or(base.max_delay_ms),
            failure_rate: self.failure_rate.unwrap_or(base.failure_rate),
        }
    }
}

/// The `[faults]` table as written in the file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FaultConfigTable {
    seed: Option<u64>,
    list_users: FaultProfileTable,
    get_user: FaultProfileTable,
    slow: FaultProfileTable,
}

impl From<FaultConfigTable> for FaultConfig {
    fn from(table: FaultConfigTable) -> Self {
        let defaults = FaultConfig::default();
        Self {
            seed: table.seed,
            list_users: table.list_users.over(defaults.list_users),
            get_user: table.get_user.over(defaults.get_user),
            slow: table.slow.over(defaults.slow),
        }
    }
}

/// Fault injection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(from = "FaultConfigTable")]
pub struct FaultConfig {
    /// Seed for reproducible runs. Unset means a thread-local RNG.
    pub seed: Option<u64>,

    /// `GET /api/users`.
    pub list_users: FaultProfile,

    /// `GET /api/users/{user_id}`.
    pub get_user: FaultProfile,

    /// `GET /api/slow`.
    pub slow: FaultProfile,
}

impl FaultConfig {
    /// All endpoints answer immediately and never fail.
    pub fn disabled() -> Self {
        Self {
            seed: None,
            list_users: FaultProfile::none(),
            get_user: FaultProfile::none(),
            slow: FaultProfile::none(),
        }
    }

    pub(crate) fn profiles(&self) -> [(&'static str, &FaultProfile); 3] {
        [
            ("list_users", &self.list_users),
            ("get_user", &self.get_user),
            ("slow", &self.slow),
        ]
    }
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            seed: None,
            list_users: FaultProfile::new(50, 300, 0.05),
            get_user: FaultProfile::new(20, 150, 0.0),
            slow: FaultProfile::new(500, 1500, 0.0),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, for development.
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. "info", "sample_api=debug"). RUST_LOG wins.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Buckets (seconds) for `http_request_duration_seconds`.
    pub histogram_buckets: Vec<f64>,

    /// Push export to an OpenTelemetry collector.
    pub otlp: OtlpConfig,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            histogram_buckets: vec![
                0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
            ],
            otlp: OtlpConfig::default(),
        }
    }
}

/// OTLP/HTTP exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OtlpConfig {
    pub enabled: bool,

    /// Collector base URL; `/v1/traces` and `/v1/metrics` are appended.
    pub endpoint: String,

    /// Metric push interval in seconds.
    pub export_interval_secs: u64,
}

impl OtlpConfig {
    pub fn traces_endpoint(&self) -> String {
        format!("{}/v1/traces", self.endpoint.trim_end_matches('/'))
    }

    pub fn metrics_endpoint(&self) -> String {
        format!("{}/v1/metrics", self.endpoint.trim_end_matches('/'))
    }
}

impl Default for OtlpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://otel-collector:4318".to_string(),
            export_interval_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fault_profiles() {
        let faults = FaultConfig::default();
        assert_eq!(faults.list_users, FaultProfile::new(50, 300, 0.05));
        assert_eq!(faults.get_user, FaultProfile::new(20, 150, 0.0));
        assert_eq!(faults.slow, FaultProfile::new(500, 1500, 0.0));
        assert!(faults.seed.is_none());
    }

    #[test]
    fn test_otlp_endpoints() {
        let otlp = OtlpConfig {
            endpoint: "http://collector:4318/".to_string(),
            ..OtlpConfig::default()
        };
        assert_eq!(otlp.traces_endpoint(), "http://collector:4318/v1/traces");
        assert_eq!(otlp.metrics_endpoint(), "http://collector:4318/v1/metrics");
    }
}
