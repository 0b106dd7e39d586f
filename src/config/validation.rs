//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays ordered, rates within [0, 1])
//! - Check addresses and exporter settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("service name must not be empty")]
    EmptyServiceName,

    #[error("faults.{profile}: min_delay_ms ({min}) exceeds max_delay_ms ({max})")]
    DelayRange {
        profile: &'static str,
        min: u64,
        max: u64,
    },

    #[error("faults.{profile}: failure_rate {rate} is outside [0, 1]")]
    FailureRate { profile: &'static str, rate: f64 },

    #[error("observability.histogram_buckets must be non-empty, finite and strictly increasing")]
    HistogramBuckets,

    #[error("observability.otlp.endpoint must not be empty when OTLP is enabled")]
    OtlpEndpoint,

    #[error("observability.otlp.export_interval_secs must be greater than zero")]
    OtlpInterval,
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.service.name.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    for (name, profile) in config.faults.profiles() {
        if profile.min_delay_ms > profile.max_delay_ms {
            errors.push(ValidationError::DelayRange {
                profile: name,
                min: profile.min_delay_ms,
                max: profile.max_delay_ms,
            });
        }
        if !(0.0..=1.0).contains(&profile.failure_rate) {
            errors.push(ValidationError::FailureRate {
                profile: name,
                rate: profile.failure_rate,
            });
        }
    }

    let buckets = &config.observability.histogram_buckets;
    let increasing = buckets.windows(2).all(|w| w[0] < w[1]);
    if buckets.is_empty() || !increasing || buckets.iter().any(|b| !b.is_finite()) {
        errors.push(ValidationError::HistogramBuckets);
    }

    let otlp = &config.observability.otlp;
    if otlp.enabled {
        if otlp.endpoint.trim().is_empty() {
            errors.push(ValidationError::OtlpEndpoint);
        }
        if otlp.export_interval_secs == 0 {
            errors.push(ValidationError::OtlpInterval);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
