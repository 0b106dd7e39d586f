//! Route handlers.
//!
//! Each fault-injected handler follows the same shape: sleep for a sampled
//! delay, optionally fail, then count the outcome and time it on success.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tokio::time::Instant;
use tracing::Span;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics::PROMETHEUS_CONTENT_TYPE;
use crate::users::User;

/// Endpoint labels used in metrics.
pub const LIST_USERS: &str = "/api/users";
pub const GET_USER: &str = "/api/users/{id}";
pub const SLOW: &str = "/api/slow";
pub const ERROR: &str = "/api/error";

const GET: &str = "GET";

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceStatus> {
    tracing::info!("Root endpoint accessed");
    Json(ServiceStatus {
        status: "ok",
        service: state.config.service.name.clone(),
    })
}

#[tracing::instrument(
    name = "get_users",
    skip_all,
    fields(user.count = tracing::field::Empty, error = tracing::field::Empty)
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let start = Instant::now();
    let profile = &state.config.faults.list_users;

    state.faults.delay(profile).await;

    if state.faults.should_fail(profile) {
        tracing::error!(error_code = "DB_ERROR", "Failed to fetch users");
        state.metrics.record_request(GET, LIST_USERS, 500);
        Span::current().record("error", true);
        return Err(ApiError::Internal("Database error"));
    }

    let users = state.users.all().to_vec();
    tracing::info!(count = users.len(), "Fetched {} users", users.len());
    state.metrics.record_request(GET, LIST_USERS, 200);
    state.metrics.observe_latency(GET, LIST_USERS, start.elapsed());
    Span::current().record("user.count", users.len() as u64);

    Ok(Json(UsersResponse { users }))
}

#[tracing::instrument(
    name = "get_user",
    skip_all,
    fields(user.id = tracing::field::Empty, error = tracing::field::Empty)
)]
pub async fn get_user(
    State(state): State<AppState>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let start = Instant::now();

    let raw = match user_id {
        Ok(Path(raw)) => raw,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Invalid user id");
            state.metrics.record_request(GET, GET_USER, 422);
            Span::current().record("error", true);
            return Err(ApiError::Unprocessable(
                "user_id must be an integer".to_string(),
            ));
        }
    };

    let user_id = match parse_user_id(&raw) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(user_id = %raw, "Invalid user id");
            state.metrics.record_request(GET, GET_USER, 422);
            Span::current().record("error", true);
            return Err(e);
        }
    };
    let span = Span::current();
    match user_id {
        Some(id) => {
            span.record("user.id", id);
        }
        None => {
            span.record("user.id", raw.as_str());
        }
    }

    let profile = &state.config.faults.get_user;
    state.faults.delay(profile).await;

    if state.faults.should_fail(profile) {
        tracing::error!(user_id = %raw, error_code = "DB_ERROR", "Failed to fetch user");
        state.metrics.record_request(GET, GET_USER, 500);
        span.record("error", true);
        return Err(ApiError::Internal("Database error"));
    }

    let Some(user) = user_id.and_then(|id| state.users.find(id)).cloned() else {
        tracing::warn!(user_id = %raw, "User not found: {}", raw);
        state.metrics.record_request(GET, GET_USER, 404);
        span.record("error", true);
        return Err(ApiError::NotFound("User not found"));
    };

    tracing::info!(user_id = user.id, "Fetched user: {}", user.id);
    state.metrics.record_request(GET, GET_USER, 200);
    state.metrics.observe_latency(GET, GET_USER, start.elapsed());

    Ok(Json(user))
}

/// Parse the `{user_id}` path segment.
///
/// `Ok(None)` is a well-formed integer outside the `i64` range: it cannot
/// match any user, so the caller answers 404 rather than 422.
fn parse_user_id(raw: &str) -> Result<Option<i64>, ApiError> {
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(Some(id));
    }

    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(None)
    } else {
        Err(ApiError::Unprocessable(
            "user_id must be an integer".to_string(),
        ))
    }
}

/// Deliberately slow endpoint, for outlier latency samples.
#[tracing::instrument(name = "slow_endpoint", skip_all)]
pub async fn slow(State(state): State<AppState>) -> Json<Message> {
    let start = Instant::now();
    tracing::warn!("Slow endpoint called");

    state.faults.delay(&state.config.faults.slow).await;

    state.metrics.record_request(GET, SLOW, 200);
    state.metrics.observe_latency(GET, SLOW, start.elapsed());
    Json(Message {
        message: "This was slow",
    })
}

/// Always fails.
pub async fn always_error(State(state): State<AppState>) -> ApiError {
    tracing::error!(error_type = "intentional", "Intentional error triggered");
    state.metrics.record_request(GET, ERROR, 500);
    ApiError::Internal("Intentional error for testing")
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy" })
}

/// Emit one log line per severity.
pub async fn generate_logs() -> Json<Message> {
    tracing::debug!("Debug log message");
    tracing::info!(user = "test", action = "view", "Info log message");
    tracing::warn!(threshold = 80, current = 85, "Warning log message");
    tracing::error!(error_code = "ERR_001", "Error log message");
    Json(Message {
        message: "Logs generated",
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found")
}
