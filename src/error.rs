//! Request-time error taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Body text returned for every upstream failure.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch data from Neople API";

/// Failures while talking to the Neople API.
///
/// The variants only feed logs and metrics. Callers always see the same 500.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Connection, DNS, timeout or body read failure.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Upstream answered with a body that is not JSON.
    #[error("upstream returned invalid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

impl ProxyError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Upstream(e) if e.is_timeout() => "timeout",
            ProxyError::Upstream(_) => "transport",
            ProxyError::InvalidPayload(_) => "payload",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": UPSTREAM_FAILURE_MESSAGE })),
        )
            .into_response()
    }
}
