use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::{Error, StatsError, UpstreamError};

/// Error type for API responses. Renders as `{ "error": message }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(UpstreamError),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
            Self::Upstream(e) => write!(f, "upstream_error: {e}"),
            Self::Internal(msg) => write!(f, "internal_error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg) => msg,
            Self::Upstream(e) => {
                tracing::error!(ticker = %e.ticker(), error = %e, "upstream fetch failed");
                format!("Failed to fetch data from the upstream service: {e}")
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                msg
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Upstream(e) => Self::Upstream(e),
            Error::Stats(e @ StatsError::InsufficientData { .. }) => Self::BadRequest(e.to_string()),
            Error::Stats(e @ StatsError::DimensionMismatch { .. }) => Self::Internal(e.to_string()),
            Error::Ticker(e) => Self::BadRequest(format!("invalid ticker: {e}")),
            Error::Validation(msg) => Self::BadRequest(msg),
            Error::Config(msg) => Self::Internal(msg),
        }
    }
}
