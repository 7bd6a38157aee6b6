//! API error type and its HTTP mapping

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use thiserror::Error;

use super::models::ErrorBody;
use crate::output::OutputError;

/// Body sent for every internal fault. Details only go to the log.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Malformed body, missing field, or a value out of bounds
    #[error("{0}")]
    Validation(String),

    /// Client exceeded its request budget
    #[error("Rate limit exceeded: {limit}")]
    RateLimited { limit: String, retry_after: Duration },

    /// Anything unexpected; never shown to the client
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(message) => {
                warn!("rejected request: {}", message);
                (status, Json(ErrorBody { detail: message })).into_response()
            }
            ApiError::RateLimited { limit, retry_after } => {
                // Round up so clients never retry early
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                let detail = format!("Rate limit exceeded: {}", limit);
                let mut response = (status, Json(ErrorBody { detail })).into_response();
                response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
                response
            }
            ApiError::Internal(message) => {
                error!("internal error: {}", message);
                (status, Json(ErrorBody { detail: INTERNAL_ERROR_DETAIL.to_string() })).into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<OutputError> for ApiError {
    fn from(e: OutputError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("render task failed: {}", e))
    }
}
