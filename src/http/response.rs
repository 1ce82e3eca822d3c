//! Response envelope and error translation.
//!
//! # Responsibilities
//! - Render failures as `{success: false, message, error?, status?}`
//! - Map FlightAware and Auto.dev failures to client-facing status codes
//! - Timestamp helper shared by every enriched payload
//!
//! # Design Decisions
//! - `ApiError` is the only error type that crosses the handler boundary
//! - Upstream 401/403/404/429 get fixed messages; other statuses pass through

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::observability::metrics;
use crate::upstream::UpstreamError;

/// Client-facing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<String>,
    upstream_status: Option<u16>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.map(str::to_string),
            upstream_status: None,
        }
    }

    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(code), message)
    }

    pub fn not_found(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, Some(code), message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Translate a FlightAware failure. `fallback` is the endpoint-specific
    /// message used when the upstream could not be reached at all.
    pub fn flightaware(err: &UpstreamError, fallback: &str) -> Self {
        tracing::error!(error = %err, status = ?err.status(), "FlightAware API error");
        metrics::record_upstream_failure("flightaware");

        match err {
            UpstreamError::Status { status, message } => match status.as_u16() {
                401 => Self::new(
                    StatusCode::UNAUTHORIZED,
                    Some("UNAUTHORIZED"),
                    "FlightAware API key is invalid or expired",
                ),
                403 => Self::new(
                    StatusCode::FORBIDDEN,
                    Some("FORBIDDEN"),
                    "Access denied by FlightAware",
                ),
                404 => Self::not_found("NOT_FOUND", "Resource not found"),
                429 => Self::new(
                    StatusCode::TOO_MANY_REQUESTS,
                    Some("RATE_LIMIT_EXCEEDED"),
                    "Request limit exceeded",
                ),
                _ => {
                    let message = if message.is_empty() { fallback } else { message.as_str() };
                    Self::new(*status, Some("API_ERROR"), message)
                }
            },
            UpstreamError::NotConfigured(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("NOT_CONFIGURED"),
                err.to_string(),
            ),
            UpstreamError::Network(_)
            | UpstreamError::Decode(_)
            | UpstreamError::TooLarge { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("NETWORK_ERROR"),
                fallback,
            ),
        }
    }

    /// Translate an Auto.dev failure: upstream statuses pass through with
    /// the upstream code echoed in `status`.
    pub fn autodev(err: &UpstreamError) -> Self {
        tracing::error!(error = %err, "Auto.dev API error");
        metrics::record_upstream_failure("autodev");

        match err.status() {
            Some(status) => Self {
                status,
                message: "Auto.dev API error".to_string(),
                code: Some(err.to_string()),
                upstream_status: Some(status.as_u16()),
            },
            None => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&err.to_string()),
                "Internal server error",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: &self.message,
            error: self.code.as_deref(),
            status: self.upstream_status,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Current time as an ISO-8601 string with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
