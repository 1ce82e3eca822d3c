//! Shared HTTP client plumbing for third-party APIs.
//!
//! # Responsibilities
//! - Build reqwest clients with the configured upstream timeout
//! - Turn non-success responses into `UpstreamError::Status` with a readable message
//! - Decode JSON bodies, reporting malformed payloads as `UpstreamError::Decode`

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::upstream::types::{UpstreamError, UpstreamResult};

/// Build a client whose every request is bounded by `timeout`.
pub fn build_http_client(timeout: Duration) -> UpstreamResult<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("travel-gateway/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Fail with `UpstreamError::Status` unless the response is 2xx.
pub async fn ensure_success(response: Response) -> UpstreamResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("upstream error").to_string());

    Err(UpstreamError::Status { status, message })
}

/// Check status and decode the JSON body.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> UpstreamResult<T> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// Pull a human-readable message out of an upstream error body.
///
/// Looks at `error`, `message`, `detail` and `reason` (in that order); `error`
/// may itself be an object carrying a `message`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    for key in ["error", "message", "detail", "reason"] {
        match value.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Object(inner)) => {
                if let Some(Value::String(s)) = inner.get("message") {
                    return Some(s.clone());
                }
            }
            _ => {}
        }
    }
    None
}
