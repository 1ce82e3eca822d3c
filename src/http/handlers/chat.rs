//! Travel assistant chat endpoint.
//!
//! Errors here use a bare `{error}` body instead of the flight envelope,
//! which is what the chat widget reads.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::chat::ChatRequest;
use crate::http::server::AppState;
use crate::http::validation::present;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

fn chat_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub async fn ai_chat(State(state): State<AppState>, body: Bytes) -> Response {
    if !state.chat.is_configured() {
        return chat_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "OPENAI_API_KEY not configured",
        );
    }

    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting malformed chat body");
            return chat_error(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };
    let Some(message) = present(request.message.as_deref()) else {
        return chat_error(StatusCode::BAD_REQUEST, "Message is required");
    };

    let completion = state.chat.completion_request(
        message,
        request.model.clone(),
        request.max_tokens,
        request.temperature,
    );
    tracing::info!(model = %completion.model, "Forwarding chat completion");

    match state.chat.complete(&completion).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Chat completion failed");
            metrics::record_upstream_failure("openai");
            let message = match &e {
                UpstreamError::Status { status, .. } => format!("OpenAI API error: {status}"),
                other => other.to_string(),
            };
            chat_error(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}
