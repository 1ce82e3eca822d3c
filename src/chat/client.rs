//! Chat completion client.
//!
//! # Responsibilities
//! - Fill caller omissions from the configured model, budget and temperature
//! - Prepend the configured system prompt
//! - Forward to `/chat/completions` with bearer auth and optional organization

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::Client;

use crate::chat::types::{ChatMessage, ChatReply, CompletionRequest, CompletionResponse};
use crate::config::ChatConfig;
use crate::upstream::{build_http_client, read_json, UpstreamError, UpstreamResult};

const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: &ChatConfig, timeout: Duration) -> UpstreamResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            config: config.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Build the upstream request for a user message.
    pub fn completion_request(
        &self,
        message: &str,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> CompletionRequest {
        CompletionRequest {
            model: model.unwrap_or_else(|| self.config.default_model.clone()),
            messages: vec![
                ChatMessage::system(self.config.system_prompt.clone()),
                ChatMessage::user(message),
            ],
            max_tokens: max_tokens.unwrap_or(self.config.max_tokens),
            temperature: temperature.unwrap_or(self.config.temperature),
        }
    }

    /// Send one completion and flatten the answer.
    pub async fn complete(&self, request: &CompletionRequest) -> UpstreamResult<ChatReply> {
        if !self.is_configured() {
            return Err(UpstreamError::NotConfigured("OpenAI"));
        }

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut builder = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(request);
        if let Some(org) = &self.config.organization {
            builder = builder.header(ORGANIZATION_HEADER, org);
        }

        let response: CompletionResponse = read_json(builder.send().await?).await?;

        Ok(ChatReply {
            response: response.first_content(),
            tokens_used: response.total_tokens(),
            model: response.model.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.config.base_url)
            .field("default_model", &self.config.default_model)
            .field("api_key_set", &self.is_configured())
            .finish()
    }
}
