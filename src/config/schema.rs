//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// FlightAware AeroAPI upstream.
    pub flightaware: FlightAwareConfig,

    /// Auto.dev vehicle listings upstream.
    pub autodev: AutoDevConfig,

    /// Chat completion upstream.
    pub chat: ChatConfig,

    /// Bounds applied to caller-supplied `limit` parameters.
    pub limits: LimitConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for an inbound request, in seconds.
    pub request_secs: u64,

    /// Time allowed for a single upstream call, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            upstream_secs: 30,
        }
    }
}

/// FlightAware AeroAPI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlightAwareConfig {
    /// API root, without trailing slash.
    pub base_url: String,

    /// Static credential sent as `x-apikey`.
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl Default for FlightAwareConfig {
    fn default() -> Self {
        Self {
            base_url: "https://aeroapi.flightaware.com/aeroapi".to_string(),
            api_key: String::new(),
        }
    }
}

/// Auto.dev configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoDevConfig {
    /// API root, without trailing slash.
    pub base_url: String,

    /// Bearer token.
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Number of listings requested per lookup.
    pub listing_limit: u32,

    /// Largest image the photo proxy will relay, in bytes.
    pub max_photo_bytes: u64,
}

impl Default for AutoDevConfig {
    fn default() -> Self {
        Self {
            base_url: "https://auto.dev/api".to_string(),
            api_key: String::new(),
            listing_limit: 5,
            max_photo_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Chat completion upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    /// API root, without trailing slash.
    pub base_url: String,

    /// Bearer token. Chat is rejected with 500 while this is empty.
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Optional `OpenAI-Organization` header value.
    pub organization: Option<String>,

    /// Model used when the caller does not pick one.
    pub default_model: String,

    /// Default completion budget.
    pub max_tokens: u32,

    /// Default sampling temperature.
    pub temperature: f32,

    /// System message prepended to every conversation.
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            organization: None,
            default_model: "gpt-4-turbo-preview".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            system_prompt:
                "You are a helpful travel assistant for Leco Tour Transportation in New York."
                    .to_string(),
        }
    }
}

/// Upper bounds for `limit` query parameters, per endpoint family.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Multi-airport aggregation (`/getBrazilUsaFlights`).
    pub aggregate_max: usize,

    /// Single airport board (`/getAirportFlights`).
    pub airport_max: usize,

    /// Origin/destination route lookup (`/getRouteFlights`).
    pub route_max: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            aggregate_max: 50,
            airport_max: 100,
            route_max: 50,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
