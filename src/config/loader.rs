//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override upstream credentials.
pub const FLIGHTAWARE_API_KEY_ENV: &str = "FLIGHTAWARE_API_KEY";
pub const AUTO_DEV_API_KEY_ENV: &str = "AUTO_DEV_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_ORGANIZATION_ENV: &str = "OPENAI_ORGANIZATION";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration text, apply environment overrides and validate.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let mut config: GatewayConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay credentials from the environment. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(FLIGHTAWARE_API_KEY_ENV) {
        config.flightaware.api_key = key;
    }
    if let Some(key) = get(AUTO_DEV_API_KEY_ENV) {
        config.autodev.api_key = key;
    }
    if let Some(key) = get(OPENAI_API_KEY_ENV) {
        config.chat.api_key = key;
    }
    if let Some(org) = get(OPENAI_ORGANIZATION_ENV) {
        config.chat.organization = Some(org);
    }
}
