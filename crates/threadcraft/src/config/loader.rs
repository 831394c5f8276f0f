use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

/// Env vars consulted by [`load_config_from_env`], in priority order.
pub const API_URL_ENV_VARS: &[&str] = &["THREADCRAFT_API_URL", "API_URL"];

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Builds a config from the environment alone: the base URL is required,
/// everything else takes its default.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    let api_url = API_URL_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(ConfigError::MissingApiUrl)?;

    let config = Config::with_api_url(api_url);
    validate_config(&config)?;
    Ok(config)
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        load_config_from_env()
    }
}

/// `<platform config dir>/threadcraft/config.json`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("threadcraft").join("config.json"))
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    validate_api_url(&config.api_url)?;

    let slots = &config.slots;
    validate_distinct_slots(
        "ideation",
        &[&slots.ideation.analysis, &slots.ideation.trends],
    )?;
    validate_distinct_slots(
        "generate",
        &[&slots.generate.analysis, &slots.generate.thread],
    )?;
    validate_distinct_slots(
        "edit",
        &[
            &slots.edit.hook,
            &slots.edit.cta,
            &slots.edit.story,
            &slots.edit.feedback,
        ],
    )?;

    Ok(())
}

fn validate_api_url(api_url: &str) -> Result<(), ConfigError> {
    if api_url.trim().is_empty() {
        return Err(ConfigError::MissingApiUrl);
    }

    let parsed = reqwest::Url::parse(api_url).map_err(|e| ConfigError::InvalidApiUrl {
        url: api_url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl {
            url: api_url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(())
}

// Two slots sharing an id would silently overwrite each other in the tweaks map.
fn validate_distinct_slots(endpoint: &str, ids: &[&String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(ConfigError::InvalidSlot {
                endpoint: endpoint.to_string(),
                reason: "Slot id must not be empty".to_string(),
            });
        }
        if !seen.insert(id.as_str()) {
            return Err(ConfigError::InvalidSlot {
                endpoint: endpoint.to_string(),
                reason: format!("Duplicate slot id '{}'", id),
            });
        }
    }
    Ok(())
}
