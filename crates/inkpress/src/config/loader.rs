use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::config::schema::{Config, ImageProvider, CONFIG_VERSION};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

/// Location of the config file when none is given: `<config dir>/inkpress/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("inkpress").join("config.json"))
}

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

/// Semantic checks the schema cannot express.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.server.bind.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::Validation {
            message: format!(
                "server.bind '{}' is not a valid socket address",
                config.server.bind
            ),
        });
    }

    if config.progress.listener_buffer == 0 {
        return Err(ConfigError::Validation {
            message: "progress.listener_buffer must be at least 1".to_string(),
        });
    }

    if config.progress.keep_alive_secs == 0 {
        return Err(ConfigError::Validation {
            message: "progress.keep_alive_secs must be at least 1".to_string(),
        });
    }

    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        return Err(ConfigError::Validation {
            message: format!("Invalid logging.level '{}': {}", config.logging.level, e),
        });
    }

    if config.generation.max_tags == 0 {
        return Err(ConfigError::Validation {
            message: "generation.max_tags must be at least 1".to_string(),
        });
    }

    if config.images.provider == ImageProvider::Unsplash
        && !(config.images.api_base.starts_with("http://")
            || config.images.api_base.starts_with("https://"))
    {
        return Err(ConfigError::Validation {
            message: format!(
                "images.api_base '{}' must be an http(s) URL",
                config.images.api_base
            ),
        });
    }

    Ok(())
}
