use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InkpressError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("Image search error: {0}")]
    ImageSearch(#[from] ImageSearchError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

#[derive(Error, Debug)]
pub enum ImageSearchError {
    #[error("Image search is not configured: {0}")]
    NotConfigured(String),

    #[error("Image search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Image search API returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Topic is empty")]
    EmptyTopic,

    #[error("Outline has no sections")]
    EmptyOutline,

    #[error("Content generation failed: {0}")]
    Generation(String),
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Post store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, InkpressError>;
