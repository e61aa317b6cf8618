use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Content generation failed: {0}")]
    Generator(#[from] crate::error::GeneratorError),

    #[error("Publishing failed: {0}")]
    Publish(#[from] crate::error::PublishError),

    #[error("Stage '{0}' has not produced its output")]
    MissingStageOutput(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    ImageSearchFailed { query: String, error: String },
    NoImageFound { query: String },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::ImageSearchFailed { query, error } => {
                write!(f, "image search for '{}' failed: {}", query, error)
            }
            PipelineWarning::NoImageFound { query } => {
                write!(f, "no image found for '{}'", query)
            }
        }
    }
}
