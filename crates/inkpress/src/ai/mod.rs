//! Content generation backends for AI-assisted posts.
//!
//! The pipeline talks to a [`ContentGenerator`]. The bundled
//! [`TemplateGenerator`] works offline and deterministically; hosted model
//! backends implement the same trait.

pub mod template;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::pipeline::GenerationRequest;

pub use template::TemplateGenerator;

/// Post structure produced by the outline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    pub title: String,
    pub sections: Vec<String>,
}

/// Post content produced by the draft stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub title: String,
    pub summary: String,
    pub body_markdown: String,
    pub tags: Vec<String>,
}

impl Draft {
    pub fn word_count(&self) -> usize {
        self.body_markdown.split_whitespace().count()
    }
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn outline(&self, request: &GenerationRequest) -> Result<Outline, GeneratorError>;

    async fn draft(
        &self,
        request: &GenerationRequest,
        outline: &Outline,
    ) -> Result<Draft, GeneratorError>;
}
