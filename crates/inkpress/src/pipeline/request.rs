use serde::{Deserialize, Serialize};

use super::error::PipelineError;

pub const MAX_TOPIC_CHARS: usize = 200;
pub const MAX_KEYWORDS: usize = 10;

/// What the caller wants written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Overrides the topic as the cover image search query.
    #[serde(default)]
    pub image_query: Option<String>,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(PipelineError::InvalidRequest(
                "topic must not be empty".to_string(),
            ));
        }
        if topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(PipelineError::InvalidRequest(format!(
                "topic must be at most {} characters",
                MAX_TOPIC_CHARS
            )));
        }
        if self.keywords.len() > MAX_KEYWORDS {
            return Err(PipelineError::InvalidRequest(format!(
                "at most {} keywords are allowed",
                MAX_KEYWORDS
            )));
        }
        Ok(())
    }

    /// Search query for the cover image: `image_query` if set, else the topic.
    pub fn image_query(&self) -> &str {
        self.image_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| self.topic.trim())
    }
}
