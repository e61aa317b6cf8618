//! Template-based generator (no model required).
//!
//! Builds an outline from the topic and keywords and fills each section with
//! tone-specific prose. Output is deterministic for a given request.

use std::fmt::Write;

use async_trait::async_trait;

use super::{ContentGenerator, Draft, Outline};
use crate::error::GeneratorError;
use crate::pipeline::GenerationRequest;
use crate::sanitize::slugify;

/// Opening and closing phrasing for a tone.
struct ToneStyle {
    tone: &'static str,
    opener: &'static str,
    closer: &'static str,
}

const TONES: &[ToneStyle] = &[
    ToneStyle {
        tone: "informative",
        opener: "This section covers",
        closer: "Keep these points in mind as you go further.",
    },
    ToneStyle {
        tone: "casual",
        opener: "Let's talk about",
        closer: "Not so scary after all, right?",
    },
    ToneStyle {
        tone: "technical",
        opener: "Here we examine",
        closer: "The details above apply to most production setups.",
    },
    ToneStyle {
        tone: "persuasive",
        opener: "It is worth paying attention to",
        closer: "Now is the right time to act on it.",
    },
];

fn style_for(tone: &str) -> &'static ToneStyle {
    TONES
        .iter()
        .find(|style| style.tone.eq_ignore_ascii_case(tone))
        .unwrap_or(&TONES[0])
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct TemplateGenerator {
    default_tone: String,
    max_tags: usize,
}

impl TemplateGenerator {
    pub fn new(default_tone: &str, max_tags: usize) -> Self {
        Self {
            default_tone: default_tone.to_string(),
            max_tags: max_tags.max(1),
        }
    }

    fn tone<'a>(&'a self, request: &'a GenerationRequest) -> &'a str {
        request
            .tone
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(self.default_tone.as_str())
    }

    fn tags(&self, request: &GenerationRequest) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        let candidates = request
            .keywords
            .iter()
            .map(|k| slugify(k))
            .chain(std::iter::once(slugify(&request.topic)));
        for tag in candidates {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags.truncate(self.max_tags);
        tags
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new("informative", 5)
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    async fn outline(&self, request: &GenerationRequest) -> Result<Outline, GeneratorError> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(GeneratorError::EmptyTopic);
        }

        let mut sections = vec!["Introduction".to_string(), format!("Why {} matters", topic)];
        for keyword in &request.keywords {
            let keyword = keyword.trim();
            if keyword.is_empty() {
                continue;
            }
            let section = format!("Working with {}", keyword);
            if !sections.contains(&section) {
                sections.push(section);
            }
        }
        sections.push("Key takeaways".to_string());

        Ok(Outline {
            title: title_case(topic),
            sections,
        })
    }

    async fn draft(
        &self,
        request: &GenerationRequest,
        outline: &Outline,
    ) -> Result<Draft, GeneratorError> {
        if outline.sections.is_empty() {
            return Err(GeneratorError::EmptyOutline);
        }

        let tone = self.tone(request);
        let style = style_for(tone);
        let topic = request.topic.trim();

        let mut body = String::new();
        let _ = writeln!(body, "# {}\n", outline.title);
        for section in &outline.sections {
            let _ = writeln!(body, "## {}\n", section);
            let _ = writeln!(
                body,
                "{} {} in the context of {}. {}\n",
                style.opener,
                section.to_lowercase(),
                topic,
                style.closer
            );
        }

        Ok(Draft {
            title: outline.title.clone(),
            summary: format!("A {} look at {}.", style.tone, topic),
            body_markdown: body.trim_end().to_string(),
            tags: self.tags(request),
        })
    }
}
