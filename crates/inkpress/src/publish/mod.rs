//! Destination for finished posts.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::Draft;
use crate::error::PublishError;
use crate::images::ImageResult;
use crate::sanitize::slugify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// A post produced by a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPost {
    pub id: Uuid,
    pub run_id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub body_markdown: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<ImageResult>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

impl GeneratedPost {
    pub fn from_draft(run_id: Uuid, draft: &Draft, cover_image: Option<ImageResult>) -> Self {
        let mut slug = slugify(&draft.title);
        if slug.is_empty() {
            slug = format!("post-{}", run_id.simple());
        }
        Self {
            id: Uuid::new_v4(),
            run_id,
            title: draft.title.clone(),
            slug,
            summary: draft.summary.clone(),
            body_markdown: draft.body_markdown.clone(),
            tags: draft.tags.clone(),
            cover_image,
            status: PostStatus::Draft,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Stores the post and returns it as stored. The slug may be adjusted to
    /// stay unique.
    async fn publish(&self, post: GeneratedPost) -> Result<GeneratedPost, PublishError>;

    /// All stored posts, oldest first.
    async fn list(&self) -> Result<Vec<GeneratedPost>, PublishError>;
}

/// In-memory post store.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    posts: RwLock<Vec<GeneratedPost>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_slug(existing: &[GeneratedPost], base: &str) -> String {
    let taken = |slug: &str| existing.iter().any(|p| p.slug == slug);
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, mut post: GeneratedPost) -> Result<GeneratedPost, PublishError> {
        let mut posts = self
            .posts
            .write()
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;

        let slug = unique_slug(&posts, &post.slug);
        if slug != post.slug {
            debug!("Slug '{}' taken, using '{}'", post.slug, slug);
            post.slug = slug;
        }

        info!("Stored post '{}' ({})", post.slug, post.id);
        posts.push(post.clone());
        Ok(post)
    }

    async fn list(&self) -> Result<Vec<GeneratedPost>, PublishError> {
        let posts = self
            .posts
            .read()
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        Ok(posts.clone())
    }
}
