//! Cover image lookup for generated posts.

pub mod unsplash;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{ImageProvider, ImagesConfig};
use crate::error::ImageSearchError;
use crate::secrets::resolve_secret_optional;

pub use unsplash::UnsplashClient;

/// One image candidate returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Photographer credit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Page on the provider's site, for attribution links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<ImageResult>, ImageSearchError>;

    fn provider(&self) -> &'static str;
}

/// Search backend used when no provider is configured. Always finds nothing.
#[derive(Debug, Default)]
pub struct NoImageSearch;

#[async_trait]
impl ImageSearch for NoImageSearch {
    async fn search(&self, _query: &str, _count: u8) -> Result<Vec<ImageResult>, ImageSearchError> {
        Ok(Vec::new())
    }

    fn provider(&self) -> &'static str {
        "none"
    }
}

/// Builds the configured search backend, resolving its access key.
pub fn from_config(config: &ImagesConfig) -> Result<Arc<dyn ImageSearch>, ImageSearchError> {
    match config.provider {
        ImageProvider::None => Ok(Arc::new(NoImageSearch)),
        ImageProvider::Unsplash => {
            let access_key = resolve_secret_optional(
                config.access_key.as_deref(),
                config.access_key_file.as_deref(),
                config.access_key_env_var.as_deref(),
            )
            .map_err(|e| ImageSearchError::NotConfigured(e.to_string()))?
            .ok_or_else(|| {
                ImageSearchError::NotConfigured(
                    "unsplash provider needs an access key".to_string(),
                )
            })?;
            Ok(Arc::new(UnsplashClient::new(&config.api_base, access_key)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_image_search_returns_nothing() {
        let search = NoImageSearch;
        assert!(search.search("rust", 3).await.unwrap().is_empty());
        assert_eq!(search.provider(), "none");
    }

    #[test]
    fn test_from_config_defaults_to_none() {
        let search = from_config(&ImagesConfig::default()).unwrap();
        assert_eq!(search.provider(), "none");
    }

    #[test]
    fn test_from_config_unsplash_with_direct_key() {
        let config = ImagesConfig {
            provider: ImageProvider::Unsplash,
            access_key: Some("test-key".to_string()),
            ..ImagesConfig::default()
        };
        let search = from_config(&config).unwrap();
        assert_eq!(search.provider(), "unsplash");
    }

    #[test]
    fn test_from_config_unsplash_without_key_fails() {
        let config = ImagesConfig {
            provider: ImageProvider::Unsplash,
            access_key: None,
            access_key_file: None,
            access_key_env_var: None,
            ..ImagesConfig::default()
        };
        match from_config(&config) {
            Err(ImageSearchError::NotConfigured(msg)) => {
                assert!(msg.contains("needs an access key"), "{}", msg)
            }
            other => panic!("expected NotConfigured, got {:?}", other.map(|s| s.provider())),
        }
    }

    #[test]
    fn test_from_config_unsplash_unreadable_key_file_fails() {
        let config = ImagesConfig {
            provider: ImageProvider::Unsplash,
            access_key: None,
            access_key_file: Some("/nonexistent/inkpress/unsplash-key".to_string()),
            access_key_env_var: None,
            ..ImagesConfig::default()
        };
        match from_config(&config) {
            Err(ImageSearchError::NotConfigured(msg)) => {
                assert!(msg.contains("/nonexistent/inkpress/unsplash-key"), "{}", msg)
            }
            other => panic!("expected NotConfigured, got {:?}", other.map(|s| s.provider())),
        }
    }
}
