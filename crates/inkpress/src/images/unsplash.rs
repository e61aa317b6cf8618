//! Unsplash photo search client.
//!
//! Uses the public search endpoint (`GET /search/photos`) with a
//! `Client-ID` access key.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{ImageResult, ImageSearch};
use crate::error::ImageSearchError;

/// Maximum length of an error body carried into errors and logs.
const MAX_ERROR_BODY_LENGTH: usize = 200;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Upper bound the API accepts for `per_page`.
const MAX_PER_PAGE: u8 = 30;

fn truncate_body(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY_LENGTH {
        let short: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
        format!("{}... (truncated)", short)
    } else {
        body.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    alt_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
    urls: PhotoUrls,
    #[serde(default)]
    user: Option<PhotoUser>,
    #[serde(default)]
    links: Option<PhotoLinks>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
    #[serde(default)]
    thumb: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PhotoLinks {
    #[serde(default)]
    html: Option<String>,
}

impl From<Photo> for ImageResult {
    fn from(photo: Photo) -> Self {
        ImageResult {
            url: photo.urls.regular,
            thumb_url: photo.urls.thumb,
            alt: photo.alt_description.or(photo.description),
            author: photo.user.map(|u| u.name),
            source_url: photo.links.and_then(|l| l.html),
        }
    }
}

fn parse_search_response(body: &str) -> Result<Vec<ImageResult>, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.results.into_iter().map(ImageResult::from).collect())
}

pub struct UnsplashClient {
    client: Client,
    api_base: String,
    access_key: SecretString,
}

impl UnsplashClient {
    pub fn new(api_base: &str, access_key: SecretString) -> Result<Self, ImageSearchError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_key,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search/photos", self.api_base)
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<ImageResult>, ImageSearchError> {
        let per_page = count.clamp(1, MAX_PER_PAGE).to_string();
        debug!("Searching Unsplash (per_page={})", per_page);

        let response = self
            .client
            .get(self.search_url())
            .header(
                "Authorization",
                format!("Client-ID {}", self.access_key.expose_secret()),
            )
            .header("Accept-Version", "v1")
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ImageSearchError::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let images = parse_search_response(&body).map_err(|e| ImageSearchError::Api {
            status: status.as_u16(),
            body: format!("unexpected response: {}", e),
        })?;
        info!("Unsplash returned {} image(s)", images.len());
        Ok(images)
    }

    fn provider(&self) -> &'static str {
        "unsplash"
    }
}
