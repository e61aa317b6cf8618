//! Collaborator fakes for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use inkpress::ai::{ContentGenerator, Draft, Outline};
use inkpress::error::{GeneratorError, ImageSearchError};
use inkpress::images::{ImageResult, ImageSearch};
use inkpress::pipeline::{GenerationRequest, ProgressEvent, ProgressReporter};

/// Generator whose outline stage always fails.
pub struct FailingOutlineGenerator;

#[async_trait]
impl ContentGenerator for FailingOutlineGenerator {
    async fn outline(&self, _request: &GenerationRequest) -> Result<Outline, GeneratorError> {
        Err(GeneratorError::Generation("quota exceeded".to_string()))
    }

    async fn draft(
        &self,
        _request: &GenerationRequest,
        _outline: &Outline,
    ) -> Result<Draft, GeneratorError> {
        unreachable!("draft must not run after a failed outline")
    }
}

/// Image search returning a single fixed photo and remembering queries.
#[derive(Default)]
pub struct StaticImageSearch {
    queries: Mutex<Vec<String>>,
}

impl StaticImageSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for StaticImageSearch {
    async fn search(&self, query: &str, _count: u8) -> Result<Vec<ImageResult>, ImageSearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(vec![ImageResult {
            url: "https://images.test/cover.jpg".to_string(),
            thumb_url: None,
            alt: Some(query.to_string()),
            author: Some("Test Photographer".to_string()),
            source_url: None,
        }])
    }

    fn provider(&self) -> &'static str {
        "static"
    }
}

/// Image search that is always down.
pub struct UnavailableImageSearch;

#[async_trait]
impl ImageSearch for UnavailableImageSearch {
    async fn search(&self, _query: &str, _count: u8) -> Result<Vec<ImageResult>, ImageSearchError> {
        Err(ImageSearchError::NotConfigured("no access key".to_string()))
    }

    fn provider(&self) -> &'static str {
        "unavailable"
    }
}

/// Reporter that keeps every event.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
