use uuid::Uuid;

use crate::ai::{Draft, Outline};
use crate::images::ImageResult;
use crate::publish::GeneratedPost;

use super::error::PipelineWarning;
use super::request::GenerationRequest;

pub struct GenerationContext {
    // Input
    pub run_id: Uuid,
    pub request: GenerationRequest,

    // Outline stage
    pub outline: Option<Outline>,

    // Draft stage
    pub draft: Option<Draft>,

    // Image search stage, None when nothing was found
    pub cover_image: Option<ImageResult>,

    // Publish stage, the post as stored
    pub post: Option<GeneratedPost>,

    // Non-fatal warnings
    pub warnings: Vec<PipelineWarning>,
}

impl GenerationContext {
    pub fn new(request: GenerationRequest) -> Self {
        Self::with_run_id(Uuid::new_v4(), request)
    }

    pub fn with_run_id(run_id: Uuid, request: GenerationRequest) -> Self {
        Self {
            run_id,
            request,
            outline: None,
            draft: None,
            cover_image: None,
            post: None,
            warnings: Vec::new(),
        }
    }
}
