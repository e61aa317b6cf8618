use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::ai::{ContentGenerator, TemplateGenerator};
use crate::config::Config;
use crate::error::ImageSearchError;
use crate::images::{self, ImageSearch};
use crate::publish::{GeneratedPost, Publisher};
use crate::sanitize;

use super::config::PipelineConfig;
use super::context::GenerationContext;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{ProgressEvent, ProgressReporter};
use super::stage::GenerationStage;

/// Outcome of one run.
#[derive(Debug)]
pub enum GenerationResult {
    Published(GeneratedPost),
    Failed {
        /// `None` when the request was rejected before any stage ran.
        stage: Option<GenerationStage>,
        error: PipelineError,
    },
}

impl GenerationResult {
    pub fn is_published(&self) -> bool {
        matches!(self, GenerationResult::Published(_))
    }

    pub fn into_result(self) -> Result<GeneratedPost, PipelineError> {
        match self {
            GenerationResult::Published(post) => Ok(post),
            GenerationResult::Failed { error, .. } => Err(error),
        }
    }
}

pub struct GenerationPipeline {
    config: Arc<PipelineConfig>,
    generator: Arc<dyn ContentGenerator>,
    images: Arc<dyn ImageSearch>,
    publisher: Arc<dyn Publisher>,
}

impl GenerationPipeline {
    /// Production constructor. Uses the template generator and the configured
    /// image provider.
    pub fn from_config(
        config: &Config,
        publisher: Arc<dyn Publisher>,
    ) -> Result<Self, ImageSearchError> {
        let pipeline_config = PipelineConfig::from_config(config);
        let generator =
            TemplateGenerator::new(&pipeline_config.default_tone, pipeline_config.max_tags);
        let images = images::from_config(&config.images)?;

        Ok(Self {
            config: Arc::new(pipeline_config),
            generator: Arc::new(generator),
            images,
            publisher,
        })
    }

    pub fn new(
        config: Arc<PipelineConfig>,
        generator: Arc<dyn ContentGenerator>,
        images: Arc<dyn ImageSearch>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            config,
            generator,
            images,
            publisher,
        }
    }

    pub fn publisher(&self) -> &Arc<dyn Publisher> {
        &self.publisher
    }

    /// Runs every stage for one request.
    /// Returns a (GenerationResult, GenerationContext) pair.
    pub async fn run(
        &self,
        ctx: GenerationContext,
        progress: &dyn ProgressReporter,
    ) -> (GenerationResult, GenerationContext) {
        let span = info_span!("generation",
            run_id = %ctx.run_id,
            topic = %sanitize::span_text(&ctx.request.topic),
            image_provider = self.images.provider(),
        );
        self.run_stages(ctx, progress).instrument(span).await
    }

    async fn run_stages(
        &self,
        mut ctx: GenerationContext,
        progress: &dyn ProgressReporter,
    ) -> (GenerationResult, GenerationContext) {
        if let Err(error) = ctx.request.validate() {
            warn!("Rejected generation request: {}", error);
            return (GenerationResult::Failed { stage: None, error }, ctx);
        }

        for stage in GenerationStage::ALL {
            progress.report(ProgressEvent::Queued { stage });
        }

        for stage in GenerationStage::ALL {
            progress.report(ProgressEvent::Started { stage });

            let step_span = info_span!("stage", step = stage.step_id());
            let outcome = match stage {
                GenerationStage::Outline => {
                    self.step_outline(&mut ctx).instrument(step_span).await
                }
                GenerationStage::Draft => self.step_draft(&mut ctx).instrument(step_span).await,
                GenerationStage::ImageSearch => {
                    Ok(self.step_image_search(&mut ctx).instrument(step_span).await)
                }
                GenerationStage::Publish => {
                    self.step_publish(&mut ctx).instrument(step_span).await
                }
            };

            match outcome {
                Ok(message) => progress.report(ProgressEvent::Completed { stage, message }),
                Err(error) => {
                    warn!("Stage '{}' failed: {}", stage, error);
                    progress.report(ProgressEvent::Failed {
                        stage,
                        error: error.to_string(),
                    });
                    return (
                        GenerationResult::Failed {
                            stage: Some(stage),
                            error,
                        },
                        ctx,
                    );
                }
            }
        }

        match ctx.post.clone() {
            Some(post) => {
                info!(
                    "Generated '{}' with {} warning(s)",
                    post.slug,
                    ctx.warnings.len()
                );
                (GenerationResult::Published(post), ctx)
            }
            None => (
                GenerationResult::Failed {
                    stage: Some(GenerationStage::Publish),
                    error: PipelineError::MissingStageOutput("publish"),
                },
                ctx,
            ),
        }
    }

    async fn step_outline(&self, ctx: &mut GenerationContext) -> Result<String, PipelineError> {
        let outline = self.generator.outline(&ctx.request).await?;
        let message = format!("Outline ready: {} sections", outline.sections.len());
        debug!("Outline title: '{}'", outline.title);
        ctx.outline = Some(outline);
        Ok(message)
    }

    async fn step_draft(&self, ctx: &mut GenerationContext) -> Result<String, PipelineError> {
        let outline = ctx
            .outline
            .as_ref()
            .ok_or(PipelineError::MissingStageOutput("outline"))?;
        let draft = self.generator.draft(&ctx.request, outline).await?;
        let message = format!("Draft written: {} words", draft.word_count());
        ctx.draft = Some(draft);
        Ok(message)
    }

    /// Never fails the run. Problems are recorded as warnings.
    async fn step_image_search(&self, ctx: &mut GenerationContext) -> String {
        let query = ctx.request.image_query().to_string();

        match self.images.search(&query, self.config.image_count).await {
            Ok(results) => match results.into_iter().next() {
                Some(image) => {
                    let message = match image.author.as_deref() {
                        Some(author) => format!("Cover image found (photo by {})", author),
                        None => "Cover image found".to_string(),
                    };
                    ctx.cover_image = Some(image);
                    message
                }
                None => {
                    debug!("No image for query '{}'", sanitize::span_text(&query));
                    ctx.warnings.push(PipelineWarning::NoImageFound { query });
                    "No matching image; continuing without a cover image".to_string()
                }
            },
            Err(e) => {
                warn!("Image search failed: {}", e);
                ctx.warnings.push(PipelineWarning::ImageSearchFailed {
                    query,
                    error: e.to_string(),
                });
                "Image search unavailable; continuing without a cover image".to_string()
            }
        }
    }

    async fn step_publish(&self, ctx: &mut GenerationContext) -> Result<String, PipelineError> {
        let draft = ctx
            .draft
            .as_ref()
            .ok_or(PipelineError::MissingStageOutput("draft"))?;
        let post = GeneratedPost::from_draft(ctx.run_id, draft, ctx.cover_image.clone());
        let stored = self.publisher.publish(post).await?;
        let message = format!("Saved as draft '{}'", stored.slug);
        ctx.post = Some(stored);
        Ok(message)
    }
}
