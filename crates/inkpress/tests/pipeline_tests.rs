//! Generation pipeline runs wired to a real progress hub.

mod common;

use std::sync::Arc;

use common::{
    FailingOutlineGenerator, RecordingListener, RecordingReporter, StaticImageSearch,
    UnavailableImageSearch,
};
use inkpress::broadcast::{ProgressHub, ProgressStatus};
use inkpress::pipeline::{
    GenerationContext, GenerationPipeline, GenerationRequest, GenerationResult, GenerationStage,
    HubProgress, PipelineConfig, PipelineWarning, ProgressEvent,
};
use inkpress::publish::{MemoryPublisher, Publisher};
use inkpress::TemplateGenerator;

fn statuses(hub: &ProgressHub) -> Vec<(String, ProgressStatus)> {
    hub.snapshot()
        .iter()
        .map(|e| (e.step_id.clone(), e.status))
        .collect()
}

fn expect(pairs: &[(&str, ProgressStatus)]) -> Vec<(String, ProgressStatus)> {
    pairs.iter().map(|(s, st)| (s.to_string(), *st)).collect()
}

#[tokio::test]
async fn test_full_run_completes_every_stage() {
    let hub = Arc::new(ProgressHub::new());
    let listener = Arc::new(RecordingListener::new());
    hub.subscribe(listener.clone());

    let images = Arc::new(StaticImageSearch::new());
    let publisher = Arc::new(MemoryPublisher::new());
    let pipeline = GenerationPipeline::new(
        Arc::new(PipelineConfig::default()),
        Arc::new(TemplateGenerator::default()),
        images.clone(),
        publisher.clone(),
    );

    let request = GenerationRequest::new("Streaming progress")
        .with_keywords(["sse", "axum"])
        .with_tone("technical");
    let (result, ctx) = pipeline
        .run(GenerationContext::new(request), &HubProgress::new(hub.clone()))
        .await;

    let post = result.into_result().unwrap();
    assert_eq!(post.slug, "streaming-progress");
    assert_eq!(post.tags, vec!["sse", "axum", "streaming-progress"]);
    assert!(ctx.warnings.is_empty());
    assert_eq!(images.queries(), vec!["Streaming progress"]);
    assert_eq!(publisher.list().await.unwrap().len(), 1);

    use ProgressStatus::Completed;
    assert_eq!(
        statuses(&hub),
        expect(&[
            ("outline", Completed),
            ("draft", Completed),
            ("image-search", Completed),
            ("publish", Completed),
        ])
    );

    // 1 init + 4 queued + 4 × (in_progress, completed)
    assert_eq!(listener.events().len(), 13);
}

#[tokio::test]
async fn test_failed_stage_leaves_later_stages_pending() {
    let hub = Arc::new(ProgressHub::new());
    let pipeline = GenerationPipeline::new(
        Arc::new(PipelineConfig::default()),
        Arc::new(FailingOutlineGenerator),
        Arc::new(StaticImageSearch::new()),
        Arc::new(MemoryPublisher::new()),
    );

    let (result, ctx) = pipeline
        .run(
            GenerationContext::new(GenerationRequest::new("Doomed")),
            &HubProgress::new(hub.clone()),
        )
        .await;

    match result {
        GenerationResult::Failed { stage, error } => {
            assert_eq!(stage, Some(GenerationStage::Outline));
            assert!(error.to_string().contains("quota exceeded"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(ctx.post.is_none());

    use ProgressStatus::{Error, Pending};
    assert_eq!(
        statuses(&hub),
        expect(&[
            ("outline", Error),
            ("draft", Pending),
            ("image-search", Pending),
            ("publish", Pending),
        ])
    );
    let outline = hub.snapshot().get("outline").cloned().unwrap();
    assert!(outline.message.contains("quota exceeded"));
}

#[tokio::test]
async fn test_image_outage_still_publishes() {
    let reporter = RecordingReporter::new();
    let pipeline = GenerationPipeline::new(
        Arc::new(PipelineConfig::default()),
        Arc::new(TemplateGenerator::default()),
        Arc::new(UnavailableImageSearch),
        Arc::new(MemoryPublisher::new()),
    );

    let (result, ctx) = pipeline
        .run(
            GenerationContext::new(GenerationRequest::new("Offline images")),
            &reporter,
        )
        .await;

    assert!(result.is_published());
    assert!(matches!(
        ctx.warnings.as_slice(),
        [PipelineWarning::ImageSearchFailed { .. }]
    ));

    let image_completed = reporter.events().into_iter().find_map(|e| match e {
        ProgressEvent::Completed {
            stage: GenerationStage::ImageSearch,
            message,
        } => Some(message),
        _ => None,
    });
    assert!(image_completed
        .unwrap()
        .contains("continuing without a cover image"));
}

#[tokio::test]
async fn test_reset_between_runs_starts_from_empty_snapshot() {
    let hub = Arc::new(ProgressHub::new());
    let pipeline = GenerationPipeline::new(
        Arc::new(PipelineConfig::default()),
        Arc::new(TemplateGenerator::default()),
        Arc::new(StaticImageSearch::new()),
        Arc::new(MemoryPublisher::new()),
    );
    let reporter = HubProgress::new(hub.clone());

    hub.update("leftover", ProgressStatus::Error, "from an older job");
    hub.reset();
    let (first, _) = pipeline
        .run(GenerationContext::new(GenerationRequest::new("Same title")), &reporter)
        .await;

    hub.reset();
    let (second, _) = pipeline
        .run(GenerationContext::new(GenerationRequest::new("Same title")), &reporter)
        .await;

    assert_eq!(first.into_result().unwrap().slug, "same-title");
    assert_eq!(second.into_result().unwrap().slug, "same-title-2");
    assert_eq!(
        hub.snapshot().step_ids(),
        vec!["outline", "draft", "image-search", "publish"]
    );
}
