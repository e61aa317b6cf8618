//! Generation jobs.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inkpress::pipeline::{GenerationContext, GenerationRequest, GenerationResult, HubProgress};
use inkpress::publish::GeneratedPost;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::ApiResponse;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAccepted {
    pub run_id: Uuid,
}

/// Starts a generation job in the background.
///
/// The hub is reset first so the new run starts from an empty snapshot.
/// Only one job runs at a time; a second request gets `409 Conflict`.
pub async fn start_generation(
    State(state): State<AppState>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<GenerateAccepted>>), AppError> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request.validate()?;

    let slot = state
        .try_begin_generation()
        .ok_or(AppError::GenerationRunning)?;

    state.hub.reset();

    let ctx = GenerationContext::new(request);
    let run_id = ctx.run_id;
    let pipeline = state.pipeline.clone();
    let reporter = HubProgress::new(state.hub.clone());

    tokio::spawn(async move {
        let _slot = slot;
        let (result, ctx) = pipeline.run(ctx, &reporter).await;
        match result {
            GenerationResult::Published(post) => {
                info!(
                    %run_id,
                    slug = %post.slug,
                    warnings = ctx.warnings.len(),
                    "Generation finished"
                );
            }
            GenerationResult::Failed { stage, error } => {
                let stage = stage
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "request".to_string());
                warn!(%run_id, %stage, "Generation failed: {}", error);
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(GenerateAccepted { run_id })),
    ))
}

/// Posts produced by earlier runs, oldest first.
pub async fn list_generated_posts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GeneratedPost>>>, AppError> {
    let posts = state.pipeline.publisher().list().await?;
    Ok(Json(ApiResponse::ok(posts)))
}
