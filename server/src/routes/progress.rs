//! Progress snapshot queries and producer updates.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use inkpress::broadcast::{ParseStatusError, ProgressEntry, ProgressSnapshot, ProgressStatus};
use serde::Deserialize;
use tracing::debug;

use super::ApiResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Body of `POST /api/progress`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateRequest {
    /// Surrounding whitespace is trimmed, so `" draft "` updates `draft`.
    pub step_id: String,
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Current snapshot as a bare JSON array.
pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressSnapshot> {
    Json(state.hub.snapshot())
}

/// Producer update. The step id is trimmed before use; unknown statuses and
/// ids that are empty after trimming are rejected.
pub async fn post_progress(
    State(state): State<AppState>,
    body: Result<Json<ProgressUpdateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ProgressEntry>>, AppError> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let step_id = request.step_id.trim();
    if step_id.is_empty() {
        return Err(AppError::BadRequest("stepId must not be empty".to_string()));
    }
    let status: ProgressStatus = request
        .status
        .parse()
        .map_err(|e: ParseStatusError| AppError::BadRequest(e.to_string()))?;

    debug!(step_id, %status, "Producer update");
    state.hub.update(step_id, status, &request.message);

    state
        .hub
        .snapshot()
        .get(step_id)
        .cloned()
        .map(|entry| Json(ApiResponse::ok(entry)))
        .ok_or_else(|| AppError::Internal(format!("step '{}' missing after update", step_id)))
}

/// Clears the snapshot and notifies every listener.
pub async fn reset_progress(State(state): State<AppState>) -> Json<ApiResponse<ProgressSnapshot>> {
    state.hub.reset();
    Json(ApiResponse::ok(state.hub.snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpress::config::Config;

    fn state() -> AppState {
        AppState::from_config(&Config::default()).unwrap()
    }

    fn update(step_id: &str, status: &str, message: &str) -> ProgressUpdateRequest {
        ProgressUpdateRequest {
            step_id: step_id.to_string(),
            status: status.to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_post_then_get_progress() {
        let state = state();

        let Json(response) = post_progress(
            State(state.clone()),
            Ok(Json(update("outline", "in_progress", "planning"))),
        )
        .await
        .unwrap();
        let entry = response.data.unwrap();
        assert_eq!(entry.step_id, "outline");
        assert_eq!(entry.status, ProgressStatus::InProgress);

        post_progress(State(state.clone()), Ok(Json(update("draft", "pending", ""))))
            .await
            .unwrap();

        let Json(snapshot) = get_progress(State(state)).await;
        assert_eq!(snapshot.step_ids(), vec!["outline", "draft"]);
    }

    #[tokio::test]
    async fn test_post_rejects_unknown_status() {
        let result = post_progress(
            State(state()),
            Ok(Json(update("outline", "finished", ""))),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_post_rejects_empty_step_id() {
        let state = state();
        let result =
            post_progress(State(state.clone()), Ok(Json(update("  ", "pending", "")))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(state.hub.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_post_trims_step_id() {
        let state = state();
        post_progress(State(state.clone()), Ok(Json(update("draft", "pending", ""))))
            .await
            .unwrap();

        let Json(response) = post_progress(
            State(state.clone()),
            Ok(Json(update("  draft ", "completed", "written"))),
        )
        .await
        .unwrap();
        assert_eq!(response.data.unwrap().step_id, "draft");

        let snapshot = state.hub.snapshot();
        assert_eq!(snapshot.step_ids(), vec!["draft"]);
        assert_eq!(snapshot.get("draft").unwrap().status, ProgressStatus::Completed);
    }

    #[tokio::test]
    async fn test_reset_clears_snapshot() {
        let state = state();
        state.hub.update("outline", ProgressStatus::Completed, "done");

        let Json(response) = reset_progress(State(state.clone())).await;
        assert!(response.data.unwrap().is_empty());
        assert!(state.hub.snapshot().is_empty());
    }

    #[test]
    fn test_update_request_uses_camel_case() {
        let request: ProgressUpdateRequest =
            serde_json::from_str(r#"{"stepId":"publish","status":"error"}"#).unwrap();
        assert_eq!(request.step_id, "publish");
        assert_eq!(request.message, "");
    }
}
