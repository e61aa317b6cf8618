//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    /// Connected progress listeners.
    pub listeners: usize,
    pub generating: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::ok(HealthStatus {
        status: "ok",
        listeners: state.hub.listener_count(),
        generating: state.is_generating(),
    }))
}
