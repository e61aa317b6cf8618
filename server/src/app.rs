//! Router assembly.

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::AppError;
use crate::events;
use crate::routes;
use crate::state::AppState;

/// Permissive CORS when no origins are configured, otherwise the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            "/api/progress",
            get(routes::get_progress).post(routes::post_progress),
        )
        .route("/api/progress/stream", get(events::progress_stream))
        .route("/api/progress/reset", post(routes::reset_progress))
        .route("/api/generate", post(routes::start_generation))
        .route("/api/generate/posts", get(routes::list_generated_posts))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}
