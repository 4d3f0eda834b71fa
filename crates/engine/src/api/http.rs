//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use lampioni_domain::Stats;
use lampioni_shared::TimelineStateData;

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/stats", get(get_stats))
        .route("/api/timeline", get(get_timeline))
}

async fn health() -> &'static str {
    "OK"
}

async fn get_stats(State(app): State<Arc<App>>) -> Result<Json<Stats>, ApiError> {
    let stats = app.timeline.stats().await.ok_or(ApiError::DataUnavailable)?;
    Ok(Json(stats))
}

async fn get_timeline(State(app): State<Arc<App>>) -> Result<Json<TimelineStateData>, ApiError> {
    let state = app
        .timeline
        .timeline_state()
        .await
        .ok_or(ApiError::DataUnavailable)?;
    Ok(Json(state))
}

enum ApiError {
    /// The lamp data never loaded; the server is up but empty.
    DataUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::DataUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Map data failed to load").into_response()
            }
        }
    }
}
