//! Request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use super::AppState;
use crate::data::NeoSummary;

/// Liveness body, always `{"status":"ok"}`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Client-facing settings
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    /// IANA id of the zone that decides "today"
    pub timezone: String,
}

/// `GET /api/neos/today`
///
/// Retrieval runs on its own task: if the client goes away mid-fetch, the
/// fetch still finishes and fills the cache.
pub async fn neos_today(State(state): State<AppState>) -> Result<Json<Arc<Vec<NeoSummary>>>, ApiError> {
    let today = Arc::clone(&state.today);
    let summaries = tokio::spawn(async move { today.today_summaries().await })
        .await
        .map_err(|err| ApiError::Internal(format!("retrieval task failed: {err}")))??;
    Ok(Json(summaries))
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /api/config`
pub async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        timezone: state.today.zone().name().to_string(),
    })
}
