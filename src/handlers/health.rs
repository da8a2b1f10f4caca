// src/handlers/health.rs

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    pub uptime_seconds: u64,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Servidor no ar", body = HealthResponse))
)]
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        uptime_seconds: app_state.started_at.elapsed().as_secs(),
    })
}
