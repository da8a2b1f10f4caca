// src/handlers/settings.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermSettingsEdit, PermSettingsRead, RequirePermission},
    models::settings::{Settings, UpdateSettingsRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses((status = 200, description = "Configurações da loja", body = Settings)),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermSettingsRead>,
) -> Result<Json<Settings>, AppError> {
    let settings = app_state.settings_repo.get_or_create().await?;
    Ok(Json(settings.redacted()))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses((status = 200, description = "Configurações atualizadas", body = Settings)),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermSettingsEdit>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<Settings>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let mut settings = app_state.settings_repo.get_or_create().await?;
    payload.apply_to(&mut settings);
    let updated = app_state.settings_repo.save(&settings).await?;

    tracing::info!("Configurações da loja atualizadas.");
    Ok(Json(updated.redacted()))
}
