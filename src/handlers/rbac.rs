// src/handlers/rbac.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{
        PermRolesCreate, PermRolesDelete, PermRolesEdit, PermRolesRead, RequirePermission,
    },
    models::rbac::{CreateRolePayload, Role, UpdateRolePayload, PERMISSIONS},
};

// GET /api/roles/permissions (Para o frontend saber o que mostrar na tela de criação)
#[utoipa::path(
    get,
    path = "/api/roles/permissions",
    tag = "RBAC",
    responses((status = 200, description = "Catálogo de permissões", body = [String])),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(_guard: RequirePermission<PermRolesRead>) -> Json<Vec<&'static str>> {
    Json(PERMISSIONS.to_vec())
}

#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "RBAC",
    responses((status = 200, description = "Cargos cadastrados", body = [Role])),
    security(("api_jwt" = []))
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesRead>,
) -> Result<Json<Vec<Role>>, AppError> {
    Ok(Json(app_state.rbac_service.list_roles().await?))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "RBAC",
    request_body = CreateRolePayload,
    responses(
        (status = 201, description = "Cargo criado", body = Role),
        (status = 409, description = "Nome de cargo já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesCreate>,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let role = app_state.rbac_service.create_role(payload).await?;

    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = "RBAC",
    request_body = UpdateRolePayload,
    params(("id" = Uuid, Path, description = "ID do cargo")),
    responses(
        (status = 200, description = "Cargo atualizado", body = Role),
        (status = 409, description = "Cargo pré-definido não pode ser alterado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<Json<Role>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.rbac_service.update_role(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(("id" = Uuid, Path, description = "ID do cargo")),
    responses(
        (status = 204, description = "Cargo removido"),
        (status = 409, description = "Cargo pré-definido não pode ser excluído")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_role(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRolesDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.rbac_service.delete_role(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
