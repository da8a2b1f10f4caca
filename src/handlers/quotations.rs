// src/handlers/quotations.rs

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
        PermQuotationsCreate, PermQuotationsDelete, PermQuotationsEdit, PermQuotationsRead,
        RequirePermission,
    },
    models::quotation::{
        CreateQuotationPayload, Quotation, UpdateQuotationPayload, UpdateQuotationStatusPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/quotations",
    tag = "Quotations",
    responses((status = 200, description = "Orçamentos", body = [Quotation])),
    security(("api_jwt" = []))
)]
pub async fn list_quotations(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermQuotationsRead>,
) -> Result<Json<Vec<Quotation>>, AppError> {
    Ok(Json(app_state.quotation_service.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/quotations",
    tag = "Quotations",
    request_body = CreateQuotationPayload,
    responses((status = 201, description = "Orçamento criado como Pending", body = Quotation)),
    security(("api_jwt" = []))
)]
pub async fn create_quotation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermQuotationsCreate>,
    Json(payload): Json<CreateQuotationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let quotation = app_state.quotation_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(quotation)))
}

#[utoipa::path(
    put,
    path = "/api/quotations/{id}",
    tag = "Quotations",
    request_body = UpdateQuotationPayload,
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento atualizado", body = Quotation),
        (status = 409, description = "Orçamento já aceito")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quotation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermQuotationsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuotationPayload>,
) -> Result<Json<Quotation>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.quotation_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/quotations/{id}",
    tag = "Quotations",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 204, description = "Orçamento removido"),
        (status = 409, description = "Orçamento já aceito")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_quotation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermQuotationsDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.quotation_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/quotations/{id}/status",
    tag = "Quotations",
    request_body = UpdateQuotationStatusPayload,
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Status alterado", body = Quotation),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quotation_status(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermQuotationsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuotationStatusPayload>,
) -> Result<Json<Quotation>, AppError> {
    Ok(Json(app_state.quotation_service.change_status(id, payload.status).await?))
}
