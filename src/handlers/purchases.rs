// src/handlers/purchases.rs

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
        PermPurchasesCreate, PermPurchasesDelete, PermPurchasesEdit, PermPurchasesRead,
        RequirePermission,
    },
    models::purchase::{CreatePurchasePayload, Purchase, UpdatePurchasePayload},
};

#[utoipa::path(
    get,
    path = "/api/purchases",
    tag = "Purchases",
    responses((status = 200, description = "Pedidos de compra", body = [Purchase])),
    security(("api_jwt" = []))
)]
pub async fn list_purchases(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermPurchasesRead>,
) -> Result<Json<Vec<Purchase>>, AppError> {
    Ok(Json(app_state.purchase_service.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/purchases",
    tag = "Purchases",
    request_body = CreatePurchasePayload,
    responses((status = 201, description = "Pedido criado com status Ordered", body = Purchase)),
    security(("api_jwt" = []))
)]
pub async fn create_purchase(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermPurchasesCreate>,
    Json(payload): Json<CreatePurchasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let purchase = app_state.purchase_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(purchase)))
}

#[utoipa::path(
    put,
    path = "/api/purchases/{id}",
    tag = "Purchases",
    request_body = UpdatePurchasePayload,
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido atualizado", body = Purchase),
        (status = 409, description = "Pedido já recebido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_purchase(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermPurchasesEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurchasePayload>,
) -> Result<Json<Purchase>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.purchase_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/purchases/{id}",
    tag = "Purchases",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 204, description = "Pedido removido"),
        (status = 409, description = "Pedido já recebido")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_purchase(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermPurchasesDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.purchase_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/purchases/{id}/receive",
    tag = "Purchases",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido recebido; estoque incrementado", body = Purchase),
        (status = 409, description = "Pedido já recebido ou cancelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn receive_purchase(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermPurchasesEdit>,
    Path(id): Path<Uuid>,
) -> Result<Json<Purchase>, AppError> {
    Ok(Json(app_state.purchase_service.receive(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/purchases/{id}/cancel",
    tag = "Purchases",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido cancelado", body = Purchase),
        (status = 409, description = "Pedido já recebido")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_purchase(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermPurchasesEdit>,
    Path(id): Path<Uuid>,
) -> Result<Json<Purchase>, AppError> {
    Ok(Json(app_state.purchase_service.cancel(id).await?))
}
