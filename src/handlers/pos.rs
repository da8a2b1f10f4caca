// src/handlers/pos.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermSalesCreate, PermSalesRead, RequirePermission},
    },
    models::sales::{CheckoutPayload, Invoice, InvoiceFilter},
};

#[utoipa::path(
    post,
    path = "/api/pos/checkout",
    tag = "POS",
    request_body = CheckoutPayload,
    responses(
        (status = 201, description = "Venda concluída, estoque baixado e fatura emitida", body = Invoice),
        (status = 404, description = "Produto ou variação não encontrado (a linha vem em `details`)"),
        (status = 409, description = "Estoque insuficiente (a linha vem em `details`)")
    ),
    security(("api_jwt" = []))
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermSalesCreate>,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let invoice = app_state.sales_service.checkout(payload, user.id).await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

#[utoipa::path(
    get,
    path = "/api/pos/invoices",
    tag = "POS",
    params(InvoiceFilter),
    responses((status = 200, description = "Faturas, mais recentes primeiro", body = [Invoice])),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermSalesRead>,
    Query(filter): Query<InvoiceFilter>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    Ok(Json(app_state.sales_service.list_invoices(&filter).await?))
}
