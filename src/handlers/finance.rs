// src/handlers/finance.rs

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
    middleware::{
        auth::AuthenticatedUser,
        rbac::{
            PermExpensesCreate, PermExpensesDelete, PermExpensesEdit, PermExpensesRead,
            PermZBillsCreate, PermZBillsRead, RequirePermission,
        },
    },
    models::{
        expense::{CreateExpensePayload, Expense, UpdateExpensePayload},
        zbill::{GenerateZBillPayload, ZBill},
    },
};

// ---
// Despesas
// ---

#[utoipa::path(
    get,
    path = "/api/expenses",
    tag = "Finance",
    responses((status = 200, description = "Despesas", body = [Expense])),
    security(("api_jwt" = []))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermExpensesRead>,
) -> Result<Json<Vec<Expense>>, AppError> {
    Ok(Json(app_state.finance_service.list_expenses().await?))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Finance",
    request_body = CreateExpensePayload,
    responses((status = 201, description = "Despesa lançada", body = Expense)),
    security(("api_jwt" = []))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermExpensesCreate>,
    Json(payload): Json<CreateExpensePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let expense = app_state.finance_service.create_expense(payload, user.id).await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    put,
    path = "/api/expenses/{id}",
    tag = "Finance",
    request_body = UpdateExpensePayload,
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Despesa atualizada", body = Expense),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_expense(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermExpensesEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExpensePayload>,
) -> Result<Json<Expense>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.finance_service.update_expense(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 204, description = "Despesa removida"),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_expense(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermExpensesDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Fechamento de caixa (Z-bill)
// ---

#[utoipa::path(
    post,
    path = "/api/zbills",
    tag = "Finance",
    request_body = GenerateZBillPayload,
    responses((status = 201, description = "Caixa do dia fechado", body = ZBill)),
    security(("api_jwt" = []))
)]
pub async fn generate_zbill(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermZBillsCreate>,
    Json(payload): Json<GenerateZBillPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let bill = app_state.closure_service.generate(payload, user.id).await?;

    Ok((StatusCode::CREATED, Json(bill)))
}

#[utoipa::path(
    get,
    path = "/api/zbills",
    tag = "Finance",
    responses((status = 200, description = "Fechamentos, mais recentes primeiro", body = [ZBill])),
    security(("api_jwt" = []))
)]
pub async fn list_zbills(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermZBillsRead>,
) -> Result<Json<Vec<ZBill>>, AppError> {
    Ok(Json(app_state.closure_service.list().await?))
}
