// src/handlers/inventory.rs

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
            PermAdjustmentsCreate, PermAdjustmentsRead, PermProductsCreate, PermProductsDelete,
            PermProductsEdit, PermProductsRead, PermWarehousesCreate, PermWarehousesDelete,
            PermWarehousesEdit, PermWarehousesRead, RequirePermission,
        },
    },
    models::{
        adjustment::{Adjustment, CreateAdjustmentPayload},
        catalog::{
            Category, CategoryPayload, CreateProductPayload, Product, Unit, UnitPayload,
            UpdateProductPayload, Warehouse, WarehousePayload,
        },
    },
};

// ---
// Produtos
// ---

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Inventory",
    responses((status = 200, description = "Produtos ativos", body = [Product])),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsRead>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.inventory_service.list_products().await?))
}

#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    tag = "Inventory",
    responses((status = 200, description = "Produtos no nível de alerta ou abaixo", body = [Product])),
    security(("api_jwt" = []))
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsRead>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.inventory_service.list_low_stock().await?))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsRead>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(app_state.inventory_service.get_product(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Inventory",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Produto criado", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsCreate>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.inventory_service.create_product(payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Inventory",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.inventory_service.update_product(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto desativado"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.inventory_service.deactivate_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Unidades de medida (qualquer usuário autenticado consulta)
// ---

#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Inventory",
    responses((status = 200, description = "Unidades de medida", body = [Unit])),
    security(("api_jwt" = []))
)]
pub async fn list_units(State(app_state): State<AppState>) -> Result<Json<Vec<Unit>>, AppError> {
    Ok(Json(app_state.inventory_repo.list_units().await?))
}

#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Inventory",
    request_body = UnitPayload,
    responses((status = 201, description = "Unidade criada", body = Unit)),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsCreate>,
    Json(payload): Json<UnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let unit = app_state.inventory_repo.create_unit(&payload).await?;

    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    put,
    path = "/api/units/{id}",
    tag = "Inventory",
    request_body = UnitPayload,
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 200, description = "Unidade atualizada", body = Unit),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UnitPayload>,
) -> Result<Json<Unit>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .inventory_repo
        .update_unit(id, &payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Unidade"))
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 204, description = "Unidade removida"),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !app_state.inventory_repo.delete_unit(id).await? {
        return Err(AppError::NotFound("Unidade"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Categorias
// ---

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Inventory",
    responses((status = 200, description = "Categorias", body = [Category])),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(app_state.inventory_repo.list_categories().await?))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Inventory",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 409, description = "Nome de categoria já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsCreate>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state.inventory_repo.create_category(&payload).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Inventory",
    request_body = CategoryPayload,
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .inventory_repo
        .update_category(id, &payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Categoria"))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria removida"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermProductsDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !app_state.inventory_repo.delete_category(id).await? {
        return Err(AppError::NotFound("Categoria"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Depósitos
// ---

#[utoipa::path(
    get,
    path = "/api/warehouses",
    tag = "Inventory",
    responses((status = 200, description = "Depósitos", body = [Warehouse])),
    security(("api_jwt" = []))
)]
pub async fn list_warehouses(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermWarehousesRead>,
) -> Result<Json<Vec<Warehouse>>, AppError> {
    Ok(Json(app_state.inventory_repo.list_warehouses().await?))
}

#[utoipa::path(
    post,
    path = "/api/warehouses",
    tag = "Inventory",
    request_body = WarehousePayload,
    responses((status = 201, description = "Depósito criado", body = Warehouse)),
    security(("api_jwt" = []))
)]
pub async fn create_warehouse(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermWarehousesCreate>,
    Json(payload): Json<WarehousePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let warehouse = app_state.inventory_repo.create_warehouse(&payload).await?;

    Ok((StatusCode::CREATED, Json(warehouse)))
}

#[utoipa::path(
    put,
    path = "/api/warehouses/{id}",
    tag = "Inventory",
    request_body = WarehousePayload,
    params(("id" = Uuid, Path, description = "ID do depósito")),
    responses(
        (status = 200, description = "Depósito atualizado", body = Warehouse),
        (status = 404, description = "Depósito não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_warehouse(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermWarehousesEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WarehousePayload>,
) -> Result<Json<Warehouse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .inventory_repo
        .update_warehouse(id, &payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Depósito"))
}

#[utoipa::path(
    delete,
    path = "/api/warehouses/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do depósito")),
    responses(
        (status = 204, description = "Depósito removido"),
        (status = 404, description = "Depósito não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_warehouse(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermWarehousesDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !app_state.inventory_repo.delete_warehouse(id).await? {
        return Err(AppError::NotFound("Depósito"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Ajustes de estoque
// ---

#[utoipa::path(
    get,
    path = "/api/adjustments",
    tag = "Inventory",
    responses((status = 200, description = "Histórico de ajustes", body = [Adjustment])),
    security(("api_jwt" = []))
)]
pub async fn list_adjustments(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermAdjustmentsRead>,
) -> Result<Json<Vec<Adjustment>>, AppError> {
    Ok(Json(app_state.inventory_service.list_adjustments().await?))
}

#[utoipa::path(
    post,
    path = "/api/adjustments",
    tag = "Inventory",
    request_body = CreateAdjustmentPayload,
    responses(
        (status = 201, description = "Ajuste aplicado e registrado", body = Adjustment),
        (status = 404, description = "Produto ou variação não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_adjustment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermAdjustmentsCreate>,
    Json(payload): Json<CreateAdjustmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let adjustment = app_state
        .inventory_service
        .create_adjustment(payload, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(adjustment)))
}
