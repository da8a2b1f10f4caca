// src/handlers/offers.rs

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
        PermOffersCreate, PermOffersDelete, PermOffersEdit, PermOffersRead, RequirePermission,
    },
    models::offer::{CreateOfferPayload, Offer, UpdateOfferPayload},
};

#[utoipa::path(
    get,
    path = "/api/offers",
    tag = "Offers",
    responses((status = 200, description = "Ofertas cadastradas", body = [Offer])),
    security(("api_jwt" = []))
)]
pub async fn list_offers(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOffersRead>,
) -> Result<Json<Vec<Offer>>, AppError> {
    Ok(Json(app_state.offer_service.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/offers",
    tag = "Offers",
    request_body = CreateOfferPayload,
    responses(
        (status = 201, description = "Oferta criada", body = Offer),
        (status = 409, description = "Código já utilizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_offer(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOffersCreate>,
    Json(payload): Json<CreateOfferPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let offer = app_state.offer_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(offer)))
}

#[utoipa::path(
    put,
    path = "/api/offers/{id}",
    tag = "Offers",
    request_body = UpdateOfferPayload,
    params(("id" = Uuid, Path, description = "ID da oferta")),
    responses(
        (status = 200, description = "Oferta atualizada", body = Offer),
        (status = 404, description = "Oferta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_offer(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOffersEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOfferPayload>,
) -> Result<Json<Offer>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.offer_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/offers/{id}",
    tag = "Offers",
    params(("id" = Uuid, Path, description = "ID da oferta")),
    responses(
        (status = 204, description = "Oferta removida"),
        (status = 404, description = "Oferta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_offer(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOffersDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.offer_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
