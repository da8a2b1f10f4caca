// src/handlers/auth.rs

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
        rbac::{PermUsersCreate, PermUsersDelete, PermUsersEdit, PermUsersRead, RequirePermission},
    },
    models::auth::{
        AuthResponse, ForgotPasswordPayload, LoginUserPayload, MessageResponse,
        RegisterStaffPayload, RegisterUserPayload, ResetPasswordPayload, UpdateUserPayload, User,
    },
};

// ---
// Rotas públicas
// ---

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário registrado", body = AuthResponse),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state
        .auth_service
        .register_user(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Conta desativada")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token, user }))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Token de redefinição emitido", body = MessageResponse),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.auth_service.forgot_password(&payload.email).await?;

    Ok(Json(MessageResponse {
        message: "Token de redefinição gerado. Válido por 10 minutos.".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password/{token}",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    params(("token" = String, Path, description = "Token de redefinição")),
    responses(
        (status = 200, description = "Senha redefinida", body = MessageResponse),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.auth_service.reset_password(&token, &payload.password).await?;

    Ok(Json(MessageResponse { message: "Senha redefinida com sucesso.".into() }))
}

// ---
// Rotas protegidas
// ---

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Users",
    responses((status = 200, description = "Usuário autenticado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

#[utoipa::path(
    post,
    path = "/api/auth/register-staff",
    tag = "Users",
    request_body = RegisterStaffPayload,
    responses(
        (status = 201, description = "Funcionário cadastrado", body = User),
        (status = 400, description = "Cargo inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_staff(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermUsersCreate>,
    Json(payload): Json<RegisterStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.auth_service.register_staff(&payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/auth/users",
    tag = "Users",
    responses((status = 200, description = "Lista de usuários", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermUsersRead>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(app_state.auth_service.list_users().await?))
}

#[utoipa::path(
    put,
    path = "/api/auth/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermUsersEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.auth_service.update_user(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/auth/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermUsersDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.auth_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
