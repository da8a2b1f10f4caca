// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

// Tipo de erro único da aplicação. Cada variante sabe qual status HTTP devolver.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Valor duplicado: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta desativada")]
    AccountDisabled,

    #[error("{0}")]
    Forbidden(String),

    #[error("Token de redefinição inválido ou expirado")]
    InvalidResetToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    // --- Erros do checkout (identificam a linha do carrinho) ---
    #[error("Produto {product_id} não encontrado (linha {line})")]
    ProductNotFound { line: usize, product_id: Uuid },

    #[error("Variação {variation_id} não encontrada no produto {product_id} (linha {line})")]
    VariationNotFound {
        line: usize,
        product_id: Uuid,
        variation_id: Uuid,
    },

    #[error("Estoque insuficiente para {product_name} (linha {line})")]
    InsufficientStock {
        line: usize,
        product_id: Uuid,
        product_name: String,
        variation_id: Option<Uuid>,
        available: i32,
        requested: i32,
    },

    // Regra de negócio violada (registro finalizado, cargo pré-definido, etc.)
    #[error("{0}")]
    Conflict(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Contador de estoque fora da faixa de `i32`.
    pub fn stock_out_of_range() -> Self {
        AppError::BadRequest("O estoque resultante excede o limite suportado.".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::InvalidResetToken => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::AccountDisabled | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::NotFound(_)
            | AppError::ProductNotFound { .. }
            | AppError::VariationNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::UniqueConstraintViolation(_)
            | AppError::InsufficientStock { .. }
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::ProductNotFound { line, product_id } => Some(json!({
                "line": line,
                "productId": product_id,
            })),
            AppError::VariationNotFound { line, product_id, variation_id } => Some(json!({
                "line": line,
                "productId": product_id,
                "variationId": variation_id,
            })),
            AppError::InsufficientStock {
                line,
                product_id,
                variation_id,
                available,
                requested,
                ..
            } => Some(json!({
                "line": line,
                "productId": product_id,
                "variationId": variation_id,
                "available": available,
                "requested": requested,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Erros de infraestrutura: detalhe vai para o log, o cliente recebe mensagem genérica.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Erro Interno do Servidor: {}", self);
            let body = Json(json!({ "error": "Ocorreu um erro inesperado." }));
            return (status, body).into_response();
        }

        let body = match self.details() {
            Some(details) if matches!(self, AppError::ValidationError(_)) => json!({
                "error": "Um ou mais campos são inválidos.",
                "details": details,
            }),
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

// Converte violação de chave única do Postgres num erro amigável.
// 22003 = numeric_value_out_of_range (ex.: `integer out of range`)
pub(crate) fn map_stock_overflow(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("22003") {
            return AppError::stock_out_of_range();
        }
    }
    e.into()
}

pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_email_key") {
                return AppError::EmailAlreadyExists;
            }
            return AppError::UniqueConstraintViolation(what.to_string());
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_by_error_kind() {
        assert_eq!(AppError::NotFound("Produto").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ProductNotFound { line: 0, product_id: Uuid::new_v4() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AccountDisabled.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_insufficient_stock_identifies_line() {
        let product_id = Uuid::new_v4();
        let err = AppError::InsufficientStock {
            line: 2,
            product_id,
            product_name: "Camiseta".into(),
            variation_id: None,
            available: 1,
            requested: 5,
        };

        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("Camiseta"));

        let details = err.details().unwrap();
        assert_eq!(details["line"], 2);
        assert_eq!(details["productId"], json!(product_id));
        assert_eq!(details["requested"], 5);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("segredo")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
