// src/models/quotation.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::catalog::validate_not_negative;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quotation_status")]
pub enum QuotationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Invoiced,
}

impl QuotationStatus {
    /// Pendente pode ir para qualquer desfecho; aceito só pode virar venda.
    pub fn can_move_to(self, next: QuotationStatus) -> bool {
        use QuotationStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Pending, Rejected) | (Pending, Invoiced) | (Accepted, Invoiced)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationCustomer {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    #[schema(example = "Padaria Central")]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLine {
    // Itens avulsos (fora do catálogo) não têm produto
    pub product_id: Option<Uuid>,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: Uuid,
    #[schema(example = "QT-00001")]
    pub quotation_number: String,
    #[schema(value_type = QuotationCustomer)]
    pub customer: Json<QuotationCustomer>,
    #[schema(value_type = Vec<QuotationLine>)]
    pub items: Json<Vec<QuotationLine>>,
    pub total_amount: Decimal,
    pub expiry_date: Option<DateTime<Utc>>,
    pub status: QuotationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLinePayload {
    pub product_id: Option<Uuid>,
    #[validate(length(min = 1, message = "O nome do item é obrigatório."))]
    pub name: String,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,
}

pub fn price_lines(lines: Vec<QuotationLinePayload>) -> Result<(Vec<QuotationLine>, Decimal), AppError> {
    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for (index, l) in lines.into_iter().enumerate() {
        let line_total = l
            .unit_price
            .checked_mul(Decimal::from(l.quantity))
            .ok_or_else(|| AppError::BadRequest(format!("Item {}: o valor excede o limite suportado.", index + 1)))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| AppError::BadRequest("O total do orçamento excede o limite suportado.".to_string()))?;
        priced.push(QuotationLine {
            total: line_total,
            product_id: l.product_id,
            name: l.name,
            quantity: l.quantity,
            unit_price: l.unit_price,
        });
    }

    Ok((priced, total))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationPayload {
    #[validate(nested)]
    pub customer: QuotationCustomer,
    #[validate(length(min = 1, message = "O orçamento precisa de ao menos um item."), nested)]
    pub items: Vec<QuotationLinePayload>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotationPayload {
    #[validate(nested)]
    pub customer: Option<QuotationCustomer>,
    #[validate(length(min = 1, message = "O orçamento precisa de ao menos um item."), nested)]
    pub items: Option<Vec<QuotationLinePayload>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl UpdateQuotationPayload {
    pub fn apply_to(self, quotation: &mut Quotation) -> Result<(), AppError> {
        if let Some(customer) = self.customer {
            quotation.customer = Json(customer);
        }
        if let Some(items) = self.items {
            let (lines, total) = price_lines(items)?;
            quotation.items = Json(lines);
            quotation.total_amount = total;
        }
        if self.expiry_date.is_some() {
            quotation.expiry_date = self.expiry_date;
        }
        if self.notes.is_some() {
            quotation.notes = self.notes;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuotationStatusPayload {
    pub status: QuotationStatus,
}
