// src/models/purchase.rs

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
#[sqlx(type_name = "purchase_status")]
pub enum PurchaseStatus {
    #[default]
    Ordered,
    Received,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    Paid,
    Partial,
    #[default]
    Unpaid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[validate(length(min = 1, message = "O nome do fornecedor é obrigatório."))]
    #[schema(example = "Distribuidora Paulista")]
    pub name: String,
    pub contact: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub cost_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    #[schema(example = "PO-00001")]
    pub purchase_number: String,
    #[schema(value_type = Supplier)]
    pub supplier: Json<Supplier>,
    pub warehouse_id: Uuid,
    #[schema(value_type = Vec<PurchaseLine>)]
    pub items: Json<Vec<PurchaseLine>>,
    pub total_amount: Decimal,
    pub status: PurchaseStatus,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLinePayload {
    pub product_id: Uuid,
    #[validate(length(min = 1, message = "O nome do item é obrigatório."))]
    pub name: String,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
    #[validate(custom(function = "validate_not_negative"))]
    pub cost_price: Decimal,
}

/// Converte as linhas do pedido calculando o total de cada uma e o total geral.
pub fn price_lines(lines: Vec<PurchaseLinePayload>) -> Result<(Vec<PurchaseLine>, Decimal), AppError> {
    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for (index, l) in lines.into_iter().enumerate() {
        let line_total = l
            .cost_price
            .checked_mul(Decimal::from(l.quantity))
            .ok_or_else(|| AppError::BadRequest(format!("Item {}: o valor excede o limite suportado.", index + 1)))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| AppError::BadRequest("O total do pedido excede o limite suportado.".to_string()))?;
        priced.push(PurchaseLine {
            total: line_total,
            product_id: l.product_id,
            name: l.name,
            quantity: l.quantity,
            cost_price: l.cost_price,
        });
    }

    Ok((priced, total))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchasePayload {
    #[validate(nested)]
    pub supplier: Supplier,
    pub warehouse_id: Uuid,
    #[validate(length(min = 1, message = "O pedido precisa de ao menos um item."), nested)]
    pub items: Vec<PurchaseLinePayload>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchasePayload {
    #[validate(nested)]
    pub supplier: Option<Supplier>,
    pub warehouse_id: Option<Uuid>,
    #[validate(length(min = 1, message = "O pedido precisa de ao menos um item."), nested)]
    pub items: Option<Vec<PurchaseLinePayload>>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

impl UpdatePurchasePayload {
    pub fn apply_to(self, purchase: &mut Purchase) -> Result<(), AppError> {
        if let Some(supplier) = self.supplier {
            purchase.supplier = Json(supplier);
        }
        if let Some(warehouse_id) = self.warehouse_id {
            purchase.warehouse_id = warehouse_id;
        }
        if let Some(items) = self.items {
            let (lines, total) = price_lines(items)?;
            purchase.items = Json(lines);
            purchase.total_amount = total;
        }
        if let Some(status) = self.payment_status {
            purchase.payment_status = status;
        }
        if self.notes.is_some() {
            purchase.notes = self.notes;
        }
        Ok(())
    }
}
