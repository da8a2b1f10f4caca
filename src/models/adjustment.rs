// src/models/adjustment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "adjustment_kind")]
pub enum AdjustmentKind {
    Addition,
    Subtraction,
}

impl AdjustmentKind {
    /// Variação com sinal a aplicar no contador de estoque.
    pub fn signed(self, quantity: i32) -> i32 {
        match self {
            AdjustmentKind::Addition => quantity,
            AdjustmentKind::Subtraction => -quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "adjustment_reason")]
pub enum AdjustmentReason {
    Damage,
    Correction,
    Return,
    Expired,
    Lost,
    Other,
}

/// Registro de auditoria. Nunca é alterado depois de criado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variation_id: Option<Uuid>,
    pub warehouse_id: Uuid,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    #[schema(example = 2)]
    pub quantity: i32,
    pub reason: AdjustmentReason,
    pub notes: Option<String>,
    pub adjusted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdjustmentPayload {
    pub product_id: Uuid,
    pub variation_id: Option<Uuid>,
    pub warehouse_id: Uuid,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
    pub reason: AdjustmentReason,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_quantity() {
        assert_eq!(AdjustmentKind::Addition.signed(4), 4);
        assert_eq!(AdjustmentKind::Subtraction.signed(4), -4);
    }

    #[test]
    fn test_payload_reads_type_field() {
        let payload: CreateAdjustmentPayload = serde_json::from_value(serde_json::json!({
            "productId": Uuid::new_v4(),
            "warehouseId": Uuid::new_v4(),
            "type": "Subtraction",
            "quantity": 2,
            "reason": "Damage"
        }))
        .unwrap();

        assert_eq!(payload.kind, AdjustmentKind::Subtraction);
        assert!(payload.variation_id.is_none());
    }
}
