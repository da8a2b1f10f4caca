// src/models/zbill.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Fechamento de caixa (Z-bill). Fotografia imutável dos totais do dia; não
/// guarda referência às faturas e despesas que o compõem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZBill {
    pub id: Uuid,
    #[schema(example = "Z-1700000000123")]
    pub bill_number: String,
    pub business_date: NaiveDate,
    pub closed_by: Uuid,
    pub opening_cash: Decimal,
    pub total_sales: Decimal,
    pub total_cash_sales: Decimal,
    pub total_card_sales: Decimal,
    pub total_expenses: Decimal,
    pub expected_cash: Decimal,
    pub actual_cash: Decimal,
    // Positivo = sobra no caixa; negativo = falta
    pub difference: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateZBillPayload {
    /// Troco inicial da gaveta. Ausente = 0.
    #[schema(example = "100.00")]
    pub opening_cash: Option<Decimal>,
    /// Valor contado na gaveta ao fechar.
    #[schema(example = "160.00")]
    pub actual_cash: Decimal,
    #[validate(length(max = 1000, message = "As observações devem ter no máximo 1000 caracteres."))]
    pub notes: Option<String>,
}
