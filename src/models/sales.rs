// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::catalog::validate_not_negative;

pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Split,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status")]
pub enum InvoiceStatus {
    #[default]
    Paid,
    Returned,
    Exchanged,
}

/// Cópia congelada de uma linha vendida. Alterações posteriores no catálogo
/// não afetam faturas já emitidas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub product_id: Uuid,
    #[schema(example = "Camiseta Básica")]
    pub name: String,
    pub variation_id: Option<Uuid>,
    #[schema(example = 3)]
    pub quantity: i32,
    #[schema(example = "20.00")]
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    #[schema(example = "60.00")]
    pub subtotal: Decimal,
    #[serde(default)]
    pub imei: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    #[schema(example = "INV-1700000000123-42")]
    pub invoice_number: String,
    pub cashier_id: Uuid,
    #[schema(example = "Walk-in Customer")]
    pub customer_name: String,
    pub customer_contact: Option<String>,
    #[schema(value_type = Vec<InvoiceLine>)]
    pub items: Json<Vec<InvoiceLine>>,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub amount_paid: Decimal,
    pub change_returned: Decimal,
    pub status: InvoiceStatus,
    pub original_invoice_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub variation_id: Option<Uuid>,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    #[schema(example = 3)]
    pub quantity: i32,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "20.00")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub imei: Vec<String>,
}

impl CartLine {
    /// `preço × quantidade − desconto + imposto`, ou `None` se estourar o
    /// intervalo do `Decimal`.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))?
            .checked_sub(self.discount)?
            .checked_add(self.tax)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    #[validate(length(min = 1, message = "O carrinho está vazio."), nested)]
    pub items: Vec<CartLine>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[schema(example = "60.00")]
    pub amount_paid: Decimal,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InvoiceFilter {
    /// Criadas a partir deste instante (inclusive)
    pub from: Option<DateTime<Utc>>,
    /// Criadas até este instante (inclusive)
    pub to: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.from.is_none_or(|from| invoice.created_at >= from)
            && self.to.is_none_or(|to| invoice.created_at <= to)
            && self.payment_method.is_none_or(|m| invoice.payment_method == m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32) -> CartLine {
        CartLine {
            product_id: Uuid::new_v4(),
            variation_id: None,
            quantity,
            unit_price: Decimal::from(20),
            discount: Decimal::ZERO,
            tax: Decimal::ZERO,
            imei: vec![],
        }
    }

    #[test]
    fn test_subtotal_applies_discount_and_tax() {
        let mut l = line(3);
        assert_eq!(l.subtotal(), Some(Decimal::from(60)));

        l.discount = Decimal::from(5);
        l.tax = Decimal::new(250, 2);
        assert_eq!(l.subtotal(), Some(Decimal::new(5750, 2)));
    }

    #[test]
    fn test_subtotal_overflow_is_none() {
        let mut l = line(3);
        l.unit_price = Decimal::MAX;
        assert_eq!(l.subtotal(), None);

        let mut l = line(1);
        l.unit_price = Decimal::MAX;
        l.tax = Decimal::ONE;
        assert_eq!(l.subtotal(), None);
    }

    #[test]
    fn test_huge_unit_price_still_passes_validation() {
        // A validação só barra negativos; o limite é conferido no checkout
        let mut l = line(3);
        l.unit_price = Decimal::MAX;
        let payload = CheckoutPayload {
            items: vec![l],
            customer_name: None,
            customer_contact: None,
            payment_method: PaymentMethod::Cash,
            amount_paid: Decimal::ZERO,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_checkout_payload_validation() {
        let empty = CheckoutPayload {
            items: vec![],
            customer_name: None,
            customer_contact: None,
            payment_method: PaymentMethod::Cash,
            amount_paid: Decimal::ZERO,
        };
        assert!(empty.validate().is_err());

        let zero_qty = CheckoutPayload { items: vec![line(0)], ..empty.clone() };
        assert!(zero_qty.validate().is_err());

        let ok = CheckoutPayload { items: vec![line(1)], ..empty };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_payment_method_defaults_to_cash() {
        let payload: CheckoutPayload = serde_json::from_value(serde_json::json!({
            "items": [{ "productId": Uuid::new_v4(), "quantity": 1, "unitPrice": 10.0 }],
            "amountPaid": 10.0
        }))
        .unwrap();

        assert_eq!(payload.payment_method, PaymentMethod::Cash);
        assert_eq!(payload.items[0].discount, Decimal::ZERO);
    }
}
