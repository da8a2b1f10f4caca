// src/models/offer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::catalog::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "offer_type")]
pub enum OfferType {
    Percentage,
    #[serde(rename = "Fixed Amount")]
    #[sqlx(rename = "Fixed Amount")]
    FixedAmount,
    #[serde(rename = "Buy One Get One")]
    #[sqlx(rename = "Buy One Get One")]
    BuyOneGetOne,
}

/// Promoção cadastrada. Não participa do checkout: o desconto de cada linha
/// continua vindo do carrinho.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Uuid,
    #[schema(example = "Semana do cliente")]
    pub name: String,
    pub description: Option<String>,
    /// Cupom opcional, único quando presente
    #[schema(example = "CLIENTE10")]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: OfferType,
    // 10 = 10% em Percentage; valor absoluto em Fixed Amount
    #[schema(example = "10")]
    pub value: Decimal,
    pub min_purchase_amount: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub applicable_categories: Vec<String>,
    pub applicable_products: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferPayload {
    #[validate(length(min = 1, message = "O nome da oferta é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "O código não pode ser vazio."))]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: OfferType,
    #[validate(custom(function = "validate_not_negative"))]
    pub value: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub min_purchase_amount: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub applicable_categories: Vec<String>,
    #[serde(default)]
    pub applicable_products: Vec<Uuid>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferPayload {
    #[validate(length(min = 1, message = "O nome da oferta não pode ser vazio."))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "O código não pode ser vazio."))]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<OfferType>,
    #[validate(custom(function = "validate_not_negative"))]
    pub value: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub min_purchase_amount: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub applicable_categories: Option<Vec<String>>,
    pub applicable_products: Option<Vec<Uuid>>,
}

impl UpdateOfferPayload {
    pub fn apply_to(self, offer: &mut Offer) {
        if let Some(name) = self.name {
            offer.name = name;
        }
        if self.description.is_some() {
            offer.description = self.description;
        }
        if self.code.is_some() {
            offer.code = self.code;
        }
        if let Some(kind) = self.kind {
            offer.kind = kind;
        }
        if let Some(value) = self.value {
            offer.value = value;
        }
        if let Some(min) = self.min_purchase_amount {
            offer.min_purchase_amount = min;
        }
        if let Some(start) = self.start_date {
            offer.start_date = start;
        }
        if let Some(end) = self.end_date {
            offer.end_date = end;
        }
        if let Some(active) = self.is_active {
            offer.is_active = active;
        }
        if let Some(categories) = self.applicable_categories {
            offer.applicable_categories = categories;
        }
        if let Some(products) = self.applicable_products {
            offer.applicable_products = products;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_type_keeps_its_labels() {
        assert_eq!(serde_json::to_value(OfferType::FixedAmount).unwrap(), "Fixed Amount");
        assert_eq!(serde_json::to_value(OfferType::BuyOneGetOne).unwrap(), "Buy One Get One");

        let parsed: OfferType = serde_json::from_value("Percentage".into()).unwrap();
        assert_eq!(parsed, OfferType::Percentage);
    }

    #[test]
    fn test_create_payload_defaults_and_validation() {
        let payload: CreateOfferPayload = serde_json::from_value(serde_json::json!({
            "name": "Queima de estoque",
            "type": "Fixed Amount",
            "value": 50.0,
            "startDate": "2024-05-01T00:00:00Z",
            "endDate": "2024-05-31T23:59:59Z"
        }))
        .unwrap();

        assert!(payload.is_active);
        assert_eq!(payload.min_purchase_amount, Decimal::ZERO);
        assert!(payload.applicable_products.is_empty());
        assert!(payload.validate().is_ok());

        let negative = CreateOfferPayload { value: Decimal::from(-1), ..payload };
        let errors = negative.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("value"));
    }
}
