// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// --- Produto ---

/// Sub-unidade com preço e estoque próprios (ex.: "Tamanho: G").
/// Só existe dentro do documento do produto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: Uuid,
    #[schema(example = "Tamanho")]
    pub name: String,
    #[schema(example = "G")]
    pub value: String,
    pub sku: Option<String>,
    #[schema(example = "49.90")]
    pub price: Decimal,
    #[schema(example = 12)]
    pub stock: i32,
    #[serde(default)]
    pub imei_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Camiseta Básica")]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    #[schema(example = "39.90")]
    pub base_price: Decimal,
    #[schema(example = "0")]
    pub tax_rate: Decimal,
    #[schema(value_type = Vec<Variation>)]
    pub variations: Json<Vec<Variation>>,
    // Para produtos com variações este contador é apenas informativo
    #[schema(example = 10)]
    pub total_stock: i32,
    #[schema(example = 3)]
    pub alert_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn variation(&self, variation_id: Uuid) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id == variation_id)
    }

    pub fn variation_mut(&mut self, variation_id: Uuid) -> Option<&mut Variation> {
        self.variations.0.iter_mut().find(|v| v.id == variation_id)
    }

    pub fn is_low_stock(&self) -> bool {
        self.is_active && self.total_stock <= self.alert_quantity
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariationPayload {
    // Ausente = nova variação; presente = preserva a identidade existente
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "O nome da variação é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O valor da variação é obrigatório."))]
    pub value: String,
    pub sku: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub imei_required: bool,
}

impl VariationPayload {
    pub fn into_variation(self) -> Variation {
        Variation {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name,
            value: self.value,
            sku: self.sku,
            price: self.price,
            stock: self.stock,
            imei_required: self.imei_required,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    #[validate(custom(function = "validate_not_negative"))]
    pub base_price: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub tax_rate: Decimal,
    #[serde(default)]
    #[validate(nested)]
    pub variations: Vec<VariationPayload>,
    #[serde(default)]
    pub total_stock: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "O alerta de estoque não pode ser negativo."))]
    pub alert_quantity: i32,
}

/// Atualização parcial: só os campos presentes são alterados.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    #[validate(custom(function = "validate_not_negative"))]
    pub base_price: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub tax_rate: Option<Decimal>,
    #[validate(nested)]
    pub variations: Option<Vec<VariationPayload>>,
    pub total_stock: Option<i32>,
    #[validate(range(min = 0, message = "O alerta de estoque não pode ser negativo."))]
    pub alert_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateProductPayload {
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if self.description.is_some() {
            product.description = self.description;
        }
        if self.category_id.is_some() {
            product.category_id = self.category_id;
        }
        if self.unit_id.is_some() {
            product.unit_id = self.unit_id;
        }
        if let Some(price) = self.base_price {
            product.base_price = price;
        }
        if let Some(rate) = self.tax_rate {
            product.tax_rate = rate;
        }
        if let Some(variations) = self.variations {
            product.variations = Json(variations.into_iter().map(VariationPayload::into_variation).collect());
        }
        if let Some(stock) = self.total_stock {
            product.total_stock = stock;
        }
        if let Some(alert) = self.alert_quantity {
            product.alert_quantity = alert;
        }
        if let Some(active) = self.is_active {
            product.is_active = active;
        }
    }
}

// --- Unidades, categorias e depósitos ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    #[schema(example = "Quilograma")]
    pub name: String,
    #[schema(example = "kg")]
    pub short_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "A abreviação é obrigatória."))]
    pub short_name: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Vestuário")]
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: Uuid,
    #[schema(example = "Depósito Central")]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehousePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}
