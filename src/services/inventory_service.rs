// src/services/inventory_service.rs

use std::sync::Arc;

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AdjustmentStore, ProductStore},
    models::{
        adjustment::{Adjustment, CreateAdjustmentPayload},
        catalog::{CreateProductPayload, Product, UpdateProductPayload, VariationPayload},
    },
};

#[derive(Clone)]
pub struct InventoryService {
    products: Arc<dyn ProductStore>,
    adjustments: Arc<dyn AdjustmentStore>,
}

impl InventoryService {
    pub fn new(products: Arc<dyn ProductStore>, adjustments: Arc<dyn AdjustmentStore>) -> Self {
        Self { products, adjustments }
    }

    // ---
    // Produtos
    // ---

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.products.list_active().await
    }

    pub async fn list_low_stock(&self) -> Result<Vec<Product>, AppError> {
        self.products.list_low_stock().await
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn create_product(&self, payload: CreateProductPayload) -> Result<Product, AppError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description,
            category_id: payload.category_id,
            unit_id: payload.unit_id,
            base_price: payload.base_price,
            tax_rate: payload.tax_rate,
            // Variações novas sempre recebem identidade gerada aqui
            variations: Json(
                payload
                    .variations
                    .into_iter()
                    .map(|v| VariationPayload { id: None, ..v }.into_variation())
                    .collect(),
            ),
            total_stock: payload.total_stock,
            alert_quantity: payload.alert_quantity,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.products.insert(&product).await
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        payload: UpdateProductPayload,
    ) -> Result<Product, AppError> {
        let mut product = self.get_product(id).await?;
        payload.apply_to(&mut product);
        self.products.save(&product).await
    }

    /// Exclusão lógica: o produto some das listagens mas continua
    /// referenciado por faturas e ajustes antigos.
    pub async fn deactivate_product(&self, id: Uuid) -> Result<(), AppError> {
        let mut product = self.get_product(id).await?;
        product.is_active = false;
        self.products.save(&product).await?;
        Ok(())
    }

    // ---
    // Ajustes de estoque
    // ---

    pub async fn list_adjustments(&self) -> Result<Vec<Adjustment>, AppError> {
        self.adjustments.list().await
    }

    /// Aplica o ajuste ao contador e registra a auditoria. Não há piso: uma
    /// subtração pode deixar o estoque negativo.
    pub async fn create_adjustment(
        &self,
        payload: CreateAdjustmentPayload,
        adjusted_by: Uuid,
    ) -> Result<Adjustment, AppError> {
        let mut product = self.get_product(payload.product_id).await?;
        let delta = payload.kind.signed(payload.quantity);

        match payload.variation_id {
            Some(variation_id) => {
                let variation = product
                    .variation_mut(variation_id)
                    .ok_or(AppError::NotFound("Variação"))?;
                variation.stock = variation
                    .stock
                    .checked_add(delta)
                    .ok_or_else(AppError::stock_out_of_range)?;
            }
            None => {
                product.total_stock = product
                    .total_stock
                    .checked_add(delta)
                    .ok_or_else(AppError::stock_out_of_range)?;
            }
        }

        self.products.save(&product).await?;

        let adjustment = Adjustment {
            id: Uuid::new_v4(),
            product_id: payload.product_id,
            variation_id: payload.variation_id,
            warehouse_id: payload.warehouse_id,
            kind: payload.kind,
            quantity: payload.quantity,
            reason: payload.reason,
            notes: payload.notes,
            adjusted_by,
            created_at: Utc::now(),
        };
        self.adjustments.insert(&adjustment).await
    }
}
