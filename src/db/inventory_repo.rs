// src/db/inventory_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::stores::{AdjustmentStore, ProductStore},
    models::{
        adjustment::Adjustment,
        catalog::{Category, CategoryPayload, Product, Unit, UnitPayload, Warehouse, WarehousePayload},
    },
};

// Produtos, ajustes de estoque e os cadastros auxiliares (unidades, categorias,
// depósitos).
#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Unidades de medida
    // ---

    pub async fn list_units(&self) -> Result<Vec<Unit>, AppError> {
        let units = sqlx::query_as::<_, Unit>("SELECT * FROM units ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(units)
    }

    pub async fn create_unit(&self, payload: &UnitPayload) -> Result<Unit, AppError> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (name, short_name, is_active)
            VALUES ($1, $2, COALESCE($3, TRUE))
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.short_name)
        .bind(payload.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(unit)
    }

    pub async fn update_unit(&self, id: Uuid, payload: &UnitPayload) -> Result<Option<Unit>, AppError> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units
            SET name = $2, short_name = $3, is_active = COALESCE($4, is_active), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.short_name)
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(unit)
    }

    pub async fn delete_unit(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Categorias
    // ---

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, is_active)
            VALUES ($1, $2, COALESCE($3, TRUE))
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe uma categoria com esse nome."))
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, description = $3, is_active = COALESCE($4, is_active), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe uma categoria com esse nome."))
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Depósitos
    // ---

    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, AppError> {
        let warehouses = sqlx::query_as::<_, Warehouse>("SELECT * FROM warehouses ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(warehouses)
    }

    pub async fn create_warehouse(&self, payload: &WarehousePayload) -> Result<Warehouse, AppError> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            INSERT INTO warehouses (name, address, phone, is_active)
            VALUES ($1, $2, $3, COALESCE($4, TRUE))
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.address)
        .bind(&payload.phone)
        .bind(payload.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(warehouse)
    }

    pub async fn update_warehouse(
        &self,
        id: Uuid,
        payload: &WarehousePayload,
    ) -> Result<Option<Warehouse>, AppError> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            UPDATE warehouses
            SET name = $2, address = $3, phone = $4,
                is_active = COALESCE($5, is_active), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.address)
        .bind(&payload.phone)
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(warehouse)
    }

    pub async fn delete_warehouse(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM warehouses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProductStore for InventoryRepository {
    async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE is_active = TRUE AND total_stock <= alert_quantity
            ORDER BY total_stock ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn insert(&self, product: &Product) -> Result<Product, AppError> {
        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                id, name, description, category_id, unit_id, base_price, tax_rate,
                variations, total_stock, alert_quantity, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.unit_id)
        .bind(product.base_price)
        .bind(product.tax_rate)
        .bind(&product.variations)
        .bind(product.total_stock)
        .bind(product.alert_quantity)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn save(&self, product: &Product) -> Result<Product, AppError> {
        // Escrita do documento inteiro; a última gravação vence.
        let saved = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, description = $3, category_id = $4, unit_id = $5,
                base_price = $6, tax_rate = $7, variations = $8, total_stock = $9,
                alert_quantity = $10, is_active = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.unit_id)
        .bind(product.base_price)
        .bind(product.tax_rate)
        .bind(&product.variations)
        .bind(product.total_stock)
        .bind(product.alert_quantity)
        .bind(product.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Produto"))?;
        Ok(saved)
    }

}

#[async_trait]
impl AdjustmentStore for InventoryRepository {
    async fn list(&self) -> Result<Vec<Adjustment>, AppError> {
        let adjustments =
            sqlx::query_as::<_, Adjustment>("SELECT * FROM adjustments ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(adjustments)
    }

    async fn insert(&self, adjustment: &Adjustment) -> Result<Adjustment, AppError> {
        let created = sqlx::query_as::<_, Adjustment>(
            r#"
            INSERT INTO adjustments (
                id, product_id, variation_id, warehouse_id, kind, quantity,
                reason, notes, adjusted_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(adjustment.id)
        .bind(adjustment.product_id)
        .bind(adjustment.variation_id)
        .bind(adjustment.warehouse_id)
        .bind(adjustment.kind)
        .bind(adjustment.quantity)
        .bind(adjustment.reason)
        .bind(&adjustment.notes)
        .bind(adjustment.adjusted_by)
        .bind(adjustment.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
