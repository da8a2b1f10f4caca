// src/db/purchase_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_stock_overflow, map_unique_violation, AppError},
    db::stores::{PurchaseStore, Receipt},
    models::purchase::Purchase,
};

#[derive(Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseStore for PurchaseRepository {
    async fn list(&self) -> Result<Vec<Purchase>, AppError> {
        let purchases =
            sqlx::query_as::<_, Purchase>("SELECT * FROM purchases ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(purchases)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Purchase>, AppError> {
        let purchase = sqlx::query_as::<_, Purchase>("SELECT * FROM purchases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(purchase)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, purchase: &Purchase) -> Result<Purchase, AppError> {
        sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (
                id, purchase_number, supplier, warehouse_id, items, total_amount,
                status, payment_status, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(purchase.id)
        .bind(&purchase.purchase_number)
        .bind(&purchase.supplier)
        .bind(purchase.warehouse_id)
        .bind(&purchase.items)
        .bind(purchase.total_amount)
        .bind(purchase.status)
        .bind(purchase.payment_status)
        .bind(&purchase.notes)
        .bind(purchase.created_at)
        .bind(purchase.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Número de pedido já utilizado, tente novamente."))
    }

    async fn save(&self, purchase: &Purchase) -> Result<Purchase, AppError> {
        let saved = sqlx::query_as::<_, Purchase>(
            r#"
            UPDATE purchases
            SET supplier = $2, warehouse_id = $3, items = $4, total_amount = $5,
                status = $6, payment_status = $7, notes = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(purchase.id)
        .bind(&purchase.supplier)
        .bind(purchase.warehouse_id)
        .bind(&purchase.items)
        .bind(purchase.total_amount)
        .bind(purchase.status)
        .bind(purchase.payment_status)
        .bind(&purchase.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Pedido de compra"))?;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn receive(&self, id: Uuid) -> Result<Option<Receipt>, AppError> {
        // Troca de status e incrementos na mesma transação; qualquer erro
        // descarta tudo (rollback no drop).
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query_as::<_, Purchase>(
            r#"
            UPDATE purchases
            SET status = 'Received', payment_status = 'Paid', updated_at = NOW()
            WHERE id = $1 AND status = 'Ordered'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(purchase) = claimed else {
            return Ok(None);
        };

        let mut missing_products = Vec::new();
        for item in purchase.items.iter() {
            let result = sqlx::query(
                "UPDATE products SET total_stock = total_stock + $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(map_stock_overflow)?;

            if result.rows_affected() == 0 {
                missing_products.push(item.product_id);
            }
        }

        tx.commit().await?;
        Ok(Some(Receipt { purchase, missing_products }))
    }
}
