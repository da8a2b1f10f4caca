// src/db/offer_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::stores::OfferStore,
    models::offer::Offer,
};

const DUPLICATE_CODE: &str = "Código de oferta já utilizado.";

#[derive(Clone)]
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferStore for OfferRepository {
    async fn list(&self) -> Result<Vec<Offer>, AppError> {
        let offers = sqlx::query_as::<_, Offer>("SELECT * FROM offers ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(offers)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Offer>, AppError> {
        let offer = sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(offer)
    }

    async fn insert(&self, offer: &Offer) -> Result<Offer, AppError> {
        sqlx::query_as::<_, Offer>(
            r#"
            INSERT INTO offers (
                id, name, description, code, kind, value, min_purchase_amount,
                start_date, end_date, is_active, applicable_categories, applicable_products,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(offer.id)
        .bind(&offer.name)
        .bind(&offer.description)
        .bind(&offer.code)
        .bind(offer.kind)
        .bind(offer.value)
        .bind(offer.min_purchase_amount)
        .bind(offer.start_date)
        .bind(offer.end_date)
        .bind(offer.is_active)
        .bind(&offer.applicable_categories)
        .bind(&offer.applicable_products)
        .bind(offer.created_at)
        .bind(offer.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_CODE))
    }

    async fn save(&self, offer: &Offer) -> Result<Offer, AppError> {
        let saved = sqlx::query_as::<_, Offer>(
            r#"
            UPDATE offers
            SET name = $2, description = $3, code = $4, kind = $5, value = $6,
                min_purchase_amount = $7, start_date = $8, end_date = $9, is_active = $10,
                applicable_categories = $11, applicable_products = $12, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(offer.id)
        .bind(&offer.name)
        .bind(&offer.description)
        .bind(&offer.code)
        .bind(offer.kind)
        .bind(offer.value)
        .bind(offer.min_purchase_amount)
        .bind(offer.start_date)
        .bind(offer.end_date)
        .bind(offer.is_active)
        .bind(&offer.applicable_categories)
        .bind(&offer.applicable_products)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_CODE))?
        .ok_or(AppError::NotFound("Oferta"))?;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
