// src/db/sales_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::stores::{InvoiceStore, QuotationStore},
    models::{
        quotation::Quotation,
        sales::{Invoice, InvoiceFilter},
    },
};

// Faturas e orçamentos
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceStore for SalesRepository {
    async fn insert(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        let created = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                id, invoice_number, cashier_id, customer_name, customer_contact, items,
                total_amount, payment_method, amount_paid, change_returned, status,
                original_invoice_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.invoice_number)
        .bind(invoice.cashier_id)
        .bind(&invoice.customer_name)
        .bind(&invoice.customer_contact)
        .bind(&invoice.items)
        .bind(invoice.total_amount)
        .bind(invoice.payment_method)
        .bind(invoice.amount_paid)
        .bind(invoice.change_returned)
        .bind(invoice.status)
        .bind(invoice.original_invoice_id)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT * FROM invoices
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at <= $2)
              AND ($3::payment_method IS NULL OR payment_method = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.payment_method)
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }

    async fn list_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE created_at >= $1 AND created_at <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }
}

#[async_trait]
impl QuotationStore for SalesRepository {
    async fn list(&self) -> Result<Vec<Quotation>, AppError> {
        let quotations =
            sqlx::query_as::<_, Quotation>("SELECT * FROM quotations ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(quotations)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quotation>, AppError> {
        let quotation = sqlx::query_as::<_, Quotation>("SELECT * FROM quotations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(quotation)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, quotation: &Quotation) -> Result<Quotation, AppError> {
        sqlx::query_as::<_, Quotation>(
            r#"
            INSERT INTO quotations (
                id, quotation_number, customer, items, total_amount, expiry_date,
                status, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(quotation.id)
        .bind(&quotation.quotation_number)
        .bind(&quotation.customer)
        .bind(&quotation.items)
        .bind(quotation.total_amount)
        .bind(quotation.expiry_date)
        .bind(quotation.status)
        .bind(&quotation.notes)
        .bind(quotation.created_at)
        .bind(quotation.updated_at)
        .fetch_one(&self.pool)
        .await
        // Dois cadastros simultâneos podem calcular o mesmo número
        .map_err(|e| map_unique_violation(e, "Número de orçamento já utilizado, tente novamente."))
    }

    async fn save(&self, quotation: &Quotation) -> Result<Quotation, AppError> {
        let saved = sqlx::query_as::<_, Quotation>(
            r#"
            UPDATE quotations
            SET customer = $2, items = $3, total_amount = $4, expiry_date = $5,
                status = $6, notes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(quotation.id)
        .bind(&quotation.customer)
        .bind(&quotation.items)
        .bind(quotation.total_amount)
        .bind(quotation.expiry_date)
        .bind(quotation.status)
        .bind(&quotation.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Orçamento"))?;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
