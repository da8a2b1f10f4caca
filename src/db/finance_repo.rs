// src/db/finance_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::{ExpenseStore, ZBillStore},
    models::{expense::Expense, zbill::ZBill},
};

// Despesas e fechamentos de caixa
#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseStore for FinanceRepository {
    async fn list(&self) -> Result<Vec<Expense>, AppError> {
        let expenses = sqlx::query_as::<_, Expense>("SELECT * FROM expenses ORDER BY date DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(expenses)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, AppError> {
        let expense = sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(expense)
    }

    async fn insert(&self, expense: &Expense) -> Result<Expense, AppError> {
        let created = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (
                id, category, amount, description, date, recorded_by,
                payment_method, status, attachment, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(expense.id)
        .bind(expense.category)
        .bind(expense.amount)
        .bind(&expense.description)
        .bind(expense.date)
        .bind(expense.recorded_by)
        .bind(expense.payment_method)
        .bind(expense.status)
        .bind(&expense.attachment)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn save(&self, expense: &Expense) -> Result<Expense, AppError> {
        let saved = sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
            SET category = $2, amount = $3, description = $4, date = $5,
                payment_method = $6, status = $7, attachment = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(expense.id)
        .bind(expense.category)
        .bind(expense.amount)
        .bind(&expense.description)
        .bind(expense.date)
        .bind(expense.payment_method)
        .bind(expense.status)
        .bind(&expense.attachment)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Despesa"))?;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_dated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, AppError> {
        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE date >= $1 AND date <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }
}

#[async_trait]
impl ZBillStore for FinanceRepository {
    async fn insert(&self, bill: &ZBill) -> Result<ZBill, AppError> {
        let created = sqlx::query_as::<_, ZBill>(
            r#"
            INSERT INTO z_bills (
                id, bill_number, business_date, closed_by, opening_cash, total_sales,
                total_cash_sales, total_card_sales, total_expenses, expected_cash,
                actual_cash, difference, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(bill.id)
        .bind(&bill.bill_number)
        .bind(bill.business_date)
        .bind(bill.closed_by)
        .bind(bill.opening_cash)
        .bind(bill.total_sales)
        .bind(bill.total_cash_sales)
        .bind(bill.total_card_sales)
        .bind(bill.total_expenses)
        .bind(bill.expected_cash)
        .bind(bill.actual_cash)
        .bind(bill.difference)
        .bind(&bill.notes)
        .bind(bill.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<ZBill>, AppError> {
        let bills = sqlx::query_as::<_, ZBill>("SELECT * FROM z_bills ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(bills)
    }
}
