// src/services/finance_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ExpenseStore,
    models::expense::{CreateExpensePayload, Expense, UpdateExpensePayload},
};

// Livro de despesas. A data contábil (`date`) é a que alimenta o fechamento.
#[derive(Clone)]
pub struct FinanceService {
    expenses: Arc<dyn ExpenseStore>,
}

impl FinanceService {
    pub fn new(expenses: Arc<dyn ExpenseStore>) -> Self {
        Self { expenses }
    }

    pub async fn list_expenses(&self) -> Result<Vec<Expense>, AppError> {
        self.expenses.list().await
    }

    pub async fn create_expense(
        &self,
        payload: CreateExpensePayload,
        recorded_by: Uuid,
    ) -> Result<Expense, AppError> {
        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            category: payload.category,
            amount: payload.amount,
            description: payload.description,
            date: payload.date.unwrap_or(now),
            recorded_by,
            payment_method: payload.payment_method,
            status: payload.status,
            attachment: payload.attachment,
            created_at: now,
            updated_at: now,
        };
        self.expenses.insert(&expense).await
    }

    pub async fn update_expense(
        &self,
        id: Uuid,
        payload: UpdateExpensePayload,
    ) -> Result<Expense, AppError> {
        let mut expense = self
            .expenses
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Despesa"))?;
        payload.apply_to(&mut expense);
        self.expenses.save(&expense).await
    }

    pub async fn delete_expense(&self, id: Uuid) -> Result<(), AppError> {
        if !self.expenses.delete(id).await? {
            return Err(AppError::NotFound("Despesa"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::expense::{ExpenseCategory, ExpensePaymentMethod, ExpenseStatus};
    use chrono::TimeDelta;
    use rust_decimal::Decimal;

    fn payload() -> CreateExpensePayload {
        CreateExpensePayload {
            category: ExpenseCategory::Utilities,
            amount: Decimal::from(90),
            description: Some("Conta de luz".into()),
            date: None,
            payment_method: ExpensePaymentMethod::BankTransfer,
            status: ExpenseStatus::Pending,
            attachment: None,
        }
    }

    #[tokio::test]
    async fn test_create_records_caller_and_defaults_date() {
        let service = FinanceService::new(Arc::new(MemoryStore::default()));
        let user = Uuid::new_v4();

        let expense = service.create_expense(payload(), user).await.unwrap();

        assert_eq!(expense.recorded_by, user);
        assert!(Utc::now() - expense.date < TimeDelta::seconds(5));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let service = FinanceService::new(Arc::new(MemoryStore::default()));
        let expense = service.create_expense(payload(), Uuid::new_v4()).await.unwrap();

        let updated = service
            .update_expense(
                expense.id,
                UpdateExpensePayload { status: Some(ExpenseStatus::Paid), ..Default::default() },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ExpenseStatus::Paid);
        assert_eq!(updated.amount, Decimal::from(90));
        assert_eq!(updated.payment_method, ExpensePaymentMethod::BankTransfer);
    }

    #[tokio::test]
    async fn test_delete_missing_expense() {
        let service = FinanceService::new(Arc::new(MemoryStore::default()));
        let expense = service.create_expense(payload(), Uuid::new_v4()).await.unwrap();

        service.delete_expense(expense.id).await.unwrap();
        assert!(matches!(
            service.delete_expense(expense.id).await,
            Err(AppError::NotFound("Despesa"))
        ));
    }
}
