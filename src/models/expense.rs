// src/models/expense.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::catalog::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "expense_category")]
pub enum ExpenseCategory {
    Rent,
    Utilities,
    Salaries,
    Supplies,
    Marketing,
    Maintenance,
    Others,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "expense_payment_method")]
pub enum ExpensePaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "Bank Transfer")]
    #[sqlx(rename = "Bank Transfer")]
    BankTransfer,
    Card,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "expense_status")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    #[default]
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub category: ExpenseCategory,
    #[schema(example = "150.00")]
    pub amount: Decimal,
    pub description: Option<String>,
    // Data contábil; é ela que entra no fechamento do dia, não o created_at
    pub date: DateTime<Utc>,
    pub recorded_by: Uuid,
    pub payment_method: ExpensePaymentMethod,
    pub status: ExpenseStatus,
    #[schema(example = "https://cdn.loja.com/recibos/123.jpg")]
    pub attachment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpensePayload {
    pub category: ExpenseCategory,
    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: ExpensePaymentMethod,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[validate(url(message = "O anexo deve ser uma URL válida."))]
    pub attachment: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpensePayload {
    pub category: Option<ExpenseCategory>,
    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub payment_method: Option<ExpensePaymentMethod>,
    pub status: Option<ExpenseStatus>,
    #[validate(url(message = "O anexo deve ser uma URL válida."))]
    pub attachment: Option<String>,
}

impl UpdateExpensePayload {
    pub fn apply_to(self, expense: &mut Expense) {
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if self.description.is_some() {
            expense.description = self.description;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(method) = self.payment_method {
            expense.payment_method = method;
        }
        if let Some(status) = self.status {
            expense.status = status;
        }
        if self.attachment.is_some() {
            expense.attachment = self.attachment;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_transfer_keeps_its_label() {
        let json = serde_json::to_value(ExpensePaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "Bank Transfer");

        let parsed: ExpensePaymentMethod = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, ExpensePaymentMethod::BankTransfer);
    }

    #[test]
    fn test_defaults_are_cash_and_paid() {
        let payload: CreateExpensePayload = serde_json::from_value(serde_json::json!({
            "category": "Rent",
            "amount": 1200.0
        }))
        .unwrap();

        assert_eq!(payload.payment_method, ExpensePaymentMethod::Cash);
        assert_eq!(payload.status, ExpenseStatus::Paid);
        assert!(payload.date.is_none());
    }
}
