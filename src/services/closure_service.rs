// src/services/closure_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{business_day::DayWindow, error::AppError, sequence},
    db::{ExpenseStore, InvoiceStore, ZBillStore},
    models::{
        expense::Expense,
        sales::{Invoice, PaymentMethod},
        zbill::{GenerateZBillPayload, ZBill},
    },
};

/// Totais do dia, antes de considerar a gaveta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub total_sales: Decimal,
    pub total_cash_sales: Decimal,
    pub total_card_sales: Decimal,
    pub total_expenses: Decimal,
}

impl DaySummary {
    // Vendas "Split" entram só no total geral.
    pub fn from_records(invoices: &[Invoice], expenses: &[Expense]) -> Result<Self, AppError> {
        let mut summary = DaySummary::default();

        for invoice in invoices {
            let amount = invoice.total_amount;
            summary.total_sales = add(summary.total_sales, amount)?;
            match invoice.payment_method {
                PaymentMethod::Cash => summary.total_cash_sales = add(summary.total_cash_sales, amount)?,
                PaymentMethod::Card => summary.total_card_sales = add(summary.total_card_sales, amount)?,
                PaymentMethod::Split => {}
            }
        }

        for expense in expenses {
            summary.total_expenses = add(summary.total_expenses, expense.amount)?;
        }
        Ok(summary)
    }

    pub fn expected_cash(&self, opening_cash: Decimal) -> Result<Decimal, AppError> {
        opening_cash
            .checked_add(self.total_cash_sales)
            .and_then(|v| v.checked_sub(self.total_expenses))
            .ok_or_else(out_of_range)
    }
}

fn add(acc: Decimal, value: Decimal) -> Result<Decimal, AppError> {
    acc.checked_add(value).ok_or_else(out_of_range)
}

fn out_of_range() -> AppError {
    AppError::BadRequest("Os totais do dia excedem o limite suportado.".to_string())
}

#[derive(Clone)]
pub struct ClosureService {
    invoices: Arc<dyn InvoiceStore>,
    expenses: Arc<dyn ExpenseStore>,
    zbills: Arc<dyn ZBillStore>,
}

impl ClosureService {
    pub fn new(
        invoices: Arc<dyn InvoiceStore>,
        expenses: Arc<dyn ExpenseStore>,
        zbills: Arc<dyn ZBillStore>,
    ) -> Self {
        Self { invoices, expenses, zbills }
    }

    /// Fecha o caixa do dia corrente (fuso local do servidor).
    pub async fn generate(&self, payload: GenerateZBillPayload, closed_by: Uuid) -> Result<ZBill, AppError> {
        self.generate_for(DayWindow::today(), payload, closed_by).await
    }

    pub(crate) async fn generate_for(
        &self,
        window: DayWindow,
        payload: GenerateZBillPayload,
        closed_by: Uuid,
    ) -> Result<ZBill, AppError> {
        let invoices = self.invoices.list_created_between(window.start, window.end).await?;
        let expenses = self.expenses.list_dated_between(window.start, window.end).await?;

        let summary = DaySummary::from_records(&invoices, &expenses)?;
        // Sem validação de faixa: troco inicial negativo é aceito como veio.
        let opening_cash = payload.opening_cash.unwrap_or(Decimal::ZERO);
        let expected_cash = summary.expected_cash(opening_cash)?;
        let difference = payload.actual_cash.checked_sub(expected_cash).ok_or_else(out_of_range)?;

        let now = Utc::now();
        let bill = ZBill {
            id: Uuid::new_v4(),
            bill_number: sequence::zbill_number(now),
            business_date: window.date,
            closed_by,
            opening_cash,
            total_sales: summary.total_sales,
            total_cash_sales: summary.total_cash_sales,
            total_card_sales: summary.total_card_sales,
            total_expenses: summary.total_expenses,
            expected_cash,
            actual_cash: payload.actual_cash,
            difference,
            notes: payload.notes,
            created_at: now,
        };

        let stored = self.zbills.insert(&bill).await?;
        tracing::info!(
            bill_number = %stored.bill_number,
            invoices = invoices.len(),
            expenses = expenses.len(),
            difference = %stored.difference,
            "Caixa fechado"
        );
        Ok(stored)
    }

    pub async fn list(&self) -> Result<Vec<ZBill>, AppError> {
        self.zbills.list().await
    }
}
