// src/services/quotation_service.rs

use std::sync::Arc;

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    common::{error::AppError, sequence},
    db::QuotationStore,
    models::quotation::{
        price_lines, CreateQuotationPayload, Quotation, QuotationStatus, UpdateQuotationPayload,
    },
};

#[derive(Clone)]
pub struct QuotationService {
    quotations: Arc<dyn QuotationStore>,
}

impl QuotationService {
    pub fn new(quotations: Arc<dyn QuotationStore>) -> Self {
        Self { quotations }
    }

    pub async fn list(&self) -> Result<Vec<Quotation>, AppError> {
        self.quotations.list().await
    }

    pub async fn create(&self, payload: CreateQuotationPayload) -> Result<Quotation, AppError> {
        let number = sequence::quotation_number(self.quotations.count().await?);
        let (items, total_amount) = price_lines(payload.items)?;
        let now = Utc::now();

        let quotation = Quotation {
            id: Uuid::new_v4(),
            quotation_number: number,
            customer: Json(payload.customer),
            items: Json(items),
            total_amount,
            expiry_date: payload.expiry_date,
            status: QuotationStatus::Pending,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };
        self.quotations.insert(&quotation).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateQuotationPayload) -> Result<Quotation, AppError> {
        let mut quotation = self.find_mutable(id, "alterado").await?;
        payload.apply_to(&mut quotation)?;
        self.quotations.save(&quotation).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let quotation = self.find_mutable(id, "excluído").await?;
        self.quotations.delete(quotation.id).await?;
        Ok(())
    }

    pub async fn change_status(&self, id: Uuid, next: QuotationStatus) -> Result<Quotation, AppError> {
        let mut quotation = self.find(id).await?;

        if !quotation.status.can_move_to(next) {
            return Err(AppError::Conflict(format!(
                "Orçamento não pode passar de {:?} para {:?}.",
                quotation.status, next
            )));
        }

        quotation.status = next;
        self.quotations.save(&quotation).await
    }

    async fn find(&self, id: Uuid) -> Result<Quotation, AppError> {
        self.quotations
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Orçamento"))
    }

    // Orçamento aceito é imutável
    async fn find_mutable(&self, id: Uuid, action: &str) -> Result<Quotation, AppError> {
        let quotation = self.find(id).await?;
        if quotation.status == QuotationStatus::Accepted {
            return Err(AppError::Conflict(format!("Orçamento aceito não pode ser {}.", action)));
        }
        Ok(quotation)
    }
}
