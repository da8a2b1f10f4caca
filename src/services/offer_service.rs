// src/services/offer_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::OfferStore,
    models::offer::{CreateOfferPayload, Offer, OfferType, UpdateOfferPayload},
};

// Cadastro de ofertas especiais. Apenas CRUD; o checkout não consulta ofertas.
#[derive(Clone)]
pub struct OfferService {
    offers: Arc<dyn OfferStore>,
}

impl OfferService {
    pub fn new(offers: Arc<dyn OfferStore>) -> Self {
        Self { offers }
    }

    pub async fn list(&self) -> Result<Vec<Offer>, AppError> {
        self.offers.list().await
    }

    pub async fn create(&self, payload: CreateOfferPayload) -> Result<Offer, AppError> {
        let now = Utc::now();
        let offer = Offer {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description,
            code: payload.code,
            kind: payload.kind,
            value: payload.value,
            min_purchase_amount: payload.min_purchase_amount,
            start_date: payload.start_date,
            end_date: payload.end_date,
            is_active: payload.is_active,
            applicable_categories: payload.applicable_categories,
            applicable_products: payload.applicable_products,
            created_at: now,
            updated_at: now,
        };
        check_rules(&offer)?;
        self.offers.insert(&offer).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateOfferPayload) -> Result<Offer, AppError> {
        let mut offer = self
            .offers
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Oferta"))?;
        payload.apply_to(&mut offer);
        // As regras valem para o resultado da mesclagem, não só para o que veio
        check_rules(&offer)?;
        self.offers.save(&offer).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.offers.delete(id).await? {
            return Err(AppError::NotFound("Oferta"));
        }
        Ok(())
    }
}

fn check_rules(offer: &Offer) -> Result<(), AppError> {
    if offer.end_date < offer.start_date {
        return Err(AppError::BadRequest(
            "A data final da oferta não pode ser anterior à inicial.".into(),
        ));
    }
    if offer.kind == OfferType::Percentage && offer.value > Decimal::ONE_HUNDRED {
        return Err(AppError::BadRequest("Percentual de desconto acima de 100.".into()));
    }
    Ok(())
}
