// src/services/purchase_service.rs

use std::sync::Arc;

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    common::{error::AppError, sequence},
    db::PurchaseStore,
    models::purchase::{
        price_lines, CreatePurchasePayload, Purchase, PurchaseStatus, UpdatePurchasePayload,
    },
};

#[derive(Clone)]
pub struct PurchaseService {
    purchases: Arc<dyn PurchaseStore>,
}

impl PurchaseService {
    pub fn new(purchases: Arc<dyn PurchaseStore>) -> Self {
        Self { purchases }
    }

    pub async fn list(&self) -> Result<Vec<Purchase>, AppError> {
        self.purchases.list().await
    }

    pub async fn create(&self, payload: CreatePurchasePayload) -> Result<Purchase, AppError> {
        let number = sequence::purchase_number(self.purchases.count().await?);
        let (items, total_amount) = price_lines(payload.items)?;
        let now = Utc::now();

        let purchase = Purchase {
            id: Uuid::new_v4(),
            purchase_number: number,
            supplier: Json(payload.supplier),
            warehouse_id: payload.warehouse_id,
            items: Json(items),
            total_amount,
            status: PurchaseStatus::Ordered,
            payment_status: payload.payment_status,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };
        self.purchases.insert(&purchase).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdatePurchasePayload) -> Result<Purchase, AppError> {
        let mut purchase = self.find_mutable(id, "alterado").await?;
        payload.apply_to(&mut purchase)?;
        self.purchases.save(&purchase).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let purchase = self.find_mutable(id, "excluído").await?;
        self.purchases.delete(purchase.id).await?;
        Ok(())
    }

    /// Ordered → Received. O estoque de cada item sobe uma única vez: a troca de
    /// status é condicional e os incrementos entram na mesma transação.
    pub async fn receive(&self, id: Uuid) -> Result<Purchase, AppError> {
        let current = self.find(id).await?;
        match current.status {
            PurchaseStatus::Received => {
                return Err(AppError::Conflict("Pedido de compra já recebido.".into()));
            }
            PurchaseStatus::Cancelled => {
                return Err(AppError::Conflict(
                    "Pedido de compra cancelado não pode ser recebido.".into(),
                ));
            }
            PurchaseStatus::Ordered => {}
        }

        let receipt = self
            .purchases
            .receive(id)
            .await?
            .ok_or_else(|| AppError::Conflict("Pedido de compra já recebido.".into()))?;
        let purchase = receipt.purchase;

        for product_id in receipt.missing_products {
            tracing::warn!(
                purchase = %purchase.purchase_number,
                %product_id,
                "Produto do pedido não existe mais; item ignorado no recebimento"
            );
        }

        tracing::info!(purchase = %purchase.purchase_number, items = purchase.items.len(), "Pedido recebido");
        Ok(purchase)
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Purchase, AppError> {
        let mut purchase = self.find_mutable(id, "cancelado").await?;
        purchase.status = PurchaseStatus::Cancelled;
        self.purchases.save(&purchase).await
    }

    async fn find(&self, id: Uuid) -> Result<Purchase, AppError> {
        self.purchases
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Pedido de compra"))
    }

    // Pedido recebido é imutável
    async fn find_mutable(&self, id: Uuid, action: &str) -> Result<Purchase, AppError> {
        let purchase = self.find(id).await?;
        if purchase.status == PurchaseStatus::Received {
            return Err(AppError::Conflict(format!(
                "Pedido de compra recebido não pode ser {}.",
                action
            )));
        }
        Ok(purchase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::catalog::Product;
    use crate::models::purchase::{PaymentStatus, PurchaseLinePayload, Supplier};
    use rust_decimal::Decimal;
    use std::sync::atomic::Ordering;

    async fn setup() -> (PurchaseService, Arc<MemoryStore>, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::default());
        let mut ids = vec![];
        for stock in [5, 0] {
            let product = Product {
                id: Uuid::new_v4(),
                name: "Item".into(),
                description: None,
                category_id: None,
                unit_id: None,
                base_price: Decimal::from(10),
                tax_rate: Decimal::ZERO,
                variations: Json(vec![]),
                total_stock: stock,
                alert_quantity: 0,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            ids.push(product.id);
            store.put_product(product).await;
        }
        let service = PurchaseService::new(store.clone());
        (service, store, ids[0], ids[1])
    }

    fn order(a: Uuid, b: Uuid) -> CreatePurchasePayload {
        CreatePurchasePayload {
            supplier: Supplier { name: "Atacado".into(), contact: None, email: None },
            warehouse_id: Uuid::new_v4(),
            items: vec![
                PurchaseLinePayload { product_id: a, name: "A".into(), quantity: 10, cost_price: Decimal::from(3) },
                PurchaseLinePayload { product_id: b, name: "B".into(), quantity: 4, cost_price: Decimal::from(7) },
            ],
            payment_status: PaymentStatus::Unpaid,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_numbers_and_prices_the_order() {
        let (service, _, a, b) = setup().await;

        let first = service.create(order(a, b)).await.unwrap();
        let second = service.create(order(a, b)).await.unwrap();

        assert_eq!(first.purchase_number, "PO-00001");
        assert_eq!(second.purchase_number, "PO-00002");
        assert_eq!(first.status, PurchaseStatus::Ordered);
        assert_eq!(first.total_amount, Decimal::from(58));
    }

    #[tokio::test]
    async fn test_receive_increments_stock_once() {
        let (service, store, a, b) = setup().await;
        let purchase = service.create(order(a, b)).await.unwrap();

        let received = service.receive(purchase.id).await.unwrap();
        assert_eq!(received.status, PurchaseStatus::Received);
        assert_eq!(received.payment_status, PaymentStatus::Paid);
        assert_eq!(store.product(a).await.unwrap().total_stock, 15);
        assert_eq!(store.product(b).await.unwrap().total_stock, 4);

        let again = service.receive(purchase.id).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
        assert_eq!(store.product(a).await.unwrap().total_stock, 15);
    }

    #[tokio::test]
    async fn test_received_order_is_immutable() {
        let (service, _, a, b) = setup().await;
        let purchase = service.create(order(a, b)).await.unwrap();
        service.receive(purchase.id).await.unwrap();

        let update = UpdatePurchasePayload { notes: Some("x".into()), ..Default::default() };
        assert!(matches!(service.update(purchase.id, update).await, Err(AppError::Conflict(_))));
        assert!(matches!(service.delete(purchase.id).await, Err(AppError::Conflict(_))));
        assert!(matches!(service.cancel(purchase.id).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cancelled_order_cannot_be_received() {
        let (service, store, a, b) = setup().await;
        let purchase = service.create(order(a, b)).await.unwrap();

        service.cancel(purchase.id).await.unwrap();
        assert!(matches!(service.receive(purchase.id).await, Err(AppError::Conflict(_))));
        assert_eq!(store.product(a).await.unwrap().total_stock, 5);
    }

    #[tokio::test]
    async fn test_update_reprices_lines() {
        let (service, _, a, b) = setup().await;
        let purchase = service.create(order(a, b)).await.unwrap();

        let updated = service
            .update(
                purchase.id,
                UpdatePurchasePayload {
                    items: Some(vec![PurchaseLinePayload {
                        product_id: a,
                        name: "A".into(),
                        quantity: 2,
                        cost_price: Decimal::from(4),
                    }]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.total_amount, Decimal::from(8));
        assert_eq!(updated.purchase_number, purchase.purchase_number);
    }

    #[tokio::test]
    async fn test_failed_receipt_changes_nothing_and_can_be_retried() {
        let (service, store, a, b) = setup().await;
        let purchase = service.create(order(a, b)).await.unwrap();
        store.fail_stock_increment.store(true, Ordering::SeqCst);

        let result = service.receive(purchase.id).await;

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
        assert_eq!(store.product(a).await.unwrap().total_stock, 5);
        assert_eq!(store.product(b).await.unwrap().total_stock, 0);
        let stored = store.purchases.lock().await.get(&purchase.id).cloned().unwrap();
        assert_eq!(stored.status, PurchaseStatus::Ordered);

        store.fail_stock_increment.store(false, Ordering::SeqCst);
        let received = service.receive(purchase.id).await.unwrap();
        assert_eq!(received.status, PurchaseStatus::Received);
        assert_eq!(store.product(a).await.unwrap().total_stock, 15);
        assert_eq!(store.product(b).await.unwrap().total_stock, 4);
    }

    #[tokio::test]
    async fn test_receipt_overflow_keeps_order_open() {
        let (service, store, a, b) = setup().await;
        let mut full = store.product(b).await.unwrap();
        full.total_stock = i32::MAX;
        store.put_product(full).await;
        let purchase = service.create(order(a, b)).await.unwrap();

        let result = service.receive(purchase.id).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(store.product(a).await.unwrap().total_stock, 5);
        assert_eq!(store.product(b).await.unwrap().total_stock, i32::MAX);
        let stored = store.purchases.lock().await.get(&purchase.id).cloned().unwrap();
        assert_eq!(stored.status, PurchaseStatus::Ordered);
    }

    #[tokio::test]
    async fn test_receipt_skips_deleted_products() {
        let (service, store, a, b) = setup().await;
        let purchase = service.create(order(a, b)).await.unwrap();
        store.products.lock().await.remove(&b);

        let received = service.receive(purchase.id).await.unwrap();

        assert_eq!(received.status, PurchaseStatus::Received);
        assert_eq!(store.product(a).await.unwrap().total_stock, 15);
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let (service, _, _, _) = setup().await;
        assert!(matches!(service.receive(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
    }
}
