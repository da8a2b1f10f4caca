// src/services/sales_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    common::{error::AppError, sequence},
    db::{InvoiceStore, ProductStore},
    models::sales::{
        CartLine, CheckoutPayload, Invoice, InvoiceFilter, InvoiceLine, InvoiceStatus,
        WALK_IN_CUSTOMER,
    },
};

/// Processa o carrinho linha a linha. Cada linha baixa o estoque e grava o
/// produto antes da próxima ser avaliada; uma falha interrompe o processamento
/// sem desfazer as linhas anteriores.
#[derive(Clone)]
pub struct SalesService {
    products: Arc<dyn ProductStore>,
    invoices: Arc<dyn InvoiceStore>,
}

impl SalesService {
    pub fn new(products: Arc<dyn ProductStore>, invoices: Arc<dyn InvoiceStore>) -> Self {
        Self { products, invoices }
    }

    pub async fn checkout(&self, payload: CheckoutPayload, cashier_id: Uuid) -> Result<Invoice, AppError> {
        // Os valores são conferidos antes de qualquer baixa de estoque
        let (subtotals, total) = price_cart(&payload.items)?;
        let change_returned = payload
            .amount_paid
            .checked_sub(total)
            .ok_or_else(|| AppError::BadRequest("O valor pago excede o limite suportado.".to_string()))?;

        let mut lines: Vec<InvoiceLine> = Vec::with_capacity(payload.items.len());

        for (index, (item, subtotal)) in payload.items.iter().zip(subtotals).enumerate() {
            match self.apply_line(index + 1, item, subtotal).await {
                Ok(line) => lines.push(line),
                Err(e) => {
                    if !lines.is_empty() {
                        tracing::warn!(
                            %cashier_id,
                            applied_lines = lines.len(),
                            failed_line = index + 1,
                            "Checkout interrompido: estoque já baixado nas linhas anteriores não foi revertido"
                        );
                    }
                    return Err(e);
                }
            }
        }

        let now = Utc::now();
        let invoice = Invoice {
            id: Uuid::new_v4(),
            invoice_number: sequence::invoice_number(now),
            cashier_id,
            customer_name: payload
                .customer_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| WALK_IN_CUSTOMER.to_string()),
            customer_contact: payload.customer_contact,
            items: Json(lines),
            total_amount: total,
            payment_method: payload.payment_method,
            amount_paid: payload.amount_paid,
            change_returned,
            status: InvoiceStatus::Paid,
            original_invoice_id: None,
            created_at: now,
            updated_at: now,
        };

        match self.invoices.insert(&invoice).await {
            Ok(stored) => {
                tracing::info!(
                    invoice_number = %stored.invoice_number,
                    total = %stored.total_amount,
                    lines = stored.items.len(),
                    "Venda registrada"
                );
                Ok(stored)
            }
            Err(e) => {
                tracing::warn!(
                    %cashier_id,
                    applied_lines = invoice.items.len(),
                    "Falha ao gravar a fatura: estoque já baixado em todas as linhas"
                );
                Err(e)
            }
        }
    }

    pub async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError> {
        self.invoices.list(filter).await
    }

    // Resolve, confere, baixa e grava. `line` começa em 1.
    async fn apply_line(&self, line: usize, item: &CartLine, subtotal: Decimal) -> Result<InvoiceLine, AppError> {
        let mut product = self
            .products
            .find_by_id(item.product_id)
            .await?
            .ok_or(AppError::ProductNotFound { line, product_id: item.product_id })?;

        let product_name = product.name.clone();

        match item.variation_id {
            Some(variation_id) => {
                let variation = product.variation_mut(variation_id).ok_or(AppError::VariationNotFound {
                    line,
                    product_id: item.product_id,
                    variation_id,
                })?;

                if item.quantity > variation.stock {
                    return Err(AppError::InsufficientStock {
                        line,
                        product_id: item.product_id,
                        product_name: format!("{} ({}: {})", product_name, variation.name, variation.value),
                        variation_id: Some(variation_id),
                        available: variation.stock,
                        requested: item.quantity,
                    });
                }
                variation.stock -= item.quantity;
            }
            None => {
                if item.quantity > product.total_stock {
                    return Err(AppError::InsufficientStock {
                        line,
                        product_id: item.product_id,
                        product_name,
                        variation_id: None,
                        available: product.total_stock,
                        requested: item.quantity,
                    });
                }
                product.total_stock -= item.quantity;
            }
        }

        // Escrita incondicional: duas vendas simultâneas podem ler o mesmo saldo.
        self.products.save(&product).await?;

        Ok(InvoiceLine {
            product_id: item.product_id,
            name: product_name,
            variation_id: item.variation_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount,
            tax: item.tax,
            subtotal,
            imei: item.imei.clone(),
        })
    }
}

/// Subtotal de cada linha e o total do carrinho, com aritmética verificada.
fn price_cart(items: &[CartLine]) -> Result<(Vec<Decimal>, Decimal), AppError> {
    let mut subtotals = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for (index, item) in items.iter().enumerate() {
        let subtotal = item.subtotal().ok_or_else(|| {
            AppError::BadRequest(format!("Linha {}: o valor excede o limite suportado.", index + 1))
        })?;
        total = total.checked_add(subtotal).ok_or_else(|| {
            AppError::BadRequest("O total do carrinho excede o limite suportado.".to_string())
        })?;
        subtotals.push(subtotal);
    }

    Ok((subtotals, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::catalog::{Product, Variation};
    use crate::models::sales::PaymentMethod;
    use std::sync::atomic::Ordering;

    fn service() -> (SalesService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (SalesService::new(store.clone(), store.clone()), store)
    }

    fn product(total_stock: i32, variations: Vec<Variation>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "P".into(),
            description: None,
            category_id: None,
            unit_id: None,
            base_price: Decimal::from(20),
            tax_rate: Decimal::ZERO,
            variations: Json(variations),
            total_stock,
            alert_quantity: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn variation(stock: i32) -> Variation {
        Variation {
            id: Uuid::new_v4(),
            name: "Tamanho".into(),
            value: "M".into(),
            sku: None,
            price: Decimal::from(25),
            stock,
            imei_required: false,
        }
    }

    fn line(product_id: Uuid, quantity: i32) -> CartLine {
        CartLine {
            product_id,
            variation_id: None,
            quantity,
            unit_price: Decimal::from(20),
            discount: Decimal::ZERO,
            tax: Decimal::ZERO,
            imei: vec![],
        }
    }

    fn cart(items: Vec<CartLine>, amount_paid: Decimal) -> CheckoutPayload {
        CheckoutPayload {
            items,
            customer_name: None,
            customer_contact: None,
            payment_method: PaymentMethod::Cash,
            amount_paid,
        }
    }

    #[tokio::test]
    async fn test_simple_sale_decrements_stock() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;

        let invoice = service
            .checkout(cart(vec![line(p.id, 3)], Decimal::from(60)), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(invoice.total_amount, Decimal::from(60));
        assert_eq!(invoice.change_returned, Decimal::ZERO);
        assert_eq!(invoice.customer_name, "Walk-in Customer");
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(invoice.invoice_number.starts_with("INV-"));
        assert_eq!(store.product(p.id).await.unwrap().total_stock, 7);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rejects_and_keeps_stock() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;

        let result = service
            .checkout(cart(vec![line(p.id, 15)], Decimal::from(300)), Uuid::new_v4())
            .await;

        match result {
            Err(AppError::InsufficientStock { line, product_id, available, requested, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(product_id, p.id);
                assert_eq!(available, 10);
                assert_eq!(requested, 15);
            }
            other => panic!("esperava estoque insuficiente, veio {:?}", other),
        }
        assert_eq!(store.product(p.id).await.unwrap().total_stock, 10);
        assert!(store.invoices.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_totals_follow_line_formula() {
        let (service, store) = service();
        let a = product(10, vec![]);
        let b = product(10, vec![]);
        store.put_product(a.clone()).await;
        store.put_product(b.clone()).await;

        let mut first = line(a.id, 2);
        first.discount = Decimal::from(5);
        let mut second = line(b.id, 1);
        second.unit_price = Decimal::new(999, 2);
        second.tax = Decimal::new(150, 2);

        let invoice = service
            .checkout(cart(vec![first, second], Decimal::from(100)), Uuid::new_v4())
            .await
            .unwrap();

        // (20×2 − 5) + (9.99×1 + 1.50)
        let expected = Decimal::new(4649, 2);
        assert_eq!(invoice.total_amount, expected);
        let sum: Decimal = invoice.items.iter().map(|l| l.subtotal).sum();
        assert_eq!(sum, expected);
        assert_eq!(invoice.change_returned, Decimal::from(100) - expected);
    }

    #[tokio::test]
    async fn test_variation_line_decrements_only_the_variation() {
        let (service, store) = service();
        let v = variation(5);
        let p = product(50, vec![v.clone()]);
        store.put_product(p.clone()).await;

        let mut l = line(p.id, 2);
        l.variation_id = Some(v.id);
        let invoice = service.checkout(cart(vec![l], Decimal::from(40)), Uuid::new_v4()).await.unwrap();

        let stored = store.product(p.id).await.unwrap();
        assert_eq!(stored.variation(v.id).unwrap().stock, 3);
        assert_eq!(stored.total_stock, 50);
        assert_eq!(invoice.items[0].variation_id, Some(v.id));
        assert_eq!(invoice.items[0].name, "P");
    }

    #[tokio::test]
    async fn test_variation_stock_is_checked_separately() {
        let (service, store) = service();
        let v = variation(1);
        let p = product(50, vec![v.clone()]);
        store.put_product(p.clone()).await;

        let mut l = line(p.id, 2);
        l.variation_id = Some(v.id);
        let result = service.checkout(cart(vec![l], Decimal::from(40)), Uuid::new_v4()).await;

        assert!(matches!(
            result,
            Err(AppError::InsufficientStock { variation_id: Some(id), available: 1, .. }) if id == v.id
        ));
    }

    #[tokio::test]
    async fn test_unknown_product_and_variation_are_not_found() {
        let (service, store) = service();
        let p = product(10, vec![variation(3)]);
        store.put_product(p.clone()).await;

        let missing = Uuid::new_v4();
        let result = service.checkout(cart(vec![line(missing, 1)], Decimal::ZERO), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::ProductNotFound { line: 1, product_id }) if product_id == missing));

        let mut l = line(p.id, 1);
        l.variation_id = Some(Uuid::new_v4());
        let result = service.checkout(cart(vec![l], Decimal::ZERO), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::VariationNotFound { line: 1, .. })));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_failure_midway_keeps_earlier_decrements() {
        let (service, store) = service();
        let a = product(10, vec![]);
        let b = product(1, vec![]);
        store.put_product(a.clone()).await;
        store.put_product(b.clone()).await;

        let result = service
            .checkout(cart(vec![line(a.id, 4), line(b.id, 2)], Decimal::from(120)), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::InsufficientStock { line: 2, .. })));
        // Sem reversão: a primeira linha continua baixada
        assert_eq!(store.product(a.id).await.unwrap().total_stock, 6);
        assert_eq!(store.product(b.id).await.unwrap().total_stock, 1);
        assert!(store.invoices.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_one_product_write_per_line() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;

        service
            .checkout(cart(vec![line(p.id, 1), line(p.id, 2)], Decimal::from(60)), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(store.writes(), 2);
        assert_eq!(store.product(p.id).await.unwrap().total_stock, 7);
    }

    #[tokio::test]
    async fn test_resubmitting_same_cart_sells_twice() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;
        let payload = cart(vec![line(p.id, 3)], Decimal::from(60));

        let first = service.checkout(payload.clone(), Uuid::new_v4()).await.unwrap();
        let second = service.checkout(payload, Uuid::new_v4()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.invoices.lock().await.len(), 2);
        assert_eq!(store.product(p.id).await.unwrap().total_stock, 4);
    }

    #[tokio::test]
    async fn test_invoice_write_failure_leaves_stock_decremented() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;
        store.fail_invoice_insert.store(true, Ordering::SeqCst);

        let result = service.checkout(cart(vec![line(p.id, 3)], Decimal::from(60)), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
        assert_eq!(store.product(p.id).await.unwrap().total_stock, 7);
    }

    #[tokio::test]
    async fn test_line_snapshot_is_frozen() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;

        let invoice = service.checkout(cart(vec![line(p.id, 1)], Decimal::from(20)), Uuid::new_v4()).await.unwrap();

        let mut changed = store.product(p.id).await.unwrap();
        changed.name = "Renomeado".into();
        store.put_product(changed).await;

        let listed = service.list_invoices(&InvoiceFilter::default()).await.unwrap();
        assert_eq!(listed[0].id, invoice.id);
        assert_eq!(listed[0].items[0].name, "P");
        assert_eq!(listed[0].items[0].unit_price, Decimal::from(20));
    }

    #[tokio::test]
    async fn test_line_value_overflow_rejects_before_stock_write() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;

        let mut l = line(p.id, 3);
        l.unit_price = Decimal::from_scientific("5e28").unwrap();
        let result = service.checkout(cart(vec![l], Decimal::ZERO), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(store.product(p.id).await.unwrap().total_stock, 10);
        assert_eq!(store.writes(), 0);
        assert!(store.invoices.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_cart_total_overflow_rejects_before_any_line() {
        let (service, store) = service();
        let a = product(10, vec![]);
        let b = product(10, vec![]);
        store.put_product(a.clone()).await;
        store.put_product(b.clone()).await;

        // Cada linha cabe sozinha, a soma não
        let mut first = line(a.id, 1);
        first.unit_price = Decimal::MAX;
        let mut second = line(b.id, 1);
        second.unit_price = Decimal::MAX;
        let result = service.checkout(cart(vec![first, second], Decimal::ZERO), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(store.product(a.id).await.unwrap().total_stock, 10);
        assert_eq!(store.product(b.id).await.unwrap().total_stock, 10);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_change_overflow_is_rejected() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;

        let mut l = line(p.id, 1);
        l.unit_price = Decimal::MAX;
        let result = service.checkout(cart(vec![l], Decimal::MIN), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(store.product(p.id).await.unwrap().total_stock, 10);
    }

    #[tokio::test]
    async fn test_list_filters_by_payment_method() {
        let (service, store) = service();
        let p = product(10, vec![]);
        store.put_product(p.clone()).await;

        service.checkout(cart(vec![line(p.id, 1)], Decimal::from(20)), Uuid::new_v4()).await.unwrap();
        let mut card = cart(vec![line(p.id, 1)], Decimal::from(20));
        card.payment_method = PaymentMethod::Card;
        service.checkout(card, Uuid::new_v4()).await.unwrap();

        let filter = InvoiceFilter { payment_method: Some(PaymentMethod::Card), ..Default::default() };
        let listed = service.list_invoices(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].payment_method, PaymentMethod::Card);
    }
}
