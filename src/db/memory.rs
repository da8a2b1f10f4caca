// src/db/memory.rs

// Armazenamento em memória para os testes dos serviços. Mesmas regras das
// implementações Postgres: escritas por id, última gravação vence.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::{
        AdjustmentStore, ExpenseStore, InvoiceStore, OfferStore, ProductStore, PurchaseStore,
        QuotationStore, Receipt, RoleStore, ZBillStore,
    },
    models::{
        adjustment::Adjustment,
        catalog::Product,
        expense::Expense,
        offer::Offer,
        purchase::{PaymentStatus, Purchase, PurchaseStatus},
        quotation::Quotation,
        rbac::Role,
        sales::{Invoice, InvoiceFilter},
        zbill::ZBill,
    },
};

#[derive(Default)]
pub struct MemoryStore {
    pub products: Mutex<HashMap<Uuid, Product>>,
    pub invoices: Mutex<Vec<Invoice>>,
    pub expenses: Mutex<HashMap<Uuid, Expense>>,
    pub zbills: Mutex<Vec<ZBill>>,
    pub purchases: Mutex<HashMap<Uuid, Purchase>>,
    pub quotations: Mutex<HashMap<Uuid, Quotation>>,
    pub offers: Mutex<HashMap<Uuid, Offer>>,
    pub adjustments: Mutex<Vec<Adjustment>>,
    pub roles: Mutex<HashMap<Uuid, Role>>,
    pub product_writes: AtomicUsize,
    pub fail_invoice_insert: AtomicBool,
    /// Faz o recebimento falhar a partir do segundo item.
    pub fail_stock_increment: AtomicBool,
}

impl MemoryStore {
    pub async fn put_product(&self, product: Product) {
        self.products.lock().await.insert(product.id, product);
    }

    pub async fn product(&self, id: Uuid) -> Option<Product> {
        self.products.lock().await.get(&id).cloned()
    }

    pub fn writes(&self) -> usize {
        self.product_writes.load(Ordering::SeqCst)
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|b| std::cmp::Reverse(key(b)));
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let products = self.products.lock().await;
        Ok(products.values().filter(|p| p.is_active).cloned().collect())
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, AppError> {
        let products = self.products.lock().await;
        Ok(products.values().filter(|p| p.is_low_stock()).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.products.lock().await.get(&id).cloned())
    }

    async fn insert(&self, product: &Product) -> Result<Product, AppError> {
        self.products.lock().await.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn save(&self, product: &Product) -> Result<Product, AppError> {
        let mut products = self.products.lock().await;
        if !products.contains_key(&product.id) {
            return Err(AppError::NotFound("Produto"));
        }
        self.product_writes.fetch_add(1, Ordering::SeqCst);
        products.insert(product.id, product.clone());
        Ok(product.clone())
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn insert(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        if self.fail_invoice_insert.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        self.invoices.lock().await.push(invoice.clone());
        Ok(invoice.clone())
    }

    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .lock()
            .await
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        newest_first(&mut invoices, |i| i.created_at);
        Ok(invoices)
    }

    async fn list_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, AppError> {
        let invoices = self.invoices.lock().await;
        Ok(invoices
            .iter()
            .filter(|i| i.created_at >= start && i.created_at <= end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Expense>, AppError> {
        let mut expenses: Vec<Expense> = self.expenses.lock().await.values().cloned().collect();
        newest_first(&mut expenses, |e| e.date);
        Ok(expenses)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, AppError> {
        Ok(self.expenses.lock().await.get(&id).cloned())
    }

    async fn insert(&self, expense: &Expense) -> Result<Expense, AppError> {
        self.expenses.lock().await.insert(expense.id, expense.clone());
        Ok(expense.clone())
    }

    async fn save(&self, expense: &Expense) -> Result<Expense, AppError> {
        let mut expenses = self.expenses.lock().await;
        if !expenses.contains_key(&expense.id) {
            return Err(AppError::NotFound("Despesa"));
        }
        expenses.insert(expense.id, expense.clone());
        Ok(expense.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.expenses.lock().await.remove(&id).is_some())
    }

    async fn list_dated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, AppError> {
        let expenses = self.expenses.lock().await;
        Ok(expenses
            .values()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ZBillStore for MemoryStore {
    async fn insert(&self, bill: &ZBill) -> Result<ZBill, AppError> {
        self.zbills.lock().await.push(bill.clone());
        Ok(bill.clone())
    }

    async fn list(&self) -> Result<Vec<ZBill>, AppError> {
        let mut bills = self.zbills.lock().await.clone();
        newest_first(&mut bills, |b| b.created_at);
        Ok(bills)
    }
}

#[async_trait]
impl PurchaseStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Purchase>, AppError> {
        let mut purchases: Vec<Purchase> = self.purchases.lock().await.values().cloned().collect();
        newest_first(&mut purchases, |p| p.created_at);
        Ok(purchases)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Purchase>, AppError> {
        Ok(self.purchases.lock().await.get(&id).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.purchases.lock().await.len() as i64)
    }

    async fn insert(&self, purchase: &Purchase) -> Result<Purchase, AppError> {
        self.purchases.lock().await.insert(purchase.id, purchase.clone());
        Ok(purchase.clone())
    }

    async fn save(&self, purchase: &Purchase) -> Result<Purchase, AppError> {
        let mut purchases = self.purchases.lock().await;
        if !purchases.contains_key(&purchase.id) {
            return Err(AppError::NotFound("Pedido de compra"));
        }
        purchases.insert(purchase.id, purchase.clone());
        Ok(purchase.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.purchases.lock().await.remove(&id).is_some())
    }

    async fn receive(&self, id: Uuid) -> Result<Option<Receipt>, AppError> {
        let mut purchases = self.purchases.lock().await;
        let mut products = self.products.lock().await;

        let Some(purchase) = purchases.get_mut(&id).filter(|p| p.status == PurchaseStatus::Ordered) else {
            return Ok(None);
        };

        // Calcula tudo numa área à parte; só publica se todos os itens passarem
        let mut staged: HashMap<Uuid, i32> = HashMap::new();
        let mut missing_products = Vec::new();
        for (index, item) in purchase.items.iter().enumerate() {
            if index > 0 && self.fail_stock_increment.load(Ordering::SeqCst) {
                return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
            }
            let Some(product) = products.get(&item.product_id) else {
                missing_products.push(item.product_id);
                continue;
            };
            let current = staged.get(&item.product_id).copied().unwrap_or(product.total_stock);
            let next = current
                .checked_add(item.quantity)
                .ok_or_else(AppError::stock_out_of_range)?;
            staged.insert(item.product_id, next);
        }

        for (product_id, stock) in staged {
            if let Some(product) = products.get_mut(&product_id) {
                product.total_stock = stock;
            }
        }
        purchase.status = PurchaseStatus::Received;
        purchase.payment_status = PaymentStatus::Paid;

        Ok(Some(Receipt { purchase: purchase.clone(), missing_products }))
    }
}

#[async_trait]
impl QuotationStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Quotation>, AppError> {
        let mut quotations: Vec<Quotation> =
            self.quotations.lock().await.values().cloned().collect();
        newest_first(&mut quotations, |q| q.created_at);
        Ok(quotations)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quotation>, AppError> {
        Ok(self.quotations.lock().await.get(&id).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.quotations.lock().await.len() as i64)
    }

    async fn insert(&self, quotation: &Quotation) -> Result<Quotation, AppError> {
        self.quotations.lock().await.insert(quotation.id, quotation.clone());
        Ok(quotation.clone())
    }

    async fn save(&self, quotation: &Quotation) -> Result<Quotation, AppError> {
        let mut quotations = self.quotations.lock().await;
        if !quotations.contains_key(&quotation.id) {
            return Err(AppError::NotFound("Orçamento"));
        }
        quotations.insert(quotation.id, quotation.clone());
        Ok(quotation.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.quotations.lock().await.remove(&id).is_some())
    }
}

#[async_trait]
impl OfferStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Offer>, AppError> {
        let mut offers: Vec<Offer> = self.offers.lock().await.values().cloned().collect();
        newest_first(&mut offers, |o| o.created_at);
        Ok(offers)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Offer>, AppError> {
        Ok(self.offers.lock().await.get(&id).cloned())
    }

    async fn insert(&self, offer: &Offer) -> Result<Offer, AppError> {
        let mut offers = self.offers.lock().await;
        if code_taken(&offers, offer) {
            return Err(AppError::UniqueConstraintViolation("Código de oferta já utilizado.".into()));
        }
        offers.insert(offer.id, offer.clone());
        Ok(offer.clone())
    }

    async fn save(&self, offer: &Offer) -> Result<Offer, AppError> {
        let mut offers = self.offers.lock().await;
        if !offers.contains_key(&offer.id) {
            return Err(AppError::NotFound("Oferta"));
        }
        if code_taken(&offers, offer) {
            return Err(AppError::UniqueConstraintViolation("Código de oferta já utilizado.".into()));
        }
        offers.insert(offer.id, offer.clone());
        Ok(offer.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.offers.lock().await.remove(&id).is_some())
    }
}

// Mesma regra do índice único `offers_code_key`
fn code_taken(offers: &HashMap<Uuid, Offer>, offer: &Offer) -> bool {
    offer.code.is_some()
        && offers.values().any(|o| o.id != offer.id && o.code == offer.code)
}

#[async_trait]
impl AdjustmentStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Adjustment>, AppError> {
        let mut adjustments = self.adjustments.lock().await.clone();
        newest_first(&mut adjustments, |a| a.created_at);
        Ok(adjustments)
    }

    async fn insert(&self, adjustment: &Adjustment) -> Result<Adjustment, AppError> {
        self.adjustments.lock().await.push(adjustment.clone());
        Ok(adjustment.clone())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Role>, AppError> {
        Ok(self.roles.lock().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        Ok(self.roles.lock().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let roles = self.roles.lock().await;
        Ok(roles.values().find(|r| r.name == name).cloned())
    }

    async fn insert(&self, role: &Role) -> Result<Role, AppError> {
        let mut roles = self.roles.lock().await;
        if roles.values().any(|r| r.name == role.name) {
            return Err(AppError::UniqueConstraintViolation(
                "Já existe um cargo com esse nome.".into(),
            ));
        }
        roles.insert(role.id, role.clone());
        Ok(role.clone())
    }

    async fn save(&self, role: &Role) -> Result<Role, AppError> {
        let mut roles = self.roles.lock().await;
        if !roles.contains_key(&role.id) {
            return Err(AppError::NotFound("Cargo"));
        }
        roles.insert(role.id, role.clone());
        Ok(role.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.roles.lock().await.remove(&id).is_some())
    }
}
