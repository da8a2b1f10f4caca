// src/db/stores.rs

// Contratos de persistência usados pelos serviços. A implementação de produção
// é Postgres; os testes usam um armazenamento em memória.
//
// Todas as escritas `save` são incondicionais: gravam o documento inteiro por id,
// sem verificação de versão. `PurchaseStore::receive` é a única escrita
// condicional e a única que envolve mais de uma tabela.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        adjustment::Adjustment,
        catalog::Product,
        expense::Expense,
        offer::Offer,
        purchase::Purchase,
        quotation::Quotation,
        rbac::Role,
        sales::{Invoice, InvoiceFilter},
        zbill::ZBill,
    },
};

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Product>, AppError>;
    async fn list_low_stock(&self) -> Result<Vec<Product>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn insert(&self, product: &Product) -> Result<Product, AppError>;
    async fn save(&self, product: &Product) -> Result<Product, AppError>;
}

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn insert(&self, invoice: &Invoice) -> Result<Invoice, AppError>;
    /// Mais recentes primeiro.
    async fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError>;
    async fn list_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, AppError>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Expense>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, AppError>;
    async fn insert(&self, expense: &Expense) -> Result<Expense, AppError>;
    async fn save(&self, expense: &Expense) -> Result<Expense, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
    /// Filtra pela data contábil (`date`), não pela data de criação.
    async fn list_dated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, AppError>;
}

#[async_trait]
pub trait ZBillStore: Send + Sync {
    async fn insert(&self, bill: &ZBill) -> Result<ZBill, AppError>;
    async fn list(&self) -> Result<Vec<ZBill>, AppError>;
}

#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Purchase>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Purchase>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn insert(&self, purchase: &Purchase) -> Result<Purchase, AppError>;
    async fn save(&self, purchase: &Purchase) -> Result<Purchase, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
    /// Passa o pedido de Ordered para Received (pagamento Paid) e soma cada
    /// item ao `totalStock` do produto, tudo ou nada. `None` quando o pedido
    /// não estava mais Ordered.
    async fn receive(&self, id: Uuid) -> Result<Option<Receipt>, AppError>;
}

/// Resultado de um recebimento aplicado.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub purchase: Purchase,
    /// Itens cujo produto não existe mais; ficaram de fora do incremento.
    pub missing_products: Vec<Uuid>,
}

#[async_trait]
pub trait QuotationStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Quotation>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quotation>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn insert(&self, quotation: &Quotation) -> Result<Quotation, AppError>;
    async fn save(&self, quotation: &Quotation) -> Result<Quotation, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait OfferStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Offer>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Offer>, AppError>;
    async fn insert(&self, offer: &Offer) -> Result<Offer, AppError>;
    async fn save(&self, offer: &Offer) -> Result<Offer, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AdjustmentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Adjustment>, AppError>;
    async fn insert(&self, adjustment: &Adjustment) -> Result<Adjustment, AppError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Role>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError>;
    async fn insert(&self, role: &Role) -> Result<Role, AppError>;
    async fn save(&self, role: &Role) -> Result<Role, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
