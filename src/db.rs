// src/db.rs

pub mod stores;
pub use stores::{
    AdjustmentStore, ExpenseStore, InvoiceStore, OfferStore, ProductStore, PurchaseStore,
    QuotationStore, Receipt, RoleStore, ZBillStore,
};

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod purchase_repo;
pub use purchase_repo::PurchaseRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod offer_repo;
pub use offer_repo::OfferRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;

#[cfg(test)]
pub mod memory;
