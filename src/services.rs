// src/services.rs

pub mod auth;
pub mod closure_service;
pub mod finance_service;
pub mod inventory_service;
pub mod offer_service;
pub mod purchase_service;
pub mod quotation_service;
pub mod rbac_service;
pub mod sales_service;
