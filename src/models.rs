// src/models.rs

pub mod adjustment;
pub mod auth;
pub mod catalog;
pub mod expense;
pub mod offer;
pub mod purchase;
pub mod quotation;
pub mod rbac;
pub mod sales;
pub mod settings;
pub mod zbill;
