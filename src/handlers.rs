// src/handlers.rs

pub mod auth;
pub mod finance;
pub mod health;
pub mod inventory;
pub mod offers;
pub mod pos;
pub mod purchases;
pub mod quotations;
pub mod rbac;
pub mod settings;
