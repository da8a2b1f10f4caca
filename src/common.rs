// src/common.rs

pub mod business_day;
pub mod error;
pub mod sequence;
