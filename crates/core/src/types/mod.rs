//! Core types for Souq Levant.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use order::{DeliveryField, DeliveryInfo, OrderRequest, PaymentMethod};
pub use price::{CURRENCY_LABEL, Price};
pub use product::Product;
