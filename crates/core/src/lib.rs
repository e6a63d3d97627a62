//! Souq Levant Core - Domain types and storefront state.
//!
//! This crate provides the types shared by the storefront binary and its
//! tests:
//! - [`types`] - Products, prices, delivery details and the order wire shape
//! - [`cart`] - The shopping cart and its line invariants
//! - [`request`] - Request lifecycle tracking with stale-response protection
//! - [`storefront`] - The per-visitor state machine driving the UI
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no
//! HTTP clients. Network calls happen in the storefront crate around the
//! `begin_*`/`finish_*` transitions defined here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod request;
pub mod storefront;
pub mod types;

pub use cart::{Cart, CartLine};
pub use request::{FetchTicket, RequestState, RequestTracker};
pub use storefront::{CheckoutError, OrderOutcome, StorefrontState, messages};
pub use types::*;
