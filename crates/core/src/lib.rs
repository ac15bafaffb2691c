//! Telecart Core - Catalog and cart types.
//!
//! This crate provides the domain model shared by the storefront and its tests:
//! - [`Product`] - an immutable catalog entry
//! - [`Cart`] / [`CartLine`] - the cart engine
//! - [`ContactInfo`] - the customer's saved contact details
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP clients. Persistence and order delivery live in the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices
//! - [`product`] - Catalog products
//! - [`cart`] - Cart lines and the cart state machine
//! - [`contact`] - Customer contact details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod contact;
pub mod product;
pub mod types;

pub use cart::{Cart, CartError, CartLine};
pub use contact::ContactInfo;
pub use product::{Product, ProductError, validate_products};
pub use types::*;
