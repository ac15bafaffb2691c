//! Core types for Telecart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::ProductId;
pub use price::{Price, PriceError, format_amount, round_cents};
