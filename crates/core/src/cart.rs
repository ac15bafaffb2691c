//! The cart engine.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, one per product, in the
//! order products were first added. Every operation keeps two invariants:
//!
//! - at most one line per [`ProductId`]
//! - every line has a quantity of at least 1
//!
//! A line whose quantity would drop to zero or below is removed. Both
//! invariants are also checked when a cart is deserialized, so a corrupted
//! persisted cart never produces an invalid in-memory one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;
use crate::types::price::format_amount;

/// Errors produced by cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product is not in the catalog.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    /// A stored line has a quantity of zero.
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// A stored cart has two lines for the same product.
    #[error("cart has more than one line for product {0}")]
    DuplicateLine(ProductId),
}

/// One product's entry in the cart.
///
/// Serialized as the product's fields plus `qty`, matching the persisted
/// record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "qty")]
    quantity: u32,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Product identifier for this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Number of units, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price multiplied by quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from existing lines, checking the invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] or [`CartError::DuplicateLine`] if
    /// the lines could not have been produced by cart operations.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CartError> {
        for (index, line) in lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.product_id()));
            }
            if lines
                .iter()
                .skip(index + 1)
                .any(|other| other.product_id() == line.product_id())
            {
                return Err(CartError::DuplicateLine(line.product_id()));
            }
        }
        Ok(Self { lines })
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line, or appends a new line with quantity 1.
    /// Returns the line's new quantity.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id() == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine::new(product.clone()));
        1
    }

    /// Change a line's quantity by `delta`.
    ///
    /// Removes the line when the result is zero or below. Returns the new
    /// quantity (0 when removed), or `None` if the product is not in the cart.
    pub fn adjust_quantity(&mut self, product_id: ProductId, delta: i64) -> Option<u32> {
        let index = self.position(product_id)?;
        let line = self.lines.get_mut(index)?;
        let updated = i64::from(line.quantity).saturating_add(delta);
        if updated <= 0 {
            self.lines.remove(index);
            return Some(0);
        }
        line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        Some(line.quantity)
    }

    /// Take the quantities in `ordered` out of this cart.
    ///
    /// Lines that reach zero are removed. Lines and units that are not in
    /// `ordered` stay as they are.
    pub fn subtract(&mut self, ordered: &Self) {
        for line in &ordered.lines {
            self.adjust_quantity(line.product_id(), -i64::from(line.quantity));
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price × quantity over all lines, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Total formatted with a currency symbol, rounded to cents.
    #[must_use]
    pub fn display_total(&self, symbol: &str) -> String {
        format_amount(symbol, self.total())
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in first-add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id() == product_id)
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
