//! Shopping cart.
//!
//! A cart is an ordered list of lines, one per distinct product. Lines keep
//! the order in which products were first added. The only mutators are
//! [`Cart::add`], [`Cart::set_quantity`] and [`Cart::clear`], which together
//! guarantee:
//!
//! - `product_id` is unique across lines
//! - every line has `quantity >= 1`

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// One distinct product in the cart with its aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity` for this line.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// `Σ price × quantity` over the current lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1. Returns the line's new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLine {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price,
            quantity: 1,
        });
        1
    }

    /// Replace a line's quantity with `max(1, quantity)`.
    ///
    /// Returns the stored quantity, or `None` (leaving the cart untouched) if
    /// the product has no line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Option<u32> {
        let line = self.line_mut(product_id)?;
        line.quantity = clamp_quantity(quantity);
        Some(line.quantity)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

/// Floor-clamp a requested quantity to 1 and cap it at `u32::MAX`.
fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}
