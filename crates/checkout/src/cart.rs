//! Cart line mutations.
//!
//! One line per product. Quantities are capped by the availability captured
//! in the product snapshot, never drop below 1 while the line exists, and
//! decrementing past 1 removes the line entirely.

use serde::{Deserialize, Serialize};

use rentflow_core::{CartItem, CurrencyCode, ProductId, ProductSnapshot, RentalPeriod};

use crate::error::CartError;

/// The shopper's cart: an ordered list of rental lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines (cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Currency of the cart, taken from the first line.
    #[must_use]
    pub fn currency(&self) -> Option<CurrencyCode> {
        self.items
            .first()
            .map(|item| item.product.daily_rate.currency)
    }

    /// Add a product to the cart.
    ///
    /// Adding a product that already has a line merges into it by summing
    /// quantities; the existing line's rental period is kept. A quantity of
    /// zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityUnavailable`] if the resulting quantity
    /// would exceed the snapshot's availability, or
    /// [`CartError::CurrencyMismatch`] if the product is priced in a
    /// different currency than the cart.
    pub fn add(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
        period: RentalPeriod,
    ) -> Result<(), CartError> {
        let quantity = quantity.max(1);

        if let Some(cart_currency) = self.currency()
            && product.daily_rate.currency != cart_currency
        {
            return Err(CartError::CurrencyMismatch {
                cart: cart_currency,
                item: product.daily_rate.currency,
            });
        }

        if let Some(line) = self.line_mut(product.id) {
            let merged = line.quantity.saturating_add(quantity);
            if merged > line.product.available {
                return Err(CartError::QuantityUnavailable {
                    name: line.product.name.clone(),
                    requested: merged,
                    available: line.product.available,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if quantity > product.available {
            return Err(CartError::QuantityUnavailable {
                name: product.name.clone(),
                requested: quantity,
                available: product.available,
            });
        }

        self.items.push(CartItem {
            product,
            quantity,
            period,
        });
        Ok(())
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if the product has no line, or
    /// [`CartError::QuantityUnavailable`] above the availability ceiling.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(product_id);
        }

        let line = self
            .line_mut(product_id)
            .ok_or(CartError::UnknownItem { product_id })?;
        if quantity > line.product.available {
            return Err(CartError::QuantityUnavailable {
                name: line.product.name.clone(),
                requested: quantity,
                available: line.product.available,
            });
        }
        line.quantity = quantity;
        Ok(())
    }

    /// Increase a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] or
    /// [`CartError::QuantityUnavailable`].
    pub fn increment(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let current = self
            .line(product_id)
            .ok_or(CartError::UnknownItem { product_id })?
            .quantity;
        self.set_quantity(product_id, current.saturating_add(1))
    }

    /// Decrease a line's quantity by one. At quantity 1 the line is removed
    /// rather than left at zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if the product has no line.
    pub fn decrement(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let current = self
            .line(product_id)
            .ok_or(CartError::UnknownItem { product_id })?
            .quantity;
        self.set_quantity(product_id, current - 1)
    }

    /// Replace a line's rental period.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if the product has no line.
    pub fn set_period(
        &mut self,
        product_id: ProductId,
        period: RentalPeriod,
    ) -> Result<(), CartError> {
        let line = self
            .line_mut(product_id)
            .ok_or(CartError::UnknownItem { product_id })?;
        line.period = period;
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if the product has no line.
    pub fn remove(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != product_id);
        if self.items.len() == before {
            return Err(CartError::UnknownItem { product_id });
        }
        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn line(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.product.id == product_id)
    }
}
