//! Cart line items and the product data captured into them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::money::Money;
use super::rental::RentalPeriod;

/// Catalog data captured into a cart line at add time.
///
/// The snapshot pins the name, rate, and availability the shopper saw, so a
/// later catalog edit does not silently reprice an in-progress checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product ID in the rental catalog.
    pub id: ProductId,
    /// Display name at the time the item was added.
    pub name: String,
    /// Rental rate per day.
    pub daily_rate: Money,
    /// Units available to rent; the quantity ceiling for this line.
    pub available: u32,
    /// Primary product image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A single line in the shopper's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product being rented.
    pub product: ProductSnapshot,
    /// Units rented. Always at least 1 while the line exists.
    pub quantity: u32,
    /// Rental date range.
    pub period: RentalPeriod,
}

impl CartItem {
    /// Line total: daily rate x quantity x rental days.
    ///
    /// Recomputed on every call; never cached.
    #[must_use]
    pub fn line_total(&self) -> Money {
        let days = Decimal::from(self.period.days());
        let quantity = Decimal::from(self.quantity);
        Money::new(
            self.product.daily_rate.amount * quantity * days,
            self.product.daily_rate.currency,
        )
    }
}
