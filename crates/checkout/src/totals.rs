//! Order total computation.
//!
//! One pure function computes every derived figure - subtotal, tax,
//! delivery charge, grand total - from the item list alone. Each checkout
//! stage's summary panel consumes this same function, so the figures can
//! never drift between stages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rentflow_core::{CartItem, CurrencyCode, Money};

/// Sales tax rate applied to the subtotal.
fn tax_rate() -> Decimal {
    Decimal::new(10, 2) // 10%
}

/// Derived monetary figures for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Flat delivery charge. Currently always zero.
    pub delivery_charge: Money,
    /// Tax on the subtotal, rounded to cents.
    pub tax: Money,
    /// Subtotal + delivery charge + tax.
    pub total: Money,
}

impl OrderTotals {
    /// All-zero totals in the given currency (empty cart).
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self {
            subtotal: Money::zero(currency),
            delivery_charge: Money::zero(currency),
            tax: Money::zero(currency),
            total: Money::zero(currency),
        }
    }
}

/// Compute order totals from an item list.
///
/// `subtotal = sum(daily_rate x quantity x days)`, `tax = round(subtotal x
/// 10%)`, delivery is free, `total = subtotal + delivery + tax`. Always
/// recomputed from scratch; nothing is cached across cart mutations.
#[must_use]
pub fn order_totals(items: &[CartItem]) -> OrderTotals {
    let Some(first) = items.first() else {
        return OrderTotals::zero(CurrencyCode::default());
    };
    let currency = first.product.daily_rate.currency;

    let subtotal_amount: Decimal = items.iter().map(|item| item.line_total().amount).sum();
    let subtotal = Money::new(subtotal_amount, currency);
    let delivery_charge = Money::zero(currency);
    let tax = Money::new(subtotal_amount * tax_rate(), currency).round_cents();
    let total = Money::new(
        subtotal.amount + delivery_charge.amount + tax.amount,
        currency,
    );

    OrderTotals {
        subtotal,
        delivery_charge,
        tax,
        total,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use rentflow_core::{ProductId, ProductSnapshot, RentalPeriod};

    use super::*;

    fn item(rate: i64, quantity: u32, start_day: u32, end_day: u32) -> CartItem {
        CartItem {
            product: ProductSnapshot {
                id: ProductId::new(i64::from(start_day)),
                name: "Generator".to_string(),
                daily_rate: Money::new(Decimal::from(rate), CurrencyCode::USD),
                available: 10,
                image_url: None,
            },
            quantity,
            period: RentalPeriod::new(
                NaiveDate::from_ymd_opt(2024, 1, start_day).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, end_day).unwrap(),
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_single_item_totals() {
        // 100/day x 2 units x 3 days = 600; tax 60; total 660
        let totals = order_totals(&[item(100, 2, 1, 3)]);
        assert_eq!(totals.subtotal.amount, Decimal::from(600));
        assert_eq!(totals.tax.amount, Decimal::from(60));
        assert!(totals.delivery_charge.is_zero());
        assert_eq!(totals.total.amount, Decimal::from(660));
    }

    #[test]
    fn test_multiple_items_sum() {
        let totals = order_totals(&[item(100, 1, 1, 2), item(50, 2, 5, 5)]);
        // 100x1x2 + 50x2x1 = 300
        assert_eq!(totals.subtotal.amount, Decimal::from(300));
        assert_eq!(totals.total.amount, Decimal::from(330));
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        // 33.33 x 1 x 1 day -> subtotal 33.33, 10% = 3.333 -> 3.33
        let mut line = item(0, 1, 1, 1);
        line.product.daily_rate = Money::new(Decimal::new(3333, 2), CurrencyCode::USD);
        let totals = order_totals(&[line]);
        assert_eq!(totals.tax.amount, Decimal::new(333, 2));
        assert_eq!(totals.total.amount, Decimal::new(3666, 2));
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = order_totals(&[]);
        assert!(totals.subtotal.is_zero());
        assert!(totals.tax.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_totals_are_deterministic() {
        let items = [item(75, 3, 10, 14)];
        assert_eq!(order_totals(&items), order_totals(&items));
    }
}
