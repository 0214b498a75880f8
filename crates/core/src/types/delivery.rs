//! Delivery method selection.

use serde::{Deserialize, Serialize};

/// How the rented equipment reaches the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Delivered to the shopper's address.
    HomeDelivery,
    /// Picked up at the rental location.
    StorePickup,
}

impl DeliveryMethod {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::HomeDelivery => "Home delivery",
            Self::StorePickup => "Store pickup",
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
