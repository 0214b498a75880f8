//! Payment method selection and card instrument details.

use serde::{Deserialize, Serialize};

/// How the shopper pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    PayPal,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Whether this method requires card instrument details.
    #[must_use]
    pub const fn is_card(&self) -> bool {
        matches!(self, Self::CreditCard | Self::DebitCard)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit card",
            Self::DebitCard => "Debit card",
            Self::PayPal => "PayPal",
            Self::CashOnDelivery => "Cash on delivery",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Card instrument fields entered on the payment stage.
///
/// Implements `Debug` manually to redact the number and security code.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    /// Name on the card.
    pub holder_name: String,
    /// Card number.
    pub number: String,
    /// Expiry, as entered (e.g., "12/27").
    pub expiry: String,
    /// Security code.
    pub cvv: String,
}

impl CardDetails {
    /// Whether all four fields are filled in.
    ///
    /// Card-based payment methods require a complete instrument before the
    /// order can be placed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.holder_name.trim().is_empty()
            && !self.number.trim().is_empty()
            && !self.expiry.trim().is_empty()
            && !self.cvv.trim().is_empty()
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("holder_name", &self.holder_name)
            .field("number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}
