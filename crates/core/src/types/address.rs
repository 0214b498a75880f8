//! Delivery addresses.

use serde::{Deserialize, Serialize};

/// A delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Who receives the delivery.
    pub recipient: String,
    /// Street address line 1.
    pub line1: String,
    /// Street address line 2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// Province/state.
    pub state: String,
    /// Postal/ZIP code.
    pub postal_code: String,
    /// Country.
    pub country: String,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Address {
    /// Format the address as a single line.
    #[must_use]
    pub fn formatted_single_line(&self) -> String {
        let mut parts = vec![self.line1.clone()];

        if let Some(line2) = &self.line2
            && !line2.is_empty()
        {
            parts.push(line2.clone());
        }
        parts.push(self.city.clone());
        parts.push(self.state.clone());
        parts.push(self.postal_code.clone());
        parts.push(self.country.clone());

        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }
}
