//! Core domain types shared across the workspace.

pub mod address;
pub mod cart;
pub mod delivery;
pub mod id;
pub mod money;
pub mod payment;
pub mod rental;
pub mod token;

pub use address::Address;
pub use cart::{CartItem, ProductSnapshot};
pub use delivery::DeliveryMethod;
pub use id::{OrderId, ProductId};
pub use money::{CurrencyCode, Money, MoneyError};
pub use payment::{CardDetails, PaymentMethod};
pub use rental::{RentalPeriod, RentalPeriodError};
pub use token::AuthTokenPair;
