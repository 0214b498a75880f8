//! Checkout and cart error types.
//!
//! Guard failures are expected user-input states, not exceptional
//! conditions: they are returned as values for the caller to display
//! inline, and they never change the session state they refused.

use rentflow_core::{CurrencyCode, ProductId};
use thiserror::Error;

use crate::flow::Stage;

/// A cart mutation was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The referenced product has no line in the cart.
    #[error("product {product_id} is not in the cart")]
    UnknownItem { product_id: ProductId },

    /// The requested quantity exceeds the units available to rent.
    #[error("only {available} unit(s) of {name} available (requested {requested})")]
    QuantityUnavailable {
        name: String,
        requested: u32,
        available: u32,
    },

    /// The item is priced in a different currency than the cart.
    #[error("cart items must share one currency ({cart} vs {item})")]
    CurrencyMismatch {
        cart: CurrencyCode,
        item: CurrencyCode,
    },
}

/// A checkout transition or action was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Cannot advance past the cart with nothing in it.
    #[error("your cart is empty - add an item before checking out")]
    EmptyCart,

    /// Delivery stage needs an address before advancing.
    #[error("enter a delivery address to continue")]
    MissingDeliveryAddress,

    /// Delivery stage needs a method selection before advancing.
    #[error("choose a delivery method to continue")]
    MissingDeliveryMethod,

    /// Payment stage needs a method selection before paying.
    #[error("choose a payment method to continue")]
    MissingPaymentMethod,

    /// Card-based payment needs all four card fields filled in.
    #[error("fill in all card details to continue")]
    IncompleteCardDetails,

    /// The operation belongs to a different stage.
    #[error("this step belongs to the {expected} stage (currently on {actual})")]
    WrongStage { expected: Stage, actual: Stage },

    /// `back()` from a stage with no predecessor.
    #[error("there is no previous step")]
    NoPreviousStage,

    /// The caller's place-order action reported failure.
    #[error("order could not be placed: {0}")]
    OrderRejected(String),
}
