//! Rentflow checkout session.
//!
//! Sequences a shopper through four stages - Cart, Delivery, Payment,
//! Complete - with every transition guard owned by the state machine rather
//! than scattered across UI callbacks.
//!
//! # Example
//!
//! ```rust,ignore
//! use rentflow_checkout::CheckoutFlow;
//!
//! let mut flow = CheckoutFlow::new();
//! flow.cart_mut()?.add(product, 2, period)?;
//! flow.proceed_to_delivery()?;
//!
//! let delivery = flow.delivery_mut()?;
//! delivery.address = Some(address);
//! delivery.method = Some(DeliveryMethod::HomeDelivery);
//! flow.proceed_to_payment()?;
//!
//! flow.payment_mut()?.method = Some(PaymentMethod::PayPal);
//! let order = flow.pay(|draft| api.place_order(draft)).await?;
//! ```
//!
//! # Modules
//!
//! - [`cart`] - cart line mutations (quantity ceilings, removal rules)
//! - [`flow`] - the stage machine and its transition guards
//! - [`totals`] - the one pure totals calculation used by every stage
//! - [`error`] - guard refusals as values, never panics

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod error;
pub mod flow;
pub mod totals;

pub use cart::Cart;
pub use error::{CartError, CheckoutError};
pub use flow::{CheckoutFlow, DeliveryForm, OrderDraft, PaymentForm, Stage};
pub use totals::{OrderTotals, order_totals};
