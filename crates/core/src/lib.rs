//! Rentflow Core - Shared types library.
//!
//! This crate provides common types used across all Rentflow components:
//! - `client` - Authenticated HTTP client for the rental-management API
//! - `checkout` - Client-side checkout session and cart rules
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, rental periods, cart items, addresses,
//!   delivery/payment selections, and auth token pairs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
