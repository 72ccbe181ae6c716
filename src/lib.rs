//! Trolley
//!
//! Trolley is a storefront cart synchronization and pricing engine: it keeps
//! a local view of a shopper's cart consistent with a remote cart service,
//! exposes confirm-then-apply mutations, and derives checkout totals as a
//! pure function of the current items and coupon state.
//!
//! The remote service stays the system of record. Local state is replaced
//! wholesale on fetch and patched per line only after the service confirms a
//! mutation; a failed call never changes what the shopper sees beyond a
//! non-blocking notification.

pub mod auth;
pub mod cart;
pub mod coupons;
pub mod notify;
pub mod pricing;
pub mod prelude;
pub mod remote;
