//! Cart state and models.

pub mod models;
pub mod store;

pub use models::{CartItem, NewCartItem, Quantity};
pub use store::{CartStore, CartView, MutationOutcome};
