//! Remote cart service boundary.
//!
//! The remote service is the system of record for cart contents. This module
//! owns the [`CartRemote`] contract the store mutates through, the wire
//! shapes the HTTP service speaks, and the error taxonomy every remote call
//! can produce.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::cart::models::{CartItem, NewCartItem, Quantity};

pub mod http;
pub mod wire;

pub use http::HttpCartRemote;

/// Errors produced by remote cart calls.
#[derive(Debug, Error)]
pub enum CartRemoteError {
    /// Transport-level failure: the service was unreachable, the connection
    /// dropped, or the request timed out.
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service rejected the call as unauthenticated (401/403).
    #[error("not authenticated with the cart service")]
    Unauthorized,

    /// The service rejected the request body (400/422), with its message
    /// when it supplied one.
    #[error("cart service rejected the request: {}", .0.as_deref().unwrap_or("no detail provided"))]
    Validation(Option<String>),

    /// Any other non-success response or a body we could not interpret.
    #[error("unexpected response from cart service: {0}")]
    Unexpected(String),
}

/// Remote CRUD surface for the authoritative cart.
///
/// Implementations perform one round trip per call and never retry; the
/// store decides what a failure means for local state.
#[automock]
#[async_trait]
pub trait CartRemote: Send + Sync {
    /// Retrieves the full authoritative cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartRemoteError`] when the call fails.
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, CartRemoteError>;

    /// Adds a line to the cart, returning the confirmed line.
    ///
    /// # Errors
    ///
    /// Returns a [`CartRemoteError`] when the call fails.
    async fn add_item(&self, item: &NewCartItem) -> Result<CartItem, CartRemoteError>;

    /// Sets the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns a [`CartRemoteError`] when the call fails.
    async fn update_quantity(
        &self,
        item_id: &str,
        quantity: Quantity,
    ) -> Result<(), CartRemoteError>;

    /// Removes one line.
    ///
    /// # Errors
    ///
    /// Returns a [`CartRemoteError`] when the call fails.
    async fn remove_item(&self, item_id: &str) -> Result<(), CartRemoteError>;

    /// Removes every line in a single call.
    ///
    /// # Errors
    ///
    /// Returns a [`CartRemoteError`] when the call fails.
    async fn clear(&self) -> Result<(), CartRemoteError>;
}
