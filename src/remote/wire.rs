//! Wire shapes spoken by the HTTP cart service.
//!
//! The service returns nested product/variant objects per line; the store
//! works with the flat [`CartItem`] snapshot. Mapping happens here, at fetch
//! time, so product data changing server-side later never reshapes a cart
//! already on screen.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cart::models::{CartItem, NewCartItem, Quantity},
    remote::CartRemoteError,
};

/// The authoritative cart as returned by `GET /cart`.
#[derive(Debug, Deserialize)]
pub struct RemoteCart {
    /// Current lines, possibly empty.
    #[serde(default)]
    pub items: Vec<RemoteLine>,
}

/// One line as the service represents it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLine {
    /// Line identifier, stable across updates.
    pub id: String,

    /// Line quantity.
    pub quantity: u32,

    /// Product reference at fetch time.
    pub product: RemoteProduct,

    /// Selected variant, absent for products without variants.
    #[serde(default)]
    pub variant: Option<RemoteVariant>,
}

/// Product reference embedded in a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProduct {
    /// Product identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Image URL.
    #[serde(default)]
    pub image: String,

    /// Category label.
    #[serde(default)]
    pub category: String,

    /// Base unit price, used when the line has no variant.
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Variant reference embedded in a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVariant {
    /// Variant identifier.
    pub id: String,

    /// Unit price of this variant.
    pub price: Decimal,

    /// Size label, when the variant carries one.
    #[serde(default)]
    pub size: Option<String>,

    /// Color label, when the variant carries one.
    #[serde(default)]
    pub color: Option<String>,

    /// Material label, when the variant carries one.
    #[serde(default)]
    pub material: Option<String>,
}

/// Body for `POST /cart/items`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest<'a> {
    /// Product to add.
    pub product_id: &'a str,

    /// Variant selection, omitted for products without variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<&'a str>,

    /// Requested quantity.
    pub quantity: u32,
}

impl<'a> From<&'a NewCartItem> for AddItemRequest<'a> {
    fn from(item: &'a NewCartItem) -> Self {
        Self {
            product_id: &item.product_id,
            variant_id: item.variant_id.as_deref(),
            quantity: item.quantity.get(),
        }
    }
}

/// Body for `PUT /cart/items/{id}`.
#[derive(Debug, Serialize)]
pub struct UpdateQuantityRequest {
    /// New line quantity.
    pub quantity: u32,
}

/// Error body some service responses carry.
#[derive(Debug, Deserialize)]
pub struct ServiceMessage {
    /// Human-readable rejection detail.
    pub message: String,
}

impl TryFrom<RemoteLine> for CartItem {
    type Error = CartRemoteError;

    fn try_from(line: RemoteLine) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(line.quantity).ok_or_else(|| {
            CartRemoteError::Unexpected(format!(
                "line {} has out-of-range quantity {}",
                line.id, line.quantity
            ))
        })?;

        let price = line
            .variant
            .as_ref()
            .map(|variant| variant.price)
            .or(line.product.price)
            .ok_or_else(|| {
                CartRemoteError::Unexpected(format!("line {} carries no price", line.id))
            })?;

        let (variant_id, size, color, material) = match line.variant {
            Some(variant) => (Some(variant.id), variant.size, variant.color, variant.material),
            None => (None, None, None, None),
        };

        Ok(Self {
            id: line.id,
            product_id: line.product.id,
            name: line.product.name,
            image: line.product.image,
            category: line.product.category,
            price,
            quantity,
            variant_id,
            size,
            color,
            material,
        })
    }
}
