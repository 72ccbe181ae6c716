//! Cart Models

use rust_decimal::Decimal;

/// Smallest quantity a cart line may carry.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a cart line may carry.
pub const MAX_QUANTITY: u32 = 99;

/// A per-line quantity, always within `1..=99`.
///
/// There is no clamping constructor: a value outside the range is rejected
/// and the caller decides what to do (the store treats it as a silent no-op).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(u32);

impl Quantity {
    /// Creates a quantity, returning `None` when `value` is outside `1..=99`.
    pub fn new(value: u32) -> Option<Self> {
        (MIN_QUANTITY..=MAX_QUANTITY)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Returns the underlying count.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// One product-variant-quantity tuple within the cart.
///
/// Display attributes (`name`, `image`, `category`) are copied from the
/// product at fetch time; the cart is a snapshot view, not a live join.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// Line identifier assigned by the remote service, stable across updates.
    pub id: String,

    /// Identifier of the underlying product.
    pub product_id: String,

    /// Product display name at fetch time.
    pub name: String,

    /// Product image URL at fetch time.
    pub image: String,

    /// Product category at fetch time.
    pub category: String,

    /// Unit price in minor currency units, from the selected variant.
    pub price: Decimal,

    /// Line quantity.
    pub quantity: Quantity,

    /// Selected variant, `None` when the product has no variants.
    pub variant_id: Option<String>,

    /// Variant size, when the variant carries one.
    pub size: Option<String>,

    /// Variant color, when the variant carries one.
    pub color: Option<String>,

    /// Variant material, when the variant carries one.
    pub material: Option<String>,
}

impl CartItem {
    /// Line total: unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.get())
    }
}

/// A line to add to the cart, identified by product and optional variant.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    /// Product to add.
    pub product_id: String,

    /// Variant selection, `None` for products without variants.
    pub variant_id: Option<String>,

    /// Requested quantity.
    pub quantity: Quantity,
}
