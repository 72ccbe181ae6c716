//! Derived checkout totals.
//!
//! Totals are never stored; they are a pure function of the current item
//! list and coupon state, recomputed on every read. Same inputs always
//! yield the same outputs.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::{cart::models::CartItem, coupons::AppliedCoupon};

/// Tax rate applied to the post-discount subtotal. Shipping is untaxed.
pub fn tax_rate() -> Percentage {
    Percentage::from(Decimal::new(18, 2))
}

/// Orders with a subtotal strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: u32 = 50_000;

/// Flat shipping charge below the free-shipping threshold.
pub const FLAT_SHIPPING: u32 = 500;

/// Checkout-facing totals derived from the item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of unit price times quantity over all lines.
    pub subtotal: Decimal,

    /// Coupon discount off the subtotal; zero without a coupon.
    pub discount: Decimal,

    /// Flat-rate shipping, waived above the free-shipping threshold.
    pub shipping: Decimal,

    /// Tax on the post-discount subtotal.
    pub tax: Decimal,

    /// `subtotal - discount + shipping + tax`.
    pub total: Decimal,
}

/// Computes checkout totals from the current items and coupon state.
///
/// Money values are rounded to two decimal places where a rate multiplication
/// can introduce more precision; shipping is decided on the unrounded
/// subtotal with a strict comparison, so a subtotal exactly at the threshold
/// still pays shipping.
pub fn compute_totals(items: &[CartItem], coupon: Option<&AppliedCoupon>) -> Totals {
    let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();

    let discount = coupon.map_or(Decimal::ZERO, |coupon| {
        (coupon.rate * subtotal).round_dp(2)
    });

    let shipping = if subtotal > Decimal::from(FREE_SHIPPING_THRESHOLD) {
        Decimal::ZERO
    } else {
        Decimal::from(FLAT_SHIPPING)
    };

    let tax = (tax_rate() * (subtotal - discount)).round_dp(2);

    Totals {
        subtotal,
        discount,
        shipping,
        tax,
        total: subtotal - discount + shipping + tax,
    }
}
