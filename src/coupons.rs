//! Coupons
//!
//! Coupon state is purely local to the cart view; the remote cart service
//! never sees it. A coupon only affects totals after it has passed a
//! [`CouponValidator`], so an arbitrary code typed into the checkout box
//! cannot grant a discount.

use async_trait::async_trait;
use decimal_percentage::Percentage;
use mockall::automock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Standard storefront coupon rate: 10% off the subtotal.
pub fn standard_rate() -> Percentage {
    Percentage::from(Decimal::new(10, 2))
}

/// A coupon that passed validation and is applied to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    /// The code as entered by the shopper.
    pub code: String,

    /// Fractional discount rate off the subtotal (e.g. `0.10`).
    pub rate: Percentage,
}

/// Errors raised when a coupon code fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The code is not known to the validator.
    #[error("unknown coupon code")]
    UnknownCode,

    /// The code exists but is no longer redeemable.
    #[error("coupon is no longer active")]
    Inactive,
}

/// Validates coupon codes before they may affect totals.
#[automock]
#[async_trait]
pub trait CouponValidator: Send + Sync {
    /// Validates `code`, returning the coupon to apply on success.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponError`] describing why the code was rejected.
    async fn validate(&self, code: &str) -> Result<AppliedCoupon, CouponError>;
}

#[derive(Debug, Clone, Copy)]
struct CouponEntry {
    rate: Percentage,
    active: bool,
}

/// An in-memory coupon book with per-code rates.
#[derive(Debug, Clone, Default)]
pub struct StaticCouponBook {
    entries: FxHashMap<String, CouponEntry>,
}

impl StaticCouponBook {
    /// Creates an empty book; every code is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `code` at the standard 10% rate.
    #[must_use]
    pub fn with_code(self, code: impl Into<String>) -> Self {
        self.with_rate(code, standard_rate())
    }

    /// Registers `code` at a specific rate.
    #[must_use]
    pub fn with_rate(mut self, code: impl Into<String>, rate: Percentage) -> Self {
        self.entries
            .insert(code.into(), CouponEntry { rate, active: true });
        self
    }

    /// Marks an already-registered code as no longer redeemable.
    #[must_use]
    pub fn deactivated(mut self, code: &str) -> Self {
        if let Some(entry) = self.entries.get_mut(code) {
            entry.active = false;
        }
        self
    }
}

#[async_trait]
impl CouponValidator for StaticCouponBook {
    async fn validate(&self, code: &str) -> Result<AppliedCoupon, CouponError> {
        let entry = self.entries.get(code).ok_or(CouponError::UnknownCode)?;

        if !entry.active {
            return Err(CouponError::Inactive);
        }

        Ok(AppliedCoupon {
            code: code.to_owned(),
            rate: entry.rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn known_code_validates_at_standard_rate() -> TestResult {
        let book = StaticCouponBook::new().with_code("SAVE10");

        let coupon = book.validate("SAVE10").await?;

        assert_eq!(coupon.code, "SAVE10");
        assert_eq!(coupon.rate, standard_rate());

        Ok(())
    }

    #[tokio::test]
    async fn unknown_code_is_rejected() {
        let book = StaticCouponBook::new().with_code("SAVE10");

        let result = book.validate("SAVE20").await;

        assert_eq!(result, Err(CouponError::UnknownCode));
    }

    #[tokio::test]
    async fn deactivated_code_is_rejected() {
        let book = StaticCouponBook::new()
            .with_code("SAVE10")
            .deactivated("SAVE10");

        let result = book.validate("SAVE10").await;

        assert_eq!(result, Err(CouponError::Inactive));
    }
}
