//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    auth::{CredentialProvider, Credentials, SessionCredentials},
    cart::{
        models::{CartItem, NewCartItem, Quantity},
        store::{CartStore, CartView, MutationOutcome},
    },
    coupons::{AppliedCoupon, CouponError, CouponValidator, StaticCouponBook},
    notify::{Notification, NotificationKind, Notifier, RecordingNotifier},
    pricing::{Totals, compute_totals},
    remote::{CartRemote, CartRemoteError, HttpCartRemote},
};
