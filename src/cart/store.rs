//! Cart state container.
//!
//! [`CartStore`] owns the local mirror of the remote cart. It is the single
//! writer: presentation components read snapshots and invoke operations, but
//! never touch the item list directly. Every mutation is confirm-then-apply —
//! local state changes only after the remote service has accepted the call,
//! so a failed call can never corrupt displayed totals.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::{
    cart::models::{CartItem, NewCartItem, Quantity},
    coupons::{AppliedCoupon, CouponError, CouponValidator},
    notify::{Notification, NotificationKind, Notifier},
    pricing::{Totals, compute_totals},
    remote::{CartRemote, CartRemoteError},
};

/// Whether a mutation reached the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The remote confirmed the change and local state was patched.
    Applied,

    /// The request was dropped without a remote call: quantity out of range,
    /// unknown line, or the line already has a call outstanding.
    Ignored,
}

/// One consistent read of the cart for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    /// Last-known-good mirror of the remote cart.
    pub items: Vec<CartItem>,

    /// True while a full-cart fetch is in flight.
    pub loading: bool,

    /// True while any mutation is in flight.
    pub updating: bool,

    /// Currently applied coupon, if any.
    pub coupon: Option<AppliedCoupon>,

    /// Totals derived from `items` and `coupon`.
    pub totals: Totals,
}

#[derive(Debug, Default)]
struct CartState {
    items: Vec<CartItem>,
    coupon: Option<AppliedCoupon>,
    loading: bool,
    busy_lines: FxHashSet<String>,
    pending_mutations: usize,
}

/// Local view of the remote cart plus all mutating operations against it.
pub struct CartStore {
    remote: Arc<dyn CartRemote>,
    coupons: Arc<dyn CouponValidator>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<CartState>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

impl CartStore {
    /// Creates an empty store. The first [`fetch`](Self::fetch) populates it.
    pub fn new(
        remote: Arc<dyn CartRemote>,
        coupons: Arc<dyn CouponValidator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            remote,
            coupons,
            notifier,
            state: Mutex::new(CartState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CartState> {
        // The lock is never held across an await, so a poisoned lock can only
        // mean a panic in a pure section; the state is still coherent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the local item list with the authoritative remote cart.
    ///
    /// On failure local state keeps its last value and one notification is
    /// raised; the caller is not logged out or redirected by this call.
    /// A fetch already in flight makes a second call a no-op.
    ///
    /// # Errors
    ///
    /// Returns the remote error after notifying.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self) -> Result<(), CartRemoteError> {
        {
            let mut state = self.state();

            if state.loading {
                return Ok(());
            }

            state.loading = true;
        }

        let result = self.remote.fetch_cart().await;

        let outcome = {
            let mut state = self.state();
            state.loading = false;

            match result {
                Ok(items) => {
                    debug!(count = items.len(), "cart fetched");
                    state.items = items;
                    Ok(())
                }
                Err(error) => Err(error),
            }
        };

        outcome.inspect_err(|error| {
            warn!(%error, "cart fetch failed");
            self.notifier.notify(fetch_failure(error));
        })
    }

    /// Adds a line to the cart, appending the remote-confirmed line locally.
    ///
    /// # Errors
    ///
    /// Returns the remote error after notifying; local state is unchanged.
    #[tracing::instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub async fn add_item(&self, item: &NewCartItem) -> Result<(), CartRemoteError> {
        self.state().pending_mutations += 1;

        let result = self.remote.add_item(item).await;

        let outcome = {
            let mut state = self.state();
            state.pending_mutations -= 1;

            match result {
                Ok(line) => {
                    // The service may fold a repeated product into the
                    // existing line; replace by id rather than blindly push.
                    match state.items.iter_mut().find(|i| i.id == line.id) {
                        Some(existing) => *existing = line,
                        None => state.items.push(line),
                    }
                    Ok(())
                }
                Err(error) => Err(error),
            }
        };

        outcome.inspect_err(|error| {
            warn!(%error, "add to cart failed");
            self.notifier.notify(mutation_failure(error));
        })
    }

    /// Sets the quantity of one line, patching only that line on success.
    ///
    /// Out-of-range quantities (`0` or `> 99`) and unknown line ids are
    /// silent no-ops: no remote call, no notification. A line with a call
    /// already outstanding is likewise ignored, so overlapping updates can
    /// never race on the same line.
    ///
    /// # Errors
    ///
    /// Returns the remote error after notifying; the line keeps its previous
    /// quantity.
    #[tracing::instrument(skip(self))]
    pub async fn change_quantity(
        &self,
        item_id: &str,
        quantity: u32,
    ) -> Result<MutationOutcome, CartRemoteError> {
        let Some(quantity) = Quantity::new(quantity) else {
            return Ok(MutationOutcome::Ignored);
        };

        if !self.mark_line_busy(item_id) {
            return Ok(MutationOutcome::Ignored);
        }

        let result = self.remote.update_quantity(item_id, quantity).await;

        let outcome = {
            let mut state = self.state();
            state.busy_lines.remove(item_id);
            state.pending_mutations -= 1;

            match result {
                Ok(()) => {
                    if let Some(item) = state.items.iter_mut().find(|i| i.id == item_id) {
                        item.quantity = quantity;
                    }
                    Ok(MutationOutcome::Applied)
                }
                Err(error) => Err(error),
            }
        };

        outcome.inspect_err(|error| {
            warn!(%error, item_id, "quantity update failed");
            self.notifier.notify(mutation_failure(error));
        })
    }

    /// Removes one line after the remote confirms the delete.
    ///
    /// Unknown line ids and lines with a call outstanding are ignored
    /// without a remote call.
    ///
    /// # Errors
    ///
    /// Returns the remote error after notifying; the line stays in place.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, item_id: &str) -> Result<MutationOutcome, CartRemoteError> {
        if !self.mark_line_busy(item_id) {
            return Ok(MutationOutcome::Ignored);
        }

        let result = self.remote.remove_item(item_id).await;

        let outcome = {
            let mut state = self.state();
            state.busy_lines.remove(item_id);
            state.pending_mutations -= 1;

            match result {
                Ok(()) => {
                    state.items.retain(|item| item.id != item_id);
                    Ok(MutationOutcome::Applied)
                }
                Err(error) => Err(error),
            }
        };

        outcome.inspect_err(|error| {
            warn!(%error, item_id, "item removal failed");
            self.notifier.notify(mutation_failure(error));
        })
    }

    /// Empties the cart in one remote call, then empties local state in one
    /// step. Idempotent: clearing an already-empty cart succeeds.
    ///
    /// Clearing is destructive; callers are expected to confirm with the
    /// shopper before invoking this.
    ///
    /// # Errors
    ///
    /// Returns the remote error after notifying; local items are untouched.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartRemoteError> {
        self.state().pending_mutations += 1;

        let result = self.remote.clear().await;

        let outcome = {
            let mut state = self.state();
            state.pending_mutations -= 1;

            match result {
                Ok(()) => {
                    state.items.clear();
                    Ok(())
                }
                Err(error) => Err(error),
            }
        };

        outcome.inspect_err(|error| {
            warn!(%error, "cart clear failed");
            self.notifier.notify(mutation_failure(error));
        })
    }

    /// Validates `code` and applies the resulting coupon locally. The remote
    /// cart service never sees coupon state.
    ///
    /// # Errors
    ///
    /// Returns the validation error after notifying; any previously applied
    /// coupon stays in effect.
    #[tracing::instrument(skip(self))]
    pub async fn apply_coupon(&self, code: &str) -> Result<(), CouponError> {
        match self.coupons.validate(code).await {
            Ok(coupon) => {
                debug!(code, "coupon applied");
                self.state().coupon = Some(coupon);
                Ok(())
            }
            Err(error) => {
                warn!(%error, code, "coupon rejected");
                self.notifier.notify(Notification::new(
                    NotificationKind::CouponRejected,
                    error.to_string(),
                ));
                Err(error)
            }
        }
    }

    /// Drops any applied coupon. Purely local.
    pub fn remove_coupon(&self) {
        self.state().coupon = None;
    }

    /// A copy of the current item list.
    pub fn items(&self) -> Vec<CartItem> {
        self.state().items.clone()
    }

    /// True while a full-cart fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// True while any mutation is in flight.
    pub fn is_updating(&self) -> bool {
        self.state().pending_mutations > 0
    }

    /// True while the given line has a mutation outstanding, so presentation
    /// can disable that line's controls.
    pub fn is_line_busy(&self, item_id: &str) -> bool {
        self.state().busy_lines.contains(item_id)
    }

    /// The currently applied coupon, if any.
    pub fn coupon(&self) -> Option<AppliedCoupon> {
        self.state().coupon.clone()
    }

    /// Totals derived from the current items and coupon.
    pub fn totals(&self) -> Totals {
        let state = self.state();
        compute_totals(&state.items, state.coupon.as_ref())
    }

    /// One consistent read of items, flags, coupon, and totals.
    pub fn snapshot(&self) -> CartView {
        let state = self.state();

        CartView {
            totals: compute_totals(&state.items, state.coupon.as_ref()),
            items: state.items.clone(),
            loading: state.loading,
            updating: state.pending_mutations > 0,
            coupon: state.coupon.clone(),
        }
    }

    /// Marks a known, non-busy line as busy and counts the pending mutation.
    /// Returns false when the mutation should be dropped instead.
    fn mark_line_busy(&self, item_id: &str) -> bool {
        let mut state = self.state();

        if !state.items.iter().any(|item| item.id == item_id) {
            return false;
        }

        if !state.busy_lines.insert(item_id.to_owned()) {
            return false;
        }

        state.pending_mutations += 1;
        true
    }
}

fn fetch_failure(error: &CartRemoteError) -> Notification {
    match error {
        CartRemoteError::Unauthorized => Notification::new(
            NotificationKind::AuthRequired,
            "Please sign in to view your cart.",
        ),
        _ => Notification::new(
            NotificationKind::LoadFailed,
            "Failed to load your cart. Please try again.",
        ),
    }
}

fn mutation_failure(error: &CartRemoteError) -> Notification {
    let message = match error {
        CartRemoteError::Unauthorized => "Your session has expired. The cart was not changed.",
        CartRemoteError::Validation(Some(message)) => message.as_str(),
        CartRemoteError::Validation(None) => "The cart service rejected the update.",
        _ => "Failed to update your cart. Please try again.",
    };

    Notification::new(NotificationKind::UpdateFailed, message)
}
