//! User-visible notifications.
//!
//! Every failed remote operation is converted into exactly one
//! [`Notification`] at the operation's call site. Notifications are
//! non-blocking and non-fatal; the cart view stays interactive with its
//! last-known-good state.

use std::sync::Mutex;

use mockall::automock;

/// What kind of failure a notification describes, so presentation can pick
/// the right treatment (toast vs. re-authentication prompt).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The full-cart fetch failed; the view shows its last-known-good state.
    LoadFailed,

    /// The full-cart fetch was rejected as unauthenticated; the shopper
    /// should be prompted to sign in again.
    AuthRequired,

    /// A mutation failed; the cart was not changed. Auth failures during
    /// mutations also land here so the shopper is not navigated away.
    UpdateFailed,

    /// A coupon code failed validation.
    CouponRejected,
}

/// A user-visible, non-blocking notice about a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Failure category.
    pub kind: NotificationKind,

    /// Human-readable message, service-provided where available.
    pub message: String,
}

impl Notification {
    /// Creates a notification.
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Sink for user-visible notifications raised by the cart engine.
#[automock]
pub trait Notifier: Send + Sync {
    /// Delivers one notification. Must not block.
    fn notify(&self, notification: Notification);
}

/// A [`Notifier`] that records everything it receives. Used by tests and
/// by presentation layers that drain notices on their own schedule.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything received so far.
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .received
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification);
    }
}
