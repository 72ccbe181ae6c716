//! End-to-end cart flows against a mocked remote service: the checkout
//! scenarios from the storefront, overlapping-mutation discipline, and the
//! failure paths that must leave local state untouched.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use testresult::TestResult;
use tokio::sync::Notify;
use trolley::{prelude::*, remote::MockCartRemote};

fn quantity(value: u32) -> Quantity {
    Quantity::new(value).unwrap_or_else(|| unreachable!("test quantities are in range"))
}

fn line(id: &str, price: u32, qty: u32) -> CartItem {
    CartItem {
        id: id.to_owned(),
        product_id: format!("prod-{id}"),
        name: format!("Product {id}"),
        image: format!("{id}.jpg"),
        category: "apparel".into(),
        price: Decimal::from(price),
        quantity: quantity(qty),
        variant_id: Some(format!("var-{id}")),
        size: Some("M".into()),
        color: None,
        material: None,
    }
}

fn store_with(remote: impl CartRemote + 'static) -> (CartStore, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let store = CartStore::new(
        Arc::new(remote),
        Arc::new(StaticCouponBook::new().with_code("SAVE10")),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    );

    (store, notifier)
}

#[tokio::test]
async fn checkout_totals_without_coupon() -> TestResult {
    let mut remote = MockCartRemote::new();
    remote
        .expect_fetch_cart()
        .return_once(|| Ok(vec![line("a", 12_499, 2), line("b", 8_999, 1)]));

    let (store, _) = store_with(remote);
    store.fetch().await?;

    let totals = store.totals();

    assert_eq!(totals.subtotal, Decimal::from(33_997));
    assert_eq!(totals.discount, Decimal::ZERO);
    assert_eq!(totals.shipping, Decimal::from(500));
    assert_eq!(totals.tax, Decimal::new(611_946, 2));
    assert_eq!(totals.total, Decimal::new(4_061_646, 2));

    Ok(())
}

#[tokio::test]
async fn checkout_totals_with_coupon() -> TestResult {
    let mut remote = MockCartRemote::new();
    remote
        .expect_fetch_cart()
        .return_once(|| Ok(vec![line("a", 12_499, 2), line("b", 8_999, 1)]));

    let (store, _) = store_with(remote);
    store.fetch().await?;
    store.apply_coupon("SAVE10").await?;

    let totals = store.totals();

    assert_eq!(totals.discount, Decimal::new(339_970, 2));
    assert_eq!(totals.tax, Decimal::new(550_751, 2));
    assert_eq!(totals.shipping, Decimal::from(500));
    assert_eq!(totals.total, Decimal::new(3_660_481, 2));

    Ok(())
}

#[tokio::test]
async fn large_order_ships_free() -> TestResult {
    let mut remote = MockCartRemote::new();
    remote
        .expect_fetch_cart()
        .return_once(|| Ok(vec![line("a", 60_000, 1)]));

    let (store, _) = store_with(remote);
    store.fetch().await?;

    let totals = store.totals();

    assert_eq!(totals.shipping, Decimal::ZERO);
    assert_eq!(totals.tax, Decimal::from(10_800));
    assert_eq!(totals.total, Decimal::from(70_800));

    Ok(())
}

#[tokio::test]
async fn quantity_stepper_flow_updates_totals() -> TestResult {
    let mut remote = MockCartRemote::new();
    remote
        .expect_fetch_cart()
        .return_once(|| Ok(vec![line("a", 10_000, 1)]));
    remote
        .expect_update_quantity()
        .withf(|id, qty| id == "a" && qty.get() == 2)
        .times(1)
        .returning(|_, _| Ok(()));

    let (store, notifier) = store_with(remote);
    store.fetch().await?;

    let outcome = store.change_quantity("a", 2).await?;

    assert_eq!(outcome, MutationOutcome::Applied);
    assert_eq!(store.totals().subtotal, Decimal::from(20_000));
    assert!(notifier.received().is_empty(), "no errors surfaced");

    Ok(())
}

#[tokio::test]
async fn rejected_update_raises_exactly_one_notification() -> TestResult {
    let mut remote = MockCartRemote::new();
    remote
        .expect_fetch_cart()
        .return_once(|| Ok(vec![line("a", 10_000, 1)]));
    remote
        .expect_remove_item()
        .times(1)
        .returning(|_| Err(CartRemoteError::Unexpected("503".into())));

    let (store, notifier) = store_with(remote);
    store.fetch().await?;

    let result = store.remove_item("a").await;

    assert!(result.is_err(), "removal error propagates");
    assert_eq!(store.items().len(), 1, "item still present");
    assert_eq!(notifier.received().len(), 1, "exactly one notification");

    Ok(())
}

/// Remote double whose `update_quantity` blocks until released, so a test
/// can observe the store while a call is in flight.
struct GatedRemote {
    update_calls: AtomicUsize,
    gate: Notify,
}

impl GatedRemote {
    fn new() -> Self {
        Self {
            update_calls: AtomicUsize::new(0),
            gate: Notify::new(),
        }
    }
}

#[async_trait]
impl CartRemote for GatedRemote {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, CartRemoteError> {
        Ok(vec![line("a", 10_000, 1), line("b", 5_000, 1)])
    }

    async fn add_item(&self, _item: &NewCartItem) -> Result<CartItem, CartRemoteError> {
        Err(CartRemoteError::Unexpected("not under test".into()))
    }

    async fn update_quantity(
        &self,
        _item_id: &str,
        _quantity: Quantity,
    ) -> Result<(), CartRemoteError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }

    async fn remove_item(&self, _item_id: &str) -> Result<(), CartRemoteError> {
        Err(CartRemoteError::Unexpected("not under test".into()))
    }

    async fn clear(&self) -> Result<(), CartRemoteError> {
        Err(CartRemoteError::Unexpected("not under test".into()))
    }
}

#[tokio::test]
async fn overlapping_updates_on_one_line_issue_a_single_remote_call() -> TestResult {
    let remote = Arc::new(GatedRemote::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(CartStore::new(
        Arc::clone(&remote) as Arc<dyn CartRemote>,
        Arc::new(StaticCouponBook::new()),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    ));

    store.fetch().await?;

    let first = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.change_quantity("a", 3).await })
    };

    // Wait for the first call to reach the remote and park on the gate.
    while remote.update_calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    assert!(store.is_line_busy("a"), "line busy while call outstanding");
    assert!(store.is_updating(), "a mutation is pending");

    // Second update on the same line is dropped without a remote call.
    let overlapping = store.change_quantity("a", 7).await?;
    assert_eq!(overlapping, MutationOutcome::Ignored);
    assert_eq!(remote.update_calls.load(Ordering::SeqCst), 1, "single round trip");

    // A different line is independent, so it is not blocked.
    assert!(!store.is_line_busy("b"), "other lines unaffected");

    remote.gate.notify_one();

    let outcome = first.await??;
    assert_eq!(outcome, MutationOutcome::Applied);

    assert!(!store.is_line_busy("a"), "busy flag cleared");
    assert!(!store.is_updating(), "no mutation pending");

    let items = store.items();
    assert_eq!(
        items.iter().find(|i| i.id == "a").map(|i| i.quantity.get()),
        Some(3),
        "the confirmed update wins, not the dropped one"
    );

    Ok(())
}

#[tokio::test]
async fn clear_then_refetch_round_trip() -> TestResult {
    let mut remote = MockCartRemote::new();
    let mut fetches = 0;
    remote.expect_fetch_cart().times(2).returning(move || {
        fetches += 1;
        if fetches == 1 {
            Ok(vec![line("a", 10_000, 1)])
        } else {
            Ok(Vec::new())
        }
    });
    remote.expect_clear().times(1).returning(|| Ok(()));

    let (store, _) = store_with(remote);

    store.fetch().await?;
    assert_eq!(store.items().len(), 1);

    store.clear().await?;
    assert!(store.items().is_empty(), "cleared in one step");

    // A reload re-fetches from the remote; no client-side persistence.
    store.fetch().await?;
    assert!(store.items().is_empty(), "remote agrees the cart is empty");

    Ok(())
}
