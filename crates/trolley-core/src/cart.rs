//! In-memory cart session state.
//!
//! A single global session lives behind a [`CartStore`] handle. Polling
//! the cart drives the RFID removal simulation: every Nth poll the last
//! item in the list disappears, mimicking an item being lifted out of
//! the trolley.

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::CartConfig;
use crate::receipt::Receipt;

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Opaque product id
    pub id: String,
    /// Display name
    pub name: String,
    /// Units in the trolley
    pub quantity: u32,
    /// Per-unit price
    pub unit_price: f64,
}

impl CartItem {
    /// Create a new cart item
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Line total for this item
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// What a poll returns: the cart id and the current item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Current session's cart id
    pub cart_id: String,
    /// Items currently in the trolley
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    /// Whether the trolley holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of a single poll.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// Cart contents after the poll
    pub snapshot: CartSnapshot,
    /// Item dropped by the removal simulation on this poll, if any
    pub removed: Option<CartItem>,
}

struct CartSession {
    cart_id: String,
    items: Vec<CartItem>,
    poll_count: u64,
    last_receipt: Option<Receipt>,
}

/// Shared handle to the single in-memory cart session.
///
/// Cloning is cheap; all clones observe the same session.
#[derive(Clone)]
pub struct CartStore {
    removal_interval: u64,
    session: Arc<Mutex<CartSession>>,
}

impl CartStore {
    /// Create a store seeded from the cart configuration.
    pub fn new(config: &CartConfig) -> Self {
        Self {
            removal_interval: config.removal_interval,
            session: Arc::new(Mutex::new(CartSession {
                cart_id: config.initial_cart_id.clone(),
                items: config.catalog.clone(),
                poll_count: 0,
                last_receipt: None,
            })),
        }
    }

    /// Poll the cart.
    ///
    /// Increments the poll counter and, on every Nth poll, drops the
    /// last item if the cart is non-empty. The counter accumulates for
    /// the whole session; it is only reset by [`CartStore::reset`].
    pub fn poll(&self) -> PollOutcome {
        let mut session = self.session.lock();
        session.poll_count += 1;

        let mut removed = None;
        if session.poll_count % self.removal_interval == 0 && !session.items.is_empty() {
            let item = session.items.pop();
            if let Some(ref item) = item {
                info!(
                    poll = session.poll_count,
                    item = %item.name,
                    "simulated RFID removal"
                );
            }
            removed = item;
        }

        debug!(poll = session.poll_count, items = session.items.len(), "cart polled");

        PollOutcome {
            snapshot: CartSnapshot {
                cart_id: session.cart_id.clone(),
                items: session.items.clone(),
            },
            removed,
        }
    }

    /// Current contents without advancing the poll counter.
    pub fn snapshot(&self) -> CartSnapshot {
        let session = self.session.lock();
        CartSnapshot {
            cart_id: session.cart_id.clone(),
            items: session.items.clone(),
        }
    }

    /// End the session: clear the cart, zero the poll counter, drop the
    /// stored receipt and issue a fresh cart id. Returns the new id.
    pub fn reset(&self) -> String {
        let new_id = generate_cart_id();
        let mut session = self.session.lock();
        session.items.clear();
        session.poll_count = 0;
        session.last_receipt = None;
        session.cart_id = new_id.clone();
        info!(cart_id = %new_id, "session reset");
        new_id
    }

    /// Number of polls served in the current session.
    pub fn poll_count(&self) -> u64 {
        self.session.lock().poll_count
    }

    /// Store the receipt of a completed payment.
    pub fn set_receipt(&self, receipt: Receipt) {
        self.session.lock().last_receipt = Some(receipt);
    }

    /// Receipt of the most recent successful payment this session.
    pub fn last_receipt(&self) -> Option<Receipt> {
        self.session.lock().last_receipt.clone()
    }
}

/// Generate an opaque cart id: `CART-<4 digits>-<2 uppercase alnum>`.
fn generate_cart_id() -> String {
    const SUFFIX_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let digits: u32 = rng.gen_range(1000..=9999);
    let suffix: String = (0..2)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("CART-{}-{}", digits, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CartConfig;

    fn test_store(removal_interval: u64) -> CartStore {
        CartStore::new(&CartConfig {
            removal_interval,
            ..CartConfig::default()
        })
    }

    #[test]
    fn poll_returns_seeded_catalog() {
        let store = test_store(30);
        let outcome = store.poll();
        assert_eq!(outcome.snapshot.cart_id, "CART-7421-AB");
        assert_eq!(outcome.snapshot.items.len(), 3);
        assert!(outcome.removed.is_none());
    }

    #[test]
    fn nth_poll_removes_last_item() {
        let store = test_store(30);

        for _ in 0..29 {
            assert!(store.poll().removed.is_none());
        }

        let outcome = store.poll();
        let removed = outcome.removed.expect("30th poll should remove an item");
        assert_eq!(removed.name, "Almond Milk (1L)");
        assert_eq!(outcome.snapshot.items.len(), 2);
    }

    #[test]
    fn counter_keeps_accumulating_across_intervals() {
        let store = test_store(30);

        for _ in 0..60 {
            store.poll();
        }
        assert_eq!(store.poll_count(), 60);
        // Two intervals elapsed, two items gone
        assert_eq!(store.snapshot().items.len(), 1);

        for _ in 0..30 {
            store.poll();
        }
        assert_eq!(store.poll_count(), 90);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn removal_on_empty_cart_is_noop() {
        let store = test_store(2);

        // Drain all three items (polls 2, 4, 6)
        for _ in 0..6 {
            store.poll();
        }
        assert!(store.snapshot().is_empty());

        // Further interval hits keep counting but remove nothing
        let outcome_7 = store.poll();
        let outcome_8 = store.poll();
        assert!(outcome_7.removed.is_none());
        assert!(outcome_8.removed.is_none());
        assert_eq!(store.poll_count(), 8);
    }

    #[test]
    fn reset_clears_items_counter_and_receipt() {
        let store = test_store(30);
        store.poll();
        store.poll();

        let new_id = store.reset();
        assert_ne!(new_id, "CART-7421-AB");
        assert!(store.snapshot().is_empty());
        assert_eq!(store.poll_count(), 0);
        assert!(store.last_receipt().is_none());
    }

    #[test]
    fn generated_cart_id_matches_format() {
        for _ in 0..50 {
            let id = generate_cart_id();
            let parts: Vec<&str> = id.split('-').collect();
            assert_eq!(parts.len(), 3, "unexpected id: {}", id);
            assert_eq!(parts[0], "CART");
            assert_eq!(parts[1].len(), 4);
            let digits: u32 = parts[1].parse().expect("digit segment");
            assert!((1000..=9999).contains(&digits));
            assert_eq!(parts[2].len(), 2);
            assert!(parts[2]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn item_serializes_with_camel_case_keys() {
        let item = CartItem::new("p1", "Organic Apples (1kg)", 1, 120.0);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"unitPrice\":120.0"));
        assert!(!json.contains("unit_price"));
    }

    #[test]
    fn snapshot_serializes_with_cart_id_key() {
        let store = test_store(30);
        let json = serde_json::to_string(&store.snapshot()).unwrap();
        assert!(json.contains("\"cartId\":\"CART-7421-AB\""));
    }
}
