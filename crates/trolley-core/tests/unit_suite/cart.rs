//! Cart session behavior through the public API.

use super::helpers::store_with_interval;
use trolley_core::Config;

#[test]
fn thirtieth_poll_drops_the_last_item() {
    let store = store_with_interval(30);

    for poll in 1..=29 {
        let outcome = store.poll();
        assert!(
            outcome.removed.is_none(),
            "poll {} should not remove anything",
            poll
        );
        assert_eq!(outcome.snapshot.items.len(), 3);
    }

    let outcome = store.poll();
    assert_eq!(
        outcome.removed.map(|item| item.name),
        Some("Almond Milk (1L)".to_string())
    );
    assert_eq!(outcome.snapshot.items.len(), 2);
}

#[test]
fn counter_accumulates_across_subsequent_calls() {
    let store = store_with_interval(30);

    // Three full intervals empty the default catalog
    for _ in 0..90 {
        store.poll();
    }
    assert_eq!(store.poll_count(), 90);
    assert!(store.snapshot().is_empty());

    // The counter keeps going even with nothing left to remove
    for _ in 0..45 {
        store.poll();
    }
    assert_eq!(store.poll_count(), 135);
}

#[test]
fn reset_issues_fresh_id_and_zeroes_the_counter() {
    let store = store_with_interval(30);
    let original_id = store.snapshot().cart_id;
    for _ in 0..7 {
        store.poll();
    }

    let new_id = store.reset();
    assert_ne!(new_id, original_id);
    assert!(store.snapshot().is_empty());
    assert_eq!(store.poll_count(), 0);

    // New id keeps the opaque CART-NNNN-XX shape
    let parts: Vec<&str> = new_id.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "CART");
    assert!(parts[1].parse::<u32>().is_ok());
    assert_eq!(parts[2].len(), 2);
}

#[test]
fn two_resets_give_distinct_sessions() {
    let store = store_with_interval(30);
    let first = store.reset();
    let second = store.reset();
    // 9000 * 36 * 36 possible ids; a collision here means the generator
    // is not using the random segments at all
    assert_ne!(first, second);
}

#[test]
fn removal_interval_comes_from_config() {
    let config = Config::default();
    assert_eq!(config.cart.removal_interval, 30);

    let store = store_with_interval(5);
    for _ in 0..4 {
        assert!(store.poll().removed.is_none());
    }
    assert!(store.poll().removed.is_some());
}
