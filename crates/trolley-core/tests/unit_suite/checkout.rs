//! End-to-end checkout flow: poll, pay, render the receipt.

use super::helpers::{fast_gateway, store_with_interval};
use trolley_core::config::StoreConfig;
use trolley_core::{render_pdf, BillTotals, PaymentGateway, PaymentMethod, Receipt};

#[tokio::test]
async fn full_checkout_produces_a_receipt_pdf() {
    let store = store_with_interval(30);
    let gateway = fast_gateway();

    // Shopper polls a few times, nothing disappears yet
    for _ in 0..5 {
        store.poll();
    }

    let snapshot = store.snapshot();
    let totals = BillTotals::compute(&snapshot.items, 0.05);
    let confirmation = gateway
        .charge(PaymentMethod::Card, totals.total)
        .await
        .unwrap();
    assert_eq!(confirmation.amount, 409.5);

    let receipt = Receipt::assemble(&StoreConfig::default(), &snapshot, &totals, &confirmation);
    store.set_receipt(receipt.clone());

    let bytes = render_pdf(&receipt).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    // The stored receipt survives until the session ends
    assert_eq!(store.last_receipt().unwrap().id, receipt.id);
    store.reset();
    assert!(store.last_receipt().is_none());
}

#[tokio::test]
async fn receipt_reflects_items_removed_before_payment() {
    let store = store_with_interval(2);
    let gateway = fast_gateway();

    // Polls 2 and 4 drop the almond milk and the bread
    for _ in 0..4 {
        store.poll();
    }
    let snapshot = store.snapshot();
    assert_eq!(snapshot.items.len(), 1);

    let totals = BillTotals::compute(&snapshot.items, 0.05);
    assert_eq!(totals.subtotal, 120.0);

    let confirmation = gateway
        .charge(PaymentMethod::Upi, totals.total)
        .await
        .unwrap();
    let receipt = Receipt::assemble(&StoreConfig::default(), &snapshot, &totals, &confirmation);
    assert_eq!(receipt.items.len(), 1);
    assert_eq!(receipt.items[0].name, "Organic Apples (1kg)");
}

#[tokio::test]
async fn rendered_receipt_can_be_written_to_disk() {
    let store = store_with_interval(30);
    let gateway = fast_gateway();

    let snapshot = store.snapshot();
    let totals = BillTotals::compute(&snapshot.items, 0.05);
    let confirmation = gateway
        .charge(PaymentMethod::NetBanking, totals.total)
        .await
        .unwrap();
    let receipt = Receipt::assemble(&StoreConfig::default(), &snapshot, &totals, &confirmation);

    let bytes = render_pdf(&receipt).unwrap();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(format!("receipt-{}.pdf", receipt.id));
    std::fs::write(&path, &bytes).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, bytes);
}
