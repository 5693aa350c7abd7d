//! Receipt assembly and PDF rendering.
//!
//! A [`Receipt`] is assembled from a cart snapshot, its bill totals and
//! the payment confirmation, then rendered to PDF bytes by
//! [`pdf::render_pdf`].

pub mod pdf;

use serde::{Deserialize, Serialize};

use crate::billing::BillTotals;
use crate::cart::CartSnapshot;
use crate::config::StoreConfig;
use crate::payment::{PaymentConfirmation, PaymentMethod};

/// One line on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item display name
    pub name: String,
    /// Units bought
    pub qty: u32,
    /// Per-unit price
    pub price: f64,
}

impl ReceiptItem {
    /// Line total for this entry
    pub fn line_total(&self) -> f64 {
        f64::from(self.qty) * self.price
    }
}

/// A complete purchase receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Receipt id (the payment's transaction id)
    pub id: String,
    /// Store display name
    pub store_name: String,
    /// Optional store address line
    pub store_address: Option<String>,
    /// Human-readable purchase timestamp
    pub date: String,
    /// Purchased items
    pub items: Vec<ReceiptItem>,
    /// Sum of line totals
    pub subtotal: f64,
    /// Tax charged
    pub tax: f64,
    /// Amount paid
    pub total: f64,
    /// Method the payment was made with
    pub payment_method: PaymentMethod,
}

impl Receipt {
    /// Assemble a receipt from a completed checkout.
    pub fn assemble(
        store: &StoreConfig,
        snapshot: &CartSnapshot,
        totals: &BillTotals,
        confirmation: &PaymentConfirmation,
    ) -> Self {
        let when = chrono::DateTime::from_timestamp_millis(confirmation.paid_at)
            .unwrap_or_else(chrono::Utc::now);

        Self {
            id: confirmation.txn_id.clone(),
            store_name: store.name.clone(),
            store_address: store.address.clone(),
            date: when
                .with_timezone(&chrono::Local)
                .format("%d/%m/%Y %H:%M:%S")
                .to_string(),
            items: snapshot
                .items
                .iter()
                .map(|item| ReceiptItem {
                    name: item.name.clone(),
                    qty: item.quantity,
                    price: item.unit_price,
                })
                .collect(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            payment_method: confirmation.method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;

    fn demo_receipt() -> Receipt {
        let store = StoreConfig::default();
        let snapshot = CartSnapshot {
            cart_id: "CART-7421-AB".to_string(),
            items: vec![
                CartItem::new("p1", "Organic Apples (1kg)", 1, 120.0),
                CartItem::new("p2", "Whole Wheat Bread", 2, 45.0),
            ],
        };
        let totals = BillTotals::compute(&snapshot.items, 0.05);
        let confirmation = PaymentConfirmation {
            txn_id: "TXN-1722945600000".to_string(),
            method: PaymentMethod::Upi,
            amount: totals.total,
            paid_at: 1_722_945_600_000,
        };
        Receipt::assemble(&store, &snapshot, &totals, &confirmation)
    }

    #[test]
    fn assemble_copies_totals_and_identity() {
        let receipt = demo_receipt();
        assert_eq!(receipt.id, "TXN-1722945600000");
        assert_eq!(receipt.store_name, "Smart Trolley");
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.subtotal, 210.0);
        assert_eq!(receipt.tax, 10.5);
        assert_eq!(receipt.total, 220.5);
        assert_eq!(receipt.payment_method, PaymentMethod::Upi);
    }

    #[test]
    fn assemble_formats_a_date() {
        let receipt = demo_receipt();
        // dd/mm/yyyy hh:mm:ss
        assert_eq!(receipt.date.len(), 19);
        assert_eq!(&receipt.date[2..3], "/");
        assert_eq!(&receipt.date[5..6], "/");
    }

    #[test]
    fn line_total_multiplies_qty() {
        let item = ReceiptItem {
            name: "Whole Wheat Bread".to_string(),
            qty: 2,
            price: 45.0,
        };
        assert_eq!(item.line_total(), 90.0);
    }
}
