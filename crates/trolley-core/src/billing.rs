//! Bill totals arithmetic.

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;

/// Computed totals for a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTotals {
    /// Total units across all items
    pub total_items: u32,
    /// Sum of quantity x unit price over all items
    pub subtotal: f64,
    /// Tax on the subtotal
    pub tax: f64,
    /// Subtotal plus tax
    pub total: f64,
}

impl BillTotals {
    /// Compute totals for `items` at the given tax rate.
    ///
    /// Pure arithmetic; no hidden state.
    pub fn compute(items: &[CartItem], tax_rate: f64) -> Self {
        let subtotal: f64 = items.iter().map(CartItem::line_total).sum();
        let tax = subtotal * tax_rate;
        Self {
            total_items: items.iter().map(|item| item.quantity).sum(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}
