//! Receipt total arithmetic through the public API.

use super::helpers::demo_catalog;
use trolley_core::{BillTotals, CartItem};

#[test]
fn demo_catalog_totals() {
    let totals = BillTotals::compute(&demo_catalog(), 0.05);
    assert_eq!(totals.subtotal, 390.0);
    assert_eq!(totals.tax, 19.5);
    assert_eq!(totals.total, 409.5);
    assert_eq!(totals.total_items, 4);
}

#[test]
fn subtotal_is_sum_of_quantity_times_unit_price() {
    let items = vec![
        CartItem::new("a", "Basmati Rice (5kg)", 3, 250.0),
        CartItem::new("b", "Ghee (500ml)", 1, 320.0),
    ];
    let totals = BillTotals::compute(&items, 0.05);
    assert_eq!(totals.subtotal, 3.0 * 250.0 + 320.0);
}

#[test]
fn tax_scales_linearly_with_rate() {
    let items = demo_catalog();
    let at_five = BillTotals::compute(&items, 0.05);
    let at_ten = BillTotals::compute(&items, 0.10);
    assert!((at_ten.tax - 2.0 * at_five.tax).abs() < 1e-9);
}

#[test]
fn totals_serialize_with_camel_case_keys() {
    let totals = BillTotals::compute(&demo_catalog(), 0.05);
    let json = serde_json::to_string(&totals).unwrap();
    assert!(json.contains("\"totalItems\":4"));
    assert!(json.contains("\"subtotal\":390.0"));
}
