use anyhow::Result;
use tracing::info;
use trolley_core::{
    render_pdf, BillTotals, CartSnapshot, PaymentConfirmation, PaymentMethod, Receipt,
};

/// Render a receipt for the configured catalog without running a server.
pub async fn run(config_path: Option<&str>, output: &str, method: &str) -> Result<()> {
    let config = super::load_config(config_path).await?;
    let method: PaymentMethod = method.parse()?;

    let snapshot = CartSnapshot {
        cart_id: config.cart.initial_cart_id.clone(),
        items: config.cart.catalog.clone(),
    };
    let totals = BillTotals::compute(&snapshot.items, config.billing.tax_rate);
    let confirmation = PaymentConfirmation::new(method, totals.total);

    let receipt = Receipt::assemble(&config.store, &snapshot, &totals, &confirmation);
    let bytes = render_pdf(&receipt)?;
    tokio::fs::write(output, &bytes).await?;

    info!(
        "Receipt {} written to {} ({} bytes)",
        receipt.id,
        output,
        bytes.len()
    );
    Ok(())
}
