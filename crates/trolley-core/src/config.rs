//! Configuration structures for the trolley service.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::cart::CartItem;

/// Main configuration structure.
///
/// Every field carries a serde default, so an empty YAML document is a
/// valid configuration that yields the stock demo setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Store identity printed on receipts
    #[serde(default)]
    pub store: StoreConfig,

    /// Cart session options
    #[serde(default)]
    pub cart: CartConfig,

    /// Billing options
    #[serde(default)]
    pub billing: BillingConfig,

    /// Payment simulation options
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            store: StoreConfig::default(),
            cart: CartConfig::default(),
            billing: BillingConfig::default(),
            payment: PaymentConfig::default(),
        }
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Store identity shown in the UI header and on receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store display name
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Optional address line printed under the name
    #[serde(default = "default_store_address")]
    pub address: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            address: default_store_address(),
        }
    }
}

fn default_store_name() -> String {
    "Smart Trolley".to_string()
}

fn default_store_address() -> Option<String> {
    Some("Smart Mall, 1st Floor, Bengaluru".to_string())
}

/// Cart session options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    /// Cart id the first session starts with
    #[serde(default = "default_initial_cart_id")]
    pub initial_cart_id: String,

    /// Every Nth poll drops the last item to simulate RFID removal
    #[serde(default = "default_removal_interval")]
    pub removal_interval: u64,

    /// Items the session is seeded with
    #[serde(default = "default_catalog")]
    pub catalog: Vec<CartItem>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            initial_cart_id: default_initial_cart_id(),
            removal_interval: default_removal_interval(),
            catalog: default_catalog(),
        }
    }
}

fn default_initial_cart_id() -> String {
    "CART-7421-AB".to_string()
}

fn default_removal_interval() -> u64 {
    30
}

fn default_catalog() -> Vec<CartItem> {
    vec![
        CartItem::new("p1", "Organic Apples (1kg)", 1, 120.0),
        CartItem::new("p2", "Whole Wheat Bread", 2, 45.0),
        CartItem::new("p3", "Almond Milk (1L)", 1, 180.0),
    ]
}

/// Billing options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Tax rate applied to the subtotal (0.05 = 5%)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
        }
    }
}

fn default_tax_rate() -> f64 {
    0.05
}

/// Payment simulation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Fixed gateway delay in milliseconds before the payment succeeds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_delay_ms() -> u64 {
    1200
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.cart.removal_interval == 0 {
            return Err(crate::Error::Config(
                "cart.removal_interval must be > 0".to_string(),
            ));
        }

        if self.billing.tax_rate < 0.0 {
            return Err(crate::Error::Config(format!(
                "billing.tax_rate must not be negative (got {})",
                self.billing.tax_rate
            )));
        }

        if self.store.name.is_empty() {
            return Err(crate::Error::Config(
                "store.name must not be empty".to_string(),
            ));
        }

        for item in &self.cart.catalog {
            if item.id.is_empty() || item.name.is_empty() {
                return Err(crate::Error::Config(format!(
                    "catalog item with empty id or name: {:?}",
                    item
                )));
            }
        }

        Ok(())
    }
}
