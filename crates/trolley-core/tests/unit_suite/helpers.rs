//! Test helper utilities.
//!
//! Common configuration and data builders used across the unit suite.

use trolley_core::config::{CartConfig, PaymentConfig};
use trolley_core::{CartItem, CartStore, Config, SimulatedGateway};

/// The stock three-item demo catalog.
pub fn demo_catalog() -> Vec<CartItem> {
    Config::default().cart.catalog
}

/// A cart store with a custom removal interval.
pub fn store_with_interval(removal_interval: u64) -> CartStore {
    CartStore::new(&CartConfig {
        removal_interval,
        ..CartConfig::default()
    })
}

/// A gateway that completes almost immediately.
pub fn fast_gateway() -> SimulatedGateway {
    SimulatedGateway::new(&PaymentConfig { delay_ms: 1 })
}
