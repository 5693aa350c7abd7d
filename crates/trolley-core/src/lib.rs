//! Smart Trolley Core Library
//!
//! This crate provides the core functionality for the smart trolley
//! checkout service: the in-memory cart session, bill totals, the
//! simulated payment gateway, PDF receipt rendering and the HTTP server
//! that ties them together.

pub mod billing;
pub mod cart;
pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod payment;
pub mod receipt;
pub mod server;

pub use billing::BillTotals;
pub use cart::{CartItem, CartSnapshot, CartStore, PollOutcome};
pub use config::{BillingConfig, CartConfig, Config, PaymentConfig, StoreConfig};
pub use error::{Error, Result};
pub use health::{HealthCheck, HealthReport, HealthStatus};
pub use metrics::TrolleyMetrics;
pub use payment::{
    PaymentConfirmation, PaymentGateway, PaymentMethod, PaymentStatus, SimulatedGateway,
};
pub use receipt::{pdf::render_pdf, Receipt, ReceiptItem};
pub use server::{ServerConfig, TrolleyServer};
