//! Simulated payment flow.
//!
//! The [`PaymentGateway`] trait is the seam a real gateway integration
//! would plug into. The shipped [`SimulatedGateway`] waits a fixed delay
//! and then succeeds, which is the whole of the demo's payment story.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::config::PaymentConfig;
use crate::{Error, Result};

/// Supported payment methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    Card,
    NetBanking,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Upi => write!(f, "UPI"),
            PaymentMethod::Card => write!(f, "Card"),
            PaymentMethod::NetBanking => write!(f, "NetBanking"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "upi" => Ok(PaymentMethod::Upi),
            "card" => Ok(PaymentMethod::Card),
            "netbanking" | "net-banking" => Ok(PaymentMethod::NetBanking),
            other => Err(Error::Payment(format!("unknown payment method: {}", other))),
        }
    }
}

/// Payment state of a checkout in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Idle,
    Pending,
    Success,
}

/// Record of a completed payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    /// Transaction id, `TXN-<epoch millis>`
    pub txn_id: String,
    /// Method the payment was made with
    pub method: PaymentMethod,
    /// Amount charged
    pub amount: f64,
    /// Completion timestamp (epoch milliseconds)
    pub paid_at: i64,
}

impl PaymentConfirmation {
    /// Create a confirmation stamped with the current time.
    pub fn new(method: PaymentMethod, amount: f64) -> Self {
        let paid_at = chrono::Utc::now().timestamp_millis();
        Self {
            txn_id: format!("TXN-{}", paid_at),
            method,
            amount,
            paid_at,
        }
    }
}

/// A payment gateway that can charge an amount.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` using `method`, returning a confirmation.
    async fn charge(&self, method: PaymentMethod, amount: f64) -> Result<PaymentConfirmation>;
}

/// Gateway that waits a fixed delay and always succeeds.
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    /// Create a gateway from the payment configuration.
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, method: PaymentMethod, amount: f64) -> Result<PaymentConfirmation> {
        if amount <= 0.0 {
            return Err(Error::Payment(format!(
                "cannot charge a non-positive amount: {}",
                amount
            )));
        }

        tokio::time::sleep(self.delay).await;

        let confirmation = PaymentConfirmation::new(method, amount);

        info!(
            txn_id = %confirmation.txn_id,
            method = %method,
            amount,
            "payment simulated"
        );

        Ok(confirmation)
    }
}
