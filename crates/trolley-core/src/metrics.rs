//! Prometheus metrics registry for the trolley service.
//!
//! Counters follow the prometheus-client conventions; the registry is
//! encoded to the OpenMetrics text format by the `/metrics` endpoint.

use parking_lot::RwLock;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;

use crate::payment::PaymentMethod;

/// Payment latency histogram buckets (in seconds).
/// The simulated gateway sits around a second; real ones would not.
const PAYMENT_DURATION_BUCKETS: [f64; 8] = [0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Labels for payment metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct PaymentLabels {
    pub method: String,
    pub status: String,
}

impl PaymentLabels {
    pub fn new(method: PaymentMethod, status: impl Into<String>) -> Self {
        Self {
            method: method.to_string(),
            status: status.into(),
        }
    }
}

/// Metrics registry for the trolley service.
pub struct TrolleyMetrics {
    /// Internal prometheus-client registry.
    registry: RwLock<Registry>,

    /// Cart polls served.
    pub polls_total: Counter,

    /// Items dropped by the removal simulation.
    pub items_removed_total: Counter,

    /// Sessions ended via cart reset.
    pub sessions_reset_total: Counter,

    /// Payments by method and outcome.
    pub payments_total: Family<PaymentLabels, Counter>,

    /// Gateway charge latency.
    pub payment_duration_seconds: Histogram,

    /// Receipt PDFs rendered.
    pub receipts_rendered_total: Counter,
}

impl Default for TrolleyMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TrolleyMetrics {
    /// Create a registry with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let polls_total = Counter::default();
        registry.register("trolley_polls", "Cart polls served", polls_total.clone());

        let items_removed_total = Counter::default();
        registry.register(
            "trolley_items_removed",
            "Items dropped by the removal simulation",
            items_removed_total.clone(),
        );

        let sessions_reset_total = Counter::default();
        registry.register(
            "trolley_sessions_reset",
            "Sessions ended via cart reset",
            sessions_reset_total.clone(),
        );

        let payments_total = Family::<PaymentLabels, Counter>::default();
        registry.register(
            "trolley_payments",
            "Payments by method and outcome",
            payments_total.clone(),
        );

        let payment_duration_seconds = Histogram::new(PAYMENT_DURATION_BUCKETS.into_iter());
        registry.register(
            "trolley_payment_duration_seconds",
            "Gateway charge latency",
            payment_duration_seconds.clone(),
        );

        let receipts_rendered_total = Counter::default();
        registry.register(
            "trolley_receipts_rendered",
            "Receipt PDFs rendered",
            receipts_rendered_total.clone(),
        );

        Self {
            registry: RwLock::new(registry),
            polls_total,
            items_removed_total,
            sessions_reset_total,
            payments_total,
            payment_duration_seconds,
            receipts_rendered_total,
        }
    }

    /// Record a served poll and whether it dropped an item.
    pub fn record_poll(&self, removed_item: bool) {
        self.polls_total.inc();
        if removed_item {
            self.items_removed_total.inc();
        }
    }

    /// Record a session reset.
    pub fn record_session_reset(&self) {
        self.sessions_reset_total.inc();
    }

    /// Record a payment outcome and its latency.
    pub fn record_payment(&self, method: PaymentMethod, status: &str, duration_secs: f64) {
        self.payments_total
            .get_or_create(&PaymentLabels::new(method, status))
            .inc();
        self.payment_duration_seconds.observe(duration_secs);
    }

    /// Record a rendered receipt.
    pub fn record_receipt(&self) {
        self.receipts_rendered_total.inc();
    }

    /// Encode all metrics in the OpenMetrics text format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry.read()).is_err() {
            return String::new();
        }
        buffer
    }
}
