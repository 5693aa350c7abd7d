//! HTTP server for the trolley service.
//!
//! This module provides an HTTP server using Hyper 1.x that exposes the
//! cart, billing, payment and receipt endpoints, plus `/health` and
//! `/metrics` for monitoring.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::billing::BillTotals;
use crate::cart::CartStore;
use crate::config::{Config, StoreConfig};
use crate::health::{HealthCheck, HealthStatus};
use crate::metrics::TrolleyMetrics;
use crate::payment::{PaymentGateway, PaymentMethod};
use crate::receipt::{pdf::render_pdf, Receipt};

/// Configuration for the trolley server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl ServerConfig {
    /// Create a new config with a custom port.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], port)),
        }
    }

    /// Create a new config with a custom bind address.
    pub fn with_address(addr: impl Into<SocketAddr>) -> Self {
        Self {
            bind_address: addr.into(),
        }
    }
}

/// HTTP server for the trolley service.
///
/// Endpoints:
/// - `GET /api/cart` - poll the cart (drives the removal simulation)
/// - `DELETE /api/cart` - end the session and issue a fresh cart id
/// - `GET /api/bill` - bill totals for the current cart
/// - `POST /api/pay` - run the simulated payment for the current bill
/// - `GET /api/receipt` - PDF receipt of the session's last payment
/// - `GET /health` - health check endpoint (JSON)
/// - `GET /metrics` - Prometheus metrics in text format
/// - `GET /` - simple HTML page with links
pub struct TrolleyServer {
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl TrolleyServer {
    /// Create a server from the service configuration.
    pub fn new(
        config: &Config,
        gateway: Arc<dyn PaymentGateway>,
        metrics: Arc<TrolleyMetrics>,
        health: Arc<HealthCheck>,
    ) -> Self {
        Self {
            config: ServerConfig {
                bind_address: config.bind_address,
            },
            state: Arc::new(ServerState {
                store: CartStore::new(&config.cart),
                gateway,
                store_info: config.store.clone(),
                tax_rate: config.billing.tax_rate,
                metrics,
                health,
            }),
        }
    }

    /// Run the server.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> crate::Result<()> {
        let listener = TcpListener::bind(self.config.bind_address)
            .await
            .map_err(|e| {
                crate::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::AddrInUse,
                    format!("Failed to bind server: {}", e),
                ))
            })?;

        info!(
            "Trolley server listening on http://{}",
            self.config.bind_address
        );

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!("Connection from {}", addr);

                            let io = TokioIo::new(stream);
                            let state = Arc::clone(&self.state);

                            // Spawn a task to handle the connection
                            tokio::spawn(async move {
                                let service = service_fn(move |req| {
                                    let state = Arc::clone(&state);
                                    async move {
                                        Ok::<_, Infallible>(handle_request(req, &state).await)
                                    }
                                });

                                if let Err(err) = http1::Builder::new()
                                    .serve_connection(io, service)
                                    .await
                                {
                                    // Connection errors are expected when clients disconnect
                                    if !err.is_incomplete_message() {
                                        warn!("Error serving connection from {}: {}", addr, err);
                                    }
                                }
                            });
                        }
                        Err(e) => {
                            warn!("Failed to accept connection: {}", e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Trolley server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run the server until a signal is received.
    ///
    /// This is a convenience method that creates its own shutdown channel.
    pub async fn run_until_shutdown(self) -> crate::Result<()> {
        let (tx, rx) = broadcast::channel(1);

        // Set up signal handler
        let shutdown_tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
            }
            let _ = shutdown_tx.send(());
        });

        self.run(rx).await
    }
}

/// Shared state for request handling.
struct ServerState {
    store: CartStore,
    gateway: Arc<dyn PaymentGateway>,
    store_info: StoreConfig,
    tax_rate: f64,
    metrics: Arc<TrolleyMetrics>,
    health: Arc<HealthCheck>,
}

/// Body of a `POST /api/pay` request.
#[derive(Debug, Default, Deserialize)]
struct PayRequest {
    #[serde(default)]
    method: PaymentMethod,
}

/// Handle an incoming HTTP request.
async fn handle_request(req: Request<Incoming>, state: &ServerState) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let method = parts.method;
    let path = parts.uri.path();

    if path == "/api/cart" {
        if method == Method::GET {
            handle_poll(state)
        } else if method == Method::DELETE {
            handle_reset(state)
        } else {
            method_not_allowed()
        }
    } else if path == "/api/bill" {
        if method == Method::GET {
            handle_bill(state)
        } else {
            method_not_allowed()
        }
    } else if path == "/api/pay" {
        if method == Method::POST {
            let bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        &format!("failed to read request body: {}", e),
                    )
                }
            };
            handle_pay(state, bytes).await
        } else {
            method_not_allowed()
        }
    } else if path == "/api/receipt" {
        if method == Method::GET {
            handle_receipt(state)
        } else {
            method_not_allowed()
        }
    } else if path == "/health" || path == "/healthz" {
        if method == Method::GET {
            handle_health(state)
        } else {
            method_not_allowed()
        }
    } else if path == "/metrics" {
        if method == Method::GET {
            make_response(
                StatusCode::OK,
                "text/plain; version=0.0.4; charset=utf-8",
                state.metrics.encode(),
            )
        } else {
            method_not_allowed()
        }
    } else if path == "/" {
        if method == Method::GET {
            let body = r#"<!DOCTYPE html>
<html>
<head><title>Smart Trolley</title></head>
<body>
<h1>Smart Trolley Checkout Service</h1>
<ul>
<li><a href="/api/cart">/api/cart</a> - live cart (GET polls, DELETE resets)</li>
<li><a href="/api/bill">/api/bill</a> - bill totals</li>
<li>/api/pay - POST to run the simulated payment</li>
<li><a href="/api/receipt">/api/receipt</a> - PDF receipt of the last payment</li>
<li><a href="/health">/health</a> - health check</li>
<li><a href="/metrics">/metrics</a> - Prometheus metrics</li>
</ul>
</body>
</html>"#;
            make_response(StatusCode::OK, "text/html; charset=utf-8", body)
        } else {
            method_not_allowed()
        }
    } else {
        make_response(StatusCode::NOT_FOUND, "text/plain", "Not Found")
    }
}

/// `GET /api/cart` - one poll of the cart.
fn handle_poll(state: &ServerState) -> Response<Full<Bytes>> {
    let outcome = state.store.poll();
    state.metrics.record_poll(outcome.removed.is_some());
    state.health.record_poll();
    json_response(StatusCode::OK, &outcome.snapshot)
}

/// `DELETE /api/cart` - end the session.
fn handle_reset(state: &ServerState) -> Response<Full<Bytes>> {
    state.store.reset();
    state.metrics.record_session_reset();
    state.health.record_session_end();
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// `GET /api/bill` - totals for the current cart.
fn handle_bill(state: &ServerState) -> Response<Full<Bytes>> {
    let snapshot = state.store.snapshot();
    let totals = BillTotals::compute(&snapshot.items, state.tax_rate);
    json_response(StatusCode::OK, &totals)
}

/// `POST /api/pay` - run the simulated payment for the current bill.
async fn handle_pay(state: &ServerState, body: Bytes) -> Response<Full<Bytes>> {
    let method = if body.is_empty() {
        PaymentMethod::default()
    } else {
        match serde_json::from_slice::<PayRequest>(&body) {
            Ok(request) => request.method,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("invalid payment request: {}", e),
                )
            }
        }
    };

    let snapshot = state.store.snapshot();
    let totals = BillTotals::compute(&snapshot.items, state.tax_rate);
    if totals.total_items == 0 {
        return error_response(StatusCode::CONFLICT, "cart is empty");
    }

    let started = Instant::now();
    match state.gateway.charge(method, totals.total).await {
        Ok(confirmation) => {
            state
                .metrics
                .record_payment(method, "success", started.elapsed().as_secs_f64());

            let receipt = Receipt::assemble(&state.store_info, &snapshot, &totals, &confirmation);
            state.store.set_receipt(receipt);

            json_response(StatusCode::OK, &confirmation)
        }
        Err(e) => {
            state
                .metrics
                .record_payment(method, "failed", started.elapsed().as_secs_f64());
            warn!("Payment failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, &format!("payment failed: {}", e))
        }
    }
}

/// `GET /api/receipt` - PDF of the session's last payment.
fn handle_receipt(state: &ServerState) -> Response<Full<Bytes>> {
    let receipt = match state.store.last_receipt() {
        Some(receipt) => receipt,
        None => {
            return error_response(
                StatusCode::NOT_FOUND,
                "no completed payment this session",
            )
        }
    };

    match render_pdf(&receipt) {
        Ok(bytes) => {
            state.metrics.record_receipt();
            Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/pdf")
                .header(
                    "Content-Disposition",
                    format!("attachment; filename=\"receipt-{}.pdf\"", receipt.id),
                )
                .header("Content-Length", bytes.len())
                .body(Full::new(Bytes::from(bytes)))
                .unwrap()
        }
        Err(e) => {
            error!("Failed to render receipt {}: {}", receipt.id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to render receipt",
            )
        }
    }
}

/// Handle health check request.
fn handle_health(state: &ServerState) -> Response<Full<Bytes>> {
    let report = state.health.report();

    let code = match report.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    match serde_json::to_string(&report) {
        Ok(body) => make_response(code, "application/json", body),
        Err(e) => {
            error!("Failed to encode health report: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to encode health report",
            )
        }
    }
}

/// Serialize `value` into a JSON response.
fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_string(value) {
        Ok(body) => make_response(status, "application/json", body),
        Err(e) => {
            error!("Failed to encode response body: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to encode response",
            )
        }
    }
}

/// JSON error body with the given status.
fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = format!(r#"{{"error":"{}"}}"#, message.replace('"', "\\\""));
    make_response(status, "application/json", body)
}

fn method_not_allowed() -> Response<Full<Bytes>> {
    make_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "text/plain",
        "Method Not Allowed",
    )
}

/// Create an HTTP response.
fn make_response(
    status: StatusCode,
    content_type: &str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let body = body.into();
    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Content-Length", body.len())
        .body(Full::new(body))
        .unwrap()
}
