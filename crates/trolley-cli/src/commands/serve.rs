use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use trolley_core::{HealthCheck, SimulatedGateway, TrolleyMetrics, TrolleyServer};

pub async fn run(config_path: Option<&str>, port: Option<u16>) -> Result<()> {
    let mut config = super::load_config(config_path).await?;
    if let Some(port) = port {
        config.bind_address.set_port(port);
    }

    let gateway = Arc::new(SimulatedGateway::new(&config.payment));
    let metrics = Arc::new(TrolleyMetrics::new());
    let health = Arc::new(HealthCheck::new());
    health.register_component("server");
    health.register_component("gateway");

    info!("Starting trolley service: {}", config.store.name);

    let server = TrolleyServer::new(&config, gateway, metrics, health);
    server.run_until_shutdown().await?;

    info!("Trolley service stopped");
    Ok(())
}
