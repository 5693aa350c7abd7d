pub mod receipt;
pub mod serve;
pub mod show_config;

use anyhow::{Context, Result};
use tracing::info;
use trolley_core::Config;

/// Load and validate the service configuration.
///
/// With no path, the stock demo configuration is used.
pub async fn load_config(path: Option<&str>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path))?;
            serde_yaml::from_str(&content)?
        }
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}
