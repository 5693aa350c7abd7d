use anyhow::Result;

/// Parse, validate and echo the effective configuration as YAML.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path).await?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}
