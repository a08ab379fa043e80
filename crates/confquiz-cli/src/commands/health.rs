//! The `confquiz health` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use confquiz_client::load_config_from;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let service = config.create_service()?;

    let health = service
        .health()
        .await
        .with_context(|| format!("quiz service at {} is not reachable", service.base_url()))?;

    println!("{}: {}", service.base_url(), health.status);
    if !health.message.is_empty() {
        println!("{}", health.message);
    }
    Ok(())
}
