mod infra;

use std::path::Path;

use anyhow::Context;
use tracing::info;

use infra::{Config, LogGuard, c2dm_adapter};

const CONFIG_PATH: &str = "./config";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_config()?;

    let _log_guard = LogGuard::init()?;
    let config = Config::new();

    let sender = c2dm_adapter::build_sender(&config)?;
    let message = c2dm_adapter::build_message(&config)?;

    info!(kind = %message.kind(), "sending c2dm message");

    let delivered = sender.send(&message).await.context("c2dm send failed")?;
    if !delivered {
        anyhow::bail!("message was not delivered, see log for details");
    }

    info!("message delivered");
    Ok(())
}

fn load_config() -> anyhow::Result<()> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        dotenv::from_path(path).context("failed to load ./config")?;
    }
    Ok(())
}
