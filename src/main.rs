use anyhow::Result;
use dotenvy::dotenv;
use reelscout::config::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset: request traces plus this crate's flow logs.
const DEFAULT_LOG_FILTER: &str = "warn,reelscout=info,tower_http=info";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_result = dotenv();
    init_tracing();
    match dotenv_result {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    let config = Config::from_env()?;
    reelscout::app::run_server(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
