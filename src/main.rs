//! netchart — serves a live chart of host network throughput over HTTP.
//!
//! Run with:  `RUST_LOG=info netchart`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("netchart v{} starting", env!("CARGO_PKG_VERSION"));

    let config = netchart_config::load(netchart_config::default_path())?;

    netchart_server::run(config).await.map_err(Into::into)
}
