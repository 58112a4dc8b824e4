pub mod schema;

pub use schema::{
    ChartConfig, NetChartConfig, SamplerConfig, ServerConfig, TickErrorPolicy, MAX_DIMENSION,
};

use netchart_core::{NetChartError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `NetChartConfig::default()`
/// if the file doesn't exist, so an unconfigured host samples every second
/// and serves on port 8080.
pub fn load(path: impl AsRef<Path>) -> Result<NetChartConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(NetChartConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| NetChartError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config = parse(&raw)?;
    tracing::info!("Loaded config from '{}'", path.display());
    Ok(config)
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<NetChartConfig> {
    let config: NetChartConfig =
        toml::from_str(raw).map_err(|e| NetChartError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("netchart").join("netchart.toml")
}
