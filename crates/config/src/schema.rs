use netchart_core::{NetChartError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Largest accepted chart width or height, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Root configuration structure parsed from `netchart.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetChartConfig {
    /// Counter sampling settings.
    pub sampler: SamplerConfig,
    /// Chart appearance.
    pub chart: ChartConfig,
    /// HTTP listener.
    pub server: ServerConfig,
}

impl NetChartConfig {
    /// Reject values that would break the sampler or the renderer.
    pub fn validate(&self) -> Result<()> {
        if self.sampler.interval_ms == 0 {
            return Err(NetChartError::Config("sampler.interval_ms must be > 0".into()));
        }
        if self.sampler.history_limit == Some(0) {
            return Err(NetChartError::Config("sampler.history_limit must be >= 1".into()));
        }
        if !(self.chart.y_axis_max.is_finite() && self.chart.y_axis_max > 0.0) {
            return Err(NetChartError::Config(format!(
                "chart.y_axis_max must be a positive number, got {}",
                self.chart.y_axis_max
            )));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(NetChartError::Config("chart.width and chart.height must be > 0".into()));
        }
        if self.chart.width > MAX_DIMENSION || self.chart.height > MAX_DIMENSION {
            return Err(NetChartError::Config(format!(
                "chart.width and chart.height must be at most {MAX_DIMENSION}"
            )));
        }
        if !(0.0..=1.0).contains(&self.chart.fill_alpha) {
            return Err(NetChartError::Config("chart.fill_alpha must be within 0.0 – 1.0".into()));
        }
        self.server.addr()?;
        Ok(())
    }
}

/// What the sampler does when the counter source fails after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TickErrorPolicy {
    /// Log, keep the previous reading, try again next tick.
    #[default]
    Skip,
    /// Stop the sampler and take the process down.
    Abort,
}

/// Sampling cadence and retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Milliseconds between counter reads.
    pub interval_ms: u64,
    /// Keep at most this many points; unset keeps the whole run.
    pub history_limit: Option<usize>,
    pub on_tick_error: TickErrorPolicy,
}

impl SamplerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms:   1000,
            history_limit: None,
            on_tick_error: TickErrorPolicy::Skip,
        }
    }
}

/// Chart size, range and colours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Upper bound of the Y axis in MB/s.
    pub y_axis_max: f64,
    /// Line colour of the "Sent" series (hex).
    pub sent_color: String,
    /// Line colour of the "Received" series (hex).
    pub recv_color: String,
    /// Opacity of the area under each line (0.0 – 1.0).
    pub fill_alpha: f32,
    /// Image background (hex).
    pub background: String,
    /// TrueType fonts tried in order for axis and legend text.
    pub font_paths: Vec<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width:      1024,
            height:     400,
            y_axis_max: 15.0,
            sent_color: "#ff0000".to_string(),
            recv_color: "#00ff00".to_string(),
            fill_alpha: 0.25,
            background: "#ffffff".to_string(),
            font_paths: [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `"127.0.0.1:9000"`.
    pub listen: String,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| NetChartError::Config(format!("server.listen '{}': {e}", self.listen)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}
