pub mod colors;
pub mod style;

pub use colors::Color;
pub use style::SeriesStyle;

use netchart_config::ChartConfig;
use std::path::PathBuf;

/// Compiled chart appearance derived from [`ChartConfig`].
///
/// All colours are pre-parsed from hex strings into normalised `[0, 1]`
/// RGBA. Calling [`ChartTheme::from_config`] is infallible — invalid colour
/// strings fall back to the stock red/green on white.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub width:      u32,
    pub height:     u32,
    pub background: Color,
    /// Axis, grid and legend border colour.
    pub foreground: Color,
    /// Y axis spans `0.0 ..= y_axis_max` MB/s.
    pub y_axis_max: f64,
    pub sent:       SeriesStyle,
    pub recv:       SeriesStyle,
    pub font_paths: Vec<PathBuf>,
}

impl ChartTheme {
    /// Build a [`ChartTheme`] from the config file's `[chart]` section.
    pub fn from_config(cfg: &ChartConfig) -> Self {
        let sent = Color::from_hex(&cfg.sent_color).unwrap_or(Color::RED);
        let recv = Color::from_hex(&cfg.recv_color).unwrap_or(Color::GREEN);

        Self {
            width:      cfg.width,
            height:     cfg.height,
            background: Color::from_hex(&cfg.background).unwrap_or(Color::WHITE),
            foreground: Color::BLACK,
            y_axis_max: cfg.y_axis_max,
            sent:       SeriesStyle::new("Sent", sent, cfg.fill_alpha),
            recv:       SeriesStyle::new("Received", recv, cfg.fill_alpha),
            font_paths: cfg.font_paths.clone(),
        }
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}
