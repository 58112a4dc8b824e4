//! Chart drawing for the throughput series.
//!
//! A [`ChartRenderer`] is a pure function of its [`ChartTheme`] and the
//! snapshot it is handed: it draws "Sent" and "Received" as filled line
//! series over a fixed `0 ..= y_axis_max` MB/s axis and returns PNG bytes.
//! Axis titles, tick labels and the legend need a TrueType font (see
//! [`fonts`]); without one the same chart is drawn with no text.

pub mod fonts;

use netchart_core::{NetChartError, Result, SeriesSnapshot};
use netchart_theme::{ChartTheme, SeriesStyle};
use plotters::prelude::*;
use tracing::warn;

pub const X_AXIS_LABEL: &str = "Time (s)";
pub const Y_AXIS_LABEL: &str = "Bandwidth (MB/s)";

/// Turns a series snapshot into an encoded image.
///
/// The HTTP layer only depends on this, so it can be handed any renderer.
pub trait RenderChart: Send + Sync {
    fn render_png(&self, snapshot: &SeriesSnapshot) -> Result<Vec<u8>>;
}

/// Renders series snapshots to PNG.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    theme: ChartTheme,
    /// Whether a font is registered for axis and legend text.
    text:  bool,
}

impl ChartRenderer {
    /// Build a renderer, registering the first usable font from the theme.
    pub fn new(theme: ChartTheme) -> Self {
        let text = fonts::install(&theme.font_paths);
        if !text {
            warn!("No usable chart font found; charts will be drawn without labels");
        }
        Self { theme, text }
    }

    /// A renderer that never draws text, independent of installed fonts.
    pub fn without_text(theme: ChartTheme) -> Self {
        Self { theme, text: false }
    }

    pub fn has_text(&self) -> bool {
        self.text
    }

    /// Draw `snapshot` and encode it as PNG.
    ///
    /// Fails only on mismatched series lengths or a backend error.
    pub fn render_png(&self, snapshot: &SeriesSnapshot) -> Result<Vec<u8>> {
        if !snapshot.is_aligned() {
            return Err(NetChartError::Render(format!(
                "series lengths differ: time={}, sent={}, recv={}",
                snapshot.time.len(),
                snapshot.sent.len(),
                snapshot.recv.len(),
            )));
        }

        let (width, height) = (self.theme.width, self.theme.height);
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        self.draw(snapshot, &mut pixels)?;
        encode_png(&pixels, width, height)
    }

    fn draw(&self, snapshot: &SeriesSnapshot, pixels: &mut [u8]) -> Result<()> {
        let theme = &self.theme;
        let root = BitMapBackend::with_buffer(pixels, (theme.width, theme.height))
            .into_drawing_area();

        let background = theme.background.to_plotters();
        let foreground = theme.foreground.to_plotters();
        root.fill(&background).map_err(render_err)?;

        let (x_min, x_max) = x_range(&snapshot.time);
        let y_max = theme.y_axis_max;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(16);
        if self.text {
            builder.x_label_area_size(40).y_label_area_size(60);
        }
        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(render_err)?;

        {
            let mut mesh = chart.configure_mesh();
            mesh.axis_style(foreground.stroke_width(1))
                .bold_line_style(foreground.mix(0.15).stroke_width(1))
                .light_line_style(foreground.mix(0.05).stroke_width(1));
            if self.text {
                mesh.x_desc(X_AXIS_LABEL).y_desc(Y_AXIS_LABEL);
            }
            mesh.draw().map_err(render_err)?;
        }

        let series: [(&SeriesStyle, Box<dyn Iterator<Item = (f64, f64)> + '_>); 2] = [
            (&theme.sent, Box::new(snapshot.sent_points())),
            (&theme.recv, Box::new(snapshot.recv_points())),
        ];
        for (style, points) in series {
            // Out-of-range points (e.g. a counter reset) are pinned to the axis bounds.
            let points = points.map(|(t, v)| (t, v.clamp(0.0, y_max)));
            let (stroke, fill) = colors(style);

            let anno = chart
                .draw_series(
                    AreaSeries::new(points, 0.0, fill.filled())
                        .border_style(stroke.stroke_width(2)),
                )
                .map_err(render_err)?;

            if self.text {
                anno.label(style.label.clone()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], stroke.filled())
                });
            }
        }

        if self.text {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(background.mix(0.8).filled())
                .border_style(foreground.stroke_width(1))
                .draw()
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
        Ok(())
    }
}

impl RenderChart for ChartRenderer {
    fn render_png(&self, snapshot: &SeriesSnapshot) -> Result<Vec<u8>> {
        ChartRenderer::render_png(self, snapshot)
    }
}

fn colors(style: &SeriesStyle) -> (RGBAColor, RGBAColor) {
    (style.stroke.to_plotters(), style.fill.to_plotters())
}

/// X axis bounds covering `time`; never empty or zero-width.
fn x_range(time: &[f64]) -> (f64, f64) {
    match (time.first(), time.last()) {
        (Some(&first), Some(&last)) if last > first => (first, last),
        (Some(&first), _) => (first, first + 1.0),
        _ => (0.0, 1.0),
    }
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(render_err)?;
        writer.write_image_data(pixels).map_err(render_err)?;
        writer.finish().map_err(render_err)?;
    }
    Ok(out)
}

fn render_err(e: impl std::fmt::Display) -> NetChartError {
    NetChartError::Render(e.to_string())
}
