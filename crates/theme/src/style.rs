use crate::colors::Color;

/// How one data series is drawn.
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    /// Legend label, e.g. `"Sent"`.
    pub label:  String,
    /// Line colour.
    pub stroke: Color,
    /// Area fill under the line.
    pub fill:   Color,
}

impl SeriesStyle {
    /// Stroke in `color`, filled with the same colour at `fill_alpha`.
    pub fn new(label: impl Into<String>, color: Color, fill_alpha: f32) -> Self {
        Self {
            label:  label.into(),
            stroke: color,
            fill:   color.with_alpha(fill_alpha),
        }
    }
}
