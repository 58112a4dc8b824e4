use plotters::style::RGBAColor;

/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED:   Self = Self { r: 1.0, g: 0.0, b: 0.0, a: 1.0 }; // #ff0000
    pub const GREEN: Self = Self { r: 0.0, g: 1.0, b: 0.0, a: 1.0 }; // #00ff00
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 }; // #ffffff
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }; // #000000

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        match hex.len() {
            6 => Some(Self {
                r: byte(&hex[0..2])? as f32 / 255.0,
                g: byte(&hex[2..4])? as f32 / 255.0,
                b: byte(&hex[4..6])? as f32 / 255.0,
                a: 1.0,
            }),
            8 => Some(Self {
                r: byte(&hex[0..2])? as f32 / 255.0,
                g: byte(&hex[2..4])? as f32 / 255.0,
                b: byte(&hex[4..6])? as f32 / 255.0,
                a: byte(&hex[6..8])? as f32 / 255.0,
            }),
            _ => None,
        }
    }

    /// Convert to a [`plotters`] colour for chart drawing.
    #[inline]
    pub fn to_plotters(self) -> RGBAColor {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        RGBAColor(
            channel(self.r),
            channel(self.g),
            channel(self.b),
            f64::from(self.a.clamp(0.0, 1.0)),
        )
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::GREEN));
    }

    #[test]
    fn parses_alpha_channel() {
        let c = Color::from_hex("#ffffff00").unwrap();
        assert_eq!(c.a, 0.0);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
    }

    #[test]
    fn converts_to_plotters() {
        let RGBAColor(r, g, b, a) = Color::GREEN.with_alpha(0.25).to_plotters();
        assert_eq!((r, g, b), (0, 255, 0));
        assert!((a - 0.25).abs() < 1e-6);
    }
}
