//! sRGB color helpers shared by sampling, export and the saved collections.

use csscolorparser::Color as CssColor;
use palette::Srgb;
use serde::{Deserialize, Serialize};

/// Fallback color used when a pixel cannot be read.
pub const FALLBACK_COLOR: Srgb<u8> = Srgb::new(0, 0, 0);

/// A color captured at sample time, in all the forms the exports need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledColor {
    /// Red, green and blue channels (0-255)
    pub rgb: [u8; 3],
    /// Lowercase `#rrggbb`
    pub hex: String,
    /// CSS `rgb(r, g, b)`
    pub css: String,
}

impl SampledColor {
    pub fn from_srgb(color: Srgb<u8>) -> Self {
        Self {
            rgb: [color.red, color.green, color.blue],
            hex: srgb_to_hex(color),
            css: srgb_to_rgb_string(color),
        }
    }

    pub fn srgb(&self) -> Srgb<u8> {
        let [r, g, b] = self.rgb;
        Srgb::new(r, g, b)
    }

    pub fn is_black(&self) -> bool {
        self.rgb == [0, 0, 0]
    }
}

impl Default for SampledColor {
    fn default() -> Self {
        Self::from_srgb(FALLBACK_COLOR)
    }
}

/// Convert an Srgb<u8> to a lowercase `#rrggbb` string.
pub fn srgb_to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Convert an Srgb<u8> to a CSS `rgb(r, g, b)` string.
pub fn srgb_to_rgb_string(color: Srgb<u8>) -> String {
    format!("rgb({}, {}, {})", color.red, color.green, color.blue)
}

/// Convert Srgb<f32> (0.0-1.0) to Srgb<u8>, clamping out-of-range channels.
pub fn srgb_to_u8(color: Srgb<f32>) -> Srgb<u8> {
    Srgb::new(
        (color.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (color.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (color.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Convert Srgb<u8> to Srgb<f32>.
pub fn srgb_to_f32(color: Srgb<u8>) -> Srgb<f32> {
    color.into_format()
}

/// Euclidean distance between two colors in 0-255 RGB space.
///
/// The maximum value (black to white) is about 441.7.
pub fn color_distance(a: Srgb<u8>, b: Srgb<u8>) -> f32 {
    let dr = f32::from(a.red) - f32::from(b.red);
    let dg = f32::from(a.green) - f32::from(b.green);
    let db = f32::from(a.blue) - f32::from(b.blue);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Parse any CSS color string into Srgb<u8>.
///
/// Supports: hex (#RRGGBB), rgb(), hsl(), named colors, etc. Alpha is dropped.
pub fn parse_color(input: &str) -> Result<Srgb<u8>, String> {
    let css_color: CssColor = input
        .parse()
        .map_err(|e| format!("Invalid color '{}': {}", input, e))?;
    let [r, g, b, _a] = css_color.to_rgba8();
    Ok(Srgb::new(r, g, b))
}

/// Normalize a CSS color string to lowercase `#rrggbb`.
pub fn normalize_hex(input: &str) -> Result<String, String> {
    parse_color(input).map(srgb_to_hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_rgb_strings() {
        let c = SampledColor::from_srgb(Srgb::new(255, 16, 0));
        assert_eq!(c.hex, "#ff1000");
        assert_eq!(c.css, "rgb(255, 16, 0)");
        assert!(!c.is_black());
    }

    #[test]
    fn distance_black_white() {
        let d = color_distance(Srgb::new(0, 0, 0), Srgb::new(255, 255, 255));
        assert!((d - 441.67).abs() < 0.01);
    }

    #[test]
    fn normalize_accepts_css_forms() {
        assert_eq!(normalize_hex("#ABCDEF").unwrap(), "#abcdef");
        assert_eq!(normalize_hex("rgb(1, 2, 3)").unwrap(), "#010203");
        assert_eq!(normalize_hex("white").unwrap(), "#ffffff");
        assert!(normalize_hex("not-a-color").is_err());
    }
}
