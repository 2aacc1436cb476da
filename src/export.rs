//! Turning sample points into exportable text and images.
//!
//! Every function here is a pure transform over an ordered list of colors or
//! points; index order is preserved everywhere and numbering is 1-based to
//! match the markers drawn on the image.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::color::{FALLBACK_COLOR, parse_color, srgb_to_rgb_string};
use crate::library::{LibraryError, Palette, find_duplicate};
use crate::store::SamplePoint;

/// Text export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    /// One hex per line
    #[default]
    List,
    /// `:root` block of custom properties
    Css,
    /// Tailwind `theme.extend.colors` config
    Tailwind,
    /// Theme object for styled-components style libraries
    Theme,
    /// One `rgb()` per line
    Rgb,
    /// Raw sample points as JSON
    Json,
    /// Raw sample points as YAML
    Yaml,
}

/// Hex strings in point order.
pub fn to_color_list(points: &[SamplePoint]) -> Vec<String> {
    points.iter().map(|p| p.color.hex.clone()).collect()
}

/// `rgb(r, g, b)` strings in point order.
pub fn to_rgb_list(points: &[SamplePoint]) -> Vec<String> {
    points.iter().map(|p| p.color.css.clone()).collect()
}

/// `:root` block with one `--color-N` property per color.
pub fn to_css_variables(colors: &[String]) -> String {
    let mut out = String::from(":root {\n");
    for (i, color) in colors.iter().enumerate() {
        out.push_str(&format!("  --color-{}: {};\n", i + 1, color));
    }
    out.push_str("}\n");
    out
}

/// Tailwind config snippet exposing the colors as `palette-N`.
pub fn to_tailwind_config(colors: &[String]) -> String {
    let mut out = String::from(
        "module.exports = {\n  theme: {\n    extend: {\n      colors: {\n        palette: {\n",
    );
    for (i, color) in colors.iter().enumerate() {
        out.push_str(&format!("          {}: '{}',\n", i + 1, color));
    }
    out.push_str("        },\n      },\n    },\n  },\n};\n");
    out
}

/// Theme object snippet for CSS-in-JS libraries.
pub fn to_theme_object(colors: &[String]) -> String {
    let mut out = String::from("export const theme = {\n  colors: {\n");
    for (i, color) in colors.iter().enumerate() {
        out.push_str(&format!("    color{}: '{}',\n", i + 1, color));
    }
    out.push_str("  },\n};\n");
    out
}

/// Render sample points in a text format.
pub fn render_text(points: &[SamplePoint], format: TextFormat) -> Result<String, String> {
    let colors = to_color_list(points);
    let text = match format {
        TextFormat::List => lines(&colors),
        TextFormat::Rgb => lines(&to_rgb_list(points)),
        TextFormat::Css => to_css_variables(&colors),
        TextFormat::Tailwind => to_tailwind_config(&colors),
        TextFormat::Theme => to_theme_object(&colors),
        TextFormat::Json => serde_json::to_string_pretty(points)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string())?,
        TextFormat::Yaml => serde_yaml::to_string(points).map_err(|e| e.to_string())?,
    };
    Ok(text)
}

fn lines(items: &[String]) -> String {
    items.iter().map(|s| format!("{s}\n")).collect()
}

/// Wrap the current colors as a palette, checking for a saved duplicate.
///
/// Without a name the palette is called `Palette <n+1>`. An empty palette is
/// returned as-is; callers decide whether it is worth saving.
pub fn to_palette(
    points: &[SamplePoint],
    name: Option<&str>,
    saved: &[Palette],
) -> Result<Palette, LibraryError> {
    let name = match name {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => format!("Palette {}", saved.len() + 1),
    };
    let palette = Palette::new(name, to_color_list(points));
    if let Some(existing) = find_duplicate(saved, &palette) {
        return Err(LibraryError::DuplicatePalette(existing.name.clone()));
    }
    Ok(palette)
}

/// Palette as pretty JSON (`{ "name": ..., "colors": [...] }`).
pub fn palette_to_json(palette: &Palette) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(palette)
}

/// Height of the swatch strip image, in pixels.
pub const SWATCH_HEIGHT: u32 = 120;
/// Width of a single swatch, in pixels.
pub const SWATCH_WIDTH: u32 = 120;

/// Draw the colors as a horizontal strip of equal swatches.
pub fn render_swatches(colors: &[String]) -> RgbImage {
    let width = SWATCH_WIDTH * colors.len().max(1) as u32;
    let fills: Vec<Rgb<u8>> = colors
        .iter()
        .map(|c| {
            let rgb = parse_color(c).unwrap_or(FALLBACK_COLOR);
            Rgb([rgb.red, rgb.green, rgb.blue])
        })
        .collect();

    RgbImage::from_fn(width, SWATCH_HEIGHT, |x, _| {
        fills
            .get((x / SWATCH_WIDTH) as usize)
            .copied()
            .unwrap_or(Rgb([255, 255, 255]))
    })
}

/// Encode the swatch strip, picking PNG or JPEG from the path's extension.
pub fn write_swatch_image(colors: &[String], path: &Path) -> Result<(), image::ImageError> {
    let img = render_swatches(colors);
    img.save(path)?;
    debug!(path = %path.display(), swatches = colors.len(), "Wrote swatch image");
    Ok(())
}

/// Encode the swatch strip in memory.
pub fn encode_swatch_image(
    colors: &[String],
    format: ImageFormat,
) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    render_swatches(colors).write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

/// Flattened `rgb()` form of an arbitrary hex list.
pub fn hex_list_to_rgb(colors: &[String]) -> Vec<String> {
    colors
        .iter()
        .map(|c| srgb_to_rgb_string(parse_color(c).unwrap_or(FALLBACK_COLOR)))
        .collect()
}
