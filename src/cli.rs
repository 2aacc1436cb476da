//! CLI argument parsing.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};

use crate::config::{
    ConfigOverrides, DisplayOverrides, PlacementOverrides, SamplingOverrides, StorageOverrides,
};
use crate::export::TextFormat;
use crate::geometry::DisplayPoint;
use crate::gradient::GradientDirection;

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// One hex color per line
    #[default]
    List,
    /// CSS custom properties
    Css,
    /// Tailwind color config
    Tailwind,
    /// CSS-in-JS theme object
    Theme,
    /// One rgb() color per line
    Rgb,
    /// Sample points as JSON
    Json,
    /// Sample points as YAML
    Yaml,
}

impl From<FormatArg> for TextFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::List => TextFormat::List,
            FormatArg::Css => TextFormat::Css,
            FormatArg::Tailwind => TextFormat::Tailwind,
            FormatArg::Theme => TextFormat::Theme,
            FormatArg::Rgb => TextFormat::Rgb,
            FormatArg::Json => TextFormat::Json,
            FormatArg::Yaml => TextFormat::Yaml,
        }
    }
}

/// Move a point by index: `INDEX:X,Y` in display pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveArg {
    pub index: usize,
    pub to: DisplayPoint,
}

impl FromStr for MoveArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, to) = s
            .split_once(':')
            .ok_or_else(|| format!("expected INDEX:X,Y, got '{}'", s))?;
        let index = index
            .trim()
            .parse()
            .map_err(|e| format!("invalid index '{}': {}", index, e))?;
        Ok(Self {
            index,
            to: parse_point(to)?,
        })
    }
}

/// Drag whatever point is under `FROM` to `TO`: `X,Y:X,Y` in display pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragArg {
    pub from: DisplayPoint,
    pub to: DisplayPoint,
}

impl FromStr for DragArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| format!("expected X,Y:X,Y, got '{}'", s))?;
        Ok(Self {
            from: parse_point(from)?,
            to: parse_point(to)?,
        })
    }
}

fn parse_point(s: &str) -> Result<DisplayPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x: f32 = x
        .trim()
        .parse()
        .map_err(|e| format!("invalid x '{}': {}", x, e))?;
    let y: f32 = y
        .trim()
        .parse()
        .map_err(|e| format!("invalid y '{}': {}", y, e))?;
    Ok(DisplayPoint::new(x, y))
}

/// Sample color palettes from an image.
#[derive(Parser, Debug)]
#[command(name = "huepick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// PNG or JPEG image to sample
    #[arg(required_unless_present_any = ["list_palettes", "delete_palette", "completions", "save_config"])]
    pub image: Option<PathBuf>,

    /// Number of sample points (default 5)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Seed for point placement (random if not set)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Grow or shrink to this many points after placement, keeping existing ones
    #[arg(long, value_name = "COUNT")]
    pub resize: Option<usize>,

    /// Minimum distance between points, in display pixels (default 40)
    #[arg(long)]
    pub min_distance: Option<f32>,

    /// Minimum RGB distance between sampled colors (default 30)
    #[arg(long)]
    pub min_color_distance: Option<f32>,

    /// Candidate budget for placement (default 200)
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Width of the viewport the image is fitted into (default 800)
    #[arg(long)]
    pub max_width: Option<f32>,

    /// Height of the viewport the image is fitted into (default 600)
    #[arg(long)]
    pub max_height: Option<f32>,

    /// Move a point: INDEX:X,Y in display pixels (repeatable)
    #[arg(long = "move", value_name = "INDEX:X,Y", allow_hyphen_values = true)]
    pub moves: Vec<MoveArg>,

    /// Drag the point under FROM to TO: X,Y:X,Y in display pixels (repeatable)
    #[arg(long = "drag", value_name = "X,Y:X,Y", allow_hyphen_values = true)]
    pub drags: Vec<DragArg>,

    /// Treat moves and drags as touch input (larger grab radius)
    #[arg(long)]
    pub touch: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::List)]
    pub format: FormatArg,

    /// Print a CSS linear-gradient through the sampled colors instead
    #[arg(long)]
    pub gradient: bool,

    /// Gradient direction, e.g. "to right" or "135deg"
    #[arg(long, default_value = "to right")]
    pub direction: GradientDirection,

    /// Save the sampled colors as a palette
    #[arg(long)]
    pub save: bool,

    /// Palette name (default: "Palette N")
    #[arg(long)]
    pub name: Option<String>,

    /// Save the gradient through the sampled colors
    #[arg(long)]
    pub save_gradient: bool,

    /// Save each sampled color individually
    #[arg(long)]
    pub save_colors: bool,

    /// Write the palette as a swatch image (PNG or JPEG by extension)
    #[arg(long, value_name = "FILE")]
    pub swatch: Option<PathBuf>,

    /// Write the palette as JSON
    #[arg(long, value_name = "FILE")]
    pub palette_json: Option<PathBuf>,

    /// List saved palettes
    #[arg(long)]
    pub list_palettes: bool,

    /// Delete the saved palette with this name
    #[arg(long, value_name = "NAME")]
    pub delete_palette: Option<String>,

    /// Store file for saved palettes, gradients and colors (default: huepick.json)
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Load configuration from TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save current configuration to TOML file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Log file path (logs to stderr if not set)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Generate shell completions for the specified shell
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

impl Cli {
    /// Collect explicitly set flags for layering over the config file.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            sampling: SamplingOverrides {
                count: self.count,
                seed: self.seed,
            },
            placement: PlacementOverrides {
                min_distance: self.min_distance,
                min_color_distance: self.min_color_distance,
                max_attempts: self.max_attempts,
            },
            display: DisplayOverrides {
                max_width: self.max_width,
                max_height: self.max_height,
            },
            storage: StorageOverrides {
                path: self.store.clone(),
            },
        }
    }
}
