//! TOML configuration with layered overrides.
//!
//! Effective settings are built from the built-in defaults, then an optional
//! TOML file, then whatever was set explicitly on the command line.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::placement::PlacementConfig;

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading/writing file
    Io(std::io::Error),
    /// TOML parsing error
    Parse(toml::de::Error),
    /// TOML serialization error
    Serialize(toml::ser::Error),
    /// Layered extraction error
    Extract(Box<figment::Error>),
    /// A setting is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "TOML parse error: {}", e),
            Self::Serialize(e) => write!(f, "TOML serialize error: {}", e),
            Self::Extract(e) => write!(f, "Configuration error: {}", e),
            Self::Invalid(s) => write!(f, "Invalid setting: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialize(e)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Extract(Box::new(e))
    }
}

/// Root configuration structure for TOML files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuepickConfig {
    /// How many points to sample and how to retry
    pub sampling: SamplingConfig,
    /// Spacing and color constraints for placement
    pub placement: PlacementConfig,
    /// Size the image is displayed at
    pub display: DisplayConfig,
    /// Where saved collections live
    pub storage: StorageConfig,
}

/// Sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Number of sample points
    pub count: usize,
    /// RNG seed; random when absent
    pub seed: Option<u64>,
    /// Placement attempts when nothing could be placed
    pub placement_retries: u32,
    /// Delay between placement attempts, in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            count: 5,
            seed: None,
            placement_retries: 3,
            retry_backoff_ms: 100,
        }
    }
}

/// Viewport the image is fitted into, in display pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: 800.0,
            max_height: 600.0,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding saved palettes, gradients and colors
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("huepick.json"),
        }
    }
}

/// Explicitly set values that override the file and defaults.
///
/// Unset fields are skipped when serialized so they don't mask lower layers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    pub sampling: SamplingOverrides,
    pub placement: PlacementOverrides,
    pub display: DisplayOverrides,
    pub storage: StorageOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SamplingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlacementOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_distance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_color_distance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl HuepickConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Merge defaults, an optional TOML file, and explicit overrides.
    ///
    /// A file that was asked for but doesn't exist is an error.
    pub fn layered(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            if !path.is_file() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file {} not found", path.display()),
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let config: Self = figment.merge(Serialized::defaults(overrides)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no placement could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.placement;
        let finite_positive = |v: f32| v.is_finite() && v > 0.0;
        if !(finite_positive(self.display.max_width) && finite_positive(self.display.max_height)) {
            return Err(ConfigError::Invalid(
                "display size must be positive".to_string(),
            ));
        }
        // Jitter draws radii up to twice the spacing, which must stay finite
        let usable = |v: f32| v >= 0.0 && (v * 2.0 + 1.0).is_finite();
        if !(usable(p.min_distance) && usable(p.min_color_distance)) {
            return Err(ConfigError::Invalid(
                "placement distances must be finite and not negative".to_string(),
            ));
        }
        if !(0.0..50.0).contains(&p.edge_buffer) {
            return Err(ConfigError::Invalid(
                "edge_buffer must be within 0-50 percent".to_string(),
            ));
        }
        Ok(())
    }
}
