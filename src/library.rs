//! Saved palettes, gradients and colors.
//!
//! All three collections reject duplicates through the same structural
//! comparison of their ordered color sequence; names and labels are ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::color::normalize_hex;
use crate::gradient::{Gradient, GradientDirection, GradientError, GradientStop};

/// Error type for saved-collection operations.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    /// A palette with the same colors is already saved (holds its name)
    DuplicatePalette(String),
    /// A gradient with the same stops is already saved (holds its id)
    DuplicateGradient(u64),
    /// The color is already saved (holds its id)
    DuplicateColor(u64),
    /// No entry with this name or id
    NotFound(String),
    /// Color string could not be parsed
    InvalidColor(String),
}

impl std::fmt::Display for LibraryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicatePalette(name) => {
                write!(f, "This palette is already saved as '{}'", name)
            }
            Self::DuplicateGradient(id) => write!(f, "This gradient is already saved (#{})", id),
            Self::DuplicateColor(id) => write!(f, "This color is already saved (#{})", id),
            Self::NotFound(key) => write!(f, "Nothing saved under '{}'", key),
            Self::InvalidColor(s) => write!(f, "Invalid color: {}", s),
        }
    }
}

impl std::error::Error for LibraryError {}

/// Anything identified, for duplicate purposes, by an ordered list of colors.
pub trait ColorSequence {
    fn color_sequence(&self) -> Vec<String>;
}

/// Find an item whose color sequence equals the candidate's.
pub fn find_duplicate<'a, T: ColorSequence>(
    items: &'a [T],
    candidate: &impl ColorSequence,
) -> Option<&'a T> {
    let key = candidate.color_sequence();
    items.iter().find(|item| item.color_sequence() == key)
}

/// A named, ordered list of colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    /// Hex strings; order maps to numbered slots and gradient stops
    pub colors: Vec<String>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }
}

impl ColorSequence for Palette {
    fn color_sequence(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_lowercase()).collect()
    }
}

/// A gradient as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGradient {
    pub id: u64,
    pub colors: Vec<GradientStop>,
    pub direction: GradientDirection,
    pub label: String,
}

impl SavedGradient {
    /// Rebuild an editable gradient, checking the stop invariants.
    pub fn to_gradient(&self) -> Result<Gradient, GradientError> {
        Gradient::from_stops(self.colors.clone(), self.direction)
    }
}

impl ColorSequence for SavedGradient {
    fn color_sequence(&self) -> Vec<String> {
        stop_sequence(&self.colors)
    }
}

impl ColorSequence for Gradient {
    fn color_sequence(&self) -> Vec<String> {
        stop_sequence(self.stops())
    }
}

fn stop_sequence(stops: &[GradientStop]) -> Vec<String> {
    stops
        .iter()
        .map(|s| format!("{}@{:.2}", s.color.to_lowercase(), s.position))
        .collect()
}

/// A single saved color. `id` stays stable across reorders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedColorItem {
    pub id: u64,
    pub color: String,
    pub label: String,
}

impl ColorSequence for SavedColorItem {
    fn color_sequence(&self) -> Vec<String> {
        vec![self.color.to_lowercase()]
    }
}

/// The three saved collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    pub palettes: Vec<Palette>,
    pub gradients: Vec<SavedGradient>,
    pub colors: Vec<SavedColorItem>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Palette <n+1>` where n is the number of saved palettes.
    pub fn next_palette_name(&self) -> String {
        format!("Palette {}", self.palettes.len() + 1)
    }

    /// Save a palette unless one with the same colors exists.
    pub fn save_palette(&mut self, palette: Palette) -> Result<&Palette, LibraryError> {
        if let Some(existing) = find_duplicate(&self.palettes, &palette) {
            debug!(name = %palette.name, existing = %existing.name, "Duplicate palette rejected");
            return Err(LibraryError::DuplicatePalette(existing.name.clone()));
        }
        info!(name = %palette.name, colors = palette.colors.len(), "Saved palette");
        self.palettes.push(palette);
        Ok(&self.palettes[self.palettes.len() - 1])
    }

    /// Delete the first palette with this name.
    pub fn delete_palette(&mut self, name: &str) -> Result<Palette, LibraryError> {
        let index = self
            .palettes
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))?;
        Ok(self.palettes.remove(index))
    }

    /// Rename a palette, replacing its record.
    pub fn rename_palette(&mut self, name: &str, new_name: &str) -> Result<(), LibraryError> {
        let index = self
            .palettes
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))?;
        let colors = self.palettes[index].colors.clone();
        self.palettes[index] = Palette::new(new_name, colors);
        Ok(())
    }

    /// Save a gradient unless one with the same stops exists.
    pub fn save_gradient(
        &mut self,
        gradient: &Gradient,
        label: Option<String>,
    ) -> Result<&SavedGradient, LibraryError> {
        if let Some(existing) = find_duplicate(&self.gradients, gradient) {
            return Err(LibraryError::DuplicateGradient(existing.id));
        }
        let id = next_id(self.gradients.iter().map(|g| g.id));
        let label = label.unwrap_or_else(|| format!("Gradient {}", self.gradients.len() + 1));
        self.gradients.push(SavedGradient {
            id,
            colors: gradient.stops().to_vec(),
            direction: gradient.direction(),
            label,
        });
        info!(id, "Saved gradient");
        Ok(&self.gradients[self.gradients.len() - 1])
    }

    pub fn delete_gradient(&mut self, id: u64) -> Result<SavedGradient, LibraryError> {
        let index = self
            .gradients
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        Ok(self.gradients.remove(index))
    }

    /// Save a single color with a fresh id. The label defaults to the hex.
    pub fn add_color(
        &mut self,
        color: &str,
        label: Option<String>,
    ) -> Result<&SavedColorItem, LibraryError> {
        let color = normalize_hex(color).map_err(LibraryError::InvalidColor)?;
        let item = SavedColorItem {
            id: next_id(self.colors.iter().map(|c| c.id)),
            label: label.unwrap_or_else(|| color.clone()),
            color,
        };
        if let Some(existing) = find_duplicate(&self.colors, &item) {
            return Err(LibraryError::DuplicateColor(existing.id));
        }
        self.colors.push(item);
        Ok(&self.colors[self.colors.len() - 1])
    }

    pub fn delete_color(&mut self, id: u64) -> Result<SavedColorItem, LibraryError> {
        let index = self.color_index(id)?;
        Ok(self.colors.remove(index))
    }

    pub fn relabel_color(&mut self, id: u64, label: &str) -> Result<(), LibraryError> {
        let index = self.color_index(id)?;
        self.colors[index].label = label.to_string();
        Ok(())
    }

    /// Move the color with `id` to position `to` (clamped), keeping every id.
    pub fn move_color(&mut self, id: u64, to: usize) -> Result<(), LibraryError> {
        let from = self.color_index(id)?;
        let item = self.colors.remove(from);
        let to = to.min(self.colors.len());
        self.colors.insert(to, item);
        Ok(())
    }

    fn color_index(&self, id: u64) -> Result<usize, LibraryError> {
        self.colors
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))
    }
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |m| m + 1)
}
