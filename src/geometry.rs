//! Mapping between displayed-image coordinates and buffer space.
//!
//! Display coordinates are CSS-style pixels relative to the top-left corner
//! of the image's on-screen box. Buffer space is the image's natural
//! resolution. Sample point positions are stored as percentages of the
//! displayed box so they survive resizes.

use serde::{Deserialize, Serialize};

use crate::pixel_buffer::SampleError;

/// On-screen size of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when layout has produced a usable, finite area.
    pub fn is_ready(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    fn ensure_ready(&self) -> Result<(), SampleError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(SampleError::GeometryNotReady)
        }
    }
}

/// A point in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

impl DisplayPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &DisplayPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A position as a percentage (0-100) of the displayed width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percent {
    pub x: f32,
    pub y: f32,
}

impl Percent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Scale a display coordinate into buffer space.
///
/// The image is always shown at a locked aspect ratio, so each axis is a
/// plain linear scale.
pub fn to_buffer_space(
    display: DisplayPoint,
    rect: DisplayRect,
    buffer_width: u32,
    buffer_height: u32,
) -> Result<(f32, f32), SampleError> {
    rect.ensure_ready()?;
    Ok((
        display.x * (buffer_width as f32 / rect.width),
        display.y * (buffer_height as f32 / rect.height),
    ))
}

/// Convert a display coordinate to a percentage of the rect, clamped to 0-100.
pub fn to_percentage(display: DisplayPoint, rect: DisplayRect) -> Result<Percent, SampleError> {
    rect.ensure_ready()?;
    Ok(Percent {
        x: clamp_percent(display.x / rect.width * 100.0),
        y: clamp_percent(display.y / rect.height * 100.0),
    })
}

/// Convert a stored percentage back to display pixels for the given rect.
pub fn from_percentage(percent: Percent, rect: DisplayRect) -> DisplayPoint {
    DisplayPoint {
        x: percent.x / 100.0 * rect.width,
        y: percent.y / 100.0 * rect.height,
    }
}

/// Size an image to fit inside a viewport at its natural aspect ratio.
///
/// Images smaller than the viewport are shown at natural size.
pub fn fit_to_viewport(
    natural_width: u32,
    natural_height: u32,
    max_width: f32,
    max_height: f32,
) -> DisplayRect {
    if natural_width == 0 || natural_height == 0 {
        return DisplayRect::new(0.0, 0.0);
    }
    let (w, h) = (natural_width as f32, natural_height as f32);
    let scale = (max_width / w).min(max_height / h).min(1.0);
    DisplayRect::new(w * scale, h * scale)
}

fn clamp_percent(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}
