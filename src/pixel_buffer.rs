//! Off-screen RGB buffer at an image's natural resolution.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use palette::Srgb;
use tracing::{debug, warn};

use crate::color::FALLBACK_COLOR;
use crate::geometry::{DisplayPoint, DisplayRect, to_buffer_space};

/// Error type for sampling and geometry queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    /// Queried before an image was loaded (the buffer has zero area)
    NotReady,
    /// Pixel data could not be decoded or read
    SampleUnavailable(String),
    /// The displayed image has no on-screen area yet
    GeometryNotReady,
}

impl std::fmt::Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "No image loaded"),
            Self::SampleUnavailable(s) => write!(f, "Sample unavailable: {}", s),
            Self::GeometryNotReady => write!(f, "Display geometry is zero-sized"),
        }
    }
}

impl std::error::Error for SampleError {}

/// Readable RGB grid of a loaded image.
///
/// Written once by [`PixelBuffer::load`] and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PixelBuffer {
    pixels: Vec<[u8; 3]>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create an empty buffer. Every query fails with `NotReady` until loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an image file and load it.
    pub fn open(path: &Path) -> Result<Self, SampleError> {
        let img = image::open(path).map_err(|e| {
            SampleError::SampleUnavailable(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self::from_image(&img))
    }

    /// Decode an in-memory PNG/JPEG and load it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SampleError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| SampleError::SampleUnavailable(format!("Unable to decode image: {e}")))?;
        Ok(Self::from_image(&img))
    }

    pub fn from_image(img: &DynamicImage) -> Self {
        let mut buffer = Self::new();
        buffer.load(img);
        buffer
    }

    /// Copy a decoded image into the buffer at its natural size.
    ///
    /// Fully transparent pixels read as black. Any other pixel keeps its
    /// straight RGB regardless of alpha.
    pub fn load(&mut self, img: &DynamicImage) {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        self.pixels = rgba
            .pixels()
            .map(|p| match p.0 {
                [_, _, _, 0] => [0, 0, 0],
                [r, g, b, _] => [r, g, b],
            })
            .collect();
        self.width = width;
        self.height = height;

        debug!(width, height, "Loaded pixel buffer");
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// RGB at a buffer-space coordinate, clamped into the image bounds.
    ///
    /// Any input is accepted: out-of-range and non-finite coordinates are
    /// clamped to the nearest edge (NaN maps to 0).
    pub fn sample_at(&self, px: f32, py: f32) -> Result<Srgb<u8>, SampleError> {
        if !self.is_ready() {
            return Err(SampleError::NotReady);
        }

        let x = clamp_index(px, self.width);
        let y = clamp_index(py, self.height);
        let idx = y as usize * self.width as usize + x as usize;

        let [r, g, b] = self
            .pixels
            .get(idx)
            .copied()
            .ok_or_else(|| SampleError::SampleUnavailable(format!("pixel ({x}, {y}) missing")))?;
        Ok(Srgb::new(r, g, b))
    }

    /// Sample the pixel under a display-space point of the shown image.
    pub fn sample_display(
        &self,
        point: DisplayPoint,
        rect: DisplayRect,
    ) -> Result<Srgb<u8>, SampleError> {
        let (bx, by) = to_buffer_space(point, rect, self.width, self.height)?;
        self.sample_at(bx, by)
    }

    /// Like [`sample_at`](Self::sample_at), resolving any error to the
    /// fallback color and logging it.
    pub fn sample_or_default(&self, px: f32, py: f32) -> Srgb<u8> {
        self.sample_at(px, py).unwrap_or_else(|e| {
            warn!(px, py, error = %e, "Sampling failed, using fallback color");
            FALLBACK_COLOR
        })
    }
}

fn clamp_index(v: f32, len: u32) -> u32 {
    let max = (len - 1) as f32;
    // `as` saturates and maps NaN to 0
    v.floor().clamp(0.0, max) as u32
}
