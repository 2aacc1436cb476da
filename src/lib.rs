//! Sample color palettes from images.
//!
//! Sample points are placed over a displayed image, read back through a
//! [`pixel_buffer::PixelBuffer`] at the image's natural resolution, and kept
//! in sync with their position by a [`store::SamplePointStore`]. The sampled
//! colors can then be exported, turned into gradients, and saved.

pub mod cli;
pub mod color;
pub mod config;
pub mod export;
pub mod geometry;
pub mod gradient;
pub mod library;
pub mod logging;
pub mod persistence;
pub mod pixel_buffer;
pub mod placement;
pub mod store;
