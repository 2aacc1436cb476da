//! The authoritative, ordered list of sample points.
//!
//! All transitions recompute from the current display rectangle rather than
//! applying deltas, so repeated moves never accumulate drift.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::SampledColor;
use crate::geometry::{DisplayPoint, DisplayRect, Percent, from_percentage, to_percentage};
use crate::pixel_buffer::{PixelBuffer, SampleError};
use crate::placement::{PlacedPoint, PlacementConfig, place_points};

/// Kind of input driving a drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputProfile {
    /// Mouse or pen
    #[default]
    Pointer,
    /// Finger on a touch screen
    Touch,
}

impl InputProfile {
    /// How far from a point's center a press still grabs it, in display pixels.
    pub fn hit_radius(self) -> f32 {
        match self {
            Self::Pointer => 12.0,
            Self::Touch => 24.0,
        }
    }
}

/// A marker on the image and the color under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Position as a percentage of the displayed image
    pub position: Percent,
    /// Color captured at the last sample
    pub color: SampledColor,
    /// Set only while the point is being dragged
    #[serde(default)]
    pub dragging: bool,
}

/// The image and its current on-screen size.
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a> {
    pub buffer: &'a PixelBuffer,
    pub rect: DisplayRect,
}

impl<'a> Surface<'a> {
    pub fn new(buffer: &'a PixelBuffer, rect: DisplayRect) -> Self {
        Self { buffer, rect }
    }
}

/// Result of a placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// This many points were placed
    Placed(usize),
    /// Nothing could be placed yet; retry after layout settles
    RetryLater,
}

/// Error type for store transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No point at this index
    IndexOutOfRange { index: usize, len: usize },
    /// Another point is already being dragged
    DragInProgress { active: usize },
    /// Sampling or geometry failure
    Sample(SampleError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Point {} out of range ({} points)", index, len)
            }
            Self::DragInProgress { active } => write!(f, "Point {} is already being dragged", active),
            Self::Sample(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<SampleError> for StoreError {
    fn from(e: SampleError) -> Self {
        Self::Sample(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveDrag {
    index: usize,
    profile: InputProfile,
}

/// Ordered sample points plus the single active drag, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplePointStore {
    points: Vec<SamplePoint>,
    #[serde(skip)]
    active: Option<ActiveDrag>,
}

impl SamplePointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point currently being dragged.
    pub fn active_index(&self) -> Option<usize> {
        self.active.map(|a| a.index)
    }

    /// Replace all points with `count` freshly placed ones.
    pub fn regenerate<R: Rng>(
        &mut self,
        count: usize,
        surface: Surface<'_>,
        config: &PlacementConfig,
        rng: &mut R,
    ) -> Result<PlacementOutcome, SampleError> {
        self.active = None;
        self.points.clear();
        if count == 0 {
            return Ok(PlacementOutcome::Placed(0));
        }
        ensure_buffer(surface)?;

        let placed = place_points(count, surface.rect, surface.buffer, &[], config, rng);
        self.append(&placed, surface.rect)
    }

    /// [`regenerate`](Self::regenerate), retried with a fixed backoff while
    /// nothing could be placed.
    pub fn regenerate_with_retry<R: Rng>(
        &mut self,
        count: usize,
        surface: Surface<'_>,
        config: &PlacementConfig,
        retries: u32,
        backoff: Duration,
        rng: &mut R,
    ) -> Result<PlacementOutcome, SampleError> {
        let mut outcome = self.regenerate(count, surface, config, rng)?;
        for attempt in 1..=retries {
            if outcome != PlacementOutcome::RetryLater {
                break;
            }
            debug!(attempt, ?backoff, "Retrying placement");
            std::thread::sleep(backoff);
            outcome = self.regenerate(count, surface, config, rng)?;
        }
        if outcome == PlacementOutcome::RetryLater {
            warn!(count, retries, "Could not place any sample points");
        }
        Ok(outcome)
    }

    /// Grow or shrink to `count` points.
    ///
    /// Growing appends newly placed points that keep clear of the existing
    /// ones; shrinking truncates from the end. Existing points never move.
    pub fn resize<R: Rng>(
        &mut self,
        count: usize,
        surface: Surface<'_>,
        config: &PlacementConfig,
        rng: &mut R,
    ) -> Result<PlacementOutcome, SampleError> {
        if count <= self.points.len() {
            self.points.truncate(count);
            if self.active.is_some_and(|a| a.index >= count) {
                self.active = None;
            }
            return Ok(PlacementOutcome::Placed(0));
        }
        ensure_buffer(surface)?;

        let existing: Vec<PlacedPoint> = self
            .points
            .iter()
            .map(|p| PlacedPoint {
                display: from_percentage(p.position, surface.rect),
                color: p.color.srgb(),
                jittered: false,
            })
            .collect();
        let placed = place_points(
            count - self.points.len(),
            surface.rect,
            surface.buffer,
            &existing,
            config,
            rng,
        );
        self.append(&placed, surface.rect)
    }

    fn append(
        &mut self,
        placed: &[PlacedPoint],
        rect: DisplayRect,
    ) -> Result<PlacementOutcome, SampleError> {
        if placed.is_empty() {
            debug!("Placement produced no points");
            return Ok(PlacementOutcome::RetryLater);
        }
        for p in placed {
            self.points.push(SamplePoint {
                position: to_percentage(p.display, rect)?,
                color: SampledColor::from_srgb(p.color),
                dragging: false,
            });
        }
        Ok(PlacementOutcome::Placed(placed.len()))
    }

    /// Index of the point under a press, preferring the nearest.
    pub fn point_at(
        &self,
        display: DisplayPoint,
        rect: DisplayRect,
        profile: InputProfile,
    ) -> Option<usize> {
        let radius = profile.hit_radius();
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, from_percentage(p.position, rect).distance(&display)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Mark a point as being dragged.
    ///
    /// Only one drag may be active; starting another is rejected until the
    /// first is finalized.
    pub fn begin_drag(&mut self, index: usize, profile: InputProfile) -> Result<(), StoreError> {
        self.check_index(index)?;
        if let Some(active) = self.active.filter(|a| a.index != index) {
            return Err(StoreError::DragInProgress {
                active: active.index,
            });
        }
        self.active = Some(ActiveDrag { index, profile });
        self.points[index].dragging = true;
        Ok(())
    }

    /// Move a point to a display position and resample its color.
    ///
    /// The position is clamped to the image and stored as a percentage. If
    /// the pixel cannot be read the previous color is kept. Moves from a
    /// different input profile than the one holding the active drag are
    /// rejected, which drops emulated mouse events during a touch drag.
    pub fn move_point(
        &mut self,
        index: usize,
        display: DisplayPoint,
        surface: Surface<'_>,
        profile: InputProfile,
    ) -> Result<&SamplePoint, StoreError> {
        self.check_index(index)?;
        if let Some(active) = self
            .active
            .filter(|a| a.index != index || a.profile != profile)
        {
            return Err(StoreError::DragInProgress {
                active: active.index,
            });
        }

        let position = to_percentage(display, surface.rect)?;
        let clamped = from_percentage(position, surface.rect);

        let point = &mut self.points[index];
        point.position = position;
        match surface.buffer.sample_display(clamped, surface.rect) {
            Ok(color) => point.color = SampledColor::from_srgb(color),
            Err(e) => warn!(index, error = %e, "Keeping previous color"),
        }
        Ok(&self.points[index])
    }

    /// Clear a point's dragging flag on pointer-up or touch-end.
    ///
    /// A release from a different input profile than the one holding the
    /// drag is rejected, so an emulated mouse-up cannot end a touch drag.
    /// Interrupted gestures go through [`cancel_drag`](Self::cancel_drag).
    pub fn finalize(&mut self, index: usize, profile: InputProfile) -> Result<(), StoreError> {
        self.check_index(index)?;
        if let Some(active) = self.active.filter(|a| a.index == index && a.profile != profile) {
            return Err(StoreError::DragInProgress {
                active: active.index,
            });
        }
        self.points[index].dragging = false;
        if self.active.is_some_and(|a| a.index == index) {
            self.active = None;
        }
        debug!(index, ?profile, "Drag finalized");
        Ok(())
    }

    /// Release every drag, e.g. on touch-cancel or blur.
    ///
    /// Clears all dragging flags, including ones restored from a saved store
    /// with no active drag behind them. Returns the active index, or else
    /// the first stale one.
    pub fn cancel_drag(&mut self) -> Option<usize> {
        let active = self.active.take().map(|a| a.index);
        let mut released = None;
        for (index, point) in self.points.iter_mut().enumerate() {
            if point.dragging {
                point.dragging = false;
                released.get_or_insert(index);
            }
        }
        active.or(released)
    }

    /// Resample every point at its stored position, e.g. after the image
    /// was replaced. Points that cannot be read keep their color.
    pub fn refresh_colors(&mut self, surface: Surface<'_>) {
        for (index, point) in self.points.iter_mut().enumerate() {
            let display = from_percentage(point.position, surface.rect);
            match surface.buffer.sample_display(display, surface.rect) {
                Ok(color) => point.color = SampledColor::from_srgb(color),
                Err(e) => warn!(index, error = %e, "Keeping previous color"),
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
        }
    }
}

fn ensure_buffer(surface: Surface<'_>) -> Result<(), SampleError> {
    if surface.buffer.is_ready() {
        Ok(())
    } else {
        Err(SampleError::NotReady)
    }
}
