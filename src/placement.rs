//! Rejection-sampled placement of sample points.
//!
//! Candidates are drawn uniformly inside the displayed image minus an edge
//! buffer. A candidate is accepted when it keeps `min_distance` from every
//! other point, does not sample pure black, and its color is at least
//! `min_color_distance` away from every accepted color. When the attempt
//! budget runs out, the remaining slots are filled by jittering copies of
//! accepted points; those only honour the distance constraint.

use std::collections::HashMap;
use std::f32::consts::TAU;

use palette::Srgb;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[cfg(debug_assertions)]
use tracing::instrument;

use crate::color::{FALLBACK_COLOR, color_distance};
use crate::geometry::{DisplayPoint, DisplayRect};
use crate::pixel_buffer::PixelBuffer;

const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);

/// Placement constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Minimum distance between points, in display pixels
    pub min_distance: f32,
    /// Minimum Euclidean RGB distance between colors in the primary phase
    pub min_color_distance: f32,
    /// Candidate budget for the primary phase
    pub max_attempts: u32,
    /// Tries per slot in the jitter fallback
    pub jitter_retries: u32,
    /// Margin kept free on every side, as a percentage of the displayed size
    pub edge_buffer: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            min_distance: 40.0,
            min_color_distance: 30.0,
            max_attempts: 200,
            jitter_retries: 20,
            edge_buffer: 5.0,
        }
    }
}

/// A placed point in display space with the color under it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPoint {
    pub display: DisplayPoint,
    pub color: Srgb<u8>,
    /// Produced by the jitter fallback rather than the primary phase
    pub jittered: bool,
}

/// Uniform grid keyed by cell, used to find neighbours without a full scan.
struct SpatialGrid {
    cell: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    fn new(cell: f32) -> Self {
        Self {
            cell: cell.max(1.0),
            cells: HashMap::new(),
        }
    }

    fn key(&self, p: DisplayPoint) -> (i32, i32) {
        ((p.x / self.cell).floor() as i32, (p.y / self.cell).floor() as i32)
    }

    fn insert(&mut self, index: usize, p: DisplayPoint) {
        self.cells.entry(self.key(p)).or_default().push(index);
    }

    /// Indices in the candidate's cell and the eight cells around it.
    fn neighbours(&self, p: DisplayPoint) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.key(p);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
            .filter_map(|k| self.cells.get(&k))
            .flatten()
            .copied()
    }

    /// True if no indexed point lies closer than `min_distance`.
    ///
    /// Exact only while `min_distance` does not exceed the cell size, which
    /// holds because the grid is built with `cell = min_distance`.
    fn is_clear(&self, p: DisplayPoint, points: &[PlacedPoint], min_distance: f32) -> bool {
        self.neighbours(p)
            .all(|i| points[i].display.distance(&p) >= min_distance)
    }
}

/// The area candidates may be drawn from.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
}

impl Bounds {
    fn inset(rect: DisplayRect, edge_buffer: f32) -> Option<Self> {
        if !rect.is_ready() || !edge_buffer.is_finite() {
            return None;
        }
        let bx = rect.width * edge_buffer.clamp(0.0, 49.0) / 100.0;
        let by = rect.height * edge_buffer.clamp(0.0, 49.0) / 100.0;
        let bounds = Self {
            x0: bx,
            x1: rect.width - bx,
            y0: by,
            y1: rect.height - by,
        };
        // Less than a display pixel to work with: nothing meaningful to place
        if bounds.x1 - bounds.x0 < 1.0 || bounds.y1 - bounds.y0 < 1.0 {
            return None;
        }
        Some(bounds)
    }

    fn random<R: Rng>(&self, rng: &mut R) -> DisplayPoint {
        DisplayPoint::new(rng.gen_range(self.x0..=self.x1), rng.gen_range(self.y0..=self.y1))
    }

    fn clamp(&self, p: DisplayPoint) -> DisplayPoint {
        DisplayPoint::new(p.x.clamp(self.x0, self.x1), p.y.clamp(self.y0, self.y1))
    }
}

/// Place `count` new points, keeping clear of `existing` ones.
///
/// Returns only the new points. An empty result means nothing acceptable
/// was found (zero-sized layout, a degenerate image, or an image that is
/// entirely black); the caller should retry once layout has settled.
/// Otherwise exactly `count` points are returned.
#[cfg_attr(
    debug_assertions,
    instrument(skip(buffer, existing, config, rng), fields(existing = existing.len()))
)]
pub fn place_points<R: Rng>(
    count: usize,
    rect: DisplayRect,
    buffer: &PixelBuffer,
    existing: &[PlacedPoint],
    config: &PlacementConfig,
    rng: &mut R,
) -> Vec<PlacedPoint> {
    if count == 0 {
        return Vec::new();
    }
    let Some(bounds) = Bounds::inset(rect, config.edge_buffer) else {
        debug!(?rect, "No usable area for placement");
        return Vec::new();
    };

    let min_distance = config.min_distance.max(0.0);
    // The jitter radius reaches up to twice the spacing
    if !(min_distance * 2.0 + 1.0).is_finite() {
        warn!(min_distance, "Minimum distance is not a usable number");
        return Vec::new();
    }
    let mut points: Vec<PlacedPoint> = existing.to_vec();
    let mut grid = SpatialGrid::new(min_distance);
    for (i, p) in points.iter().enumerate() {
        grid.insert(i, p.display);
    }
    let target = existing.len() + count;

    // Primary phase
    let mut attempts = 0;
    while points.len() < target && attempts < config.max_attempts {
        attempts += 1;
        let candidate = bounds.random(rng);
        if !grid.is_clear(candidate, &points, min_distance) {
            continue;
        }
        let color = sample(buffer, rect, candidate);
        if color == BLACK {
            continue;
        }
        if points
            .iter()
            .any(|p| color_distance(p.color, color) < config.min_color_distance)
        {
            continue;
        }
        grid.insert(points.len(), candidate);
        points.push(PlacedPoint {
            display: candidate,
            color,
            jittered: false,
        });
    }

    let primary = points.len() - existing.len();
    debug!(primary, attempts, "Primary placement finished");

    if points.is_empty() {
        debug!("No acceptable candidate found");
        return Vec::new();
    }

    // Jitter fallback
    while points.len() < target {
        let candidate = jitter_candidate(&points, &grid, bounds, min_distance, config, rng);
        let color = sample(buffer, rect, candidate);
        grid.insert(points.len(), candidate);
        points.push(PlacedPoint {
            display: candidate,
            color,
            jittered: true,
        });
    }

    if primary < count {
        debug!(jittered = count - primary, "Filled remaining slots by jitter");
    }

    points.split_off(existing.len())
}

/// Offset a random accepted point until it clears `min_distance`.
///
/// When every retry collides, the best-spaced try is used so the caller still
/// receives a full set.
fn jitter_candidate<R: Rng>(
    points: &[PlacedPoint],
    grid: &SpatialGrid,
    bounds: Bounds,
    min_distance: f32,
    config: &PlacementConfig,
    rng: &mut R,
) -> DisplayPoint {
    let mut best: Option<(DisplayPoint, f32)> = None;

    for _ in 0..config.jitter_retries.max(1) {
        let anchor = points[rng.gen_range(0..points.len())].display;
        let angle = rng.gen_range(0.0..TAU);
        let radius = rng.gen_range(min_distance..=min_distance * 2.0 + 1.0);
        let candidate = bounds.clamp(DisplayPoint::new(
            anchor.x + angle.cos() * radius,
            anchor.y + angle.sin() * radius,
        ));

        if grid.is_clear(candidate, points, min_distance) {
            return candidate;
        }

        let nearest = points
            .iter()
            .map(|p| p.display.distance(&candidate))
            .fold(f32::INFINITY, f32::min);
        if best.is_none_or(|(_, d)| nearest > d) {
            best = Some((candidate, nearest));
        }
    }

    debug!(min_distance, "Jitter retries exhausted, using best-spaced candidate");
    best.map(|(p, _)| p).unwrap_or_else(|| bounds.random(rng))
}

fn sample(buffer: &PixelBuffer, rect: DisplayRect, p: DisplayPoint) -> Srgb<u8> {
    buffer.sample_display(p, rect).unwrap_or_else(|e| {
        warn!(x = p.x, y = p.y, error = %e, "Sampling failed during placement");
        FALLBACK_COLOR
    })
}
