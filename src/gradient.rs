//! Linear gradients built from palette colors.

use std::fmt;
use std::str::FromStr;

use float_cmp::approx_eq;
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::color::{FALLBACK_COLOR, normalize_hex, parse_color, srgb_to_f32, srgb_to_u8};

/// Minimum separation between neighbouring stops, in percent.
pub const MIN_STOP_GAP: f32 = 1.0;

/// Error type for gradient edits.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientError {
    /// A gradient needs at least one color
    Empty,
    /// No stop at this index
    IndexOutOfRange(usize),
    /// First and last stops cannot be removed
    ProtectedStop(usize),
    /// Stop would sit closer than `MIN_STOP_GAP` to a neighbour or outside 0-100
    StopTooClose(f32),
    /// Color string could not be parsed
    InvalidColor(String),
}

impl fmt::Display for GradientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Gradient has no colors"),
            Self::IndexOutOfRange(i) => write!(f, "No gradient stop at index {}", i),
            Self::ProtectedStop(i) => write!(f, "Stop {} is an end stop and cannot be removed", i),
            Self::StopTooClose(p) => write!(f, "No room for a stop at {}%", p),
            Self::InvalidColor(s) => write!(f, "Invalid color: {}", s),
        }
    }
}

impl std::error::Error for GradientError {}

/// A color at a position (0-100) along the gradient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Lowercase `#rrggbb`
    pub color: String,
    pub position: f32,
}

/// CSS `linear-gradient` direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GradientDirection {
    #[default]
    ToRight,
    ToLeft,
    ToBottom,
    ToTop,
    ToBottomRight,
    ToBottomLeft,
    ToTopRight,
    ToTopLeft,
    /// Angle in degrees
    Angle(f32),
}

impl fmt::Display for GradientDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToRight => write!(f, "to right"),
            Self::ToLeft => write!(f, "to left"),
            Self::ToBottom => write!(f, "to bottom"),
            Self::ToTop => write!(f, "to top"),
            Self::ToBottomRight => write!(f, "to bottom right"),
            Self::ToBottomLeft => write!(f, "to bottom left"),
            Self::ToTopRight => write!(f, "to top right"),
            Self::ToTopLeft => write!(f, "to top left"),
            Self::Angle(deg) => write!(f, "{}deg", format_number(*deg)),
        }
    }
}

impl FromStr for GradientDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let direction = match normalized.as_str() {
            "to right" => Self::ToRight,
            "to left" => Self::ToLeft,
            "to bottom" => Self::ToBottom,
            "to top" => Self::ToTop,
            "to bottom right" | "to right bottom" => Self::ToBottomRight,
            "to bottom left" | "to left bottom" => Self::ToBottomLeft,
            "to top right" | "to right top" => Self::ToTopRight,
            "to top left" | "to left top" => Self::ToTopLeft,
            other => {
                let deg = other
                    .strip_suffix("deg")
                    .and_then(|d| d.trim().parse::<f32>().ok())
                    .filter(|d| d.is_finite())
                    .ok_or_else(|| format!("Invalid gradient direction '{}'", s))?;
                Self::Angle(deg)
            }
        };
        Ok(direction)
    }
}

impl From<GradientDirection> for String {
    fn from(d: GradientDirection) -> Self {
        d.to_string()
    }
}

impl TryFrom<String> for GradientDirection {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// An editable gradient.
///
/// Invariants: at least two stops, positions within 0-100, strictly
/// increasing with at least `MIN_STOP_GAP` between neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<GradientStop>,
    direction: GradientDirection,
}

impl Gradient {
    /// Spread colors evenly from 0% to 100%.
    ///
    /// A single color becomes a flat gradient with stops at both ends.
    pub fn from_colors(
        colors: &[String],
        direction: GradientDirection,
    ) -> Result<Self, GradientError> {
        let colors: Vec<String> = colors
            .iter()
            .map(|c| normalize_hex(c).map_err(GradientError::InvalidColor))
            .collect::<Result<_, _>>()?;

        let stops = match colors.as_slice() {
            [] => return Err(GradientError::Empty),
            [only] => vec![
                GradientStop {
                    color: only.clone(),
                    position: 0.0,
                },
                GradientStop {
                    color: only.clone(),
                    position: 100.0,
                },
            ],
            many => {
                let last = (many.len() - 1) as f32;
                many.iter()
                    .enumerate()
                    .map(|(i, color)| GradientStop {
                        color: color.clone(),
                        position: i as f32 / last * 100.0,
                    })
                    .collect()
            }
        };

        Self::from_stops(stops, direction)
    }

    /// Build from explicit stops, checking the invariants.
    pub fn from_stops(
        stops: Vec<GradientStop>,
        direction: GradientDirection,
    ) -> Result<Self, GradientError> {
        if stops.is_empty() {
            return Err(GradientError::Empty);
        }
        if stops.len() < 2 {
            return Err(GradientError::StopTooClose(stops[0].position));
        }
        for stop in &stops {
            if !(0.0..=100.0).contains(&stop.position) {
                return Err(GradientError::StopTooClose(stop.position));
            }
        }
        for pair in stops.windows(2) {
            if !far_enough(pair[0].position, pair[1].position) {
                return Err(GradientError::StopTooClose(pair[1].position));
            }
        }
        Ok(Self { stops, direction })
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn direction(&self) -> GradientDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: GradientDirection) {
        self.direction = direction;
    }

    /// Insert a stop between the end stops. Returns its index.
    pub fn add_stop(&mut self, color: &str, position: f32) -> Result<usize, GradientError> {
        let color = normalize_hex(color).map_err(GradientError::InvalidColor)?;
        let index = self.stops.partition_point(|s| s.position < position);
        if index == 0 || index == self.stops.len() {
            return Err(GradientError::StopTooClose(position));
        }
        if !far_enough(self.stops[index - 1].position, position)
            || !far_enough(position, self.stops[index].position)
        {
            return Err(GradientError::StopTooClose(position));
        }
        self.stops.insert(index, GradientStop { color, position });
        Ok(index)
    }

    /// Move a stop, clamped so it keeps `MIN_STOP_GAP` from its neighbours.
    ///
    /// Stops never pass each other. A stop squeezed between neighbours with
    /// no room left stays where it is. Returns the position actually applied.
    pub fn move_stop(&mut self, index: usize, position: f32) -> Result<f32, GradientError> {
        if index >= self.stops.len() {
            return Err(GradientError::IndexOutOfRange(index));
        }
        let lower = match index {
            0 => 0.0,
            i => self.stops[i - 1].position + MIN_STOP_GAP,
        };
        let upper = match self.stops.get(index + 1) {
            Some(next) => next.position - MIN_STOP_GAP,
            None => 100.0,
        };
        let current = self.stops[index].position;
        let applied = if position.is_nan() || lower > upper {
            current
        } else {
            position.clamp(lower, upper)
        };
        self.stops[index].position = applied;
        Ok(applied)
    }

    pub fn set_color(&mut self, index: usize, color: &str) -> Result<(), GradientError> {
        let color = normalize_hex(color).map_err(GradientError::InvalidColor)?;
        let stop = self
            .stops
            .get_mut(index)
            .ok_or(GradientError::IndexOutOfRange(index))?;
        stop.color = color;
        Ok(())
    }

    /// Remove an inner stop. End stops are protected.
    pub fn remove_stop(&mut self, index: usize) -> Result<GradientStop, GradientError> {
        if index >= self.stops.len() {
            return Err(GradientError::IndexOutOfRange(index));
        }
        if index == 0 || index == self.stops.len() - 1 {
            return Err(GradientError::ProtectedStop(index));
        }
        Ok(self.stops.remove(index))
    }

    /// Color at `position` percent, interpolated in sRGB like CSS does.
    pub fn color_at(&self, position: f32) -> Srgb<u8> {
        let stop_color = |s: &GradientStop| parse_color(&s.color).unwrap_or(FALLBACK_COLOR);

        let next = self.stops.partition_point(|s| s.position <= position);
        if next == 0 {
            return stop_color(&self.stops[0]);
        }
        if next == self.stops.len() {
            return stop_color(&self.stops[next - 1]);
        }

        let (a, b) = (&self.stops[next - 1], &self.stops[next]);
        let t = (position - a.position) / (b.position - a.position);
        let (ca, cb) = (srgb_to_f32(stop_color(a)), srgb_to_f32(stop_color(b)));
        let lerp = |x: f32, y: f32| x + (y - x) * t;
        srgb_to_u8(Srgb::new(
            lerp(ca.red, cb.red),
            lerp(ca.green, cb.green),
            lerp(ca.blue, cb.blue),
        ))
    }

    /// CSS `linear-gradient(...)` value.
    pub fn to_css(&self) -> String {
        let stops: Vec<String> = self
            .stops
            .iter()
            .map(|s| format!("{} {}%", s.color, format_number(s.position)))
            .collect();
        format!("linear-gradient({}, {})", self.direction, stops.join(", "))
    }
}

fn far_enough(a: f32, b: f32) -> bool {
    let gap = b - a;
    gap >= MIN_STOP_GAP || approx_eq!(f32, gap, MIN_STOP_GAP, epsilon = 1e-4)
}

/// Up to two decimals, without trailing zeros.
fn format_number(v: f32) -> String {
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
