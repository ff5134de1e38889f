//! Scalar to RGBA lookup table.

use thiserror::Error;

use crate::geom::Rgba;

pub const DEFAULT_STEPS: usize = 1000;

/// Dark blue.
pub const STOP_LOW: Rgba = [0.0, 0.0, 0.5, 1.0];
/// Purple.
pub const STOP_MID: Rgba = [0.5, 0.0, 0.5, 1.0];
/// Olive.
pub const STOP_HIGH: Rgba = [0.5, 0.5, 0.0, 1.0];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColormapError {
    #[error("colormap needs at least 2 steps, got {0}")]
    TooFewSteps(usize),
    #[error("colormap domain [{min}, {max}] is empty or not finite")]
    EmptyDomain { min: f64, max: f64 },
}

/// Three-stop piecewise-linear gradient sampled into a fixed table.
///
/// Lookups never fail: values outside `[min_value, max_value]` saturate to
/// the first or last entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    min_value: f64,
    max_value: f64,
    table: Vec<Rgba>,
}

impl Colormap {
    /// Builds the table. The lower half `[0, steps / 2)` runs from
    /// [`STOP_LOW`] to [`STOP_MID`], the rest from [`STOP_MID`] to
    /// [`STOP_HIGH`]; each half hits both of its stops exactly.
    ///
    /// With an even `steps` both halves hold `steps / 2` entries and entry
    /// `i` of a half sits at `i / (steps / 2 - 1)` along it, the classic
    /// viridian table. An odd count gives the upper half the extra entry
    /// rather than extrapolating past a stop.
    pub fn build(min_value: f64, max_value: f64, steps: usize) -> Result<Self, ColormapError> {
        if steps < 2 {
            return Err(ColormapError::TooFewSteps(steps));
        }
        if !(min_value.is_finite() && max_value.is_finite()) || max_value <= min_value {
            return Err(ColormapError::EmptyDomain {
                min: min_value,
                max: max_value,
            });
        }

        let lower = steps / 2;
        let upper = steps - lower;

        let mut table = Vec::with_capacity(steps);
        table.extend((0..lower).map(|i| mix(STOP_LOW, STOP_MID, half_position(i, lower))));
        table.extend((0..upper).map(|i| mix(STOP_MID, STOP_HIGH, half_position(i, upper))));

        Ok(Self {
            min_value,
            max_value,
            table,
        })
    }

    /// The default 1000-step map over `[min_value, max_value]`.
    pub fn viridian(min_value: f64, max_value: f64) -> Result<Self, ColormapError> {
        Self::build(min_value, max_value, DEFAULT_STEPS)
    }

    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn table(&self) -> &[Rgba] {
        &self.table
    }

    /// Index of the entry used for `value`. NaN maps to 0.
    #[must_use]
    pub fn index_of(&self, value: f64) -> usize {
        let steps = self.table.len();
        let normalized = (value - self.min_value) / (self.max_value - self.min_value);
        let scaled = (normalized * steps as f64).floor();
        if scaled.is_nan() {
            return 0;
        }
        scaled.clamp(0.0, (steps - 1) as f64) as usize
    }

    #[must_use]
    pub fn query(&self, value: f64) -> Rgba {
        self.table[self.index_of(value)]
    }
}

fn half_position(i: usize, len: usize) -> f64 {
    if len > 1 {
        i as f64 / (len - 1) as f64
    } else {
        0.0
    }
}

fn mix(a: Rgba, b: Rgba, pos: f64) -> Rgba {
    std::array::from_fn(|c| b[c] * pos + a[c] * (1.0 - pos))
}
