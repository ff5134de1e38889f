//! Graph space <-> device space mapping and axis divisions.
//!
//! Graph space is whatever the plotted function is defined over. Device space
//! is the fixed cube `[-1, 1]^3` all geometry is emitted in. The mapping is a
//! per-axis affine transform and its exact inverse.

use thiserror::Error;

use crate::geom::{Axis, Point3};

pub const DEVICE_START: f64 = -1.0;
pub const DEVICE_END: f64 = 1.0;

/// Resource limit on ticks per axis. Frames whose spacing would produce more
/// ticks than this are otherwise well formed but rejected with
/// [`FrameError::TooManyDivisions`].
pub const MAX_DIVISIONS: usize = 100_000;

/// Relative slack (in units of the spacing) for snapping ticks onto the
/// ends of the range.
const TICK_SNAP: f64 = 1e-9;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("extent of the {axis} axis must be > 0, got {value}")]
    NonPositiveExtent { axis: Axis, value: f64 },
    #[error("division spacing of the {axis} axis must be > 0, got {value}")]
    NonPositiveDivision { axis: Axis, value: f64 },
    #[error("{axis} axis has a non-finite start, extent or spacing")]
    NonFinite { axis: Axis },
    #[error(
        "{axis} axis would get {count} divisions, over this crate's resource limit of {MAX_DIVISIONS} ticks per axis"
    )]
    TooManyDivisions { axis: Axis, count: usize },
}

/// Affine frame between graph space and the device cube.
///
/// Immutable once built; every plot borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateFrame {
    start: [f64; 3],
    extent: [f64; 3],
    divisions: [f64; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateFrameBuilder {
    start: [f64; 3],
    extent: [f64; 3],
    divisions: [f64; 3],
}

impl Default for CoordinateFrameBuilder {
    fn default() -> Self {
        Self {
            start: [0.0; 3],
            extent: [1.0; 3],
            divisions: [0.2; 3],
        }
    }
}

impl CoordinateFrameBuilder {
    /// Graph-space corner mapped to `(-1, -1, -1)`.
    #[must_use]
    pub fn with_start(mut self, start: [f64; 3]) -> Self {
        self.start = start;
        self
    }

    #[must_use]
    pub fn with_extent(mut self, extent: [f64; 3]) -> Self {
        self.extent = extent;
        self
    }

    /// Tick spacing per axis, in graph units.
    #[must_use]
    pub fn with_divisions(mut self, divisions: [f64; 3]) -> Self {
        self.divisions = divisions;
        self
    }

    pub fn build(self) -> Result<CoordinateFrame, FrameError> {
        CoordinateFrame::new(self.start, self.extent, self.divisions)
    }
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        let CoordinateFrameBuilder {
            start,
            extent,
            divisions,
        } = CoordinateFrameBuilder::default();
        Self {
            start,
            extent,
            divisions,
        }
    }
}

impl CoordinateFrame {
    #[must_use]
    pub fn builder() -> CoordinateFrameBuilder {
        CoordinateFrameBuilder::default()
    }

    pub fn new(start: [f64; 3], extent: [f64; 3], divisions: [f64; 3]) -> Result<Self, FrameError> {
        for axis in Axis::ALL {
            let i = axis.index();
            let (s, e, d) = (start[i], extent[i], divisions[i]);

            if !(s.is_finite() && e.is_finite() && d.is_finite()) {
                return Err(FrameError::NonFinite { axis });
            }
            if e <= 0.0 {
                return Err(FrameError::NonPositiveExtent { axis, value: e });
            }
            if d <= 0.0 {
                return Err(FrameError::NonPositiveDivision { axis, value: d });
            }

            let estimate = (e / d).floor() + 1.0;
            if estimate > MAX_DIVISIONS as f64 {
                let count = if estimate.is_finite() { estimate as usize } else { usize::MAX };
                return Err(FrameError::TooManyDivisions { axis, count });
            }
        }

        Ok(Self {
            start,
            extent,
            divisions,
        })
    }

    #[must_use]
    pub fn start(&self) -> [f64; 3] {
        self.start
    }

    #[must_use]
    pub fn extent(&self) -> [f64; 3] {
        self.extent
    }

    #[must_use]
    pub fn divisions(&self) -> [f64; 3] {
        self.divisions
    }

    /// Graph-space corner mapped to `(1, 1, 1)`.
    #[must_use]
    pub fn end(&self) -> [f64; 3] {
        std::array::from_fn(|i| self.start[i] + self.extent[i])
    }

    #[must_use]
    pub fn graph_to_device(&self, p: Point3) -> Point3 {
        let map = |axis: Axis| {
            let i = axis.index();
            (p.coord(axis) - self.start[i]) * (DEVICE_END - DEVICE_START) / self.extent[i]
                + DEVICE_START
        };
        Point3::new(map(Axis::X), map(Axis::Y), map(Axis::Z))
    }

    #[must_use]
    pub fn device_to_graph(&self, p: Point3) -> Point3 {
        let map = |axis: Axis| {
            let i = axis.index();
            (p.coord(axis) - DEVICE_START) * self.extent[i] / (DEVICE_END - DEVICE_START)
                + self.start[i]
        };
        Point3::new(map(Axis::X), map(Axis::Y), map(Axis::Z))
    }

    /// Tick values of one axis in graph units, ascending.
    #[must_use]
    pub fn axis_divisions(&self, axis: Axis) -> Vec<f64> {
        let i = axis.index();
        let spacing = self.divisions[i];
        let start = self.start[i];
        let end = start + self.extent[i];
        let slack = TICK_SNAP * spacing;

        let first = (start / spacing).ceil() * spacing;
        let mut ticks = Vec::new();
        for k in 0..MAX_DIVISIONS {
            let mut value = first + k as f64 * spacing;
            if value > end + slack {
                break;
            }
            if value > end {
                value = end;
            }
            if value.abs() < slack {
                value = 0.0;
            }
            ticks.push(value);
        }
        ticks
    }

    /// Tick values for all three axes.
    #[must_use]
    pub fn compute_divisions(&self) -> [Vec<f64>; 3] {
        Axis::ALL.map(|axis| self.axis_divisions(axis))
    }

    /// Device coordinate of every tick, each on its own axis.
    #[must_use]
    pub fn division_positions(&self) -> [Vec<f64>; 3] {
        Axis::ALL.map(|axis| {
            self.axis_divisions(axis)
                .into_iter()
                .map(|value| {
                    let p = Point3::ORIGIN.with_coord(axis, value);
                    self.graph_to_device(p).coord(axis)
                })
                .collect()
        })
    }

    pub fn tick_labels(&self, axis: Axis, formatter: impl Fn(f64) -> String) -> Vec<String> {
        self.axis_divisions(axis).into_iter().map(formatter).collect()
    }
}

/// One decimal, with a leading space for non-negative values (`" 0.5"`,
/// `"-0.5"`).
#[must_use]
pub fn default_division_formatter(value: f64) -> String {
    if value.is_sign_negative() {
        format!("{value:.1}")
    } else {
        format!(" {value:.1}")
    }
}
