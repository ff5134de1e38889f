//! Grid sampling and overlay line tracing shared by the surface plots.
//!
//! Both surface kinds walk the same `(divisions + 1)^2` device grid and differ
//! only in how a grid coordinate `(gx, gy)` becomes a device-space vertex.
//! That step is passed in as a closure.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geom::{
    Axis, PlotDiagnostics, PlotMesh, PlotMetrics, Point3, Segment3, TimingBucket, grid_coordinate,
    quad_grid_faces,
};

use super::frame::CoordinateFrame;
use super::function::EvaluationError;
use super::style::{PlotError, PlotOutput, PlotStyle, check_precision, finish_plot};

/// One overlay line: the constant-coordinate slice of a surface through a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    /// Axis whose coordinate is held fixed.
    pub axis: Axis,
    /// Device-space position of the tick on `axis`.
    pub tick: f64,
    pub segments: Vec<Segment3>,
}

impl GridLine {
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Samples every grid vertex, row-major with `gx` varying fastest.
pub(crate) fn sample_grid<S>(divisions: usize, sample: S) -> Result<Vec<[f64; 3]>, EvaluationError>
where
    S: Fn(f64, f64) -> Result<Point3, EvaluationError> + Sync,
{
    let stride = divisions + 1;
    let vertex = |k: usize| {
        let gx = grid_coordinate(k % stride, divisions);
        let gy = grid_coordinate(k / stride, divisions);
        sample(gx, gy).map(Point3::to_array)
    };
    collect_vertices(stride * stride, vertex)
}

#[cfg(feature = "parallel")]
fn collect_vertices<V>(count: usize, vertex: V) -> Result<Vec<[f64; 3]>, EvaluationError>
where
    V: Fn(usize) -> Result<[f64; 3], EvaluationError> + Sync + Send,
{
    (0..count).into_par_iter().map(vertex).collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_vertices<V>(count: usize, vertex: V) -> Result<Vec<[f64; 3]>, EvaluationError>
where
    V: Fn(usize) -> Result<[f64; 3], EvaluationError> + Sync + Send,
{
    (0..count).map(vertex).collect()
}

/// Traces one line per tick: at fixed `gx` for each X tick, then at fixed
/// `gy` for each Y tick. Each line has `divisions` segments.
pub(crate) fn trace_grid_lines<S>(
    frame: &CoordinateFrame,
    divisions: usize,
    sample: S,
) -> Result<Vec<GridLine>, EvaluationError>
where
    S: Fn(f64, f64) -> Result<Point3, EvaluationError>,
{
    let [x_ticks, y_ticks, _] = frame.division_positions();
    let mut lines = Vec::with_capacity(x_ticks.len() + y_ticks.len());

    for (axis, ticks) in [(Axis::X, x_ticks), (Axis::Y, y_ticks)] {
        for tick in ticks {
            let points = (0..=divisions)
                .map(|i| {
                    let along = grid_coordinate(i, divisions);
                    match axis {
                        Axis::X => sample(tick, along),
                        _ => sample(along, tick),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            lines.push(GridLine {
                axis,
                tick,
                segments: polyline_segments(&points),
            });
        }
    }

    Ok(lines)
}

/// A surface sampled on the device grid.
pub(crate) trait GridSurface: Sync {
    fn frame(&self) -> &CoordinateFrame;
    fn precision(&self) -> usize;
    fn style(&self) -> &PlotStyle;

    /// Rejects configurations that cannot be sampled.
    fn validate(&self) -> Result<(), PlotError> {
        check_precision(self.precision())
    }

    /// Device-space vertex for grid coordinate `(gx, gy)`.
    fn vertex(&self, gx: f64, gy: f64) -> Result<Point3, EvaluationError>;
}

pub(crate) fn tessellate_surface<S: GridSurface>(surface: &S) -> Result<PlotMesh, PlotError> {
    surface.validate()?;
    let precision = surface.precision();
    let positions = sample_grid(precision, |gx, gy| surface.vertex(gx, gy))?;
    Ok(PlotMesh::new(positions, quad_grid_faces(precision)))
}

pub(crate) fn surface_lines<S: GridSurface>(surface: &S) -> Result<Vec<GridLine>, PlotError> {
    surface.validate()?;
    let lines = trace_grid_lines(surface.frame(), surface.precision(), |gx, gy| {
        surface.vertex(gx, gy)
    })?;
    Ok(lines)
}

pub(crate) fn plot_surface<S: GridSurface>(surface: &S) -> Result<PlotOutput, PlotError> {
    surface.validate()?;
    let precision = surface.precision();

    let mut metrics = PlotMetrics::default();
    metrics.begin();
    let mut diagnostics = PlotDiagnostics::new();

    let positions = metrics.time(TimingBucket::Sampling, || {
        sample_grid(precision, |gx, gy| surface.vertex(gx, gy))
    })?;
    diagnostics.evaluated_sample_count += positions.len();
    let faces = metrics.time(TimingBucket::Topology, || quad_grid_faces(precision));

    let lines = if surface.style().stroke.is_some() {
        let lines = metrics.time(TimingBucket::Strokes, || surface_lines(surface))?;
        diagnostics.evaluated_sample_count += lines.len() * (precision + 1);
        lines
    } else {
        Vec::new()
    };

    log::debug!(
        "sampled {}x{} grid with {} overlay line(s)",
        precision + 1,
        precision + 1,
        lines.len()
    );

    finish_plot(
        Some(PlotMesh::new(positions, faces)),
        lines,
        Vec::new(),
        surface.style(),
        metrics,
        diagnostics,
    )
}

/// Consecutive point pairs as segments.
pub(crate) fn polyline_segments(points: &[Point3]) -> Vec<Segment3> {
    points
        .windows(2)
        .map(|pair| Segment3::new(pair[0], pair[1]))
        .collect()
}
