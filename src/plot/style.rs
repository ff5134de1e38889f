//! Plot options and the shared paint / stroke / clip pipeline.

use thiserror::Error;

use crate::geom::{
    ClipError, PlotDiagnostics, PlotMesh, PlotMetrics, Rgba, Segment3, StrokeError,
    StrokeOptions, TimingBucket, clip_mesh_to_cube, clip_meshes_to_cube, cylinder_between,
};

use super::color::{paint_mesh, paint_uniform};
use super::colormap::{Colormap, ColormapError};
use super::frame::FrameError;
use super::function::EvaluationError;
use super::sampler::GridLine;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlotError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Colormap(#[from] ColormapError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Stroke(#[from] StrokeError),
    #[error(transparent)]
    Clip(#[from] ClipError),
    #[error("precision must be between 1 and {MAX_PRECISION}, got {0}")]
    InvalidPrecision(usize),
    #[error("{name} range is empty or not finite")]
    EmptyRange { name: &'static str },
}

/// Overlay line appearance. `width` is the stroke cylinder radius in device
/// units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    pub radial_segments: usize,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.5, 0.0],
            width: 0.01,
            radial_segments: StrokeOptions::default().radial_segments,
        }
    }
}

/// What to do with a tessellated plot: paint it, overlay lines, clip it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotStyle {
    pub colormap: Option<Colormap>,
    pub stroke: Option<StrokeStyle>,
    pub clip: bool,
}

impl PlotStyle {
    #[must_use]
    pub fn fill(mut self, colormap: Colormap) -> Self {
        self.colormap = Some(colormap);
        self
    }

    /// Turns overlay lines on, keeping the current radial segment count.
    #[must_use]
    pub fn stroke(mut self, color: Rgba, width: f64) -> Self {
        let base = self.stroke.unwrap_or_default();
        self.stroke = Some(StrokeStyle {
            color,
            width,
            ..base
        });
        self
    }

    #[must_use]
    pub fn clip(mut self) -> Self {
        self.clip = true;
        self
    }
}

/// Everything a plot produces, in device space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotOutput {
    /// Filled surface; `None` for curves and for surfaces clipped away
    /// entirely.
    pub surface: Option<PlotMesh>,
    /// One cylinder mesh per overlay or curve segment.
    pub strokes: Vec<PlotMesh>,
    /// Overlay lines traced on a surface (empty for curves).
    pub lines: Vec<GridLine>,
    /// Curve polyline (empty for surfaces).
    pub curve: Vec<Segment3>,
    pub diagnostics: PlotDiagnostics,
}

impl PlotOutput {
    /// Surface first, then strokes.
    pub fn meshes(&self) -> impl Iterator<Item = &PlotMesh> {
        self.surface.iter().chain(self.strokes.iter())
    }
}

/// Turns `segments` into painted stroke cylinders.
///
/// Zero-length segments are skipped and recorded in `diagnostics`; every other
/// stroke error aborts.
pub(crate) fn build_strokes<'a>(
    segments: impl IntoIterator<Item = &'a Segment3>,
    style: &StrokeStyle,
    diagnostics: &mut PlotDiagnostics,
) -> Result<Vec<PlotMesh>, PlotError> {
    let options = StrokeOptions {
        radial_segments: style.radial_segments,
    };

    let mut strokes = Vec::new();
    for segment in segments {
        match cylinder_between(segment.a, segment.b, style.width, options) {
            Ok(mut mesh) => {
                paint_uniform(&mut mesh, style.color);
                strokes.push(mesh);
            }
            Err(StrokeError::DegenerateSegment(at)) => {
                log::warn!("skipping zero-length stroke segment at {at:?}");
                diagnostics.skipped_segment_count += 1;
                diagnostics.add_warning(format!(
                    "skipped zero-length stroke segment at ({}, {}, {})",
                    at.x, at.y, at.z
                ));
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(strokes)
}

/// Paints, strokes and clips a tessellated plot according to `style`.
///
/// `surface` is unpainted; `lines` / `curve` hold the already traced overlay.
pub(crate) fn finish_plot(
    mut surface: Option<PlotMesh>,
    lines: Vec<GridLine>,
    curve: Vec<Segment3>,
    style: &PlotStyle,
    mut metrics: PlotMetrics,
    mut diagnostics: PlotDiagnostics,
) -> Result<PlotOutput, PlotError> {
    if let (Some(mesh), Some(colormap)) = (surface.as_mut(), style.colormap.as_ref()) {
        metrics.time(TimingBucket::Coloring, || paint_mesh(mesh, colormap));
    }

    let mut strokes = match style.stroke.as_ref() {
        Some(stroke) => metrics.time(TimingBucket::Strokes, || {
            let segments = lines.iter().flat_map(|line| &line.segments).chain(&curve);
            build_strokes(segments, stroke, &mut diagnostics)
        })?,
        None => Vec::new(),
    };

    if style.clip {
        let clipped = metrics.time(TimingBucket::Clipping, || -> Result<_, PlotError> {
            let surface = surface
                .take()
                .map(|mesh| clip_mesh_to_cube(&mesh))
                .transpose()?;
            let (strokes, stroke_diagnostics) = clip_meshes_to_cube(&strokes)?;
            Ok((surface, strokes, stroke_diagnostics))
        })?;

        let (clipped_surface, clipped_strokes, mut clip_diagnostics) = clipped;
        if let Some(result) = clipped_surface {
            clip_diagnostics.merge(&result.diagnostics);
            surface = (!result.mesh.is_empty()).then_some(result.mesh);
        }
        if clipped_strokes.len() < strokes.len() {
            diagnostics.add_warning(format!(
                "{} stroke(s) clipped away completely",
                strokes.len() - clipped_strokes.len()
            ));
        }
        strokes = clipped_strokes;
        clip_diagnostics.record_into(&mut diagnostics);
    }

    diagnostics.stroke_count = strokes.len();
    diagnostics.vertex_count = surface.iter().chain(&strokes).map(PlotMesh::vertex_count).sum();
    diagnostics.face_count = surface.iter().chain(&strokes).map(PlotMesh::face_count).sum();
    diagnostics.timing = metrics.end();

    log::debug!("plot finished: {}", diagnostics.summary());

    Ok(PlotOutput {
        surface,
        strokes,
        lines,
        curve,
        diagnostics,
    })
}

/// Largest accepted precision. A surface grid has `(precision + 1)^2`
/// vertices, and that count must fit in a `u32` index on every target,
/// 32-bit `usize` included.
pub const MAX_PRECISION: usize = 65_534;

/// Checks a user-facing precision value.
pub(crate) fn check_precision(precision: usize) -> Result<(), PlotError> {
    if (1..=MAX_PRECISION).contains(&precision) {
        Ok(())
    } else {
        Err(PlotError::InvalidPrecision(precision))
    }
}

/// Checks a parameter range: finite endpoints and non-zero width.
pub(crate) fn check_range(name: &'static str, range: (f64, f64)) -> Result<(), PlotError> {
    let (lo, hi) = range;
    if lo.is_finite() && hi.is_finite() && lo != hi {
        Ok(())
    } else {
        Err(PlotError::EmptyRange { name })
    }
}
