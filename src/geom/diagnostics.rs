//! Diagnostics for plot generation.
//!
//! Every stage of the plot pipeline (sampling, stroke generation, clipping,
//! coloring) reports what it did through [`PlotDiagnostics`]. The struct is
//! returned alongside the meshes in a `PlotOutput` and can be used for:
//!
//! - Validating output (how many faces survived clipping, how many crop faces
//!   were removed)
//! - Debugging degenerate overlay lines (skipped stroke segments)
//! - Performance profiling (timing buckets)
//!
//! # Example
//!
//! ```ignore
//! use plot3d_engine::plot::{CoordinateFrame, HeightFieldPlot};
//!
//! let frame = CoordinateFrame::default();
//! let output = HeightFieldPlot::new(&frame).of_function(|x, y| x * y, 20).plot()?;
//!
//! println!("{}", output.diagnostics.summary());
//! for warning in &output.diagnostics.warnings {
//!     eprintln!("Warning: {warning}");
//! }
//! ```

use std::fmt;

/// Counts and warnings collected while building one plot.
///
/// # Sampling
///
/// - `evaluated_sample_count`: user-function evaluations performed
///
/// # Strokes
///
/// - `stroke_count`: cylinder strokes emitted for overlay lines
/// - `skipped_segment_count`: zero-length segments that produced no stroke
///
/// # Clipping
///
/// - `clipped_face_count`: faces cut by at least one cube plane
/// - `discarded_face_count`: faces lying completely outside the cube
/// - `crop_face_count`: faces removed because they lie on a cube plane
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlotDiagnostics {
    /// Total number of vertices in the final surface or curve strokes.
    pub vertex_count: usize,

    /// Total number of polygon faces in the final geometry.
    pub face_count: usize,

    /// Number of user-function evaluations.
    pub evaluated_sample_count: usize,

    /// Number of stroke meshes emitted.
    pub stroke_count: usize,

    /// Number of overlay segments skipped because their endpoints coincide.
    ///
    /// A non-zero value is not an error: the rest of the plot is complete.
    pub skipped_segment_count: usize,

    /// Number of faces split by the cube planes.
    pub clipped_face_count: usize,

    /// Number of faces that fell completely outside the cube.
    pub discarded_face_count: usize,

    /// Number of crop faces removed after clipping.
    pub crop_face_count: usize,

    /// Optional timing breakdown by operation category.
    ///
    /// Only populated when the `plot_metrics` feature is enabled and the
    /// target is not WASM.
    pub timing: Option<super::metrics::PlotTimingReport>,

    /// Human-readable warnings.
    ///
    /// Examples:
    /// - "skipped zero-length stroke segment at (0.5, 0.5, 0.5)"
    /// - "stroke clipped away completely"
    pub warnings: Vec<String>,
}

impl PlotDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if clipping changed the geometry in any way.
    #[must_use]
    pub fn was_clipped(&self) -> bool {
        self.clipped_face_count > 0 || self.discarded_face_count > 0 || self.crop_face_count > 0
    }

    /// Returns `true` if no segments were skipped and no warnings were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped_segment_count == 0 && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merges another diagnostics struct into this one.
    ///
    /// Counts are summed and warnings appended. `timing` from `other` is
    /// ignored; use a parent `PlotMetrics` to track timing across stages.
    pub fn merge(&mut self, other: &PlotDiagnostics) {
        self.vertex_count += other.vertex_count;
        self.face_count += other.face_count;
        self.evaluated_sample_count += other.evaluated_sample_count;
        self.stroke_count += other.stroke_count;
        self.skipped_segment_count += other.skipped_segment_count;
        self.clipped_face_count += other.clipped_face_count;
        self.discarded_face_count += other.discarded_face_count;
        self.crop_face_count += other.crop_face_count;
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"V:{vertices} F:{faces} [details...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} F:{}", self.vertex_count, self.face_count)];

        if self.evaluated_sample_count > 0 {
            parts.push(format!("samples:{}", self.evaluated_sample_count));
        }
        if self.stroke_count > 0 {
            parts.push(format!("strokes:{}", self.stroke_count));
        }
        if self.skipped_segment_count > 0 {
            parts.push(format!("skipped:{}", self.skipped_segment_count));
        }
        if self.clipped_face_count > 0 {
            parts.push(format!("clipped:{}", self.clipped_face_count));
        }
        if self.discarded_face_count > 0 {
            parts.push(format!("discarded:{}", self.discarded_face_count));
        }
        if self.crop_face_count > 0 {
            parts.push(format!("crop:{}", self.crop_face_count));
        }

        parts.join(" ")
    }
}

impl fmt::Display for PlotDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plot Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Samples evaluated: {}", self.evaluated_sample_count)?;

        if self.stroke_count > 0 || self.skipped_segment_count > 0 {
            writeln!(f, "  Strokes:")?;
            writeln!(f, "    - Emitted: {}", self.stroke_count)?;
            if self.skipped_segment_count > 0 {
                writeln!(f, "    - Skipped degenerate segments: {}", self.skipped_segment_count)?;
            }
        }

        if self.was_clipped() {
            writeln!(f, "  Clipping:")?;
            if self.clipped_face_count > 0 {
                writeln!(f, "    - Faces split: {}", self.clipped_face_count)?;
            }
            if self.discarded_face_count > 0 {
                writeln!(f, "    - Faces outside cube: {}", self.discarded_face_count)?;
            }
            if self.crop_face_count > 0 {
                writeln!(f, "    - Crop faces removed: {}", self.crop_face_count)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.is_clean() { "CLEAN" } else { "WITH WARNINGS" };
        writeln!(f, "  Status: {status}")?;

        Ok(())
    }
}
