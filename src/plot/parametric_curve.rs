//! Parametric curves `(x, y, z) = f(t)`, drawn as stroked polylines.

use crate::geom::{PlotDiagnostics, PlotMetrics, Point3, Rgba, Segment3, TimingBucket};

use super::frame::CoordinateFrame;
use super::function::{EvaluationError, Function1};
use super::sampler::polyline_segments;
use super::style::{
    PlotError, PlotOutput, PlotStyle, StrokeStyle, check_precision, check_range, finish_plot,
};

pub const DEFAULT_CURVE_PRECISION: usize = 100;
pub const DEFAULT_CURVE_WIDTH: f64 = 0.02;

type CurveFn = fn(f64) -> f64;

fn identity(t: f64) -> f64 {
    t
}

/// A curve sampled at `precision + 1` evenly spaced parameter values.
///
/// Strokes are on by default (radius 0.02) since a bare polyline has no
/// visible geometry.
#[derive(Debug, Clone)]
pub struct ParametricCurvePlot<'a, X = CurveFn, Y = CurveFn, Z = CurveFn> {
    frame: &'a CoordinateFrame,
    fx: X,
    fy: Y,
    fz: Z,
    t_extent: (f64, f64),
    precision: usize,
    style: PlotStyle,
}

impl<'a> ParametricCurvePlot<'a> {
    /// The diagonal `(t, t, t)` for `t` in `[0, 1]`.
    #[must_use]
    pub fn new(frame: &'a CoordinateFrame) -> Self {
        Self {
            frame,
            fx: identity,
            fy: identity,
            fz: identity,
            t_extent: (0.0, 1.0),
            precision: DEFAULT_CURVE_PRECISION,
            style: PlotStyle {
                stroke: Some(StrokeStyle {
                    width: DEFAULT_CURVE_WIDTH,
                    ..StrokeStyle::default()
                }),
                ..PlotStyle::default()
            },
        }
    }
}

impl<'a, X: Function1, Y: Function1, Z: Function1> ParametricCurvePlot<'a, X, Y, Z> {
    #[must_use]
    pub fn of_function<X2, Y2, Z2>(
        self,
        fx: X2,
        fy: Y2,
        fz: Z2,
        t_extent: (f64, f64),
        precision: usize,
    ) -> ParametricCurvePlot<'a, X2, Y2, Z2>
    where
        X2: Function1,
        Y2: Function1,
        Z2: Function1,
    {
        ParametricCurvePlot {
            frame: self.frame,
            fx,
            fy,
            fz,
            t_extent,
            precision,
            style: self.style,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn stroke(mut self, color: Rgba, width: f64) -> Self {
        self.style = self.style.stroke(color, width);
        self
    }

    #[must_use]
    pub fn clip(mut self) -> Self {
        self.style = self.style.clip();
        self
    }

    #[must_use]
    pub fn t_extent(&self) -> (f64, f64) {
        self.t_extent
    }

    fn validate(&self) -> Result<(), PlotError> {
        check_precision(self.precision)?;
        check_range("t", self.t_extent)
    }

    /// Parameter value of sample `i`.
    #[must_use]
    pub fn parameter_at(&self, i: usize) -> f64 {
        let (t0, t1) = self.t_extent;
        let delta = (t1 - t0) / self.precision as f64;
        t0 + i as f64 * delta
    }

    fn point(&self, t: f64) -> Result<Point3, EvaluationError> {
        let graph = Point3::new(
            self.fx.evaluate_finite(t)?,
            self.fy.evaluate_finite(t)?,
            self.fz.evaluate_finite(t)?,
        );
        Ok(self.frame.graph_to_device(graph))
    }

    /// Device-space sample points, `precision + 1` of them.
    pub fn sample_points(&self) -> Result<Vec<Point3>, PlotError> {
        self.validate()?;
        let points = (0..=self.precision)
            .map(|i| self.point(self.parameter_at(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(points)
    }

    /// The curve as `precision` segments; segment `i` joins samples `i` and
    /// `i + 1`.
    pub fn tessellate(&self) -> Result<Vec<Segment3>, PlotError> {
        Ok(polyline_segments(&self.sample_points()?))
    }

    pub fn plot(&self) -> Result<PlotOutput, PlotError> {
        self.validate()?;
        log::debug!(
            "plotting curve t={:?} at precision {}",
            self.t_extent,
            self.precision
        );

        let mut metrics = PlotMetrics::default();
        metrics.begin();
        let mut diagnostics = PlotDiagnostics::new();

        let curve = metrics.time(TimingBucket::Sampling, || self.tessellate())?;
        diagnostics.evaluated_sample_count += self.precision + 1;

        finish_plot(None, Vec::new(), curve, &self.style, metrics, diagnostics)
    }
}
