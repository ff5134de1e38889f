//! Parametric surfaces `(x, y, z) = f(u, v)`.

use crate::geom::{PlotMesh, Point3, Rgba};

use super::colormap::Colormap;
use super::frame::CoordinateFrame;
use super::function::{EvaluationError, Function2};
use super::height_field::DEFAULT_SURFACE_PRECISION;
use super::sampler::{GridLine, GridSurface, plot_surface, surface_lines, tessellate_surface};
use super::style::{PlotError, PlotOutput, PlotStyle, check_precision, check_range};

type ParamFn = fn(f64, f64) -> f64;

fn param_u(u: f64, _v: f64) -> f64 {
    u
}

fn param_v(_u: f64, v: f64) -> f64 {
    v
}

fn zero(_u: f64, _v: f64) -> f64 {
    0.0
}

/// A surface whose whole position is a function of `(u, v)`.
///
/// The device grid is used only as a normalized parameter domain: grid
/// coordinate `gx` in `[-1, 1]` maps linearly onto `u_extent`, `gy` onto
/// `v_extent`. The three functions give a graph-space point which is then
/// converted to device space.
#[derive(Debug, Clone)]
pub struct ParametricSurfacePlot<'a, X = ParamFn, Y = ParamFn, Z = ParamFn> {
    frame: &'a CoordinateFrame,
    fx: X,
    fy: Y,
    fz: Z,
    u_extent: (f64, f64),
    v_extent: (f64, f64),
    precision: usize,
    style: PlotStyle,
}

impl<'a> ParametricSurfacePlot<'a> {
    /// The plane `(u, v, 0)` over the unit square.
    #[must_use]
    pub fn new(frame: &'a CoordinateFrame) -> Self {
        Self {
            frame,
            fx: param_u,
            fy: param_v,
            fz: zero,
            u_extent: (0.0, 1.0),
            v_extent: (0.0, 1.0),
            precision: DEFAULT_SURFACE_PRECISION,
            style: PlotStyle::default(),
        }
    }
}

impl<'a, X: Function2, Y: Function2, Z: Function2> ParametricSurfacePlot<'a, X, Y, Z> {
    #[must_use]
    pub fn of_function<X2, Y2, Z2>(
        self,
        fx: X2,
        fy: Y2,
        fz: Z2,
        u_extent: (f64, f64),
        v_extent: (f64, f64),
        precision: usize,
    ) -> ParametricSurfacePlot<'a, X2, Y2, Z2>
    where
        X2: Function2,
        Y2: Function2,
        Z2: Function2,
    {
        ParametricSurfacePlot {
            frame: self.frame,
            fx,
            fy,
            fz,
            u_extent,
            v_extent,
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
    pub fn fill(mut self, colormap: Colormap) -> Self {
        self.style = self.style.fill(colormap);
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
    pub fn u_extent(&self) -> (f64, f64) {
        self.u_extent
    }

    #[must_use]
    pub fn v_extent(&self) -> (f64, f64) {
        self.v_extent
    }

    /// `(u, v)` for a device grid coordinate.
    #[must_use]
    pub fn parameters_at(&self, gx: f64, gy: f64) -> (f64, f64) {
        let (u0, u1) = self.u_extent;
        let (v0, v1) = self.v_extent;
        (
            u0 + (gx + 1.0) / 2.0 * (u1 - u0),
            v0 + (gy + 1.0) / 2.0 * (v1 - v0),
        )
    }

    pub fn tessellate(&self) -> Result<PlotMesh, PlotError> {
        tessellate_surface(self)
    }

    /// Overlay lines along the frame's X and Y tick positions, mapped through
    /// the surface.
    pub fn lines(&self) -> Result<Vec<GridLine>, PlotError> {
        surface_lines(self)
    }

    pub fn plot(&self) -> Result<PlotOutput, PlotError> {
        log::debug!(
            "plotting parametric surface u={:?} v={:?} at precision {}",
            self.u_extent,
            self.v_extent,
            self.precision
        );
        plot_surface(self)
    }
}

impl<X: Function2, Y: Function2, Z: Function2> GridSurface for ParametricSurfacePlot<'_, X, Y, Z> {
    fn frame(&self) -> &CoordinateFrame {
        self.frame
    }

    fn precision(&self) -> usize {
        self.precision
    }

    fn style(&self) -> &PlotStyle {
        &self.style
    }

    fn validate(&self) -> Result<(), PlotError> {
        check_precision(self.precision)?;
        check_range("u", self.u_extent)?;
        check_range("v", self.v_extent)
    }

    fn vertex(&self, gx: f64, gy: f64) -> Result<Point3, EvaluationError> {
        let (u, v) = self.parameters_at(gx, gy);
        let graph = Point3::new(
            self.fx.evaluate_finite(u, v)?,
            self.fy.evaluate_finite(u, v)?,
            self.fz.evaluate_finite(u, v)?,
        );
        Ok(self.frame.graph_to_device(graph))
    }
}
