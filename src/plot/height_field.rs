//! Height-field surfaces `z = f(x, y)`.

use crate::geom::{PlotMesh, Point3, Rgba};

use super::colormap::Colormap;
use super::frame::CoordinateFrame;
use super::function::{EvaluationError, Function2};
use super::sampler::{GridLine, GridSurface, plot_surface, surface_lines, tessellate_surface};
use super::style::{PlotError, PlotOutput, PlotStyle};

pub const DEFAULT_SURFACE_PRECISION: usize = 20;

fn flat(_x: f64, _y: f64) -> f64 {
    0.0
}

/// A `z = f(x, y)` plot over the x/y range of a frame.
///
/// The device grid keeps its x and y; only z comes from the function. Values
/// outside the z extent are not clamped, so vertices may leave the device
/// cube unless the plot is clipped.
#[derive(Debug, Clone)]
pub struct HeightFieldPlot<'a, F = fn(f64, f64) -> f64> {
    frame: &'a CoordinateFrame,
    function: F,
    precision: usize,
    style: PlotStyle,
}

impl<'a> HeightFieldPlot<'a> {
    /// A flat `z = 0` plot at the default precision.
    #[must_use]
    pub fn new(frame: &'a CoordinateFrame) -> Self {
        Self {
            frame,
            function: flat,
            precision: DEFAULT_SURFACE_PRECISION,
            style: PlotStyle::default(),
        }
    }
}

impl<'a, F: Function2> HeightFieldPlot<'a, F> {
    /// Replaces the function; `precision` is the number of grid cells per side.
    #[must_use]
    pub fn of_function<G: Function2>(self, function: G, precision: usize) -> HeightFieldPlot<'a, G> {
        HeightFieldPlot {
            frame: self.frame,
            function,
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
    pub fn function(&self) -> &F {
        &self.function
    }

    /// Unpainted, unclipped surface mesh.
    pub fn tessellate(&self) -> Result<PlotMesh, PlotError> {
        tessellate_surface(self)
    }

    /// Overlay lines through the X and Y ticks of the frame.
    pub fn lines(&self) -> Result<Vec<GridLine>, PlotError> {
        surface_lines(self)
    }

    pub fn plot(&self) -> Result<PlotOutput, PlotError> {
        log::debug!("plotting height field at precision {}", self.precision);
        plot_surface(self)
    }
}

impl<F: Function2> GridSurface for HeightFieldPlot<'_, F> {
    fn frame(&self) -> &CoordinateFrame {
        self.frame
    }

    fn precision(&self) -> usize {
        self.precision
    }

    fn style(&self) -> &PlotStyle {
        &self.style
    }

    fn vertex(&self, gx: f64, gy: f64) -> Result<Point3, EvaluationError> {
        let graph = self.frame.device_to_graph(Point3::new(gx, gy, 0.0));
        let z = self.function.evaluate_finite(graph.x, graph.y)?;
        let device = self.frame.graph_to_device(Point3::new(graph.x, graph.y, z));
        Ok(Point3::new(gx, gy, device.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> CoordinateFrame {
        CoordinateFrame::new([-1.0, -1.0, 0.0], [2.0, 2.0, 1.0], [0.5, 0.5, 0.2]).unwrap()
    }

    #[test]
    fn flat_function_gives_flat_grid_on_frame_corners() {
        let frame = frame();
        let mesh = HeightFieldPlot::new(&frame)
            .of_function(|_x: f64, _y: f64| 0.0, 1)
            .tessellate()
            .unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![vec![0, 1, 3, 2]]);

        let corners: Vec<Point3> = mesh
            .positions
            .iter()
            .map(|&p| frame.device_to_graph(Point3::from_array(p)))
            .collect();
        assert_eq!(
            corners,
            vec![
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(-1.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn z_follows_function_and_is_not_clamped() {
        let frame = frame();
        let plot = HeightFieldPlot::new(&frame).of_function(|x: f64, y: f64| x + y, 2);
        let mesh = plot.tessellate().unwrap();

        // Device z = 2 * (x + y) - 1 for this frame.
        assert_eq!(mesh.positions[0], [-1.0, -1.0, -5.0]);
        assert_eq!(mesh.positions[4], [0.0, 0.0, -1.0]);
        assert_eq!(mesh.positions[8], [1.0, 1.0, 3.0]);
    }

    #[test]
    fn non_finite_values_abort() {
        let frame = frame();
        let plot = HeightFieldPlot::new(&frame).of_function(|x: f64, _y: f64| 1.0 / x, 2);
        assert!(matches!(
            plot.tessellate(),
            Err(PlotError::Evaluation(EvaluationError::NonFinite { .. }))
        ));
    }

    #[test]
    fn zero_precision_is_rejected() {
        let frame = frame();
        let plot = HeightFieldPlot::new(&frame).of_function(|_x: f64, _y: f64| 0.0, 0);
        assert_eq!(plot.tessellate(), Err(PlotError::InvalidPrecision(0)));
        assert_eq!(plot.plot(), Err(PlotError::InvalidPrecision(0)));
    }

    #[test]
    fn oversized_precision_is_rejected_before_sampling() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        use crate::plot::style::MAX_PRECISION;

        let frame = frame();
        let calls = AtomicUsize::new(0);
        let counting = |_x: f64, _y: f64| {
            calls.fetch_add(1, Ordering::Relaxed);
            0.0
        };
        for precision in [MAX_PRECISION + 1, usize::MAX] {
            let plot = HeightFieldPlot::new(&frame).of_function(&counting, precision);
            assert_eq!(plot.tessellate(), Err(PlotError::InvalidPrecision(precision)));
            assert_eq!(plot.plot(), Err(PlotError::InvalidPrecision(precision)));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn lines_sit_on_the_surface() {
        let frame = frame();
        let plot = HeightFieldPlot::new(&frame).of_function(|x: f64, y: f64| 0.25 * (x - y), 4);
        let lines = plot.lines().unwrap();

        // Five ticks per axis at spacing 0.5 over [-1, 1].
        assert_eq!(lines.len(), 10);
        for line in &lines {
            for s in &line.segments {
                for p in [s.a, s.b] {
                    let g = frame.device_to_graph(p);
                    assert!((g.z - 0.25 * (g.x - g.y)).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn plot_paints_every_vertex() {
        let frame = frame();
        let output = HeightFieldPlot::new(&frame)
            .of_function(|x: f64, y: f64| (x * y).cos(), 6)
            .fill(Colormap::viridian(0.0, 1.0).unwrap())
            .plot()
            .unwrap();

        let surface = output.surface.unwrap();
        assert_eq!(surface.colors.as_ref().map(Vec::len), Some(49));
        assert!(output.strokes.is_empty());
        assert_eq!(output.diagnostics.evaluated_sample_count, 49);
        assert_eq!(output.diagnostics.face_count, 36);
    }
}
