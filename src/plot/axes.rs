//! Axes decoration: back planes, division strokes, axis strokes and label
//! anchors around the device cube.
//!
//! Text is not rendered here. Labels come out as anchors (string plus device
//! position) and the host is expected to draw and camera-align them.

use crate::geom::{
    Axis, PlotDiagnostics, PlotMesh, PlotMetrics, Point3, Rgba, Segment3, TimingBucket, Vec3,
};

use super::color::paint_uniform;
use super::frame::{CoordinateFrame, DEVICE_END, DEVICE_START, default_division_formatter};
use super::style::{PlotError, StrokeStyle, build_strokes};

/// Tick labels closer than this to the far end of their axis are hidden.
const LABEL_WINDOW: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct AxesStyle {
    /// Colors of the x, y and z axis strokes.
    pub axis_colors: [Rgba; 3],
    pub division_color: Rgba,
    pub plane_color: Rgba,
    pub text_color: Rgba,
    pub division_radius: f64,
    pub axis_radius: f64,
    pub radial_segments: usize,
    pub font_size: f64,
    /// Per-axis offset added to each tick label anchor.
    pub text_offsets: [Vec3; 3],
    pub axis_labels: [String; 3],
    /// Absolute device positions of the axis labels.
    pub axis_label_positions: [Point3; 3],
    pub formatters: [fn(f64) -> String; 3],
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            axis_colors: [
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
            ],
            division_color: [0.0, 0.0, 0.0, 1.0],
            plane_color: [0.8, 0.8, 0.8, 1.0],
            text_color: [0.0, 0.0, 0.0, 1.0],
            division_radius: 0.01,
            axis_radius: 0.02,
            radial_segments: StrokeStyle::default().radial_segments,
            font_size: 0.15,
            text_offsets: [
                Vec3::new(0.0, -0.25, -0.05),
                Vec3::new(0.05, -0.05, -0.05),
                Vec3::new(0.05, 0.0, -0.05),
            ],
            axis_labels: ["X".to_string(), "Y".to_string(), "Z".to_string()],
            axis_label_positions: [
                Point3::new(1.4, 0.0, -1.1),
                Point3::new(0.0, -1.4, -1.1),
                Point3::new(1.4, 1.1, 0.0),
            ],
            formatters: [default_division_formatter; 3],
        }
    }
}

impl AxesStyle {
    #[must_use]
    pub fn with_axis_labels(mut self, labels: [&str; 3]) -> Self {
        self.axis_labels = labels.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, axis: Axis, formatter: fn(f64) -> String) -> Self {
        self.formatters[axis.index()] = formatter;
        self
    }

    fn division_stroke(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.division_color,
            width: self.division_radius,
            radial_segments: self.radial_segments,
        }
    }

    fn axis_stroke(&self, axis: Axis) -> StrokeStyle {
        StrokeStyle {
            color: self.axis_colors[axis.index()],
            width: self.axis_radius,
            radial_segments: self.radial_segments,
        }
    }
}

/// A string to draw at a device-space position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnchor {
    pub axis: Axis,
    pub text: String,
    pub position: Point3,
    /// Graph-space tick value; `None` for axis titles.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxesDecoration {
    /// Back planes at `y = 1`, `x = -1` and `z = -1`, in that order.
    pub planes: Vec<PlotMesh>,
    pub division_strokes: Vec<PlotMesh>,
    /// One stroke per axis, x then y then z.
    pub axis_strokes: Vec<PlotMesh>,
    pub tick_labels: Vec<TextAnchor>,
    pub axis_labels: Vec<TextAnchor>,
    pub font_size: f64,
    pub text_color: Rgba,
    pub diagnostics: PlotDiagnostics,
}

impl AxesDecoration {
    /// Planes, then division strokes, then axis strokes.
    pub fn meshes(&self) -> impl Iterator<Item = &PlotMesh> {
        self.planes
            .iter()
            .chain(&self.division_strokes)
            .chain(&self.axis_strokes)
    }
}

/// The face of the cube a back plane lies on.
#[derive(Debug, Clone, Copy)]
enum BackPlane {
    /// `y = 1`, spanned by x and z.
    Xz,
    /// `x = -1`, spanned by y and z.
    Yz,
    /// `z = -1`, spanned by x and y.
    Xy,
}

impl BackPlane {
    const ALL: [Self; 3] = [Self::Xz, Self::Yz, Self::Xy];

    fn corners(self) -> [Point3; 4] {
        let (s, e) = (DEVICE_START, DEVICE_END);
        match self {
            Self::Xz => [
                Point3::new(s, e, s),
                Point3::new(e, e, s),
                Point3::new(e, e, e),
                Point3::new(s, e, e),
            ],
            Self::Yz => [
                Point3::new(s, s, s),
                Point3::new(s, e, s),
                Point3::new(s, e, e),
                Point3::new(s, s, e),
            ],
            Self::Xy => [
                Point3::new(s, s, s),
                Point3::new(e, s, s),
                Point3::new(e, e, s),
                Point3::new(s, e, s),
            ],
        }
    }

    fn mesh(self, color: Rgba) -> PlotMesh {
        let positions = self.corners().map(Point3::to_array).to_vec();
        let mut mesh = PlotMesh::new(positions, vec![vec![0, 1, 2, 3]]);
        paint_uniform(&mut mesh, color);
        mesh
    }

    /// Division segments across the plane for one tick at device position
    /// `pa` on `axis`. `None` when `axis` does not lie in this plane.
    fn division(self, axis: Axis, pa: f64) -> Option<Segment3> {
        let (s, e) = (DEVICE_START, DEVICE_END);
        let (a, b) = match (self, axis) {
            (Self::Xz, Axis::X) => (Point3::new(pa, e, s), Point3::new(pa, e, e)),
            (Self::Xz, Axis::Z) => (Point3::new(s, e, pa), Point3::new(e, e, pa)),
            (Self::Yz, Axis::Y) => (Point3::new(s, pa, s), Point3::new(s, pa, e)),
            (Self::Yz, Axis::Z) => (Point3::new(s, s, pa), Point3::new(s, e, pa)),
            (Self::Xy, Axis::X) => (Point3::new(pa, s, s), Point3::new(pa, e, s)),
            (Self::Xy, Axis::Y) => (Point3::new(s, pa, s), Point3::new(e, pa, s)),
            _ => return None,
        };
        Some(Segment3::new(a, b))
    }
}

/// Tick label anchor for `axis` at device position `pa`, or `None` when the
/// tick is outside the visible window for that axis.
fn tick_label_position(axis: Axis, pa: f64, offset: Vec3) -> Option<Point3> {
    let (s, e) = (DEVICE_START, DEVICE_END);
    let (visible, base) = match axis {
        Axis::X => (pa < LABEL_WINDOW, Point3::new(pa, s, s)),
        Axis::Y => (pa > -LABEL_WINDOW && pa < LABEL_WINDOW, Point3::new(e, pa, s)),
        Axis::Z => (pa > -LABEL_WINDOW, Point3::new(e, e, pa)),
    };
    visible.then(|| base + offset)
}

fn axis_segment(axis: Axis) -> Segment3 {
    let (s, e) = (DEVICE_START, DEVICE_END);
    match axis {
        Axis::X => Segment3::new(Point3::new(s, e, s), Point3::new(e, e, s)),
        Axis::Y => Segment3::new(Point3::new(s, s, s), Point3::new(s, e, s)),
        Axis::Z => Segment3::new(Point3::new(s, e, s), Point3::new(s, e, e)),
    }
}

/// Builds the decoration geometry for `frame`.
///
/// Ticks come from [`CoordinateFrame::compute_divisions`]; each plane carries
/// division strokes for its two in-plane axes.
pub fn build_axes_decoration(
    frame: &CoordinateFrame,
    style: &AxesStyle,
) -> Result<AxesDecoration, PlotError> {
    let mut metrics = PlotMetrics::default();
    metrics.begin();
    let mut diagnostics = PlotDiagnostics::new();

    let mut decoration = metrics.time(TimingBucket::Decoration, || -> Result<_, PlotError> {
        let values = frame.compute_divisions();
        let positions = frame.division_positions();

        let planes = BackPlane::ALL
            .iter()
            .map(|plane| plane.mesh(style.plane_color))
            .collect();

        let mut division_segments = Vec::new();
        for plane in BackPlane::ALL {
            for axis in Axis::ALL {
                division_segments.extend(
                    positions[axis.index()]
                        .iter()
                        .filter_map(|&pa| plane.division(axis, pa)),
                );
            }
        }
        let division_strokes =
            build_strokes(&division_segments, &style.division_stroke(), &mut diagnostics)?;

        let mut axis_strokes = Vec::with_capacity(3);
        for axis in Axis::ALL {
            let segment = axis_segment(axis);
            axis_strokes.extend(build_strokes([&segment], &style.axis_stroke(axis), &mut diagnostics)?);
        }

        let mut tick_labels = Vec::new();
        for axis in Axis::ALL {
            let i = axis.index();
            for (&value, &pa) in values[i].iter().zip(&positions[i]) {
                if let Some(position) = tick_label_position(axis, pa, style.text_offsets[i]) {
                    tick_labels.push(TextAnchor {
                        axis,
                        text: (style.formatters[i])(value),
                        position,
                        value: Some(value),
                    });
                }
            }
        }

        let axis_labels = Axis::ALL
            .iter()
            .map(|&axis| TextAnchor {
                axis,
                text: style.axis_labels[axis.index()].clone(),
                position: style.axis_label_positions[axis.index()],
                value: None,
            })
            .collect();

        Ok(AxesDecoration {
            planes,
            division_strokes,
            axis_strokes,
            tick_labels,
            axis_labels,
            font_size: style.font_size,
            text_color: style.text_color,
            diagnostics: PlotDiagnostics::default(),
        })
    })?;

    diagnostics.stroke_count = decoration.division_strokes.len() + decoration.axis_strokes.len();
    diagnostics.vertex_count = decoration.meshes().map(PlotMesh::vertex_count).sum();
    diagnostics.face_count = decoration.meshes().map(PlotMesh::face_count).sum();
    diagnostics.timing = metrics.end();
    log::debug!(
        "axes decoration: {} tick labels, {}",
        decoration.tick_labels.len(),
        diagnostics.summary()
    );
    decoration.diagnostics = diagnostics;

    Ok(decoration)
}
