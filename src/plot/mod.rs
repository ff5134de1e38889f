//! Plot construction on top of [`crate::geom`]: coordinate frames, colormaps,
//! the three tessellators and axes decoration.

pub mod axes;
pub mod color;
pub mod colormap;
pub mod expression;
pub mod frame;
pub mod function;
pub mod height_field;
pub mod parametric_curve;
pub mod parametric_surface;
pub mod sampler;
pub mod style;

pub use axes::{AxesDecoration, AxesStyle, TextAnchor, build_axes_decoration};
pub use color::{assign_vertex_colors, paint_mesh, paint_uniform};
pub use colormap::{Colormap, ColormapError, DEFAULT_STEPS};
pub use expression::Expression;
pub use frame::{
    CoordinateFrame, CoordinateFrameBuilder, DEVICE_END, DEVICE_START, FrameError, MAX_DIVISIONS,
    default_division_formatter,
};
pub use function::{EvaluationError, Function1, Function2};
pub use height_field::{DEFAULT_SURFACE_PRECISION, HeightFieldPlot};
pub use parametric_curve::{DEFAULT_CURVE_PRECISION, DEFAULT_CURVE_WIDTH, ParametricCurvePlot};
pub use parametric_surface::ParametricSurfacePlot;
pub use sampler::GridLine;
pub use style::{MAX_PRECISION, PlotError, PlotOutput, PlotStyle, StrokeStyle};
