#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod plot;

use std::fmt;

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

use geom::{PlotMesh, Point3, Rgba};
use plot::{
    AxesDecoration, AxesStyle, Colormap, CoordinateFrame, DEFAULT_CURVE_WIDTH, DEFAULT_STEPS,
    Expression, HeightFieldPlot, ParametricCurvePlot, ParametricSurfacePlot, PlotError,
    PlotOutput, StrokeStyle, TextAnchor, build_axes_decoration,
};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // A second call finds the logger already installed.
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("failed to start the rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Colormap range requested by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FillOptions {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_steps")]
    pub steps: usize,
}

fn default_steps() -> usize {
    DEFAULT_STEPS
}

/// Overlay line request; missing fields fall back to [`StrokeStyle`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    pub color: Option<Rgba>,
    pub width: Option<f64>,
}

/// Options object accepted by every `plot_*` call. `undefined` and `null`
/// mean "no fill, no strokes, no clipping" (curves keep their own strokes).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub fill: Option<FillOptions>,
    pub stroke: Option<LineOptions>,
    pub clip: bool,
}

impl PlotOptions {
    fn colormap(&self) -> Result<Option<Colormap>, PlotError> {
        self.fill
            .as_ref()
            .map(|fill| Colormap::build(fill.min, fill.max, fill.steps))
            .transpose()
            .map_err(PlotError::from)
    }

    fn line(&self, base: StrokeStyle) -> Option<(Rgba, f64)> {
        self.stroke.as_ref().map(|line| {
            (
                line.color.unwrap_or(base.color),
                line.width.unwrap_or(base.width),
            )
        })
    }
}

/// Render-ready buffers for one mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshExport {
    /// `[x0, y0, z0, x1, ...]`
    pub positions: Vec<f64>,
    /// Triangle list after fan triangulation.
    pub indices: Vec<u32>,
    /// `[r0, g0, b0, a0, r1, ...]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<f64>>,
    pub normals: Vec<f64>,
}

impl From<&PlotMesh> for MeshExport {
    fn from(mesh: &PlotMesh) -> Self {
        Self {
            positions: mesh.positions_flat().to_vec(),
            indices: mesh.triangulated(),
            colors: mesh.colors_flat().map(<[f64]>::to_vec),
            normals: mesh.compute_vertex_normals().as_flattened().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotExport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<MeshExport>,
    pub strokes: Vec<MeshExport>,
    /// Curve polyline in device space; empty for surfaces.
    pub curve: Vec<[f64; 3]>,
    pub summary: String,
    pub warnings: Vec<String>,
}

impl From<&PlotOutput> for PlotExport {
    fn from(output: &PlotOutput) -> Self {
        let curve = output
            .curve
            .first()
            .map(|first| first.a)
            .into_iter()
            .chain(output.curve.iter().map(|segment| segment.b))
            .map(Point3::to_array)
            .collect();

        Self {
            surface: output.surface.as_ref().map(MeshExport::from),
            strokes: output.strokes.iter().map(MeshExport::from).collect(),
            curve,
            summary: output.diagnostics.summary(),
            warnings: output.diagnostics.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelExport {
    pub text: String,
    pub position: [f64; 3],
}

impl From<&TextAnchor> for LabelExport {
    fn from(anchor: &TextAnchor) -> Self {
        Self {
            text: anchor.text.clone(),
            position: anchor.position.to_array(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxesExport {
    pub planes: Vec<MeshExport>,
    pub divisions: Vec<MeshExport>,
    pub axes: Vec<MeshExport>,
    pub tick_labels: Vec<LabelExport>,
    pub axis_labels: Vec<LabelExport>,
    pub font_size: f64,
    pub text_color: Rgba,
}

impl From<&AxesDecoration> for AxesExport {
    fn from(decoration: &AxesDecoration) -> Self {
        Self {
            planes: decoration.planes.iter().map(MeshExport::from).collect(),
            divisions: decoration.division_strokes.iter().map(MeshExport::from).collect(),
            axes: decoration.axis_strokes.iter().map(MeshExport::from).collect(),
            tick_labels: decoration.tick_labels.iter().map(LabelExport::from).collect(),
            axis_labels: decoration.axis_labels.iter().map(LabelExport::from).collect(),
            font_size: decoration.font_size,
            text_color: decoration.text_color,
        }
    }
}

/// Public entry point for JavaScript hosts.
///
/// Holds the current coordinate frame; every plot call is independent and
/// returns plain buffers for the renderer.
#[wasm_bindgen]
pub struct PlotEngine {
    frame: CoordinateFrame,
    axes_style: AxesStyle,
}

impl Default for PlotEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PlotEngine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> PlotEngine {
        PlotEngine {
            frame: CoordinateFrame::default(),
            axes_style: AxesStyle::default(),
        }
    }

    /// Replaces the coordinate frame. Each argument takes three values.
    #[wasm_bindgen]
    pub fn set_axes(
        &mut self,
        start: Vec<f64>,
        extent: Vec<f64>,
        divisions: Vec<f64>,
    ) -> Result<(), JsValue> {
        let start = triple("start", &start).map_err(|err| js_error(&err))?;
        let extent = triple("extent", &extent).map_err(|err| js_error(&err))?;
        let divisions = triple("divisions", &divisions).map_err(|err| js_error(&err))?;
        self.configure_axes(start, extent, divisions)
            .map_err(to_js_error)
    }

    /// Sets the three axis titles.
    #[wasm_bindgen]
    pub fn set_axis_labels(&mut self, x: &str, y: &str, z: &str) {
        self.axes_style = self.axes_style.clone().with_axis_labels([x, y, z]);
    }

    /// Plots `z = f(x, y)` given as an expression over `x` and `y`.
    #[wasm_bindgen]
    pub fn plot_surface(
        &self,
        expression: &str,
        precision: usize,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let options = parse_options(options)?;
        let export = self
            .surface_export(expression, precision, &options)
            .map_err(to_js_error)?;
        to_js_value(&export)
    }

    /// Plots `(x, y, z) = f(u, v)`, one expression per coordinate.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn plot_parametric_surface(
        &self,
        x: &str,
        y: &str,
        z: &str,
        u_start: f64,
        u_end: f64,
        v_start: f64,
        v_end: f64,
        precision: usize,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let options = parse_options(options)?;
        let export = self
            .parametric_surface_export(
                [x, y, z],
                (u_start, u_end),
                (v_start, v_end),
                precision,
                &options,
            )
            .map_err(to_js_error)?;
        to_js_value(&export)
    }

    /// Plots `(x, y, z) = f(t)`, one expression per coordinate.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn plot_curve(
        &self,
        x: &str,
        y: &str,
        z: &str,
        t_start: f64,
        t_end: f64,
        precision: usize,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let options = parse_options(options)?;
        let export = self
            .curve_export([x, y, z], (t_start, t_end), precision, &options)
            .map_err(to_js_error)?;
        to_js_value(&export)
    }

    /// Back planes, division and axis strokes, and label anchors for the
    /// current frame.
    #[wasm_bindgen]
    pub fn axes(&self) -> Result<JsValue, JsValue> {
        let export = self.axes_export().map_err(to_js_error)?;
        to_js_value(&export)
    }
}

impl PlotEngine {
    #[must_use]
    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    pub fn configure_axes(
        &mut self,
        start: [f64; 3],
        extent: [f64; 3],
        divisions: [f64; 3],
    ) -> Result<(), PlotError> {
        self.frame = CoordinateFrame::new(start, extent, divisions)?;
        debug_log!("axes set: start={start:?} extent={extent:?} divisions={divisions:?}");
        Ok(())
    }

    pub fn surface_export(
        &self,
        expression: &str,
        precision: usize,
        options: &PlotOptions,
    ) -> Result<PlotExport, PlotError> {
        let function = Expression::parse(expression, &["x", "y"])?;
        let mut plot = HeightFieldPlot::new(&self.frame).of_function(function, precision);
        if let Some(colormap) = options.colormap()? {
            plot = plot.fill(colormap);
        }
        if let Some((color, width)) = options.line(StrokeStyle::default()) {
            plot = plot.stroke(color, width);
        }
        if options.clip {
            plot = plot.clip();
        }
        Ok(PlotExport::from(&plot.plot()?))
    }

    pub fn parametric_surface_export(
        &self,
        expressions: [&str; 3],
        u_extent: (f64, f64),
        v_extent: (f64, f64),
        precision: usize,
        options: &PlotOptions,
    ) -> Result<PlotExport, PlotError> {
        let [fx, fy, fz] = parse_all(expressions, &["u", "v"])?;
        let mut plot = ParametricSurfacePlot::new(&self.frame)
            .of_function(fx, fy, fz, u_extent, v_extent, precision);
        if let Some(colormap) = options.colormap()? {
            plot = plot.fill(colormap);
        }
        if let Some((color, width)) = options.line(StrokeStyle::default()) {
            plot = plot.stroke(color, width);
        }
        if options.clip {
            plot = plot.clip();
        }
        Ok(PlotExport::from(&plot.plot()?))
    }

    /// Curves are always stroked; `options.stroke` only overrides color and
    /// width, and `options.fill` is ignored.
    pub fn curve_export(
        &self,
        expressions: [&str; 3],
        t_extent: (f64, f64),
        precision: usize,
        options: &PlotOptions,
    ) -> Result<PlotExport, PlotError> {
        let [fx, fy, fz] = parse_all(expressions, &["t"])?;
        let mut plot =
            ParametricCurvePlot::new(&self.frame).of_function(fx, fy, fz, t_extent, precision);
        let base = StrokeStyle {
            width: DEFAULT_CURVE_WIDTH,
            ..StrokeStyle::default()
        };
        if let Some((color, width)) = options.line(base) {
            plot = plot.stroke(color, width);
        }
        if options.clip {
            plot = plot.clip();
        }
        Ok(PlotExport::from(&plot.plot()?))
    }

    pub fn axes_export(&self) -> Result<AxesExport, PlotError> {
        let decoration = build_axes_decoration(&self.frame, &self.axes_style)?;
        Ok(AxesExport::from(&decoration))
    }
}

fn parse_all(sources: [&str; 3], variables: &[&str]) -> Result<[Expression; 3], PlotError> {
    let [x, y, z] = sources;
    Ok([
        Expression::parse(x, variables)?,
        Expression::parse(y, variables)?,
        Expression::parse(z, variables)?,
    ])
}

fn triple(name: &str, values: &[f64]) -> Result<[f64; 3], String> {
    <[f64; 3]>::try_from(values)
        .map_err(|_| format!("{name} needs 3 values, got {}", values.len()))
}

fn parse_options(options: JsValue) -> Result<PlotOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(PlotOptions::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(|err| JsError::new(&err.to_string()).into())
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()).into())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
