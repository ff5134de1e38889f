use std::f64::consts::{FRAC_PI_2, PI, TAU};

use plot3d_engine::PlotEngine;
use plot3d_engine::PlotOptions;
use plot3d_engine::geom::{Axis, PlotMesh, Point3, clip_mesh_to_cube, is_crop_face};
use plot3d_engine::plot::colormap::{STOP_HIGH, STOP_LOW, STOP_MID};
use plot3d_engine::plot::{
    AxesStyle, Colormap, CoordinateFrame, EvaluationError, Expression, HeightFieldPlot,
    ParametricCurvePlot, ParametricSurfacePlot, PlotError, build_axes_decoration,
    default_division_formatter,
};
use rand::Rng;

const EPS: f64 = 1e-9;

fn plot_frame(divisions: [f64; 3]) -> CoordinateFrame {
    CoordinateFrame::new([-1.0, -1.0, 0.0], [2.0, 2.0, 1.0], divisions).expect("valid frame")
}

fn assert_point_close(actual: Point3, expected: Point3) {
    assert!(
        actual.distance_to(expected) < EPS,
        "expected {expected:?}, got {actual:?}"
    );
}

fn assert_inside_cube(mesh: &PlotMesh) {
    for p in &mesh.positions {
        for c in p {
            assert!(c.abs() <= 1.0 + EPS, "vertex {p:?} leaves the device cube");
        }
    }
}

#[test]
fn graph_device_round_trip_is_exact_within_tolerance() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        let start: [f64; 3] = std::array::from_fn(|_| rng.random_range(-100.0..100.0));
        let extent: [f64; 3] = std::array::from_fn(|_| rng.random_range(0.01..50.0));
        let divisions = extent.map(|e| e / 10.0);
        let frame = CoordinateFrame::new(start, extent, divisions).expect("valid frame");

        for _ in 0..20 {
            let p = Point3::new(
                start[0] + rng.random_range(0.0..=1.0) * extent[0],
                start[1] + rng.random_range(0.0..=1.0) * extent[1],
                start[2] + rng.random_range(0.0..=1.0) * extent[2],
            );
            let device = frame.graph_to_device(p);
            for axis in Axis::ALL {
                assert!(device.coord(axis).abs() <= 1.0 + EPS);
            }
            let back = frame.device_to_graph(device);
            for axis in Axis::ALL {
                let scale = p.coord(axis).abs().max(1.0);
                assert!((back.coord(axis) - p.coord(axis)).abs() <= EPS * scale);
            }
        }
    }
}

#[test]
fn ticks_for_zero_origin_extent_two_spacing_half() {
    let frame = CoordinateFrame::new([0.0; 3], [2.0; 3], [0.5; 3]).unwrap();
    let [x, y, z] = frame.compute_divisions();
    assert_eq!(x, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    assert_eq!(x, y);
    assert_eq!(x, z);
}

#[test]
fn colormap_stops_and_clamping() {
    let map = Colormap::build(0.0, 1.0, 1000).unwrap();
    assert_eq!(map.query(0.0), STOP_LOW);
    assert_eq!(map.query(1.0), STOP_HIGH);
    assert_eq!(map.query(-5.0), map.query(0.0));
    assert_eq!(map.query(0.5), STOP_MID);
    assert_eq!(map.query(12.0), STOP_HIGH);
}

#[test]
fn flat_height_field_corners_map_back_to_graph_corners() {
    let frame = plot_frame([0.5, 0.5, 0.2]);
    let mesh = HeightFieldPlot::new(&frame)
        .of_function(|_x: f64, _y: f64| 0.0, 1)
        .tessellate()
        .unwrap();

    assert_eq!(mesh.vertex_count(), 4);
    let corners: Vec<Point3> = mesh
        .positions
        .iter()
        .map(|&p| frame.device_to_graph(Point3::from_array(p)))
        .collect();
    let expected = [
        Point3::new(-1.0, -1.0, 0.0),
        Point3::new(1.0, -1.0, 0.0),
        Point3::new(-1.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
    ];
    for (actual, expected) in corners.into_iter().zip(expected) {
        assert_point_close(actual, expected);
    }
}

#[test]
fn identity_parametric_surface_matches_flat_height_field() {
    // Device x/y span [-1, 1]; over u, v in [0, 1] the frame below maps
    // (u, v, 0) onto exactly the same device grid.
    let frame = CoordinateFrame::new([0.0; 3], [1.0; 3], [0.2; 3]).unwrap();
    let parametric = ParametricSurfacePlot::new(&frame)
        .of_function(
            |u: f64, _v: f64| u,
            |_u: f64, v: f64| v,
            |_u: f64, _v: f64| 0.0,
            (0.0, 1.0),
            (0.0, 1.0),
            6,
        )
        .tessellate()
        .unwrap();
    let height = HeightFieldPlot::new(&frame)
        .of_function(|_x: f64, _y: f64| 0.0, 6)
        .tessellate()
        .unwrap();

    assert_eq!(parametric.faces, height.faces);
    for (a, b) in parametric.positions.iter().zip(&height.positions) {
        assert_point_close(Point3::from_array(*a), Point3::from_array(*b));
    }
}

#[test]
fn unit_circle_curve_has_four_quarter_segments() {
    let frame = CoordinateFrame::new([-1.0; 3], [2.0; 3], [0.5; 3]).unwrap();
    let plot = ParametricCurvePlot::new(&frame).of_function(
        f64::cos,
        f64::sin,
        |_t: f64| 0.0,
        (0.0, TAU),
        4,
    );
    let segments = plot.tessellate().unwrap();
    assert_eq!(segments.len(), 4);

    let ts = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2, TAU];
    for (i, segment) in segments.iter().enumerate() {
        let expect = |t: f64| frame.graph_to_device(Point3::new(t.cos(), t.sin(), 0.0));
        assert_point_close(segment.a, expect(ts[i]));
        assert_point_close(segment.b, expect(ts[i + 1]));
    }
}

#[test]
fn clipping_inside_mesh_is_idempotent() {
    let frame = plot_frame([0.5, 0.5, 0.2]);
    let mesh = HeightFieldPlot::new(&frame)
        .of_function(|x: f64, y: f64| 0.25 + 0.1 * x * y, 8)
        .tessellate()
        .unwrap();

    let clipped = clip_mesh_to_cube(&mesh).unwrap();
    assert_eq!(clipped.mesh.vertex_count(), mesh.vertex_count());
    assert_eq!(clipped.mesh.face_count(), mesh.face_count());

    let again = clip_mesh_to_cube(&clipped.mesh).unwrap();
    assert_eq!(again.mesh, clipped.mesh);
}

#[test]
fn face_on_cube_boundary_is_removed() {
    let mesh = PlotMesh::new(
        vec![
            [0.0, -0.5, 0.0],
            [1.0, -0.5, 0.0],
            [1.0, 0.5, 0.0],
            [0.0, 0.5, 0.0],
            [1.0, -0.5, 0.5],
            [1.0, 0.5, 0.5],
        ],
        vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]],
    );
    assert!(is_crop_face(&mesh.positions, &mesh.faces[1]));

    let clipped = clip_mesh_to_cube(&mesh).unwrap();
    assert_eq!(clipped.mesh.face_count(), 1);
    assert_eq!(clipped.diagnostics.crop_face_count, 1);
    assert!(
        clipped
            .mesh
            .faces
            .iter()
            .all(|face| !is_crop_face(&clipped.mesh.positions, face))
    );
}

#[test]
fn basic_3d_plot_scenario() {
    let frame = plot_frame([0.2, 0.2, 0.2]);
    let output = HeightFieldPlot::new(&frame)
        .of_function(|x: f64, y: f64| y.exp() * x.cos(), 20)
        .fill(Colormap::viridian(0.0, 1.0).unwrap())
        .stroke([0.0, 0.0, 0.5, 0.0], 0.01)
        .plot()
        .unwrap();

    let surface = output.surface.as_ref().unwrap();
    assert_eq!(surface.vertex_count(), 21 * 21);
    assert_eq!(surface.face_count(), 400);
    assert!(surface.validate().is_ok());

    // Eleven ticks along each of x and y, twenty segments per line.
    assert_eq!(output.lines.len(), 22);
    assert_eq!(output.strokes.len(), 22 * 20);
    assert!(output.diagnostics.is_clean());
    assert!(!output.diagnostics.was_clipped());
}

#[test]
fn clipped_uv_plot_scenario() {
    let frame = CoordinateFrame::new([-1.0, -1.0, 0.0], [2.0, 2.0, 7.0], [0.5, 0.5, 2.0]).unwrap();
    let output = ParametricSurfacePlot::new(&frame)
        .of_function(
            |u: f64, v: f64| u * v.cos(),
            |u: f64, v: f64| u * v.sin(),
            |_u: f64, v: f64| v,
            (0.0, 1.0),
            (-PI, 3.0 * PI),
            100,
        )
        .fill(Colormap::viridian(0.0, 1.0).unwrap())
        .clip()
        .plot()
        .unwrap();

    let surface = output.surface.expect("part of the helicoid is inside the cube");
    assert!(surface.validate().is_ok());
    assert_inside_cube(&surface);
    assert_eq!(
        surface.colors.as_ref().map(Vec::len),
        Some(surface.vertex_count())
    );
    assert!(output.diagnostics.was_clipped());
    assert!(output.diagnostics.clipped_face_count > 0);
    assert!(output.diagnostics.discarded_face_count > 0);
    assert!(
        surface
            .faces
            .iter()
            .all(|face| !is_crop_face(&surface.positions, face))
    );
}

#[test]
fn basic_t_plot_scenario() {
    let frame = plot_frame([0.5, 0.5, 0.2]);
    let output = ParametricCurvePlot::new(&frame)
        .of_function(
            |t: f64| t * (20.0 * t).cos(),
            |t: f64| t * (20.0 * t).sin(),
            |t: f64| t,
            (0.0, 1.0),
            100,
        )
        .plot()
        .unwrap();

    assert!(output.surface.is_none());
    assert_eq!(output.curve.len(), 100);
    assert_eq!(output.strokes.len(), 100);
    assert_eq!(output.diagnostics.evaluated_sample_count, 101);
    assert_point_close(output.curve[0].a, Point3::new(0.0, 0.0, -1.0));
    assert!((output.curve[99].b.z - 1.0).abs() < EPS);
}

#[test]
fn clipped_painted_surface_keeps_a_color_per_vertex() {
    let frame = plot_frame([0.5, 0.5, 0.2]);
    let output = HeightFieldPlot::new(&frame)
        .of_function(|x: f64, y: f64| 2.0 * x * y, 12)
        .fill(Colormap::viridian(0.0, 1.0).unwrap())
        .stroke([0.0, 0.0, 0.0, 1.0], 0.01)
        .clip()
        .plot()
        .unwrap();

    for mesh in output.meshes() {
        assert_inside_cube(mesh);
        assert_eq!(mesh.colors.as_ref().map(Vec::len), Some(mesh.vertex_count()));
    }
}

#[test]
fn zero_length_segments_do_not_abort_the_plot() {
    let frame = plot_frame([0.5, 0.5, 0.2]);
    // Constant for t < 0.5, so the first half of the polyline collapses.
    let output = ParametricCurvePlot::new(&frame)
        .of_function(
            |t: f64| t.max(0.5),
            |_t: f64| 0.0,
            |_t: f64| 0.5,
            (0.0, 1.0),
            10,
        )
        .plot()
        .unwrap();

    assert_eq!(output.diagnostics.skipped_segment_count, 5);
    assert_eq!(output.strokes.len(), 5);
    assert_eq!(output.diagnostics.warnings.len(), 5);
}

#[test]
fn nan_from_expression_aborts_tessellation() {
    let frame = plot_frame([0.5, 0.5, 0.2]);
    let function = Expression::parse("sqrt(x)", &["x", "y"]).unwrap();
    let err = HeightFieldPlot::new(&frame)
        .of_function(function, 4)
        .plot()
        .unwrap_err();
    match err {
        PlotError::Evaluation(EvaluationError::NonFinite { input, value }) => {
            assert!(value.is_nan());
            assert!(input[0] < 0.0);
        }
        other => panic!("expected NonFinite, got {other:?}"),
    }
}

#[test]
fn division_labels_use_padded_format() {
    let frame = plot_frame([0.5, 0.5, 0.2]);
    assert_eq!(
        frame.tick_labels(Axis::X, default_division_formatter),
        vec!["-1.0", "-0.5", " 0.0", " 0.5", " 1.0"]
    );

    let decoration = build_axes_decoration(&frame, &AxesStyle::default()).unwrap();
    assert!(
        decoration
            .tick_labels
            .iter()
            .any(|label| label.text == "-0.5" && label.axis == Axis::X)
    );
}

#[test]
fn engine_plots_expressions_end_to_end() {
    let mut engine = PlotEngine::new();
    engine
        .configure_axes([-1.0, -1.0, 0.0], [2.0, 2.0, 7.0], [0.5, 0.5, 2.0])
        .unwrap();

    let options = PlotOptions {
        clip: true,
        ..PlotOptions::default()
    };
    let export = engine
        .parametric_surface_export(
            ["u * cos(v)", "u * sin(v)", "v"],
            (0.0, 1.0),
            (-PI, 3.0 * PI),
            40,
            &options,
        )
        .unwrap();

    let surface = export.surface.unwrap();
    assert!(surface.positions.iter().all(|c| c.abs() <= 1.0 + EPS));
    assert_eq!(surface.indices.len() % 3, 0);
    assert!(export.summary.contains("clipped:"));
}
