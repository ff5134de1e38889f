use std::collections::HashMap;

use crate::geom::{PlotMesh, Point3, Segment3, StrokeError, StrokeOptions, cylinder_between};

/// Counts how many faces use each undirected edge.
fn edge_uses(mesh: &PlotMesh) -> HashMap<(u32, u32), usize> {
    let mut uses = HashMap::new();
    for face in &mesh.faces {
        for (k, &a) in face.iter().enumerate() {
            let b = face[(k + 1) % face.len()];
            *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    uses
}

#[test]
fn cylinder_stroke_is_watertight() {
    let mesh = cylinder_between(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 2.0),
        0.5,
        StrokeOptions { radial_segments: 16 },
    )
    .expect("stroke should succeed");

    let uses = edge_uses(&mesh);
    assert!(uses.values().all(|&n| n == 2), "expected every edge shared by two faces");
}

#[test]
fn cylinder_caps_face_outward() {
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(0.0, 0.0, 1.0);
    let n = 8;
    let mesh = cylinder_between(a, b, 0.1, StrokeOptions { radial_segments: n }).expect("stroke");

    let bottom = mesh.face_normal(&mesh.faces[n]);
    let top = mesh.face_normal(&mesh.faces[n + 1]);
    assert!(bottom.z < 0.0);
    assert!(top.z > 0.0);

    let side = mesh.face_normal(&mesh.faces[0]);
    assert!(side.z.abs() < 1e-12);
}

#[test]
fn diagonal_segment_has_expected_length_and_bounds() {
    let segment = Segment3::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5));
    assert!((segment.length() - 3.0_f64.sqrt()).abs() < 1e-12);

    let mesh = cylinder_between(segment.a, segment.b, 0.01, StrokeOptions::default()).expect("stroke");
    let bbox = mesh.bbox().expect("bbox");
    assert!(bbox.min.x > -0.52 && bbox.max.x < 0.52);
}

#[test]
fn coincident_endpoints_are_degenerate() {
    let p = Point3::new(0.1, 0.2, 0.3);
    let q = Point3::new(0.1, 0.2, 0.3 + 1e-14);
    assert_eq!(
        cylinder_between(p, q, 0.01, StrokeOptions::default()),
        Err(StrokeError::DegenerateSegment(p))
    );
}
