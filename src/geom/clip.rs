//! Clipping of plot meshes to the device cube `[-1, 1]^3`.
//!
//! Intersection is done per face: each polygon is cut against the six
//! half-spaces of the cube. Vertices created on a cut edge are cached by
//! `(edge, plane)`, so two faces sharing an edge share the new vertex and the
//! clipped surface stays connected.
//!
//! After the intersection, faces lying on one of the cube planes are removed.
//! Such crop faces appear wherever a surface is cut flush with the cube (and
//! would be the caps a solid boolean intersection adds). Classification uses a
//! fixed distance of `1e-4` from the plane to absorb floating-point jitter.

use std::collections::HashMap;

use super::diagnostics::PlotDiagnostics;
use super::mesh::{PlotMesh, Rgba};
use super::{Axis, BBox, Point3, Tolerance};

/// A coordinate above this value (or below its negation) lies on a cube plane
/// for crop-face classification.
pub const CROP_FACE_THRESHOLD: f64 = 1.0 - Tolerance::CROP_FACE.eps;

#[derive(Debug, Clone, Copy, PartialEq)]
struct CubePlane {
    axis: Axis,
    /// `+1.0` for the `coord = 1` plane, `-1.0` for `coord = -1`.
    sign: f64,
}

impl CubePlane {
    const ALL: [Self; 6] = [
        Self { axis: Axis::X, sign: 1.0 },
        Self { axis: Axis::X, sign: -1.0 },
        Self { axis: Axis::Y, sign: 1.0 },
        Self { axis: Axis::Y, sign: -1.0 },
        Self { axis: Axis::Z, sign: 1.0 },
        Self { axis: Axis::Z, sign: -1.0 },
    ];

    /// Signed distance, non-negative on the inside of the cube.
    fn distance(self, p: Point3) -> f64 {
        1.0 - self.sign * p.coord(self.axis)
    }

    fn id(self) -> u8 {
        let side = u8::from(self.sign < 0.0);
        self.axis.index() as u8 * 2 + side
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClipDiagnostics {
    pub input_vertex_count: usize,
    pub input_face_count: usize,
    pub output_vertex_count: usize,
    pub output_face_count: usize,
    /// Faces cut by at least one plane and kept.
    pub split_face_count: usize,
    /// Faces with nothing left inside the cube.
    pub discarded_face_count: usize,
    /// Faces removed by crop-face classification.
    pub crop_face_count: usize,
}

impl ClipDiagnostics {
    pub fn merge(&mut self, other: &ClipDiagnostics) {
        self.input_vertex_count += other.input_vertex_count;
        self.input_face_count += other.input_face_count;
        self.output_vertex_count += other.output_vertex_count;
        self.output_face_count += other.output_face_count;
        self.split_face_count += other.split_face_count;
        self.discarded_face_count += other.discarded_face_count;
        self.crop_face_count += other.crop_face_count;
    }

    /// Adds the clipping counts to plot-level diagnostics.
    pub fn record_into(&self, diagnostics: &mut PlotDiagnostics) {
        diagnostics.clipped_face_count += self.split_face_count;
        diagnostics.discarded_face_count += self.discarded_face_count;
        diagnostics.crop_face_count += self.crop_face_count;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipResult {
    pub mesh: PlotMesh,
    pub diagnostics: ClipDiagnostics,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ClipError {
    #[error("cannot clip invalid mesh: {0}")]
    InvalidMesh(String),
}

/// Returns `true` when every vertex of `face` lies on the same cube plane.
#[must_use]
pub fn is_crop_face(positions: &[[f64; 3]], face: &[u32]) -> bool {
    let coords = |axis: usize| face.iter().filter_map(move |&i| positions.get(i as usize).map(|p| p[axis]));

    (0..3).any(|axis| {
        coords(axis).all(|c| c > CROP_FACE_THRESHOLD) || coords(axis).all(|c| c < -CROP_FACE_THRESHOLD)
    })
}

/// Intersects `mesh` with the device cube and removes crop faces.
///
/// A mesh already inside the cube with no face on a cube plane is returned
/// unchanged. Otherwise the output keeps only referenced vertices: surviving
/// input vertices first (in input order), then the vertices created on cut
/// edges. Colors, when present, are interpolated onto new vertices.
pub fn clip_mesh_to_cube(mesh: &PlotMesh) -> Result<ClipResult, ClipError> {
    mesh.validate().map_err(ClipError::InvalidMesh)?;

    let mut diagnostics = ClipDiagnostics {
        input_vertex_count: mesh.vertex_count(),
        input_face_count: mesh.face_count(),
        ..Default::default()
    };

    let inside = mesh.bbox().is_none_or(|bbox| BBox::DEVICE_CUBE.contains_bbox(bbox));
    if inside && !mesh.faces.iter().any(|face| is_crop_face(&mesh.positions, face)) {
        diagnostics.output_vertex_count = mesh.vertex_count();
        diagnostics.output_face_count = mesh.face_count();
        return Ok(ClipResult {
            mesh: mesh.clone(),
            diagnostics,
        });
    }

    let mut clipper = PolygonClipper::new(mesh);
    let mut faces = Vec::with_capacity(mesh.face_count());

    for face in &mesh.faces {
        let all_inside = face.iter().all(|&i| clipper.is_inside(i));
        let polygon = if all_inside {
            face.clone()
        } else {
            let mut polygon = face.clone();
            for plane in CubePlane::ALL {
                polygon = clipper.clip_polygon(&polygon, plane);
                if polygon.len() < 3 {
                    break;
                }
            }
            dedup_ring(&mut polygon);
            if polygon.len() < 3 {
                diagnostics.discarded_face_count += 1;
                continue;
            }
            diagnostics.split_face_count += 1;
            polygon
        };

        if is_crop_face(&clipper.positions, &polygon) {
            diagnostics.crop_face_count += 1;
            continue;
        }
        faces.push(polygon);
    }

    let mesh = clipper.finish(faces);
    diagnostics.output_vertex_count = mesh.vertex_count();
    diagnostics.output_face_count = mesh.face_count();

    log::debug!(
        "clipped mesh: {} -> {} faces ({} split, {} outside, {} crop)",
        diagnostics.input_face_count,
        diagnostics.output_face_count,
        diagnostics.split_face_count,
        diagnostics.discarded_face_count,
        diagnostics.crop_face_count
    );

    Ok(ClipResult { mesh, diagnostics })
}

/// Clips every mesh independently. Meshes with no face left are omitted.
pub fn clip_meshes_to_cube(meshes: &[PlotMesh]) -> Result<(Vec<PlotMesh>, ClipDiagnostics), ClipError> {
    let mut out = Vec::with_capacity(meshes.len());
    let mut diagnostics = ClipDiagnostics::default();

    for mesh in meshes {
        let result = clip_mesh_to_cube(mesh)?;
        diagnostics.merge(&result.diagnostics);
        if !result.mesh.is_empty() {
            out.push(result.mesh);
        }
    }

    Ok((out, diagnostics))
}

/// Working buffers for clipping one mesh.
struct PolygonClipper {
    positions: Vec<[f64; 3]>,
    colors: Option<Vec<Rgba>>,
    input_vertex_count: usize,
    edge_cache: HashMap<(u32, u32, u8), u32>,
}

impl PolygonClipper {
    fn new(mesh: &PlotMesh) -> Self {
        Self {
            positions: mesh.positions.clone(),
            colors: mesh.colors.clone(),
            input_vertex_count: mesh.vertex_count(),
            edge_cache: HashMap::new(),
        }
    }

    fn point(&self, index: u32) -> Point3 {
        Point3::from_array(self.positions[index as usize])
    }

    fn is_inside(&self, index: u32) -> bool {
        BBox::DEVICE_CUBE.contains_point(self.point(index))
    }

    /// One Sutherland-Hodgman pass against `plane`.
    fn clip_polygon(&mut self, polygon: &[u32], plane: CubePlane) -> Vec<u32> {
        let n = polygon.len();
        let mut out = Vec::with_capacity(n + 1);

        for k in 0..n {
            let current = polygon[k];
            let next = polygon[(k + 1) % n];
            let current_in = plane.distance(self.point(current)) >= 0.0;
            let next_in = plane.distance(self.point(next)) >= 0.0;

            if current_in {
                out.push(current);
            }
            if current_in != next_in {
                out.push(self.split_edge(current, next, plane));
            }
        }

        out
    }

    /// Vertex where edge `(a, b)` crosses `plane`; exactly one endpoint is outside.
    fn split_edge(&mut self, a: u32, b: u32, plane: CubePlane) -> u32 {
        // Always interpolate from the lower index so both faces sharing the
        // edge compute bit-identical positions.
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let key = (lo, hi, plane.id());
        if let Some(&index) = self.edge_cache.get(&key) {
            return index;
        }

        let p = self.point(lo);
        let q = self.point(hi);
        let dp = plane.distance(p);
        let dq = plane.distance(q);

        let index = if dp == 0.0 {
            lo
        } else if dq == 0.0 {
            hi
        } else {
            let t = dp / (dp - dq);
            let point = p.lerp(q, t).with_coord(plane.axis, plane.sign);
            let index = self.positions.len() as u32;
            self.positions.push(point.to_array());
            if let Some(colors) = self.colors.as_mut() {
                let ca = colors[lo as usize];
                let cb = colors[hi as usize];
                colors.push(std::array::from_fn(|c| ca[c] + (cb[c] - ca[c]) * t));
            }
            index
        };

        self.edge_cache.insert(key, index);
        index
    }

    /// Drops unreferenced vertices and remaps face indices.
    fn finish(self, mut faces: Vec<Vec<u32>>) -> PlotMesh {
        let mut used = vec![false; self.positions.len()];
        for &i in faces.iter().flatten() {
            used[i as usize] = true;
        }

        let mut remap = vec![u32::MAX; self.positions.len()];
        let mut positions = Vec::new();
        let mut colors = self.colors.as_ref().map(|_| Vec::new());
        for (old, _) in used.iter().enumerate().filter(|(_, used)| **used) {
            remap[old] = positions.len() as u32;
            positions.push(self.positions[old]);
            if let (Some(src), Some(dst)) = (self.colors.as_ref(), colors.as_mut()) {
                dst.push(src[old]);
            }
        }

        for index in faces.iter_mut().flatten() {
            *index = remap[*index as usize];
        }

        debug_assert!(positions.len() <= self.input_vertex_count + self.edge_cache.len());

        PlotMesh {
            positions,
            faces,
            colors,
        }
    }
}

/// Removes consecutive duplicate indices, including across the wrap-around.
fn dedup_ring(polygon: &mut Vec<u32>) {
    polygon.dedup();
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_face_detection_per_axis() {
        let positions = vec![
            [1.0, -0.5, -0.5],
            [0.99995, 0.5, -0.5],
            [1.0, 0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-1.0, -1.0, -1.0],
            [0.3, -1.0, 0.2],
            [0.1, -0.99999, 0.9],
        ];

        assert!(is_crop_face(&positions, &[0, 1, 2]));
        assert!(!is_crop_face(&positions, &[0, 1, 3]));
        assert!(is_crop_face(&positions, &[4, 5, 6]));
    }

    #[test]
    fn dedup_ring_handles_wrap_around() {
        let mut ring = vec![3, 3, 4, 5, 3];
        dedup_ring(&mut ring);
        assert_eq!(ring, vec![3, 4, 5]);
    }

    #[test]
    fn triangle_outside_is_discarded() {
        let mesh = PlotMesh::new(
            vec![[2.0, 2.0, 0.0], [3.0, 2.0, 0.0], [2.0, 3.0, 0.0]],
            vec![vec![0, 1, 2]],
        );
        let result = clip_mesh_to_cube(&mesh).unwrap();
        assert!(result.mesh.is_empty());
        assert_eq!(result.mesh.vertex_count(), 0);
        assert_eq!(result.diagnostics.discarded_face_count, 1);
    }

    #[test]
    fn invalid_mesh_is_rejected() {
        let mesh = PlotMesh::new(vec![[0.0, 0.0, 0.0]], vec![vec![0, 1, 2]]);
        assert!(matches!(clip_mesh_to_cube(&mesh), Err(ClipError::InvalidMesh(_))));
    }

    #[test]
    fn split_vertex_interpolates_color() {
        let mesh = PlotMesh::new(
            vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.5, 0.0]],
            vec![vec![0, 1, 2]],
        )
        .with_colors(vec![
            [0.0, 0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0, 1.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);

        let result = clip_mesh_to_cube(&mesh).unwrap();
        let clipped = result.mesh;
        let colors = clipped.colors.as_ref().unwrap();
        assert_eq!(colors.len(), clipped.vertex_count());

        let on_edge = clipped
            .positions
            .iter()
            .position(|p| p[0] == 1.0 && p[1] == 0.0)
            .expect("split vertex on x = 1");
        assert!((colors[on_edge][0] - 0.5).abs() < 1e-12);
    }
}
