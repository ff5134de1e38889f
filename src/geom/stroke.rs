//! Stroke geometry: closed cylinders drawn along overlay line segments.
//!
//! Renderers have no notion of line width, so every overlay segment (grid
//! lines on a surface, the pieces of a parametric curve, axes and division
//! lines) is turned into a thin capped cylinder mesh.

use super::mesh::PlotMesh;
use super::{Point3, Tolerance, Vec3};

/// Line segment between two device-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment3 {
    pub a: Point3,
    pub b: Point3,
}

impl Segment3 {
    #[must_use]
    pub const fn new(a: Point3, b: Point3) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn direction(self) -> Vec3 {
        self.b.sub_point(self.a)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.direction().length()
    }
}

/// Options for cylinder generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeOptions {
    /// Number of segments around the circular cross-section.
    pub radial_segments: usize,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self { radial_segments: 32 }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum StrokeError {
    #[error("stroke segment has zero length at {0:?}")]
    DegenerateSegment(Point3),
    #[error("stroke radius must be finite and > 0, got {0}")]
    InvalidRadius(f64),
    #[error("stroke requires at least 3 radial segments, got {0}")]
    NotEnoughRadialSegments(usize),
    #[error("stroke endpoints must be finite")]
    NonFiniteInput,
}

/// Builds a closed cylinder of `radius` whose axis runs from `a` to `b`.
///
/// Vertex layout: ring around `a` first, then the ring around `b`, each with
/// `radial_segments` vertices. Faces: one quad per side segment plus one
/// n-gon cap at each end, all wound outward.
pub fn cylinder_between(
    a: Point3,
    b: Point3,
    radius: f64,
    options: StrokeOptions,
) -> Result<PlotMesh, StrokeError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(StrokeError::NonFiniteInput);
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(StrokeError::InvalidRadius(radius));
    }
    let n = options.radial_segments;
    if n < 3 {
        return Err(StrokeError::NotEnoughRadialSegments(n));
    }

    let axis = b.sub_point(a);
    if Tolerance::ZERO_LENGTH.is_zero_length(axis.length()) {
        return Err(StrokeError::DegenerateSegment(a));
    }
    let (Some(dir), Some(u)) = (axis.normalized(), axis.any_perpendicular()) else {
        return Err(StrokeError::DegenerateSegment(a));
    };
    let v = dir.cross(u);

    let mut positions = Vec::with_capacity(2 * n);
    for center in [a, b] {
        for k in 0..n {
            let theta = std::f64::consts::TAU * k as f64 / n as f64;
            let offset = u * (radius * theta.cos()) + v * (radius * theta.sin());
            positions.push((center + offset).to_array());
        }
    }

    let n32 = n as u32;
    let mut faces = Vec::with_capacity(n + 2);
    for k in 0..n32 {
        let next = (k + 1) % n32;
        faces.push(vec![k, next, n32 + next, n32 + k]);
    }
    faces.push((0..n32).rev().collect());
    faces.push((n32..2 * n32).collect());

    Ok(PlotMesh::new(positions, faces))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_has_expected_topology() {
        let mesh = cylinder_between(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            0.1,
            StrokeOptions { radial_segments: 8 },
        )
        .unwrap();

        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.face_count(), 10);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn cylinder_rings_sit_at_radius() {
        let a = Point3::new(-0.5, 0.2, 0.1);
        let b = Point3::new(0.5, -0.3, 0.4);
        let mesh = cylinder_between(a, b, 0.02, StrokeOptions::default()).unwrap();
        let n = StrokeOptions::default().radial_segments;

        for (k, p) in mesh.positions.iter().enumerate() {
            let center = if k < n { a } else { b };
            let d = Point3::from_array(*p).distance_to(center);
            assert!((d - 0.02).abs() < 1e-12, "vertex {k} at distance {d}");
        }
    }

    #[test]
    fn zero_length_segment_is_degenerate() {
        let p = Point3::new(0.3, 0.3, 0.3);
        let err = cylinder_between(p, p, 0.01, StrokeOptions::default()).unwrap_err();
        assert_eq!(err, StrokeError::DegenerateSegment(p));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let a = Point3::ORIGIN;
        let b = Point3::new(1.0, 0.0, 0.0);
        assert_eq!(
            cylinder_between(a, b, 0.0, StrokeOptions::default()).unwrap_err(),
            StrokeError::InvalidRadius(0.0)
        );
        assert_eq!(
            cylinder_between(a, b, 0.1, StrokeOptions { radial_segments: 2 }).unwrap_err(),
            StrokeError::NotEnoughRadialSegments(2)
        );
        assert_eq!(
            cylinder_between(a, Point3::new(f64::NAN, 0.0, 0.0), 0.1, StrokeOptions::default())
                .unwrap_err(),
            StrokeError::NonFiniteInput
        );
    }
}
