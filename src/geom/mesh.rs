use super::{BBox, Point3, Vec3};

/// Per-vertex RGBA color with components in `[0, 1]`.
pub type Rgba = [f64; 4];

/// Polygon mesh handed from the tessellators to coloring, clipping and the host.
///
/// Faces are ordered index lists with at least three entries. They are meant to
/// be planar but nothing enforces it (a parametric grid quad may be twisted).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotMesh {
    pub positions: Vec<[f64; 3]>,
    pub faces: Vec<Vec<u32>>,
    /// Optional colors, parallel to `positions`.
    pub colors: Option<Vec<Rgba>>,
}

impl PlotMesh {
    /// Create a mesh with positions and faces only.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            positions,
            faces,
            colors: None,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Rgba>) -> Self {
        self.colors = Some(colors);
        self
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[must_use]
    pub fn position(&self, index: u32) -> Option<Point3> {
        self.positions.get(index as usize).copied().map(Point3::from_array)
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all face indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.faces.iter().flatten().all(|&i| (i as usize) < n)
    }

    /// Returns true if every face has at least three corners.
    #[must_use]
    pub fn has_valid_faces(&self) -> bool {
        self.faces.iter().all(|face| face.len() >= 3)
    }

    #[must_use]
    pub fn has_valid_color_length(&self) -> bool {
        self.colors
            .as_ref()
            .is_none_or(|colors| colors.len() == self.positions.len())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_valid_faces() {
            return Err("mesh has a face with fewer than 3 vertices".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if !self.has_valid_color_length() {
            return Err("mesh color buffer does not match vertex count".to_string());
        }
        Ok(())
    }

    /// Position buffer as a flat slice: `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    /// Color buffer as a flat slice: `[r0, g0, b0, a0, r1, ...]`.
    #[must_use]
    pub fn colors_flat(&self) -> Option<&[f64]> {
        self.colors.as_deref().map(<[Rgba]>::as_flattened)
    }

    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(self.positions.iter().copied().map(Point3::from_array))
    }

    /// Fan-triangulates every face into a flat triangle index list.
    ///
    /// Faces are assumed convex, which holds for grid quads, cylinder caps and
    /// polygons clipped against the cube.
    #[must_use]
    pub fn triangulated(&self) -> Vec<u32> {
        let triangle_count: usize = self.faces.iter().map(|f| f.len().saturating_sub(2)).sum();
        let mut indices = Vec::with_capacity(triangle_count * 3);
        for face in &self.faces {
            let Some((&first, rest)) = face.split_first() else {
                continue;
            };
            for pair in rest.windows(2) {
                indices.extend_from_slice(&[first, pair[0], pair[1]]);
            }
        }
        indices
    }

    /// Area-weighted face normal (Newell's method). Not normalized.
    #[must_use]
    pub fn face_normal(&self, face: &[u32]) -> Vec3 {
        let mut normal = Vec3::ZERO;
        for (k, &i) in face.iter().enumerate() {
            let j = face[(k + 1) % face.len()];
            let (Some(a), Some(b)) = (self.position(i), self.position(j)) else {
                continue;
            };
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        normal * 0.5
    }

    /// Smooth per-vertex normals accumulated from area-weighted face normals.
    ///
    /// Vertices not referenced by any face (or only by degenerate faces) get
    /// `+Z`.
    #[must_use]
    pub fn compute_vertex_normals(&self) -> Vec<[f64; 3]> {
        let mut sums = vec![Vec3::ZERO; self.positions.len()];
        for face in &self.faces {
            let n = self.face_normal(face);
            for &i in face {
                if let Some(sum) = sums.get_mut(i as usize) {
                    *sum = *sum + n;
                }
            }
        }
        sums.into_iter()
            .map(|n| {
                let n = n.normalized().unwrap_or(Vec3::Z);
                [n.x, n.y, n.z]
            })
            .collect()
    }

    /// Appends `other`, offsetting its indices.
    ///
    /// Colors are kept only when both meshes carry them (or `self` is empty).
    pub fn append(&mut self, other: &PlotMesh) {
        let offset = self.positions.len() as u32;
        let was_empty = self.positions.is_empty();

        self.colors = match (self.colors.take(), other.colors.as_ref()) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend_from_slice(theirs);
                Some(mine)
            }
            (None, Some(theirs)) if was_empty => Some(theirs.clone()),
            _ => None,
        };

        self.positions.extend_from_slice(&other.positions);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|face| face.iter().map(|&i| i + offset).collect::<Vec<_>>()),
        );
    }
}
