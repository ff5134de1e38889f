//! Structured grid topology shared by the surface tessellators.
//!
//! Vertices are laid out row-major with the first grid coordinate varying
//! fastest: vertex `(i, j)` has index `j * (divisions + 1) + i`.

/// Device-space coordinate of grid line `index` out of `divisions`.
///
/// Spans `[-1, 1]`; the last line lands exactly on `1.0`.
#[must_use]
pub fn grid_coordinate(index: usize, divisions: usize) -> f64 {
    if index >= divisions {
        return 1.0;
    }
    2.0 * index as f64 / divisions as f64 - 1.0
}

/// Quad faces of a `(divisions + 1) x (divisions + 1)` vertex grid.
///
/// Each quad is wound counter-clockwise when seen from `+Z`
/// (`(i,j) -> (i+1,j) -> (i+1,j+1) -> (i,j+1)`).
#[must_use]
pub fn quad_grid_faces(divisions: usize) -> Vec<Vec<u32>> {
    let stride = divisions + 1;
    let mut faces = Vec::with_capacity(divisions * divisions);

    for j in 0..divisions {
        for i in 0..divisions {
            let i0 = (j * stride + i) as u32;
            let i1 = (j * stride + i + 1) as u32;
            let i2 = ((j + 1) * stride + i) as u32;
            let i3 = ((j + 1) * stride + i + 1) as u32;

            faces.push(vec![i0, i1, i3, i2]);
        }
    }

    faces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_coordinate_spans_device_range() {
        assert_eq!(grid_coordinate(0, 4), -1.0);
        assert_eq!(grid_coordinate(2, 4), 0.0);
        assert_eq!(grid_coordinate(4, 4), 1.0);
        assert_eq!(grid_coordinate(3, 3), 1.0);
    }

    #[test]
    fn single_cell_grid_has_one_quad() {
        assert_eq!(quad_grid_faces(1), vec![vec![0, 1, 3, 2]]);
    }

    #[test]
    fn face_counts_scale_with_divisions() {
        let faces = quad_grid_faces(20);
        assert_eq!(faces.len(), 400);
        let max_index = faces.iter().flatten().copied().max().unwrap();
        assert_eq!(max_index as usize, 21 * 21 - 1);
    }
}
