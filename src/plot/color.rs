//! Per-vertex coloring of plot meshes.

use crate::geom::{PlotMesh, Rgba};

use super::colormap::Colormap;

/// Colors for every vertex, looked up by device height: `(z + 1) / 2`.
#[must_use]
pub fn assign_vertex_colors(mesh: &PlotMesh, colormap: &Colormap) -> Vec<Rgba> {
    mesh.positions
        .iter()
        .map(|p| colormap.query((p[2] + 1.0) / 2.0))
        .collect()
}

/// Stores height colors on the mesh, replacing any existing colors.
pub fn paint_mesh(mesh: &mut PlotMesh, colormap: &Colormap) {
    mesh.colors = Some(assign_vertex_colors(mesh, colormap));
}

pub fn paint_uniform(mesh: &mut PlotMesh, color: Rgba) {
    mesh.colors = Some(vec![color; mesh.vertex_count()]);
}
