mod clip;
mod core;
mod diagnostics;
mod grid;
mod mesh;
mod metrics;
mod stroke;

pub use clip::{
    CROP_FACE_THRESHOLD, ClipDiagnostics, ClipError, ClipResult, clip_mesh_to_cube,
    clip_meshes_to_cube, is_crop_face,
};
pub use core::{Axis, BBox, Point3, Tolerance, Vec3};
pub use diagnostics::PlotDiagnostics;
pub use grid::{grid_coordinate, quad_grid_faces};
pub use mesh::{PlotMesh, Rgba};
pub use metrics::{PlotMetrics, PlotTimingReport, TimingBucket};
pub use stroke::{Segment3, StrokeError, StrokeOptions, cylinder_between};

#[cfg(test)]
mod tests;
