pub mod buffer;
pub mod sorter;

pub use buffer::FrameBuffer;
pub use sorter::sort_triangles;

use glam::Mat4;
use rayon::prelude::*;

use crate::core::{Camera, Triangle};
use crate::cube::RubiksCube;

/// Project the puzzle through the camera and return its visible triangles in
/// back-to-front draw order, ready for [`FrameBuffer::draw_triangles`].
pub fn assemble_frame(cube: &RubiksCube, camera: &Camera) -> Vec<Triangle> {
    let world = cube.triangles();
    let projected = project_and_cull(&world, camera.view_projection());

    let order = sort_triangles(&projected);
    order.into_iter().map(|i| projected[i]).collect()
}

/// Projection and the three cheap rejection tests, fanned out with rayon.
/// Back-facing, non-finite and out-of-depth triangles never reach the sorter.
fn project_and_cull(triangles: &[Triangle], view_projection: Mat4) -> Vec<Triangle> {
    triangles
        .par_iter()
        .map(|tri| tri.transformed(view_projection))
        .filter(|tri| tri.is_finite())
        .filter(|tri| Triangle::is_visible(tri.p1, tri.p2, tri.p3))
        .filter(|tri| tri.in_depth_range())
        .collect()
}
