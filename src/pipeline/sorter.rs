//! Painter's-algorithm depth ordering for projected triangles.
//!
//! Sorting by min or max Z alone mis-orders slanted triangles that reach past
//! each other in depth, so triangles are compared pairwise where they actually
//! meet on screen: at a 2D edge crossing, or failing that, at the centroid of
//! one triangle contained in the other's footprint. The Z of both triangles
//! at that shared X/Y decides who is drawn first.
//!
//! The result is an O(N^2) in-place adjustment, not a topological sort. Later
//! pairs see earlier swaps, and a cyclic overlap (A over B over C over A) has
//! no consistent answer here. That limitation is accepted.

use glam::Vec3;

use crate::core::Triangle;

/// Rejection threshold for near-parallel intersections, and the margin by
/// which an edge crossing must be interior to both segments.
pub const EPSILON: f32 = 1e-4;

/// Produce a draw-order permutation of `0..triangles.len()`.
///
/// Triangles must already be in clip space with +Z toward the viewer; the
/// index appearing later in the result is drawn later, i.e. on top.
pub fn sort_triangles(triangles: &[Triangle]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..triangles.len()).collect();

    for i in 0..order.len() {
        for j in (i + 1)..order.len() {
            let a = &triangles[order[i]];
            let b = &triangles[order[j]];

            if !boxes_overlap(a, b) {
                continue;
            }

            // First conflicting edge crossing decides the pair. Only when no
            // edges cross can one triangle still cover the other entirely.
            let depths = edge_crossing_depths(a, b).or_else(|| containment_depths(a, b));

            if let Some((depth_a, depth_b)) = depths {
                // Greater Z is nearer the camera and must be drawn later.
                if depth_a > depth_b {
                    order.swap(i, j);
                }
            }
        }
    }

    order
}

/// 2D axis-aligned bounding box overlap, X/Y only.
fn boxes_overlap(a: &Triangle, b: &Triangle) -> bool {
    let min_max = |v1: f32, v2: f32, v3: f32| (v1.min(v2).min(v3), v1.max(v2).max(v3));

    let (a_left, a_right) = min_max(a.p1.x, a.p2.x, a.p3.x);
    let (b_left, b_right) = min_max(b.p1.x, b.p2.x, b.p3.x);
    let (a_top, a_bottom) = min_max(a.p1.y, a.p2.y, a.p3.y);
    let (b_top, b_bottom) = min_max(b.p1.y, b.p2.y, b.p3.y);

    let width = a_right.min(b_right) - a_left.max(b_left);
    let height = a_bottom.min(b_bottom) - a_top.max(b_top);
    width > 0.0 && height > 0.0
}

/// Search the 9 edge pairs for a screen-space crossing. On the first crossing
/// interior to both segments, return the Z of each triangle's edge at that
/// point as `(depth_a, depth_b)`.
fn edge_crossing_depths(a: &Triangle, b: &Triangle) -> Option<(f32, f32)> {
    for edge_a in 0..3 {
        let a1 = a.vertex(edge_a);
        let dir_a = a.vertex((edge_a + 1) % 3) - a1;

        for edge_b in 0..3 {
            let b1 = b.vertex(edge_b);
            let dir_b = b.vertex((edge_b + 1) % 3) - b1;

            let Some((u, v)) = ray_intersect_2d(a1, dir_a, b1, dir_b, EPSILON) else {
                continue;
            };

            // The lines cross somewhere, but only a crossing strictly inside
            // both segments counts. The epsilon margin keeps shared vertices
            // and touching edges from producing bogus conflicts.
            if u <= EPSILON || u >= 1.0 - EPSILON || v <= EPSILON || v >= 1.0 - EPSILON {
                continue;
            }

            return Some(((a1 + dir_a * u).z, (b1 + dir_b * v).z));
        }
    }
    None
}

/// Containment fallback: if the centroid of one triangle lies inside the
/// other's 2D footprint, compare the centroid's own Z against the containing
/// triangle's surface Z at the same X/Y (found by a ray cast along +Z).
///
/// The centroid rather than a vertex avoids rounding trouble on triangles
/// that share an edge. Returns `(depth_a, depth_b)` or None when the
/// triangles don't overlap at all.
fn containment_depths(a: &Triangle, b: &Triangle) -> Option<(f32, f32)> {
    let centroid_a = a.centroid();
    if point_in_triangle_2d(centroid_a, b.p1, b.p2, b.p3) {
        let t = moeller_trumbore(centroid_a, Vec3::Z, b.p1, b.p2, b.p3, EPSILON)?;
        return Some((centroid_a.z, centroid_a.z + t));
    }

    let centroid_b = b.centroid();
    if point_in_triangle_2d(centroid_b, a.p1, a.p2, a.p3) {
        let t = moeller_trumbore(centroid_b, Vec3::Z, a.p1, a.p2, a.p3, EPSILON)?;
        return Some((centroid_b.z + t, centroid_b.z));
    }

    None
}

/// Solve `a_origin + a_dir * u == b_origin + b_dir * v` in X/Y, ignoring Z.
///
/// None when the directions are parallel (or one of them has no X/Y extent),
/// i.e. the 2x2 system is singular within `epsilon`.
pub fn ray_intersect_2d(
    a_origin: Vec3,
    a_dir: Vec3,
    b_origin: Vec3,
    b_dir: Vec3,
    epsilon: f32,
) -> Option<(f32, f32)> {
    let dx = b_origin.x - a_origin.x;
    let dy = b_origin.y - a_origin.y;

    let det = b_dir.x * a_dir.y - b_dir.y * a_dir.x;
    if det.abs() < epsilon {
        return None;
    }

    let u = (dy * b_dir.x - dx * b_dir.y) / det;
    let v = (dy * a_dir.x - dx * a_dir.y) / det;
    Some((u, v))
}

/// Sign-consistency point-in-triangle test over X/Y.
///
/// The point is inside iff it is not strictly left of one edge and strictly
/// right of another, which also accepts points exactly on an edge and works
/// for either vertex winding.
pub fn point_in_triangle_2d(pt: Vec3, v1: Vec3, v2: Vec3, v3: Vec3) -> bool {
    let sign =
        |p1: Vec3, p2: Vec3, p3: Vec3| (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y);

    let d1 = sign(pt, v1, v2);
    let d2 = sign(pt, v2, v3);
    let d3 = sign(pt, v3, v1);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Möller–Trumbore ray-triangle intersection.
///
/// Returns `t` such that `origin + direction * t` is the point where the ray
/// meets the triangle's plane inside its bounds, or None for a near-parallel
/// ray or a miss. `t` may be negative; the caller only needs the plane depth,
/// not a forward hit.
pub fn moeller_trumbore(
    origin: Vec3,
    direction: Vec3,
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    epsilon: f32,
) -> Option<f32> {
    let edge1 = v2 - v1;
    let edge2 = v3 - v1;

    let ray_cross_edge2 = direction.cross(edge2);
    let det = edge1.dot(ray_cross_edge2);
    if det.abs() < epsilon {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - v1;
    let u = inv_det * s.dot(ray_cross_edge2);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let s_cross_edge1 = s.cross(edge1);
    let v = inv_det * direction.dot(s_cross_edge1);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some(inv_det * edge2.dot(s_cross_edge1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    fn tri(p1: (f32, f32, f32), p2: (f32, f32, f32), p3: (f32, f32, f32)) -> Triangle {
        Triangle::new(
            Vec3::new(p1.0, p1.1, p1.2),
            Vec3::new(p2.0, p2.1, p2.2),
            Vec3::new(p3.0, p3.1, p3.2),
            Color::WHITE,
        )
    }

    #[test]
    fn disjoint_triangles_keep_their_order() {
        let triangles = vec![
            tri((-1.0, -1.0, 0.2), (-0.6, -1.0, 0.2), (-0.8, -0.6, 0.2)),
            tri((0.6, 0.6, 0.9), (1.0, 0.6, 0.9), (0.8, 1.0, 0.9)),
            tri((0.6, -1.0, -0.5), (1.0, -1.0, -0.5), (0.8, -0.6, -0.5)),
        ];

        assert_eq!(sort_triangles(&triangles), vec![0, 1, 2]);
    }

    #[test]
    fn crossing_edges_put_the_nearer_triangle_later() {
        // A crosses over B in screen space; A is nearer (greater Z).
        let a = tri((-0.5, 0.0, 0.5), (0.5, 0.0, 0.5), (0.0, 0.8, 0.5));
        let b = tri((-0.5, 0.4, -0.5), (0.5, 0.4, -0.5), (0.0, -0.6, -0.5));

        let order = sort_triangles(&[a, b]);
        assert_eq!(order, vec![1, 0], "far triangle must be drawn first");

        // Presenting them the other way round must not introduce a swap.
        let order = sort_triangles(&[b, a]);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn crossing_edge_depths_are_sampled_at_the_crossing() {
        // A slants from far to near, B sits at constant depth. At their
        // screen crossing A is behind B even though A's max Z is greater.
        let a = tri((-1.0, 0.1, -0.9), (1.0, 0.1, 0.9), (0.0, 1.0, 0.0));
        let b = tri((-0.4, -0.5, 0.0), (0.0, 0.5, 0.0), (-0.8, 0.5, 0.0));

        // The crossing lands near x = -0.16 where A's edge depth is about
        // -0.14, so A is farther there and must be drawn first.
        let order = sort_triangles(&[b, a]);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn contained_nearer_triangle_is_drawn_later() {
        let container = tri((-1.0, -1.0, -0.5), (1.0, -1.0, -0.5), (0.0, 1.5, -0.5));
        let inner = tri((-0.1, -0.1, 0.5), (0.1, -0.1, 0.5), (0.0, 0.1, 0.5));

        let order = sort_triangles(&[inner, container]);
        assert_eq!(order, vec![1, 0]);

        let order = sort_triangles(&[container, inner]);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn contained_farther_triangle_is_drawn_first() {
        let container = tri((-1.0, -1.0, 0.5), (1.0, -1.0, 0.5), (0.0, 1.5, 0.5));
        let inner = tri((-0.1, -0.1, -0.5), (0.1, -0.1, -0.5), (0.0, 0.1, -0.5));

        let order = sort_triangles(&[container, inner]);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a_origin = Vec3::new(0.0, 0.0, 0.0);
        let b_origin = Vec3::new(0.0, 1.0, 0.0);
        let dir = Vec3::new(1.0, 0.0, 0.0);

        assert_eq!(ray_intersect_2d(a_origin, dir, b_origin, dir, EPSILON), None);

        // A segment with no X/Y extent is parallel to everything.
        assert_eq!(
            ray_intersect_2d(a_origin, Vec3::new(0.0, 0.0, 1.0), b_origin, dir, EPSILON),
            None
        );
    }

    #[test]
    fn ray_intersect_solves_both_parameters() {
        let (u, v) = ray_intersect_2d(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            EPSILON,
        )
        .unwrap();

        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn point_in_triangle_accepts_inside_and_edges() {
        let v1 = Vec3::new(0.0, 0.0, 0.0);
        let v2 = Vec3::new(2.0, 0.0, 0.0);
        let v3 = Vec3::new(0.0, 2.0, 0.0);

        assert!(point_in_triangle_2d(Vec3::new(0.5, 0.5, 9.0), v1, v2, v3));
        assert!(point_in_triangle_2d(Vec3::new(1.0, 0.0, 0.0), v1, v2, v3));
        assert!(!point_in_triangle_2d(Vec3::new(2.0, 2.0, 0.0), v1, v2, v3));
        // Winding must not matter.
        assert!(point_in_triangle_2d(Vec3::new(0.5, 0.5, 0.0), v1, v3, v2));
    }

    #[test]
    fn moeller_trumbore_finds_the_plane_depth() {
        let v1 = Vec3::new(-1.0, -1.0, 0.25);
        let v2 = Vec3::new(1.0, -1.0, 0.25);
        let v3 = Vec3::new(0.0, 1.0, 0.25);

        let t = moeller_trumbore(Vec3::new(0.0, -0.5, 0.75), Vec3::Z, v1, v2, v3, EPSILON)
            .expect("ray over the triangle must hit");
        // t may be negative, only the plane depth matters.
        assert!((0.75 + t - 0.25).abs() < 1e-6);

        assert_eq!(
            moeller_trumbore(Vec3::new(5.0, 5.0, 0.0), Vec3::Z, v1, v2, v3, EPSILON),
            None
        );
    }

    #[test]
    fn moeller_trumbore_rejects_parallel_rays() {
        let v1 = Vec3::new(0.0, 0.0, 0.0);
        let v2 = Vec3::new(1.0, 0.0, 0.0);
        let v3 = Vec3::new(0.0, 0.0, 1.0);

        // Triangle lies in the XZ plane, a +Z ray runs inside that plane.
        assert_eq!(
            moeller_trumbore(Vec3::new(0.2, 0.0, -1.0), Vec3::Z, v1, v2, v3, EPSILON),
            None
        );
    }

    #[test]
    fn cube_faces_sort_back_to_front() {
        // Two parallel quads (4 triangles) standing in for the front and
        // back faces of a cube after projection. The quad halves only
        // conflict with the matching half of the other quad; each far half
        // must end up before its near counterpart.
        let far = [
            tri((-0.5, -0.5, -0.4), (0.5, -0.5, -0.4), (-0.5, 0.5, -0.4)),
            tri((0.5, 0.5, -0.4), (-0.5, 0.5, -0.4), (0.5, -0.5, -0.4)),
        ];
        let near = [
            tri((-0.6, -0.6, 0.4), (0.6, -0.6, 0.4), (-0.6, 0.6, 0.4)),
            tri((0.6, 0.6, 0.4), (-0.6, 0.6, 0.4), (0.6, -0.6, 0.4)),
        ];

        let input = vec![near[0], far[0], near[1], far[1]];
        let order = sort_triangles(&input);

        let position = |idx: usize| order.iter().position(|&o| o == idx).unwrap();
        // Indices 1 and 3 are far, 0 and 2 near.
        assert!(position(1) < position(0));
        assert!(position(3) < position(2));
    }
}
