use glam::{Mat4, Vec3};

use super::Color;

/// A solid-colored triangle. The primitive everything else renders down to.
///
/// Vertex winding is significant: after projection, counter-clockwise order in
/// screen XY marks the triangle as front-facing (see [`Triangle::is_visible`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
    pub color: Color,
}

impl Triangle {
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3, color: Color) -> Self {
        Self { p1, p2, p3, color }
    }

    pub fn vertex(&self, i: usize) -> Vec3 {
        match i {
            0 => self.p1,
            1 => self.p2,
            _ => self.p3,
        }
    }

    /// Apply a homogeneous transform to all three vertices, dividing by W.
    ///
    /// A zero W produces non-finite components; callers filter those out with
    /// [`Triangle::is_finite`] before the triangle reaches the depth sorter.
    pub fn transformed(&self, matrix: Mat4) -> Triangle {
        Triangle::new(
            matrix.project_point3(self.p1),
            matrix.project_point3(self.p2),
            matrix.project_point3(self.p3),
            self.color,
        )
    }

    /// Winding test over the XY components only.
    ///
    /// det > 0 -> points are counter clockwise (front-facing)
    /// det = 0 -> points are in line (degenerate, culled)
    /// det < 0 -> points are clockwise (back-facing, culled)
    pub fn is_visible(p1: Vec3, p2: Vec3, p3: Vec3) -> bool {
        let det = (p1.x * p2.y) + (p1.y * p3.x) + (p2.x * p3.y)
            - (p2.y * p3.x)
            - (p1.x * p3.y)
            - (p1.y * p2.x);
        det > 0.0
    }

    pub fn centroid(&self) -> Vec3 {
        (self.p1 + self.p2 + self.p3) / 3.0
    }

    pub fn is_finite(&self) -> bool {
        self.p1.is_finite() && self.p2.is_finite() && self.p3.is_finite()
    }

    /// True when every vertex lies inside the [-1, 1] clip range on Z.
    /// Triangles failing this are dropped whole, no true clipping happens.
    pub fn in_depth_range(&self) -> bool {
        self.p1.z.abs() <= 1.0 && self.p2.z.abs() <= 1.0 && self.p3.z.abs() <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversing_winding_flips_visibility() {
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(1.0, 0.0, 0.0);
        let p3 = Vec3::new(0.0, 1.0, 0.0);

        assert!(Triangle::is_visible(p1, p2, p3));
        assert!(!Triangle::is_visible(p1, p3, p2));
    }

    #[test]
    fn colinear_points_are_not_visible() {
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(1.0, 1.0, 0.0);
        let p3 = Vec3::new(2.0, 2.0, 0.0);

        assert!(!Triangle::is_visible(p1, p2, p3));
        assert!(!Triangle::is_visible(p1, p3, p2));
    }

    #[test]
    fn transform_divides_by_w() {
        let tri = Triangle::new(
            Vec3::new(2.0, 4.0, -2.0),
            Vec3::new(0.0, 2.0, -2.0),
            Vec3::new(2.0, 0.0, -2.0),
            Color::RED,
        );

        // W picks up -z, a bare perspective divide.
        let mut m = Mat4::ZERO;
        m.x_axis.x = 1.0;
        m.y_axis.y = 1.0;
        m.z_axis.z = 1.0;
        m.z_axis.w = -1.0;

        let t = tri.transformed(m);
        assert!((t.p1.x - 1.0).abs() < 1e-6);
        assert!((t.p1.y - 2.0).abs() < 1e-6);
        assert_eq!(t.color, Color::RED);
    }

    #[test]
    fn zero_w_is_detected_as_non_finite() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Color::WHITE);

        // Maps every vertex to W = 0.
        let mut m = Mat4::ZERO;
        m.x_axis.x = 1.0;
        m.y_axis.y = 1.0;
        m.z_axis.z = 1.0;

        assert!(!tri.transformed(m).is_finite());
    }
}
