use glam::{Mat4, Vec3};

use crate::core::{Color, Triangle};

/// Unit cube centered about the origin, 12 triangles (2 per face in the order
/// front, right, back, left, top, down) plus one accumulated transform.
///
/// Triangles and their colors are fixed at construction; a cubie never changes
/// identity after that. Moves only rotate its transform and reassign which
/// lattice slot owns it.
#[derive(Debug, Clone)]
pub struct Cubie {
    triangles: [Triangle; 12],
    face_colors: [Color; 6],
    pub transform: Mat4,
}

impl Cubie {
    /// `face_colors` in face order front, right, back, left, top, down.
    pub fn new(face_colors: [Color; 6], transform: Mat4) -> Self {
        let r = Vec3::new(0.5, 0.0, 0.0);
        let t = Vec3::new(0.0, 0.5, 0.0);
        let f = Vec3::new(0.0, 0.0, 0.5);
        let l = -r;
        let d = -t;
        let b = -f;

        // Winding is chosen so every face is counter clockwise when seen from
        // outside the cube, which is what the visibility cull expects.
        let triangles = [
            // front
            Triangle::new(l + t + f, l + d + f, r + t + f, face_colors[0]),
            Triangle::new(r + d + f, r + t + f, l + d + f, face_colors[0]),
            // right
            Triangle::new(r + t + f, r + d + f, r + t + b, face_colors[1]),
            Triangle::new(r + d + b, r + t + b, r + d + f, face_colors[1]),
            // back
            Triangle::new(r + t + b, r + d + b, l + t + b, face_colors[2]),
            Triangle::new(l + d + b, l + t + b, r + d + b, face_colors[2]),
            // left
            Triangle::new(l + t + b, l + d + b, l + t + f, face_colors[3]),
            Triangle::new(l + d + f, l + t + f, l + d + b, face_colors[3]),
            // top
            Triangle::new(l + t + b, l + t + f, r + t + b, face_colors[4]),
            Triangle::new(r + t + f, r + t + b, l + t + f, face_colors[4]),
            // down
            Triangle::new(l + d + f, l + d + b, r + d + f, face_colors[5]),
            Triangle::new(r + d + b, r + d + f, l + d + b, face_colors[5]),
        ];

        Self {
            triangles,
            face_colors,
            transform,
        }
    }

    /// Compose a world-space rotation onto the accumulated transform.
    pub fn rotate(&mut self, rotation: Mat4) {
        self.transform = rotation * self.transform;
    }

    /// The cubie's immutable sticker colors, front right back left top down.
    pub fn face_colors(&self) -> &[Color; 6] {
        &self.face_colors
    }

    /// The 12 triangles in world space: base geometry through the cubie's own
    /// transform and then the whole-puzzle transform.
    pub fn world_triangles(&self, root: Mat4) -> impl Iterator<Item = Triangle> + '_ {
        let combined = root * self.transform;
        self.triangles.iter().map(move |t| t.transformed(combined))
    }
}
