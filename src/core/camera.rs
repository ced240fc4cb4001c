use std::f32::consts::{FRAC_PI_4, TAU};

use glam::{Mat4, Vec2, Vec3};
use log::error;

/// Orbit camera around a fixed look-at point.
///
/// The projection is built so that after the perspective divide +Z points
/// toward the viewer: the near plane maps to +1, the far plane to -1. The
/// depth sorter relies on this ("greater Z is drawn later") so the whole
/// pipeline shares one sign convention.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    /// Anything closer than this will not be rendered
    pub near: f32,
    /// Anything beyond this will not be rendered
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, look_at: Vec3, aspect_ratio: f32) -> Self {
        Camera {
            position,
            look_at,
            up: Vec3::Y,
            fov: FRAC_PI_4,
            aspect_ratio,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0))
            * Mat4::perspective_rh_gl(self.fov, self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Inverse of the rotational part of the view matrix. Maps screen-plane
    /// vectors back into world space for orbit and pan gestures.
    ///
    /// None when the camera basis is degenerate (position == look_at, or up
    /// parallel to the view direction). The caller must skip the gesture for
    /// that frame; letting the inverse through would feed NaN into the scene.
    fn inverse_view_rotation(&self) -> Option<Mat4> {
        let view = Mat4::look_at_rh(Vec3::ZERO, self.look_at - self.position, self.up);
        let det = view.determinant();
        if !det.is_finite() || det.abs() < f32::EPSILON {
            error!("degenerate camera basis (det = {det}), gesture dropped");
            return None;
        }
        Some(view.inverse())
    }

    /// Rotate the camera around the look-at point.
    ///
    /// `drag` is a screen-space direction normalized to window size, Y going
    /// down. The rotation axis is the XY unit vector 90 degrees counter
    /// clockwise to the drag, mapped from the screen plane into world space
    /// through the inverse view rotation; the drag length is the angle.
    pub fn orbit(&mut self, drag: Vec2) {
        let length = drag.length();
        if length == 0.0 {
            return;
        }

        // y goes top to bottom on screen, for the angle we want y up,
        // then 90 degrees to get the axis orthogonal to the drawn line.
        let angle = (-drag.y).atan2(drag.x) + std::f32::consts::FRAC_PI_2;
        let unit = Vec3::new(angle.cos(), angle.sin(), 0.0);

        let Some(inverse) = self.inverse_view_rotation() else {
            return;
        };
        let axis = inverse.transform_vector3(unit);

        let rotation = Mat4::from_axis_angle(-axis.normalize(), length * TAU);
        self.position = rotation.transform_point3(self.position);
        self.up = rotation.transform_vector3(self.up);
    }

    /// Slide both the camera and its look-at point parallel to the screen.
    pub fn pan(&mut self, drag: Vec2) {
        if drag == Vec2::ZERO {
            return;
        }

        // Moving the camera down/right looks like moving the scene up/left,
        // so both components are negated (drag Y is already screen-down).
        let Some(inverse) = self.inverse_view_rotation() else {
            return;
        };
        let movement = inverse.transform_vector3(Vec3::new(-drag.x, drag.y, 0.0));

        let scale = (self.position - self.look_at).length();
        let offset = movement * scale * 2.0;
        self.position += offset;
        self.look_at += offset;
    }

    /// Move toward or away from the look-at point on a logarithmic scale, so
    /// each scroll step feels the same regardless of current distance.
    pub fn zoom(&mut self, delta: f32) {
        let direction = self.position - self.look_at;
        let length = direction.length();
        if length == 0.0 {
            return;
        }

        let ln_length = length.ln() - delta / 10.0;
        self.position = direction.normalize() * ln_length.exp() + self.look_at;
    }
}
