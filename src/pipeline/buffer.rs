use glam::{Vec2, Vec3};
use minifb::Window;
use rayon::prelude::*;

use crate::core::{Color, Triangle};

/// CPU-side pixel buffer in minifb's `0RGB` layout, rasterized by rows.
///
/// There is no depth buffer. Triangles are painted in the order they arrive,
/// so the caller is responsible for handing them over back to front.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill every pixel with `color`, split across threads by row chunks.
    pub fn clear(&mut self, color: Color) {
        let packed = color.to_u32();
        self.data
            .par_chunks_mut(self.width)
            .for_each(|row| row.fill(packed));
    }

    /// Resize to match the window, dropping the old contents.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.data = vec![0; width * height];
    }

    /// Paint triangles in slice order, first entry deepest.
    pub fn draw_triangles(&mut self, triangles: &[Triangle]) {
        for tri in triangles {
            self.fill_triangle(tri);
        }
    }

    /// Hand the buffer to the window. minifb reports failures as strings, so
    /// wrap them into an io::Error for the caller's `?`.
    pub fn present(&self, window: &mut Window) -> std::io::Result<()> {
        window
            .update_with_buffer(&self.data, self.width, self.height)
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    /// NDC to pixel coordinates. NDC Y points up, pixel rows grow downward.
    fn to_screen(&self, p: Vec3) -> Vec2 {
        Vec2::new(
            (p.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - p.y) * 0.5 * self.height as f32,
        )
    }

    fn fill_triangle(&mut self, tri: &Triangle) {
        let a = self.to_screen(tri.p1);
        let b = self.to_screen(tri.p2);
        let c = self.to_screen(tri.p3);

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as usize;
        let max_x = (a.x.max(b.x).max(c.x).ceil() as usize).min(self.width.saturating_sub(1));
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as usize;
        let max_y = (a.y.max(b.y).max(c.y).ceil() as usize).min(self.height.saturating_sub(1));

        let packed = tri.color.to_u32();

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at the pixel center.
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if barycentric(p, a, b, c).is_some() {
                    self.data[y * self.width + x] = packed;
                }
            }
        }
    }
}

/// Barycentric coordinates of `p` in screen space, or None when `p` falls
/// outside the triangle or the triangle is degenerate.
fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<(f32, f32, f32)> {
    let denom = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if denom.abs() < 1e-10 {
        return None;
    }

    let w1 = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / denom;
    let w2 = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / denom;
    let w3 = 1.0 - w1 - w2;

    if w1 >= 0.0 && w2 >= 0.0 && w3 >= 0.0 {
        Some((w1, w2, w3))
    } else {
        None
    }
}
