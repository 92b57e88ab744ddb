use glam::{Vec3, Vec4, Vec4Swizzles};
use serde::{Deserialize, Serialize};

use super::camera::Camera;

/// Size of the render surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Pixel position in the label overlay's coordinate convention
///
/// The overlay measures x mirrored relative to the canvas, so `x` is
/// negative for on-screen points. Use [`ScreenPoint::canvas_x`] for the
/// canvas convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn canvas_x(&self) -> f32 {
        -self.x
    }
}

/// Project a world point to normalized device coordinates
pub fn world_to_ndc(point: Vec3, camera: &Camera) -> Vec3 {
    let clip = camera.view_projection() * Vec4::from((point, 1.0));
    clip.xyz() / clip.w
}

/// Map a world point to overlay pixel coordinates
///
/// Points behind the camera are not clamped; they land wherever the
/// perspective divide puts them.
pub fn world_to_screen(point: Vec3, camera: &Camera, viewport: Viewport) -> ScreenPoint {
    let ndc = world_to_ndc(point, camera);
    ndc_to_screen(ndc.x, ndc.y, viewport)
}

pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, viewport: Viewport) -> ScreenPoint {
    ScreenPoint {
        x: (viewport.width / 2.0) * (ndc_x + 1.0) * -1.0,
        y: (viewport.height / 2.0) * (-ndc_y + 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ndc_corners() {
        let viewport = Viewport::new(800.0, 600.0);

        let top_left = ndc_to_screen(-1.0, 1.0, viewport);
        assert_abs_diff_eq!(top_left.canvas_x(), 0.0);
        assert_abs_diff_eq!(top_left.y, 0.0);

        let bottom_right = ndc_to_screen(1.0, -1.0, viewport);
        assert_abs_diff_eq!(bottom_right.canvas_x(), 800.0);
        assert_abs_diff_eq!(bottom_right.y, 600.0);
    }

    #[test]
    fn test_overlay_x_is_mirrored() {
        let viewport = Viewport::new(800.0, 600.0);
        let center = ndc_to_screen(0.0, 0.0, viewport);
        assert_abs_diff_eq!(center.x, -400.0);
        assert_abs_diff_eq!(center.y, 300.0);
    }

    #[test]
    fn test_point_above_target_is_higher_on_screen() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 200.0), 1.0);
        camera.look_at(Vec3::ZERO);
        let viewport = Viewport::new(400.0, 400.0);

        let center = world_to_screen(Vec3::ZERO, &camera, viewport);
        let above = world_to_screen(Vec3::new(0.0, 10.0, 0.0), &camera, viewport);
        assert!(above.y < center.y);
    }
}
