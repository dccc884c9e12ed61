use glam::{Mat4, Vec3};
use winit::dpi::PhysicalSize;

/// Fixed perspective camera shared by every object in a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y_degrees: 90.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, self.forward, self.up)
    }

    /// Right-handed projection with wgpu's 0..1 depth range.
    ///
    /// A zero-height size is treated as square.
    pub fn projection(&self, size: PhysicalSize<u32>) -> Mat4 {
        let aspect = if size.height == 0 {
            1.0
        } else {
            size.width as f32 / size.height as f32
        };
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn clip(camera: &Camera, p: Vec3) -> Vec3 {
        let c = camera.projection(PhysicalSize::new(800, 600)) * camera.view() * p.extend(1.0);
        c.truncate() / c.w
    }

    #[test]
    fn default_view_is_identity() {
        assert_eq!(Camera::default().view(), Mat4::IDENTITY);
    }

    #[test]
    fn depth_spans_near_to_far() {
        let cam = Camera::default();
        assert!(clip(&cam, Vec3::new(0.0, 0.0, -0.1)).z.abs() < 1e-5);
        assert!((clip(&cam, Vec3::new(0.0, 0.0, -100.0)).z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ninety_degree_fov_maps_unit_slope_to_edge() {
        let cam = Camera::default();
        let top = clip(&cam, Vec3::new(0.0, 2.0, -2.0));
        assert!((top.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn aspect_follows_drawable_size() {
        let cam = Camera::default();
        let wide = cam.projection(PhysicalSize::new(1600, 800)) * Vec4::new(1.0, 1.0, -1.0, 1.0);
        assert!((wide.x * 2.0 - wide.y).abs() < 1e-5);
    }
}
