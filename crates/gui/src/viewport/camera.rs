use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;

/// Camera parameters shared between the engine and the renderer.
///
/// This is also the snapshot taken when entering a panorama, so it is a
/// plain value type: restoring it is a copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view (degrees)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(8.0, 6.4, 8.0),
            target: Vec3::ZERO,
            fov: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraState {
    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Unit vector from position towards target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Project a 3D point to viewport coordinates (origin top-left).
    /// Returns `None` for points behind the camera.
    pub fn project(&self, point: Vec3, viewport: Vec2) -> Option<Vec2> {
        let aspect = viewport.x / viewport.y.max(1.0);
        let p = self.view_projection(aspect) * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }

    /// Cast a ray from a viewport position (origin top-left) into the scene
    pub fn screen_ray(&self, screen_pos: Vec2, viewport: Vec2) -> Ray {
        let aspect = viewport.x / viewport.y.max(1.0);

        // Screen → NDC
        let ndc_x = screen_pos.x / (viewport.x * 0.5) - 1.0;
        let ndc_y = 1.0 - screen_pos.y / (viewport.y * 0.5);

        let vp_inv = self.view_projection(aspect).inverse();

        let near_world = vp_inv * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.position,
            direction: (far - near).normalize_or_zero(),
        }
    }
}
