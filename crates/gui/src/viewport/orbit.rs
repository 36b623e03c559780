use glam::{Vec2, Vec3};

use super::camera::CameraState;

/// Free-look orbit control used in dollhouse mode.
///
/// The engine disables it while a panorama is shown or a teleport is in
/// flight, and re-syncs it from the camera afterwards.
pub trait OrbitControl {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    /// Adopt the camera's current position/target as the orbit state
    fn sync(&mut self, camera: &CameraState);
    /// Rotate by a pointer delta (screen units)
    fn rotate(&mut self, delta: Vec2, camera: &mut CameraState);
    /// Dolly in/out; positive delta moves away
    fn zoom(&mut self, delta: f32, camera: &mut CameraState);
}

/// Arc-ball orbit around a target point
#[derive(Debug, Clone)]
pub struct ArcBallOrbit {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Orbit target point
    pub target: Vec3,
    /// Radians per screen unit of drag
    pub rotate_speed: f32,
    /// Fractional distance change per wheel unit
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    enabled: bool,
}

impl ArcBallOrbit {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 6.0,
            target: Vec3::ZERO,
            rotate_speed: 0.01,
            zoom_speed: 0.001,
            min_distance: 0.5,
            max_distance: 500.0,
            enabled: true,
        }
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    fn apply(&self, camera: &mut CameraState) {
        camera.position = self.eye_position();
        camera.target = self.target;
    }
}

impl Default for ArcBallOrbit {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitControl for ArcBallOrbit {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn sync(&mut self, camera: &CameraState) {
        let offset = camera.position - camera.target;
        let distance = offset.length();
        self.target = camera.target;
        if distance <= f32::EPSILON {
            return;
        }
        self.distance = distance;
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
    }

    fn rotate(&mut self, delta: Vec2, camera: &mut CameraState) {
        if !self.enabled {
            return;
        }
        self.yaw -= delta.x * self.rotate_speed;
        self.pitch = (self.pitch + delta.y * self.rotate_speed).clamp(-1.5, 1.5);
        self.apply(camera);
    }

    fn zoom(&mut self, delta: f32, camera: &mut CameraState) {
        if !self.enabled {
            return;
        }
        self.distance = (self.distance * (1.0 + delta * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);
        self.apply(camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_round_trips_camera() {
        let cam = CameraState {
            position: Vec3::new(3.0, 4.0, 5.0),
            target: Vec3::new(1.0, 0.0, 1.0),
            ..CameraState::default()
        };
        let mut orbit = ArcBallOrbit::new();
        orbit.sync(&cam);
        assert!((orbit.eye_position() - cam.position).length() < 1e-4);
    }

    #[test]
    fn test_disabled_orbit_ignores_input() {
        let mut cam = CameraState::default();
        let before = cam;
        let mut orbit = ArcBallOrbit::new();
        orbit.sync(&cam);
        orbit.set_enabled(false);
        orbit.rotate(Vec2::new(50.0, 10.0), &mut cam);
        orbit.zoom(100.0, &mut cam);
        assert_eq!(cam, before);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut cam = CameraState::default();
        let mut orbit = ArcBallOrbit::new();
        orbit.sync(&cam);
        orbit.zoom(-1.0e6, &mut cam);
        assert!((orbit.distance - orbit.min_distance).abs() < 1e-6);
    }
}
