//! Panorama look direction and field-of-view accumulators

use glam::Vec3;

use crate::settings::LookSettings;
use crate::viewport::camera::CameraState;

/// Viewer position inside a panorama
pub const PANORAMA_EYE: Vec3 = Vec3::ZERO;

/// Unit look direction for yaw/pitch in degrees.
/// Yaw 0° looks down +X, yaw 90° down +Z.
pub fn look_direction(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin())
}

/// Yaw/pitch/fov accumulators driven by drags, wheel and pinch
#[derive(Debug, Clone, PartialEq)]
pub struct PanoramaLook {
    /// Degrees, unbounded
    pub yaw: f32,
    /// Degrees, clamped to ±pitch_limit
    pub pitch: f32,
    /// Degrees, clamped to [min_fov, max_fov]
    pub fov: f32,
    settings: LookSettings,
}

impl PanoramaLook {
    pub fn new(settings: LookSettings) -> Self {
        Self {
            yaw: settings.default_yaw,
            pitch: settings.default_pitch,
            fov: settings.default_fov,
            settings,
        }
    }

    pub fn reset(&mut self) {
        self.yaw = self.settings.default_yaw;
        self.pitch = self.settings.default_pitch;
        self.fov = self.settings.default_fov.clamp(self.settings.min_fov, self.settings.max_fov);
    }

    /// Apply a yaw/pitch change in degrees
    pub fn turn(&mut self, d_yaw: f32, d_pitch: f32) {
        if !d_yaw.is_finite() || !d_pitch.is_finite() {
            return;
        }
        self.yaw += d_yaw;
        let limit = self.settings.pitch_limit;
        self.pitch = (self.pitch + d_pitch).clamp(-limit, limit);
    }

    /// Wheel delta; positive zooms out
    pub fn wheel(&mut self, delta: f32) {
        self.adjust_fov(delta * self.settings.wheel_coefficient);
    }

    /// Change in pinch distance; spreading fingers zooms in
    pub fn pinch(&mut self, delta: f32) {
        self.adjust_fov(-delta * self.settings.pinch_coefficient);
    }

    fn adjust_fov(&mut self, change: f32) {
        if !change.is_finite() {
            return;
        }
        self.fov = (self.fov + change).clamp(self.settings.min_fov, self.settings.max_fov);
    }

    pub fn direction(&self) -> Vec3 {
        look_direction(self.yaw, self.pitch)
    }

    /// Camera oriented along the current look direction
    pub fn camera(&self) -> CameraState {
        CameraState {
            position: PANORAMA_EYE,
            target: PANORAMA_EYE + self.direction(),
            fov: self.fov,
            near: self.settings.near,
            far: self.settings.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_clamped_after_any_drags() {
        let mut look = PanoramaLook::new(LookSettings::default());
        let deltas = [500.0, -3.0, 1.0e6, -1.0e6, 42.0, -84.0, 90.0];
        for d in deltas {
            look.turn(d, d);
            assert!((-85.0..=85.0).contains(&look.pitch));
        }
    }

    #[test]
    fn test_fov_clamped_after_any_inputs() {
        let mut look = PanoramaLook::new(LookSettings::default());
        let deltas = [1.0e9, -1.0e9, 3.0, -700.0, f32::NAN, 120.0, f32::INFINITY];
        for d in deltas {
            look.wheel(d);
            assert!((30.0..=100.0).contains(&look.fov), "wheel {d} -> {}", look.fov);
            look.pinch(d);
            assert!((30.0..=100.0).contains(&look.fov), "pinch {d} -> {}", look.fov);
        }
    }

    #[test]
    fn test_pinch_spread_zooms_in() {
        let mut look = PanoramaLook::new(LookSettings::default());
        look.pinch(20.0);
        assert!((look.fov - 72.0).abs() < 1e-4);
        look.wheel(100.0);
        assert!((look.fov - 77.0).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_wraps_through_direction() {
        let a = look_direction(10.0, 0.0);
        let b = look_direction(370.0, 0.0);
        assert!((a - b).length() < 1e-4);
        assert!((look_direction(90.0, 0.0) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut look = PanoramaLook::new(LookSettings::default());
        look.turn(40.0, 20.0);
        look.wheel(100.0);
        look.reset();
        assert_eq!((look.yaw, look.pitch, look.fov), (0.0, 0.0, 75.0));
    }
}
