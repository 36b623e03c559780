//! Pointer routing and per-frame updates

use glam::Vec2;

use super::{Mode, Tour};
use crate::gesture::{Gesture, PointerEvent};
use crate::interaction;
use crate::markers::pulse_scale;
use crate::renderer::Renderer;
use crate::viewport::camera::CameraState;
use crate::viewport::orbit::OrbitControl;
use crate::viewport::picking::MarkerLayer;

/// Pinch distance change → orbit dolly units
const PINCH_DOLLY_FACTOR: f32 = 5.0;

impl<R: Renderer, O: OrbitControl> Tour<R, O> {
    /// Feed one raw pointer event; returns the gesture it produced
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<Gesture> {
        let gesture = self.gestures.handle(event)?;
        match gesture {
            Gesture::Tap(pos) => {
                self.tap(pos);
            }
            Gesture::Drag(delta) => match self.mode {
                Mode::Panorama => {
                    let scale = self.settings.gesture.drag_scale;
                    self.look.turn(-delta.x * scale, delta.y * scale);
                    self.renderer.set_camera(self.look.camera());
                }
                Mode::Dollhouse => self.orbit_camera(|orbit, camera| orbit.rotate(delta, camera)),
            },
            Gesture::Pinch(delta) => match self.mode {
                Mode::Panorama => {
                    self.look.pinch(delta);
                    self.renderer.set_camera(self.look.camera());
                }
                Mode::Dollhouse => {
                    self.orbit_camera(|orbit, camera| orbit.zoom(-delta * PINCH_DOLLY_FACTOR, camera))
                }
            },
            Gesture::Wheel(delta) => match self.mode {
                Mode::Panorama => {
                    self.look.wheel(delta);
                    self.renderer.set_camera(self.look.camera());
                }
                Mode::Dollhouse => self.orbit_camera(|orbit, camera| orbit.zoom(delta, camera)),
            },
        }
        Some(gesture)
    }

    /// Resolve a tap against the layer that is interactive in the current mode
    pub fn tap(&mut self, pos: Vec2) -> bool {
        if self.is_animating() {
            return false;
        }
        let layer = match self.mode {
            Mode::Dollhouse => MarkerLayer::Hotspot,
            Mode::Panorama => MarkerLayer::Floor,
        };
        match interaction::resolve(&self.renderer, &self.registry, pos, layer) {
            Some(object) => self.activate(object),
            None => false,
        }
    }

    /// Advance animations by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.elapsed_s += dt_ms / 1000.0;

        if let Some(teleport) = self.teleport.as_mut() {
            let mut camera = self.renderer.camera();
            let done = teleport.advance(dt_ms, &mut camera);
            self.renderer.set_camera(camera);
            if done {
                self.teleport = None;
                self.orbit.sync(&camera);
                self.orbit.set_enabled(self.mode == Mode::Dollhouse);
            }
        }

        if self.mode == Mode::Panorama {
            self.renderer.set_camera(self.look.camera());
        }

        if let Some(opacity) = self.fade.advance(dt_ms) {
            self.renderer.set_panorama_opacity(opacity);
        }

        let scale = pulse_scale(self.elapsed_s, &self.settings.markers);
        for id in self.registry.ids() {
            self.renderer.set_marker_scale(id, scale);
        }
    }

    fn orbit_camera(&mut self, apply: impl FnOnce(&mut O, &mut CameraState)) {
        if !self.orbit.is_enabled() {
            return;
        }
        let mut camera = self.renderer.camera();
        apply(&mut self.orbit, &mut camera);
        self.renderer.set_camera(camera);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::super::Mode;
    use crate::gesture::PointerEvent;
    use crate::harness::TestHarness;

    #[test]
    fn test_drag_turns_panorama_view() {
        let mut h = TestHarness::with_sample_tour();
        assert!(h.tour.enter_panorama(1));
        h.tour.handle_pointer(PointerEvent::Down {
            pos: Vec2::new(100.0, 100.0),
            time_ms: 0.0,
        });
        h.tour.handle_pointer(PointerEvent::Move {
            pos: Vec2::new(110.0, 90.0),
        });
        let look = h.tour.look();
        assert!((look.yaw - (-3.0)).abs() < 1e-4);
        assert!((look.pitch - (-3.0)).abs() < 1e-4);
        assert_eq!(h.tour.mode(), Mode::Panorama);
    }

    #[test]
    fn test_pitch_stays_clamped_under_long_drag() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(1);
        h.tour.handle_pointer(PointerEvent::Down {
            pos: Vec2::ZERO,
            time_ms: 0.0,
        });
        for i in 1..200 {
            h.tour.handle_pointer(PointerEvent::Move {
                pos: Vec2::new(0.0, i as f32 * 10.0),
            });
        }
        assert_eq!(h.tour.look().pitch, 85.0);
    }

    #[test]
    fn test_wheel_in_dollhouse_dollies_orbit() {
        let mut h = TestHarness::with_sample_tour();
        let before = h.tour.renderer().camera.position.length();
        h.tour.handle_pointer(PointerEvent::Wheel { delta: 200.0 });
        let after = h.tour.renderer().camera.position.length();
        assert!(after > before);
    }

    #[test]
    fn test_tick_pulses_markers() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.tick(500.0);
        let scales: Vec<f32> = h.tour.renderer().markers.iter().map(|(_, m)| m.scale).collect();
        assert!(!scales.is_empty());
        assert!(scales.iter().all(|s| (*s - 1.0).abs() > 1e-4));
    }
}
