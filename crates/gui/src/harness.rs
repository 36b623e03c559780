//! Headless test harness for driving a tour without a window.
//!
//! `HeadlessRenderer` records everything the engine asks it to show, and
//! `TestHarness` wraps a tour with an in-memory store and a fake clock.

use glam::{Vec2, Vec3};
use shared::NodeIndex;

use crate::fixtures;
use crate::gesture::PointerEvent;
use crate::interaction::Interactive;
use crate::loading::{LoadSlot, LoadStatus};
use crate::renderer::{Renderer, VisualGroup};
use crate::settings::TourSettings;
use crate::sources::ResolvedTour;
use crate::store::MemoryStore;
use crate::tour::{Mode, Tour};
use crate::viewport::camera::CameraState;
use crate::viewport::orbit::ArcBallOrbit;
use crate::viewport::picking::{Aabb, MarkerId, MarkerLayer, MarkerSet, MarkerSpec, Ray};

/// Renderer that keeps state in plain fields
#[derive(Debug)]
pub struct HeadlessRenderer {
    pub camera: CameraState,
    pub viewport: Vec2,
    pub markers: MarkerSet,
    pub model: Option<Vec<Vec3>>,
    pub dollhouse_visible: bool,
    pub panorama_visible: bool,
    /// Reference of the image currently shown
    pub panorama: Option<String>,
    pub panorama_opacity: f32,
    pub label: Option<String>,
    pub status: LoadStatus,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self {
            camera: CameraState::default(),
            viewport: Vec2::new(800.0, 600.0),
            markers: MarkerSet::default(),
            model: None,
            dollhouse_visible: true,
            panorama_visible: false,
            panorama: None,
            panorama_opacity: 1.0,
            label: None,
            status: LoadStatus::Idle,
        }
    }
}

impl Renderer for HeadlessRenderer {
    type Image = String;
    type Model = Vec<Vec3>;

    fn camera(&self) -> CameraState {
        self.camera
    }

    fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn attach_model(&mut self, model: Vec<Vec3>) -> Option<Aabb> {
        let bounds = Aabb::from_points(&model);
        self.model = Some(model);
        bounds
    }

    fn spawn_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        self.markers.spawn(marker)
    }

    fn despawn_marker(&mut self, id: MarkerId) {
        self.markers.despawn(id);
    }

    fn set_marker_scale(&mut self, id: MarkerId, scale: f32) {
        self.markers.set_scale(id, scale);
    }

    fn hit_test(&self, ray: &Ray, layer: MarkerLayer) -> Option<MarkerId> {
        self.markers.pick_nearest(ray, layer)
    }

    fn set_group_visible(&mut self, group: VisualGroup, visible: bool) {
        match group {
            VisualGroup::Dollhouse => self.dollhouse_visible = visible,
            VisualGroup::Panorama => self.panorama_visible = visible,
        }
    }

    fn show_panorama(&mut self, image: String) {
        self.panorama = Some(image);
    }

    fn set_panorama_opacity(&mut self, opacity: f32) {
        self.panorama_opacity = opacity;
    }

    fn clear_panorama(&mut self) {
        self.panorama = None;
    }

    fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    fn set_status(&mut self, status: &LoadStatus) {
        self.status = status.clone();
    }
}

const FRAME_MS: f64 = 16.0;

/// Upper bound on frames simulated by one [`TestHarness::advance`] call
pub const MAX_ADVANCE_FRAMES: u64 = 100_000;

pub type HeadlessTour = Tour<HeadlessRenderer, ArcBallOrbit>;

/// Headless tour with a store and a clock for pointer timestamps
pub struct TestHarness {
    pub tour: HeadlessTour,
    pub store: MemoryStore,
    clock_ms: f64,
}

impl TestHarness {
    /// Empty tour with default settings
    pub fn new() -> Self {
        Self::with_settings(TourSettings::default())
    }

    pub fn with_settings(settings: TourSettings) -> Self {
        Self {
            tour: Tour::new(settings, HeadlessRenderer::default(), ArcBallOrbit::new()),
            store: MemoryStore::default(),
            clock_ms: 0.0,
        }
    }

    /// Harness with the four-room sample tour installed
    pub fn with_sample_tour() -> Self {
        let mut h = Self::new();
        h.install(fixtures::sample_tour());
        h
    }

    pub fn install(&mut self, tour: ResolvedTour) {
        self.tour.install(tour);
    }

    // ── Clock ─────────────────────────────────────────────────

    /// Tick the tour in 16 ms frames for `ms`.
    ///
    /// At most [`MAX_ADVANCE_FRAMES`] frames run; the last one carries
    /// whatever time is left.
    pub fn advance(&mut self, ms: f32) {
        if !ms.is_finite() || ms <= 0.0 {
            return;
        }
        let total = ms as f64;
        let frames = (total / FRAME_MS).ceil().min(MAX_ADVANCE_FRAMES as f64) as u64;
        for frame in 0..frames {
            let spent = frame as f64 * FRAME_MS;
            let dt = if frame + 1 == frames {
                total - spent
            } else {
                FRAME_MS
            };
            self.tour.tick(dt as f32);
            self.clock_ms += dt;
        }
    }

    /// Run frames until any in-flight teleport lands
    pub fn finish_teleport(&mut self) {
        let duration = self.tour.settings().transition.teleport_ms;
        self.advance(duration + 32.0);
    }

    // ── Pointer input ─────────────────────────────────────────

    /// Quick press/release at `pos`; returns whether mode or active node changed
    pub fn tap_at(&mut self, pos: Vec2) -> bool {
        let before = (self.tour.mode(), self.tour.active_node());
        self.tour.handle_pointer(PointerEvent::Down {
            pos,
            time_ms: self.clock_ms,
        });
        self.clock_ms += 50.0;
        self.tour.handle_pointer(PointerEvent::Up {
            pos,
            time_ms: self.clock_ms,
        });
        before != (self.tour.mode(), self.tour.active_node())
    }

    /// Press, move in `steps` increments from `from` to `to`, release
    pub fn drag(&mut self, from: Vec2, to: Vec2, steps: u32) {
        self.tour.handle_pointer(PointerEvent::Down {
            pos: from,
            time_ms: self.clock_ms,
        });
        let steps = steps.max(1);
        for i in 1..=steps {
            self.clock_ms += 16.0;
            let pos = from.lerp(to, i as f32 / steps as f32);
            self.tour.handle_pointer(PointerEvent::Move { pos });
        }
        self.tour.handle_pointer(PointerEvent::Up {
            pos: to,
            time_ms: self.clock_ms,
        });
    }

    pub fn wheel(&mut self, delta: f32) {
        self.tour.handle_pointer(PointerEvent::Wheel { delta });
    }

    /// Two-finger gesture whose finger distance goes `from` → `to`
    pub fn pinch(&mut self, from: f32, to: f32) {
        let center = self.tour.renderer().viewport / 2.0;
        for distance in [from, to] {
            let half = Vec2::new(distance / 2.0, 0.0);
            self.tour.handle_pointer(PointerEvent::TwoFinger {
                a: center - half,
                b: center + half,
            });
        }
        self.tour.handle_pointer(PointerEvent::TwoFingerEnd);
    }

    // ── Markers ───────────────────────────────────────────────

    /// Marker id bound to `object`
    pub fn marker_for(&self, object: Interactive) -> Option<MarkerId> {
        self.tour
            .registry()
            .iter()
            .find(|(_, o)| *o == object)
            .map(|(id, _)| id)
    }

    /// Where a marker appears on screen, if in front of the camera
    pub fn screen_pos_of(&self, id: MarkerId) -> Option<Vec2> {
        let renderer = self.tour.renderer();
        let marker = renderer.markers.get(id)?;
        renderer
            .camera
            .project(marker.spec.position, renderer.viewport)
    }

    pub fn tap_hotspot(&mut self, node: NodeIndex) -> bool {
        let Some(pos) = self
            .marker_for(Interactive::Hotspot { node })
            .and_then(|id| self.screen_pos_of(id))
        else {
            return false;
        };
        self.tap_at(pos)
    }

    pub fn tap_floor_marker(&mut self, target: NodeIndex) -> bool {
        let Some(pos) = self
            .marker_for(Interactive::FloorMarker { target })
            .and_then(|id| self.screen_pos_of(id))
        else {
            return false;
        };
        self.tap_at(pos)
    }

    /// Targets of the current floor markers, sorted
    pub fn floor_targets(&self) -> Vec<NodeIndex> {
        let mut targets: Vec<NodeIndex> = self
            .tour
            .registry()
            .objects(MarkerLayer::Floor)
            .into_iter()
            .filter_map(|o| match o {
                Interactive::FloorMarker { target } => Some(target),
                Interactive::Hotspot { .. } => None,
            })
            .collect();
        targets.sort_unstable();
        targets
    }

    pub fn hotspot_count(&self) -> usize {
        self.tour.registry().count(MarkerLayer::Hotspot)
    }

    // ── Loading ───────────────────────────────────────────────

    /// Fulfil every queued load: images resolve to their reference,
    /// the model to the sample bounds
    pub fn complete_pending_loads(&mut self) -> usize {
        let requests = self.tour.drain_load_requests();
        let count = requests.len();
        for request in requests {
            match request.ticket.slot {
                LoadSlot::Panorama => {
                    self.tour.complete_image(request.ticket, Ok(request.reference));
                }
                LoadSlot::Model => {
                    self.tour
                        .complete_model(request.ticket, Ok(fixtures::sample_model()));
                }
            }
        }
        count
    }

    pub fn in_panorama(&self) -> bool {
        self.tour.mode() == Mode::Panorama
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_is_dollhouse() {
        let h = TestHarness::new();
        assert_eq!(h.tour.mode(), Mode::Dollhouse);
        assert!(h.tour.renderer().dollhouse_visible);
        assert!(!h.tour.renderer().panorama_visible);
    }

    #[test]
    fn test_sample_tour_has_hotspot_per_node() {
        let h = TestHarness::with_sample_tour();
        assert_eq!(h.hotspot_count(), 4);
        assert_eq!(h.tour.graph().len(), 4);
    }

    #[test]
    fn test_tap_hotspot_enters_panorama() {
        let mut h = TestHarness::with_sample_tour();
        assert!(h.tap_hotspot(3));
        assert!(h.in_panorama());
        assert_eq!(h.tour.active_node(), Some(3));
        assert_eq!(h.tour.renderer().label.as_deref(), Some("Kitchen 3 (3/4)"));
    }

    #[test]
    fn test_slow_press_is_not_a_tap() {
        let mut h = TestHarness::with_sample_tour();
        let id = h.marker_for(Interactive::Hotspot { node: 2 }).unwrap();
        let pos = h.screen_pos_of(id).unwrap();
        h.tour.handle_pointer(PointerEvent::Down { pos, time_ms: 0.0 });
        h.tour.handle_pointer(PointerEvent::Up {
            pos,
            time_ms: 400.0,
        });
        assert!(!h.in_panorama());
    }

    #[test]
    fn test_floor_marker_walks_to_neighbor() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(2);
        assert_eq!(h.floor_targets(), vec![1, 3, 4]);
        // Yaw 0 faces +X, where node 4 lies
        assert!(h.tap_floor_marker(4));
        assert_eq!(h.tour.active_node(), Some(4));
        assert_eq!(h.floor_targets(), vec![2]);
    }

    #[test]
    fn test_zero_viewport_picks_nothing() {
        let mut h = TestHarness::with_sample_tour();
        let id = h.marker_for(Interactive::Hotspot { node: 2 }).unwrap();
        let pos = h.screen_pos_of(id).unwrap();
        h.tour.renderer_mut().viewport = Vec2::new(0.0, 600.0);
        assert!(!h.tap_at(pos));
        h.tour.renderer_mut().viewport = Vec2::ZERO;
        assert!(!h.tap_at(pos));
        assert_eq!(h.tour.mode(), Mode::Dollhouse);
    }

    #[test]
    fn test_advance_huge_duration_finishes() {
        let mut h = TestHarness::with_sample_tour();
        assert!(h.tour.teleport("overview"));
        h.advance(1e10);
        assert!(!h.tour.is_animating());
        assert!(h.clock_ms >= 1e10 - 1.0);
    }

    #[test]
    fn test_complete_pending_loads() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(1);
        assert_eq!(h.complete_pending_loads(), 2);
        assert_eq!(
            h.tour.renderer().panorama.as_deref(),
            Some(ResolvedTour::image_reference("panos", "entrance-1.jpg").as_str())
        );
        assert!(h.tour.renderer().model.is_some());
        assert_eq!(h.tour.renderer().status, LoadStatus::Idle);
    }
}
