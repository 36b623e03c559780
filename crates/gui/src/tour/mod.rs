//! Tour state: the mode state machine and everything it owns
//!
//! `Tour` is the single context object for the walkthrough. It holds the
//! graph, the current mode, the active node, the camera snapshot taken on
//! entering a panorama, and the injected renderer and orbit control.

mod display;
mod input_ops;
mod load_ops;
mod mode_ops;

pub use display::display_label;

use std::sync::Arc;

use shared::NodeIndex;

use crate::gesture::GestureDisambiguator;
use crate::graph::{Graph, GraphStore};
use crate::interaction::MarkerRegistry;
use crate::loading::{FadeRamp, LoadRequest, LoadSlot, LoadStatus, LoadTracker};
use crate::look::PanoramaLook;
use crate::renderer::{Renderer, VisualGroup};
use crate::settings::TourSettings;
use crate::sources::{HotspotPositions, ResolvedTour};
use crate::transition::{Teleport, Viewpoints};
use crate::viewport::camera::CameraState;
use crate::viewport::orbit::OrbitControl;

/// Presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Dollhouse,
    Panorama,
}

pub struct Tour<R, O> {
    pub(crate) settings: TourSettings,
    pub(crate) graph: GraphStore,
    pub(crate) hotspots: HotspotPositions,
    pub(crate) viewpoints: Viewpoints,
    pub(crate) panorama_dir: String,
    pub(crate) renderer: R,
    pub(crate) orbit: O,
    pub(crate) mode: Mode,
    pub(crate) active: Option<NodeIndex>,
    /// Dollhouse camera captured on entering a panorama
    pub(crate) snapshot: Option<CameraState>,
    pub(crate) look: PanoramaLook,
    pub(crate) teleport: Option<Teleport>,
    pub(crate) gestures: GestureDisambiguator,
    pub(crate) registry: MarkerRegistry,
    pub(crate) loads: LoadTracker,
    pub(crate) fade: FadeRamp,
    pub(crate) elapsed_s: f32,
}

impl<R: Renderer, O: OrbitControl> Tour<R, O> {
    /// Empty tour in dollhouse mode
    pub fn new(settings: TourSettings, renderer: R, orbit: O) -> Self {
        let settings = settings.normalized();
        let mut tour = Self {
            look: PanoramaLook::new(settings.look.clone()),
            gestures: GestureDisambiguator::new(settings.gesture.clone()),
            fade: FadeRamp::new(
                settings.transition.fade_step,
                settings.transition.fade_duration_ms,
            ),
            settings,
            graph: GraphStore::default(),
            hotspots: HotspotPositions::default(),
            viewpoints: Viewpoints::default(),
            panorama_dir: String::new(),
            renderer,
            orbit,
            mode: Mode::Dollhouse,
            active: None,
            snapshot: None,
            teleport: None,
            registry: MarkerRegistry::default(),
            loads: LoadTracker::default(),
            elapsed_s: 0.0,
        };
        let camera = tour.renderer.camera();
        tour.orbit.sync(&camera);
        tour.orbit.set_enabled(true);
        tour.renderer.set_group_visible(VisualGroup::Dollhouse, true);
        tour.renderer.set_group_visible(VisualGroup::Panorama, false);
        tour
    }

    /// Replace graph, positions and viewpoints with a freshly loaded tour.
    ///
    /// Leaves any panorama first, so no reference to the old graph survives.
    pub fn install(&mut self, resolved: ResolvedTour) {
        if self.mode == Mode::Panorama {
            self.exit_panorama();
        }
        if self.teleport.take().is_some() {
            let camera = self.renderer.camera();
            self.orbit.sync(&camera);
            self.orbit.set_enabled(true);
        }

        tracing::info!(
            "Installing tour '{}' ({} nodes, {} positions)",
            resolved.name,
            resolved.graph.len(),
            resolved.hotspots.len()
        );
        self.graph.replace(resolved.graph);
        self.hotspots = resolved.hotspots;
        self.viewpoints = Viewpoints::new(resolved.viewpoints);
        self.panorama_dir = resolved.panorama_dir;
        self.rebuild_hotspot_markers();

        match resolved.model {
            Some(model) => {
                self.request_model(model);
            }
            None => {
                self.loads.invalidate(LoadSlot::Model);
                self.renderer.set_status(self.loads.status());
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active_node(&self) -> Option<NodeIndex> {
        self.active
    }

    /// A camera animation is in flight
    pub fn is_animating(&self) -> bool {
        self.teleport.is_some()
    }

    pub fn graph(&self) -> Arc<Graph> {
        self.graph.snapshot()
    }

    pub fn hotspots(&self) -> &HotspotPositions {
        &self.hotspots
    }

    pub fn viewpoints(&self) -> &Viewpoints {
        &self.viewpoints
    }

    pub fn look(&self) -> &PanoramaLook {
        &self.look
    }

    pub fn settings(&self) -> &TourSettings {
        &self.settings
    }

    pub fn status(&self) -> &LoadStatus {
        self.loads.status()
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn camera_snapshot(&self) -> Option<&CameraState> {
        self.snapshot.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn orbit(&self) -> &O {
        &self.orbit
    }

    /// Asset loads the host should start
    pub fn drain_load_requests(&mut self) -> Vec<LoadRequest> {
        self.loads.drain()
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::fixtures;
    use crate::harness::TestHarness;
    use crate::sources::PositionSource;
    use crate::store::MemoryStore;
    use crate::viewport::picking::MarkerLayer;

    #[test]
    fn test_enter_then_exit_restores_camera_exactly() {
        let mut h = TestHarness::with_sample_tour();
        h.drag(Vec2::new(400.0, 300.0), Vec2::new(437.0, 281.0), 5);
        h.wheel(-120.0);
        let before = h.tour.renderer().camera;

        assert!(h.tour.enter_panorama(1));
        assert_ne!(h.tour.renderer().camera, before);
        assert!(h.tour.exit_panorama());
        assert_eq!(h.tour.renderer().camera, before);
        assert!(h.tour.orbit().is_enabled());
        assert_eq!(h.tour.camera_snapshot(), None);
    }

    #[test]
    fn test_double_enter_changes_once() {
        let mut h = TestHarness::with_sample_tour();
        let before = h.tour.renderer().camera;
        assert!(h.tour.enter_panorama(1));
        assert!(!h.tour.enter_panorama(2));
        assert_eq!(h.tour.active_node(), Some(1));
        h.tour.exit_panorama();
        assert_eq!(h.tour.renderer().camera, before);
    }

    #[test]
    fn test_enter_rejects_unknown_and_unplaced_nodes() {
        let mut h = TestHarness::new();
        h.install(fixtures::sample_tour_without(&[3]));
        assert!(!h.tour.enter_panorama(99));
        assert!(!h.tour.enter_panorama(3));
        assert_eq!(h.tour.mode(), Mode::Dollhouse);
        assert_eq!(h.hotspot_count(), 3);
    }

    #[test]
    fn test_panorama_hides_dollhouse_group() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(2);
        let r = h.tour.renderer();
        assert!(!r.dollhouse_visible);
        assert!(r.panorama_visible);
        assert!(!h.tour.orbit().is_enabled());
        assert_eq!(r.camera.position, Vec3::ZERO);
        assert_eq!(r.label.as_deref(), Some("Living room 2 (2/4)"));
    }

    #[test]
    fn test_exit_disposes_floor_markers() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(2);
        assert_eq!(h.tour.renderer().markers.count(MarkerLayer::Floor), 3);
        h.tour.exit_panorama();
        assert_eq!(h.tour.renderer().markers.count(MarkerLayer::Floor), 0);
        assert!(h.floor_targets().is_empty());
        assert_eq!(h.tour.renderer().label, None);
    }

    #[test]
    fn test_navigation_wraps_in_manifest_order() {
        let mut h = TestHarness::with_sample_tour();
        assert!(!h.tour.navigate_next());
        h.tour.enter_panorama(4);
        assert!(h.tour.navigate_next());
        assert_eq!(h.tour.active_node(), Some(1));
        assert!(h.tour.navigate_prev());
        assert_eq!(h.tour.active_node(), Some(4));
    }

    #[test]
    fn test_navigate_resets_look() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(2);
        h.drag(Vec2::new(100.0, 100.0), Vec2::new(200.0, 150.0), 4);
        h.wheel(100.0);
        assert_ne!(h.tour.look().yaw, 0.0);
        h.tour.navigate_to(3);
        let look = h.tour.look();
        assert_eq!((look.yaw, look.pitch, look.fov), (0.0, 0.0, 75.0));
    }

    #[test]
    fn test_teleport_blocks_enter_until_done() {
        let mut h = TestHarness::with_sample_tour();
        assert!(h.tour.teleport("top"));
        assert!(!h.tour.teleport("front"));
        assert!(!h.tour.enter_panorama(1));
        assert!(!h.tour.orbit().is_enabled());

        h.finish_teleport();
        assert!(!h.tour.is_animating());
        assert!(h.tour.orbit().is_enabled());
        assert_eq!(h.tour.renderer().camera.position, Vec3::new(0.0, 20.0, 0.1));
        assert!(h.tour.enter_panorama(1));
    }

    #[test]
    fn test_teleport_only_in_dollhouse() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(1);
        assert!(!h.tour.teleport("overview"));
        assert!(!h.tour.is_animating());
    }

    #[test]
    fn test_override_rebuilds_markers_when_not_from_file() {
        let mut h = TestHarness::new();
        assert_eq!(h.tour.hotspots().source, PositionSource::Defaults);
        let mut store = MemoryStore::default();
        let applied = h
            .tour
            .set_hotspot_override(&mut store, 1, Vec3::new(1.0, 0.0, 1.0))
            .unwrap();
        assert!(applied);
        assert_eq!(h.tour.hotspots().source, PositionSource::Override);
        assert_eq!(h.tour.hotspots().get(1), Some(Vec3::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_override_does_not_beat_deployment_file() {
        let mut h = TestHarness::with_sample_tour();
        let mut store = MemoryStore::default();
        let applied = h
            .tour
            .set_hotspot_override(&mut store, 1, Vec3::new(9.0, 9.0, 9.0))
            .unwrap();
        assert!(!applied);
        assert_eq!(h.tour.hotspots().get(1), Some(Vec3::new(0.0, 0.5, -3.0)));
    }

    #[test]
    fn test_install_leaves_panorama() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.enter_panorama(2);
        h.install(fixtures::sample_tour());
        assert_eq!(h.tour.mode(), Mode::Dollhouse);
        assert_eq!(h.tour.active_node(), None);
        assert_eq!(h.hotspot_count(), 4);
    }
}
