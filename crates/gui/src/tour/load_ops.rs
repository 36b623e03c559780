//! Asset load requests and completions

use shared::{Viewpoint, OVERVIEW_VIEWPOINT};

use super::{Mode, Tour};
use crate::loading::{LoadSlot, LoadTicket};
use crate::renderer::Renderer;
use crate::transition::fit_to_bounds;
use crate::viewport::orbit::OrbitControl;

impl<R: Renderer, O: OrbitControl> Tour<R, O> {
    /// Queue the dollhouse model for loading
    pub fn request_model(&mut self, reference: String) -> LoadTicket {
        tracing::info!("Loading model {reference}");
        let ticket = self.loads.issue(LoadSlot::Model, None, reference);
        self.renderer.set_status(self.loads.status());
        ticket
    }

    /// Byte progress for an in-flight load. Stale tickets are ignored.
    pub fn report_progress(&mut self, ticket: LoadTicket, loaded: u64, total: Option<u64>) {
        if self.loads.progress(&ticket, loaded, total) {
            self.renderer.set_status(self.loads.status());
        }
    }

    /// Deliver a panorama image. Returns `false` when the result arrived for
    /// a node that is no longer active and was dropped.
    pub fn complete_image(&mut self, ticket: LoadTicket, result: Result<R::Image, String>) -> bool {
        let wanted = self.mode == Mode::Panorama && ticket.node.is_some() && ticket.node == self.active;
        if !wanted || !self.loads.is_current(&ticket) {
            tracing::debug!("Dropping stale panorama for {:?}", ticket.node);
            return false;
        }
        match result {
            Ok(image) => {
                self.loads.finish(&ticket, None);
                self.renderer.show_panorama(image);
                self.fade.start();
                self.renderer.set_panorama_opacity(self.fade.opacity());
            }
            Err(message) => {
                tracing::warn!("Panorama {:?} failed: {message}", ticket.node);
                self.loads.finish(&ticket, Some(message));
            }
        }
        self.renderer.set_status(self.loads.status());
        true
    }

    /// Deliver the dollhouse model, fitting the camera to it.
    ///
    /// In panorama mode only the overview viewpoint moves; the camera
    /// captured on entry is restored untouched on exit.
    pub fn complete_model(&mut self, ticket: LoadTicket, result: Result<R::Model, String>) -> bool {
        if !self.loads.is_current(&ticket) {
            tracing::debug!("Dropping stale model load");
            return false;
        }
        let model = match result {
            Ok(model) => model,
            Err(message) => {
                tracing::warn!("Model failed to load: {message}");
                self.loads.finish(&ticket, Some(message));
                self.renderer.set_status(self.loads.status());
                return true;
            }
        };
        self.loads.finish(&ticket, None);
        self.renderer.set_status(self.loads.status());

        let Some(bounds) = self.renderer.attach_model(model) else {
            tracing::warn!("Model has no geometry, camera left as is");
            return true;
        };
        let base = match self.mode {
            Mode::Panorama => self.snapshot.unwrap_or_default(),
            Mode::Dollhouse => self.renderer.camera(),
        };
        let fitted = fit_to_bounds(&base, &bounds, self.settings.transition.fit_padding);
        self.viewpoints.set(
            OVERVIEW_VIEWPOINT,
            Viewpoint {
                position: fitted.position.to_array().into(),
                target: fitted.target.to_array().into(),
            },
        );
        tracing::info!("Model fitted, overview at {:?}", fitted.position);

        if self.mode == Mode::Dollhouse && !self.is_animating() {
            self.renderer.set_camera(fitted);
            self.orbit.sync(&fitted);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::super::Mode;
    use crate::harness::TestHarness;
    use crate::loading::{LoadSlot, LoadStatus};

    #[test]
    fn test_stale_image_is_discarded() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.drain_load_requests();
        h.tour.enter_panorama(1);
        let first = h.tour.drain_load_requests().remove(0);
        h.tour.navigate_to(2);
        let second = h.tour.drain_load_requests().remove(0);

        assert!(!h.tour.complete_image(first.ticket, Ok("one".into())));
        assert_eq!(h.tour.renderer().panorama, None);
        assert!(h.tour.complete_image(second.ticket, Ok("two".into())));
        assert_eq!(h.tour.renderer().panorama.as_deref(), Some("two"));
    }

    #[test]
    fn test_image_after_exit_is_discarded() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.drain_load_requests();
        h.tour.enter_panorama(1);
        let request = h.tour.drain_load_requests().remove(0);
        h.tour.exit_panorama();
        assert!(!h.tour.complete_image(request.ticket, Ok("late".into())));
        assert_eq!(h.tour.mode(), Mode::Dollhouse);
        assert_eq!(h.tour.renderer().panorama, None);
    }

    #[test]
    fn test_image_fades_in() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.drain_load_requests();
        h.tour.enter_panorama(1);
        let request = h.tour.drain_load_requests().remove(0);
        h.tour.complete_image(request.ticket, Ok("pano".into()));
        assert_eq!(h.tour.renderer().panorama_opacity, 0.0);
        for _ in 0..20 {
            h.tour.tick(16.0);
        }
        assert!((h.tour.renderer().panorama_opacity - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_failed_image_keeps_panorama_mode() {
        let mut h = TestHarness::with_sample_tour();
        h.tour.drain_load_requests();
        h.tour.enter_panorama(1);
        let request = h.tour.drain_load_requests().remove(0);
        h.tour.complete_image(request.ticket, Err("404".into()));
        assert_eq!(h.tour.mode(), Mode::Panorama);
        assert!(matches!(
            h.tour.renderer().status,
            LoadStatus::Failed { slot: LoadSlot::Panorama, .. }
        ));
    }

    #[test]
    fn test_model_load_fits_camera_and_overview() {
        let mut h = TestHarness::with_sample_tour();
        let request = h
            .tour
            .drain_load_requests()
            .into_iter()
            .find(|r| r.ticket.slot == LoadSlot::Model)
            .unwrap();
        let model = vec![Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 3.0, 5.0)];
        assert!(h.tour.complete_model(request.ticket, Ok(model)));

        let camera = h.tour.renderer().camera;
        assert_eq!(camera.target, Vec3::new(0.0, 1.5, 0.0));
        let overview = h.tour.viewpoints().get("overview").unwrap();
        assert_eq!(overview.position.x, camera.position.x);
        // Distance from the formula: 10 / (2·tan 25°) · 1.5
        let expected = 10.0 / (2.0 * 25f32.to_radians().tan()) * 1.5;
        assert!((camera.position.distance(camera.target) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_model_in_panorama_only_moves_overview() {
        let mut h = TestHarness::with_sample_tour();
        let request = h
            .tour
            .drain_load_requests()
            .into_iter()
            .find(|r| r.ticket.slot == LoadSlot::Model)
            .unwrap();
        let before = h.tour.renderer().camera;
        h.tour.enter_panorama(1);
        h.tour
            .complete_model(request.ticket, Ok(vec![Vec3::splat(-1.0), Vec3::splat(1.0)]));
        h.tour.exit_panorama();
        assert_eq!(h.tour.renderer().camera, before);
        let overview = h.tour.viewpoints().get("overview").unwrap();
        assert_eq!(overview.target.to_array(), [0.0, 0.0, 0.0]);
        assert!(overview.position.x > 0.0);
    }
}
