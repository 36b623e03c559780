//! Renderer collaborator interface
//!
//! The engine never draws; it tells the renderer what to show and asks it to
//! hit-test markers. Implementations: the headless renderer in
//! [`crate::harness`] and the egui painter in the viewer binary.

use glam::Vec2;

use crate::loading::LoadStatus;
use crate::viewport::camera::CameraState;
use crate::viewport::picking::{Aabb, MarkerId, MarkerLayer, MarkerSpec, Ray};

/// Object groups whose visibility flips with the mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualGroup {
    /// Model mesh and hotspot markers
    Dollhouse,
    /// Panorama image and floor markers
    Panorama,
}

pub trait Renderer {
    /// Decoded panorama image
    type Image;
    /// Decoded dollhouse model
    type Model;

    fn camera(&self) -> CameraState;
    fn set_camera(&mut self, camera: CameraState);
    /// Drawing surface size in screen units
    fn viewport_size(&self) -> Vec2;

    /// Install the dollhouse model and return its bounding volume
    fn attach_model(&mut self, model: Self::Model) -> Option<Aabb>;

    fn spawn_marker(&mut self, marker: MarkerSpec) -> MarkerId;
    fn despawn_marker(&mut self, id: MarkerId);
    fn set_marker_scale(&mut self, id: MarkerId, scale: f32);
    /// Nearest marker of `layer` hit by `ray`
    fn hit_test(&self, ray: &Ray, layer: MarkerLayer) -> Option<MarkerId>;

    fn set_group_visible(&mut self, group: VisualGroup, visible: bool);

    /// Replace the panorama image (shown at the current opacity)
    fn show_panorama(&mut self, image: Self::Image);
    fn set_panorama_opacity(&mut self, opacity: f32);
    fn clear_panorama(&mut self);

    fn set_label(&mut self, label: Option<String>);
    fn set_status(&mut self, status: &LoadStatus);
}
