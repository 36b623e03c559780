//! Mode transitions, navigation and marker rebuilding

use glam::Vec3;
use shared::NodeIndex;

use super::{display_label, Mode, Tour};
use crate::error::SourceError;
use crate::graph::PanoNode;
use crate::interaction::Interactive;
use crate::loading::LoadSlot;
use crate::markers::floor_markers;
use crate::renderer::{Renderer, VisualGroup};
use crate::sources::{self, HotspotPositions, PositionSource, ResolvedTour};
use crate::store::KeyValueStore;
use crate::transition::Teleport;
use crate::viewport::orbit::OrbitControl;
use crate::viewport::picking::{MarkerLayer, MarkerSpec};

impl<R: Renderer, O: OrbitControl> Tour<R, O> {
    /// Dollhouse → Panorama at node `index`.
    ///
    /// Rejected outside dollhouse mode, during a teleport, and for nodes
    /// that are unknown or have no hotspot position.
    pub fn enter_panorama(&mut self, index: NodeIndex) -> bool {
        if self.mode != Mode::Dollhouse {
            tracing::debug!("enter_panorama({index}) ignored: already in a panorama");
            return false;
        }
        if self.is_animating() {
            tracing::debug!("enter_panorama({index}) ignored: camera is moving");
            return false;
        }
        let graph = self.graph.snapshot();
        let Some(node) = graph.by_index(index) else {
            tracing::warn!("enter_panorama: no node {index}");
            return false;
        };
        if self.hotspots.get(index).is_none() {
            tracing::warn!("enter_panorama: node {index} has no hotspot position");
            return false;
        }

        self.snapshot = Some(self.renderer.camera());
        self.orbit.set_enabled(false);
        self.mode = Mode::Panorama;
        self.renderer.set_group_visible(VisualGroup::Dollhouse, false);
        self.renderer.set_group_visible(VisualGroup::Panorama, true);
        self.fade.stop();
        self.renderer.clear_panorama();

        tracing::info!("Entering panorama {index} ({})", node.file);
        self.show_node(node, graph.len());
        true
    }

    /// Panorama → Panorama at node `index`
    pub fn navigate_to(&mut self, index: NodeIndex) -> bool {
        if self.mode != Mode::Panorama {
            tracing::debug!("navigate_to({index}) ignored outside a panorama");
            return false;
        }
        let graph = self.graph.snapshot();
        let Some(node) = graph.by_index(index) else {
            tracing::warn!("navigate_to: no node {index}");
            return false;
        };
        tracing::info!("Navigating to {index} ({})", node.file);
        self.show_node(node, graph.len());
        true
    }

    /// Next node in manifest order, wrapping
    pub fn navigate_next(&mut self) -> bool {
        let graph = self.graph.snapshot();
        match self.active.and_then(|a| graph.next_of(a)) {
            Some(node) => self.navigate_to(node.index),
            None => false,
        }
    }

    /// Previous node in manifest order, wrapping
    pub fn navigate_prev(&mut self) -> bool {
        let graph = self.graph.snapshot();
        match self.active.and_then(|a| graph.prev_of(a)) {
            Some(node) => self.navigate_to(node.index),
            None => false,
        }
    }

    /// Panorama → Dollhouse, restoring the camera captured on entry
    pub fn exit_panorama(&mut self) -> bool {
        if self.mode != Mode::Panorama {
            tracing::debug!("exit_panorama ignored outside a panorama");
            return false;
        }

        self.dispose_layer(MarkerLayer::Floor);
        self.loads.invalidate(LoadSlot::Panorama);
        self.renderer.set_status(self.loads.status());
        self.fade.stop();
        self.renderer.clear_panorama();
        self.renderer.set_label(None);
        self.active = None;
        self.mode = Mode::Dollhouse;
        self.renderer.set_group_visible(VisualGroup::Panorama, false);
        self.renderer.set_group_visible(VisualGroup::Dollhouse, true);

        let camera = match self.snapshot.take() {
            Some(camera) => camera,
            None => {
                tracing::warn!("No dollhouse camera captured, keeping the current one");
                self.renderer.camera()
            }
        };
        self.renderer.set_camera(camera);
        self.orbit.sync(&camera);
        self.orbit.set_enabled(true);
        tracing::info!("Back to dollhouse");
        true
    }

    /// Start an eased camera move to a named viewpoint (dollhouse only)
    pub fn teleport(&mut self, name: &str) -> bool {
        if self.mode != Mode::Dollhouse || self.is_animating() {
            tracing::debug!("teleport('{name}') ignored");
            return false;
        }
        let Some(viewpoint) = self.viewpoints.get(name).copied() else {
            tracing::warn!("Unknown viewpoint '{name}'");
            return false;
        };
        self.orbit.set_enabled(false);
        self.teleport = Some(Teleport::new(
            &self.renderer.camera(),
            &viewpoint,
            self.settings.transition.teleport_ms,
        ));
        tracing::debug!("Teleporting to '{name}'");
        true
    }

    /// Persist a hotspot position in the local override.
    ///
    /// Returns whether the live positions changed; a deployment hotspot
    /// file keeps priority over the override.
    pub fn set_hotspot_override(
        &mut self,
        store: &mut dyn KeyValueStore,
        index: NodeIndex,
        position: Vec3,
    ) -> Result<bool, SourceError> {
        let map = sources::write_override(store, index, position)?;
        if self.hotspots.source == PositionSource::File {
            tracing::info!("Override for {index} saved; deployment hotspot file still applies");
            return Ok(false);
        }
        self.hotspots = HotspotPositions::new(&map, PositionSource::Override);
        self.rebuild_hotspot_markers();
        if let (Mode::Panorama, Some(active)) = (self.mode, self.active) {
            self.rebuild_floor_markers(active);
        }
        Ok(true)
    }

    /// Run the action attached to an interactive object
    pub fn activate(&mut self, object: Interactive) -> bool {
        match object {
            Interactive::Hotspot { node } => self.enter_panorama(node),
            Interactive::FloorMarker { target } => self.navigate_to(target),
        }
    }

    /// Make `node` active: reset the look, request its image, rebuild its
    /// floor markers and label
    fn show_node(&mut self, node: &PanoNode, total: usize) {
        self.active = Some(node.index);
        self.look.reset();
        self.renderer.set_camera(self.look.camera());

        let reference = ResolvedTour::image_reference(&self.panorama_dir, &node.file);
        self.loads
            .issue(LoadSlot::Panorama, Some(node.index), reference);
        self.renderer.set_status(self.loads.status());

        self.rebuild_floor_markers(node.index);
        self.renderer.set_label(Some(display_label(
            &node.file,
            node.sequence_position + 1,
            total,
        )));
    }

    /// Recreate one hotspot marker per node with a known position
    pub(crate) fn rebuild_hotspot_markers(&mut self) {
        self.dispose_layer(MarkerLayer::Hotspot);
        let graph = self.graph.snapshot();
        let size = self.settings.markers.hotspot_size;
        for node in graph.nodes() {
            // Duplicate indices resolve to the first occurrence
            if graph
                .by_index(node.index)
                .is_some_and(|first| first.sequence_position != node.sequence_position)
            {
                continue;
            }
            let Some(position) = self.hotspots.get(node.index) else {
                continue;
            };
            let id = self.renderer.spawn_marker(MarkerSpec {
                layer: MarkerLayer::Hotspot,
                position,
                size,
                facing: None,
            });
            self.registry
                .insert(id, Interactive::Hotspot { node: node.index });
        }
        tracing::debug!(
            "{} hotspot markers",
            self.registry.count(MarkerLayer::Hotspot)
        );
    }

    pub(crate) fn rebuild_floor_markers(&mut self, active: NodeIndex) {
        self.dispose_layer(MarkerLayer::Floor);
        let graph = self.graph.snapshot();
        let markers = floor_markers(&graph, &self.hotspots, active, &self.settings.markers);
        for marker in markers {
            let id = self.renderer.spawn_marker(MarkerSpec {
                layer: MarkerLayer::Floor,
                position: marker.position,
                size: self.settings.markers.floor_size,
                facing: Some(marker.yaw),
            });
            self.registry.insert(
                id,
                Interactive::FloorMarker {
                    target: marker.target,
                },
            );
        }
    }

    fn dispose_layer(&mut self, layer: MarkerLayer) {
        for id in self.registry.take_layer(layer) {
            self.renderer.despawn_marker(id);
        }
    }
}
