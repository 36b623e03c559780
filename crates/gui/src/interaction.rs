//! Screen point → interactive object resolution

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use shared::NodeIndex;

use crate::renderer::Renderer;
use crate::viewport::picking::{MarkerId, MarkerLayer};

/// Interactive object kinds, each carrying its navigation action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interactive {
    /// Dollhouse marker that opens a node's panorama
    Hotspot { node: NodeIndex },
    /// Panorama floor arrow that walks to an adjacent node
    FloorMarker { target: NodeIndex },
}

impl Interactive {
    pub fn layer(&self) -> MarkerLayer {
        match self {
            Interactive::Hotspot { .. } => MarkerLayer::Hotspot,
            Interactive::FloorMarker { .. } => MarkerLayer::Floor,
        }
    }
}

/// Marker ids the engine created, per layer
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    objects: HashMap<MarkerId, Interactive>,
}

impl MarkerRegistry {
    pub fn insert(&mut self, id: MarkerId, object: Interactive) {
        self.objects.insert(id, object);
    }

    pub fn get(&self, id: MarkerId) -> Option<Interactive> {
        self.objects.get(&id).copied()
    }

    /// Remove every marker of `layer`, returning their ids for disposal
    pub fn take_layer(&mut self, layer: MarkerLayer) -> Vec<MarkerId> {
        let ids: Vec<MarkerId> = self
            .objects
            .iter()
            .filter(|(_, o)| o.layer() == layer)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            self.objects.remove(id);
        }
        ids
    }

    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.objects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, Interactive)> + '_ {
        self.objects.iter().map(|(id, o)| (*id, *o))
    }

    pub fn count(&self, layer: MarkerLayer) -> usize {
        self.objects.values().filter(|o| o.layer() == layer).count()
    }

    /// Objects of `layer`
    pub fn objects(&self, layer: MarkerLayer) -> Vec<Interactive> {
        self.objects
            .values()
            .filter(|o| o.layer() == layer)
            .copied()
            .collect()
    }
}

/// Find the interactive object of `layer` under `screen_pos`
pub fn resolve<R: Renderer>(
    renderer: &R,
    registry: &MarkerRegistry,
    screen_pos: Vec2,
    layer: MarkerLayer,
) -> Option<Interactive> {
    let viewport = renderer.viewport_size();
    if !(viewport.x > 0.0 && viewport.y > 0.0) || !screen_pos.is_finite() {
        tracing::debug!("No picking in a {viewport} viewport");
        return None;
    }
    let ray = renderer.camera().screen_ray(screen_pos, viewport);
    if !ray.direction.is_finite() || ray.direction == Vec3::ZERO {
        return None;
    }
    let id = renderer.hit_test(&ray, layer)?;
    let object = registry.get(id);
    if object.is_none() {
        tracing::debug!("Hit marker {id:?} with no registered action");
    }
    object
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_layer_only_removes_that_layer() {
        let mut reg = MarkerRegistry::default();
        reg.insert(MarkerId(1), Interactive::Hotspot { node: 1 });
        reg.insert(MarkerId(2), Interactive::FloorMarker { target: 2 });
        reg.insert(MarkerId(3), Interactive::FloorMarker { target: 3 });

        let mut floor = reg.take_layer(MarkerLayer::Floor);
        floor.sort();
        assert_eq!(floor, vec![MarkerId(2), MarkerId(3)]);
        assert_eq!(reg.count(MarkerLayer::Hotspot), 1);
        assert_eq!(reg.count(MarkerLayer::Floor), 0);
    }
}
