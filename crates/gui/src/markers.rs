//! Directional floor markers for the active panorama

use glam::Vec3;
use shared::NodeIndex;

use crate::graph::Graph;
use crate::settings::MarkerSettings;
use crate::sources::HotspotPositions;

/// Planar bearing from `from` to `to` in degrees, `atan2(Δz, Δx)`
pub fn bearing_degrees(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    d.z.atan2(d.x).to_degrees()
}

/// Bearing relative to an image's orientation offset, in [0, 360)
pub fn relative_yaw(bearing: f32, orientation_offset: f32) -> f32 {
    let yaw = (bearing - orientation_offset).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negatives
    if yaw >= 360.0 {
        0.0
    } else {
        yaw
    }
}

/// Point on the floor plane at `radius` along `yaw`
pub fn floor_position(yaw: f32, radius: f32, floor_height: f32) -> Vec3 {
    let r = yaw.to_radians();
    Vec3::new(radius * r.cos(), floor_height, radius * r.sin())
}

/// Floor marker leading to a neighbouring node
#[derive(Debug, Clone, PartialEq)]
pub struct FloorMarker {
    pub target: NodeIndex,
    /// Image-relative yaw in degrees
    pub yaw: f32,
    pub position: Vec3,
}

/// Markers for every outgoing edge of `active` whose endpoints both have a
/// known position. Nodes without a position produce no markers.
pub fn floor_markers(
    graph: &Graph,
    positions: &HotspotPositions,
    active: NodeIndex,
    settings: &MarkerSettings,
) -> Vec<FloorMarker> {
    let Some(node) = graph.by_index(active) else {
        return Vec::new();
    };
    let Some(origin) = positions.get(active) else {
        tracing::debug!("Node {active} has no position, no floor markers");
        return Vec::new();
    };

    graph
        .neighbors_of(active)
        .into_iter()
        .filter_map(|target| {
            let Some(to) = positions.get(target) else {
                tracing::debug!("Skipping marker {active} -> {target}: no position");
                return None;
            };
            let yaw = relative_yaw(bearing_degrees(origin, to), node.orientation_offset);
            Some(FloorMarker {
                target,
                yaw,
                position: floor_position(yaw, settings.floor_radius, settings.floor_height),
            })
        })
        .collect()
}

/// Marker scale for the pulse animation at `elapsed_s`
pub fn pulse_scale(elapsed_s: f32, settings: &MarkerSettings) -> f32 {
    1.0 + settings.pulse_amplitude * (elapsed_s * settings.pulse_speed).sin()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use shared::{HotspotMap, Point3};

    use super::*;
    use crate::sources::PositionSource;

    #[test]
    fn test_bearing_to_relative_yaw() {
        let a = Vec3::ZERO;
        assert_eq!(relative_yaw(bearing_degrees(a, Vec3::X), 0.0), 0.0);
        assert!((relative_yaw(bearing_degrees(a, Vec3::Z), 0.0) - 90.0).abs() < 1e-4);
        assert!((relative_yaw(bearing_degrees(a, Vec3::NEG_Z), 0.0) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_relative_yaw_applies_offset_mod_360() {
        assert!((relative_yaw(90.0, 120.0) - 330.0).abs() < 1e-4);
        assert!((relative_yaw(725.0, 0.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_floor_markers_skip_missing_positions() {
        let files: Vec<String> = ["r-1.jpg", "r-2.jpg", "r-3.jpg"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let table: shared::ConnectionTable = [(1, vec![2, 3])].into_iter().collect();
        let graph = Graph::load(&files, &table, false, &BTreeMap::new());
        let map: HotspotMap = [(1, Point3::new(0.0, 0.0, 0.0)), (2, Point3::new(0.0, 0.0, 5.0))]
            .into_iter()
            .collect();
        let positions = HotspotPositions::new(&map, PositionSource::File);
        let settings = MarkerSettings::default();

        let markers = floor_markers(&graph, &positions, 1, &settings);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].target, 2);
        assert!((markers[0].yaw - 90.0).abs() < 1e-4);
        assert!((markers[0].position.z - settings.floor_radius).abs() < 1e-4);
        assert_eq!(markers[0].position.y, settings.floor_height);

        // Node 3 has no position: no markers from it either
        assert!(floor_markers(&graph, &positions, 3, &settings).is_empty());
    }

    #[test]
    fn test_pulse_stays_near_one() {
        let settings = MarkerSettings::default();
        for i in 0..100 {
            let s = pulse_scale(i as f32 * 0.1, &settings);
            assert!((s - 1.0).abs() <= settings.pulse_amplitude + 1e-6);
        }
    }
}
