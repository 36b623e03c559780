//! Sample tour data for tests and the command interface.
//!
//! Four rooms in a line-ish layout inside a 10 × 3 × 10 model:
//!
//! ```text
//!   3 kitchen
//!   |
//!   2 living room ── 4 bedroom
//!   |
//!   1 entrance
//! ```

use std::collections::BTreeMap;

use glam::Vec3;
use shared::{
    ConnectionTable, HotspotMap, Manifest, NodeIndex, Point3, TourDescription, Viewpoint,
};

use crate::graph::Graph;
use crate::sources::{HotspotPositions, PositionSource, ResolvedTour};

pub const SAMPLE_PANORAMA_DIR: &str = "panos";
pub const SAMPLE_MODEL: &str = "house.obj";

pub fn sample_files() -> Vec<String> {
    [
        "entrance-1.jpg",
        "living_room-2.jpg",
        "kitchen-3.jpg",
        "bedroom-4.jpg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn sample_manifest() -> Manifest {
    let files = sample_files();
    Manifest {
        count: Some(files.len()),
        files,
    }
}

/// Declared one way; loaded symmetric
pub fn sample_connections() -> ConnectionTable {
    let mut table = ConnectionTable::new();
    table.insert(1, vec![2]);
    table.insert(2, vec![3, 4]);
    table
}

pub fn sample_hotspots() -> HotspotMap {
    [
        (1, Point3::new(0.0, 0.5, -3.0)),
        (2, Point3::new(0.0, 0.5, 0.0)),
        (3, Point3::new(0.0, 0.5, 3.0)),
        (4, Point3::new(3.0, 0.5, 0.0)),
    ]
    .into_iter()
    .collect()
}

/// Corner points of the sample model's bounds
pub fn sample_model() -> Vec<Vec3> {
    vec![Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 3.0, 5.0)]
}

pub fn sample_viewpoints() -> BTreeMap<String, Viewpoint> {
    let mut viewpoints = BTreeMap::new();
    viewpoints.insert(
        "top".to_string(),
        Viewpoint {
            position: Point3::new(0.0, 20.0, 0.1),
            target: Point3::new(0.0, 0.0, 0.0),
        },
    );
    viewpoints.insert(
        "front".to_string(),
        Viewpoint {
            position: Point3::new(0.0, 4.0, 14.0),
            target: Point3::new(0.0, 1.0, 0.0),
        },
    );
    viewpoints
}

pub fn sample_graph() -> Graph {
    Graph::load(&sample_files(), &sample_connections(), true, &BTreeMap::new())
}

/// Description as it would appear in a tour file
pub fn sample_description() -> TourDescription {
    TourDescription {
        name: "Sample house".to_string(),
        manifest: "manifest.json".to_string(),
        panorama_dir: SAMPLE_PANORAMA_DIR.to_string(),
        hotspots: Some("hotspots.json".to_string()),
        model: Some(SAMPLE_MODEL.to_string()),
        connections: sample_connections(),
        symmetric: true,
        orientations: BTreeMap::new(),
        viewpoints: sample_viewpoints(),
    }
}

/// Fully resolved sample tour, hotspots as if read from a deployment file
pub fn sample_tour() -> ResolvedTour {
    ResolvedTour {
        name: "Sample house".to_string(),
        graph: sample_graph(),
        hotspots: HotspotPositions::new(&sample_hotspots(), PositionSource::File),
        viewpoints: sample_viewpoints(),
        model: Some(SAMPLE_MODEL.to_string()),
        panorama_dir: SAMPLE_PANORAMA_DIR.to_string(),
    }
}

/// Sample tour with `missing` nodes absent from the hotspot positions
pub fn sample_tour_without(missing: &[NodeIndex]) -> ResolvedTour {
    let mut hotspots = sample_hotspots();
    for index in missing {
        hotspots.remove(index);
    }
    ResolvedTour {
        hotspots: HotspotPositions::new(&hotspots, PositionSource::File),
        ..sample_tour()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_graph_is_symmetric() {
        let g = sample_graph();
        assert_eq!(g.len(), 4);
        assert_eq!(g.neighbors_of(2), vec![1, 3, 4]);
        assert_eq!(g.neighbors_of(4), vec![2]);
    }

    #[test]
    fn test_description_serializes() {
        let json = serde_json::to_string(&sample_description()).unwrap();
        let back: TourDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back.connections, sample_connections());
    }
}
