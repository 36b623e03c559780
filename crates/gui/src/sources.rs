//! Tour data sources: description, manifest, hotspot positions
//!
//! Hotspot positions resolve through a fallback chain: the deployment's
//! hotspot file, then the locally persisted override, then built-in defaults.
//! A missing or broken source never blocks the dollhouse view.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use glam::Vec3;
use shared::{HotspotMap, Manifest, NodeIndex, Point3, TourDescription, Viewpoint};

use crate::error::SourceError;
use crate::graph::Graph;
use crate::store::KeyValueStore;

/// Key of the persisted hotspot override in the key-value store
pub const HOTSPOT_OVERRIDE_KEY: &str = "walkthrough.hotspot_positions";

/// Where the active hotspot positions came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    File,
    Override,
    Defaults,
}

/// Node index → anchor point in dollhouse model space
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotPositions {
    positions: HashMap<NodeIndex, Vec3>,
    pub source: PositionSource,
}

impl HotspotPositions {
    pub fn new(map: &HotspotMap, source: PositionSource) -> Self {
        Self {
            positions: map
                .iter()
                .map(|(k, p)| (*k, Vec3::from_array(p.to_array())))
                .collect(),
            source,
        }
    }

    pub fn get(&self, index: NodeIndex) -> Option<Vec3> {
        self.positions.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Default for HotspotPositions {
    fn default() -> Self {
        Self::new(&shared::default_hotspots(), PositionSource::Defaults)
    }
}

pub fn read_manifest(path: &Path) -> Result<Manifest, SourceError> {
    let json = std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| SourceError::json(path.display().to_string(), e))
}

pub fn read_hotspot_file(path: &Path) -> Result<HotspotMap, SourceError> {
    let json = std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| SourceError::json(path.display().to_string(), e))
}

pub fn read_description(path: &Path) -> Result<TourDescription, SourceError> {
    let json = std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| SourceError::json(path.display().to_string(), e))
}

/// Persisted override map, if present and valid
pub fn read_override(store: &dyn KeyValueStore) -> Option<HotspotMap> {
    let json = store.get(HOTSPOT_OVERRIDE_KEY)?;
    match serde_json::from_str(&json) {
        Ok(map) => Some(map),
        Err(e) => {
            tracing::warn!("Ignoring invalid hotspot override: {e}");
            None
        }
    }
}

/// Store `position` for `index` in the persisted override map
pub fn write_override(
    store: &mut dyn KeyValueStore,
    index: NodeIndex,
    position: Vec3,
) -> Result<HotspotMap, SourceError> {
    let mut map = read_override(store).unwrap_or_default();
    map.insert(index, Point3::from(position.to_array()));
    let json = serde_json::to_string(&map).map_err(|e| SourceError::json("hotspot override", e))?;
    store.set(HOTSPOT_OVERRIDE_KEY, json)?;
    Ok(map)
}

/// Resolve hotspot positions through the fallback chain
pub fn resolve_hotspots(file: Option<&Path>, store: &dyn KeyValueStore) -> HotspotPositions {
    if let Some(path) = file {
        match read_hotspot_file(path) {
            Ok(map) => {
                tracing::info!("Hotspots from {} ({} entries)", path.display(), map.len());
                return HotspotPositions::new(&map, PositionSource::File);
            }
            Err(e) => tracing::warn!("Hotspot file unavailable, falling back: {e}"),
        }
    }
    if let Some(map) = read_override(store) {
        tracing::info!("Hotspots from local override ({} entries)", map.len());
        return HotspotPositions::new(&map, PositionSource::Override);
    }
    tracing::info!("Using built-in hotspot positions");
    HotspotPositions::default()
}

/// Join a description-relative reference onto the description's directory.
/// URLs and absolute paths pass through.
pub fn resolve_reference(base_dir: &Path, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    let path = Path::new(reference);
    if path.is_absolute() {
        reference.to_string()
    } else {
        base_dir.join(path).display().to_string()
    }
}

/// Everything the engine needs to start a tour
#[derive(Debug, Clone)]
pub struct ResolvedTour {
    pub name: String,
    pub graph: Graph,
    pub hotspots: HotspotPositions,
    pub viewpoints: BTreeMap<String, Viewpoint>,
    /// Model reference, ready for the asset loader
    pub model: Option<String>,
    /// Prefix joined with each node's file to form its image reference
    pub panorama_dir: String,
}

impl ResolvedTour {
    /// Image reference for a node file
    pub fn image_reference(panorama_dir: &str, file: &str) -> String {
        if panorama_dir.is_empty() {
            return file.to_string();
        }
        if panorama_dir.starts_with("http://") || panorama_dir.starts_with("https://") {
            format!("{}/{}", panorama_dir.trim_end_matches('/'), file)
        } else {
            Path::new(panorama_dir).join(file).display().to_string()
        }
    }
}

/// Load a tour description file and every source it points at.
///
/// Only the description itself is fatal; an unreadable manifest yields an
/// empty graph and unreadable hotspots fall back.
pub fn load_tour(path: &Path, store: &dyn KeyValueStore) -> Result<ResolvedTour, SourceError> {
    let description = read_description(path)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(resolve_tour(&description, &base_dir, store))
}

/// Resolve a parsed description against `base_dir`
pub fn resolve_tour(
    description: &TourDescription,
    base_dir: &Path,
    store: &dyn KeyValueStore,
) -> ResolvedTour {
    let manifest_path = PathBuf::from(resolve_reference(base_dir, &description.manifest));
    let files = match read_manifest(&manifest_path) {
        Ok(manifest) => manifest.files,
        Err(e) => {
            tracing::warn!("Manifest unavailable, panoramas disabled: {e}");
            Vec::new()
        }
    };
    let graph = Graph::load(
        &files,
        &description.connections,
        description.symmetric,
        &description.orientations,
    );

    let hotspot_path = description
        .hotspots
        .as_deref()
        .map(|h| PathBuf::from(resolve_reference(base_dir, h)));
    let hotspots = resolve_hotspots(hotspot_path.as_deref(), store);

    ResolvedTour {
        name: description.name.clone(),
        graph,
        hotspots,
        viewpoints: description.viewpoints.clone(),
        model: description
            .model
            .as_deref()
            .map(|m| resolve_reference(base_dir, m)),
        panorama_dir: resolve_reference(base_dir, &description.panorama_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("walkthrough-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_fallback_to_override_then_defaults() {
        let mut store = MemoryStore::default();
        let missing = Path::new("/nonexistent/hotspots.json");

        let defaults = resolve_hotspots(Some(missing), &store);
        assert_eq!(defaults.source, PositionSource::Defaults);
        assert!(!defaults.is_empty());

        write_override(&mut store, 7, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let over = resolve_hotspots(Some(missing), &store);
        assert_eq!(over.source, PositionSource::Override);
        assert_eq!(over.get(7), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_file_wins_over_override() {
        let dir = temp_dir("hotspots");
        let path = dir.join("hotspots.json");
        std::fs::write(&path, r#"{"1": {"x": 0.0, "y": 0.0, "z": 0.0}}"#).unwrap();
        let mut store = MemoryStore::default();
        write_override(&mut store, 2, Vec3::ONE).unwrap();

        let resolved = resolve_hotspots(Some(&path), &store);
        assert_eq!(resolved.source, PositionSource::File);
        assert_eq!(resolved.get(2), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let mut store = MemoryStore::default();
        store.set(HOTSPOT_OVERRIDE_KEY, "not json".to_string()).unwrap();
        assert_eq!(resolve_hotspots(None, &store).source, PositionSource::Defaults);
    }

    #[test]
    fn test_load_tour_with_missing_manifest() {
        let dir = temp_dir("tour");
        let path = dir.join("tour.json");
        std::fs::write(&path, r#"{"manifest": "missing.json", "model": "house.obj"}"#).unwrap();
        let tour = load_tour(&path, &MemoryStore::default()).unwrap();
        assert!(tour.graph.is_empty());
        assert_eq!(tour.model, Some(dir.join("house.obj").display().to_string()));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_tour_reads_manifest() {
        let dir = temp_dir("manifest");
        std::fs::write(
            dir.join("manifest.json"),
            r#"{"files": ["b-2.jpg", "a-1.jpg"], "count": 2}"#,
        )
        .unwrap();
        let path = dir.join("tour.json");
        std::fs::write(
            &path,
            r#"{"manifest": "manifest.json", "panorama_dir": "panos", "connections": {"1": [2]}}"#,
        )
        .unwrap();
        let tour = load_tour(&path, &MemoryStore::default()).unwrap();
        assert_eq!(tour.graph.len(), 2);
        assert_eq!(tour.graph.neighbors_of(1), vec![2]);
        assert!(tour.panorama_dir.ends_with("panos"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_image_reference() {
        assert_eq!(
            ResolvedTour::image_reference("https://cdn.example/panos/", "r-1.jpg"),
            "https://cdn.example/panos/r-1.jpg"
        );
        assert_eq!(ResolvedTour::image_reference("", "r-1.jpg"), "r-1.jpg");
    }
}
