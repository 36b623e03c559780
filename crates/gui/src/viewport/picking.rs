use std::collections::BTreeMap;

use glam::Vec3;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a point set; `None` when empty
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Cube of half-size `half` around `center`
    pub fn around(center: Vec3, half: f32) -> Self {
        Self {
            min: center - Vec3::splat(half),
            max: center + Vec3::splat(half),
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Which interactive set a marker belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerLayer {
    /// Dollhouse hotspots
    Hotspot,
    /// Panorama floor arrows
    Floor,
}

/// Opaque handle for a marker created through the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Visual marker description handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub layer: MarkerLayer,
    pub position: Vec3,
    /// Half-size of the clickable box
    pub size: f32,
    /// Outward-facing yaw in degrees (floor markers only)
    pub facing: Option<f32>,
}

/// A placed marker with its current pulse scale
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub spec: MarkerSpec,
    pub scale: f32,
}

impl PlacedMarker {
    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.spec.position, self.spec.size * self.scale)
    }
}

/// Marker storage with ray picking, usable by any renderer
#[derive(Debug, Default)]
pub struct MarkerSet {
    markers: BTreeMap<MarkerId, PlacedMarker>,
    next_id: u64,
}

impl MarkerSet {
    pub fn spawn(&mut self, spec: MarkerSpec) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        self.markers.insert(id, PlacedMarker { spec, scale: 1.0 });
        id
    }

    pub fn despawn(&mut self, id: MarkerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    pub fn set_scale(&mut self, id: MarkerId, scale: f32) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.scale = scale;
        }
    }

    pub fn get(&self, id: MarkerId) -> Option<&PlacedMarker> {
        self.markers.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &PlacedMarker)> {
        self.markers.iter().map(|(id, m)| (*id, m))
    }

    pub fn count(&self, layer: MarkerLayer) -> usize {
        self.markers.values().filter(|m| m.spec.layer == layer).count()
    }

    /// Pick the nearest marker of `layer` whose box is intersected by the ray.
    pub fn pick_nearest(&self, ray: &Ray, layer: MarkerLayer) -> Option<MarkerId> {
        let mut best: Option<(MarkerId, f32)> = None;

        for (id, marker) in &self.markers {
            if marker.spec.layer != layer {
                continue;
            }
            if let Some(dist) = ray_aabb(ray, &marker.bounds()) {
                if best.map_or(true, |(_, d)| dist < d) {
                    best = Some((*id, dist));
                }
            }
        }

        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(layer: MarkerLayer, position: Vec3) -> MarkerSpec {
        MarkerSpec {
            layer,
            position,
            size: 0.5,
            facing: None,
        }
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let aabb = Aabb::around(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let hit = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        };
        let miss = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        };
        assert!((ray_aabb(&hit, &aabb).unwrap() - 4.0).abs() < 1e-5);
        assert!(ray_aabb(&miss, &aabb).is_none());
    }

    #[test]
    fn test_pick_nearest_respects_layer_and_distance() {
        let mut set = MarkerSet::default();
        let far = set.spawn(marker(MarkerLayer::Hotspot, Vec3::new(0.0, 0.0, -10.0)));
        let near = set.spawn(marker(MarkerLayer::Hotspot, Vec3::new(0.0, 0.0, -3.0)));
        let floor = set.spawn(marker(MarkerLayer::Floor, Vec3::new(0.0, 0.0, -1.0)));
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        };
        assert_eq!(set.pick_nearest(&ray, MarkerLayer::Hotspot), Some(near));
        assert_eq!(set.pick_nearest(&ray, MarkerLayer::Floor), Some(floor));
        set.despawn(near);
        assert_eq!(set.pick_nearest(&ray, MarkerLayer::Hotspot), Some(far));
    }

    #[test]
    fn test_aabb_from_points() {
        assert!(Aabb::from_points(&[]).is_none());
        let b = Aabb::from_points(&[Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 4.0, 2.0)]).unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 2.0));
        assert_eq!(b.center(), Vec3::new(0.0, 1.0, 1.0));
    }
}
