//! Eased camera teleports and camera fit-to-model

use std::collections::BTreeMap;

use glam::Vec3;
use shared::{Viewpoint, OVERVIEW_VIEWPOINT};

use crate::viewport::camera::CameraState;
use crate::viewport::picking::Aabb;

/// Direction (from the model centre) the camera sits along after a fit
const FIT_DIAGONAL: Vec3 = Vec3::new(1.0, 0.8, 1.0);

/// Cubic ease-in-out on `p ∈ [0, 1]`
pub fn ease_in_out_cubic(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// A single in-flight camera move between two position/target pairs
#[derive(Debug, Clone)]
pub struct Teleport {
    from_position: Vec3,
    from_target: Vec3,
    to_position: Vec3,
    to_target: Vec3,
    elapsed_ms: f32,
    duration_ms: f32,
}

impl Teleport {
    pub fn new(from: &CameraState, to: &Viewpoint, duration_ms: f32) -> Self {
        Self {
            from_position: from.position,
            from_target: from.target,
            to_position: Vec3::from_array(to.position.to_array()),
            to_target: Vec3::from_array(to.target.to_array()),
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(1.0),
        }
    }

    /// Advance by `dt_ms` and write the eased pose into `camera`.
    /// Returns `true` once the move has reached its destination.
    pub fn advance(&mut self, dt_ms: f32, camera: &mut CameraState) -> bool {
        self.elapsed_ms += dt_ms.max(0.0);
        let t = (self.elapsed_ms / self.duration_ms).min(1.0);
        if t >= 1.0 {
            camera.position = self.to_position;
            camera.target = self.to_target;
            return true;
        }
        let eased = ease_in_out_cubic(t);
        camera.position = self.from_position.lerp(self.to_position, eased);
        camera.target = self.from_target.lerp(self.to_target, eased);
        false
    }
}

/// Named camera viewpoints for dollhouse teleports
#[derive(Debug, Clone)]
pub struct Viewpoints {
    named: BTreeMap<String, Viewpoint>,
}

impl Viewpoints {
    /// Always contains an `overview` entry
    pub fn new(named: BTreeMap<String, Viewpoint>) -> Self {
        let mut named = named;
        named
            .entry(OVERVIEW_VIEWPOINT.to_string())
            .or_insert_with(Viewpoint::default);
        Self { named }
    }

    pub fn get(&self, name: &str) -> Option<&Viewpoint> {
        self.named.get(name)
    }

    pub fn set(&mut self, name: &str, viewpoint: Viewpoint) {
        self.named.insert(name.to_string(), viewpoint);
    }

    /// Names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }
}

impl Default for Viewpoints {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

/// Camera pose that frames `bounds` with `padding` extra distance.
///
/// `distance = maxDim / (2·tan(fov/2)) · padding`, placed along a fixed
/// diagonal from the bounds centre.
pub fn fit_to_bounds(camera: &CameraState, bounds: &Aabb, padding: f32) -> CameraState {
    let center = bounds.center();
    let size = bounds.size();
    let max_dim = size.x.max(size.y).max(size.z);
    let half_fov = (camera.fov.to_radians() / 2.0).max(1e-3);
    let distance = max_dim / (2.0 * half_fov.tan()) * padding;

    CameraState {
        position: center + FIT_DIAGONAL.normalize() * distance,
        target: center,
        ..*camera
    }
}
