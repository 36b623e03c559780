//! Tour settings

use serde::{Deserialize, Serialize};

/// Pointer gesture thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// A press shorter than this (ms) may be a tap
    pub tap_max_ms: f64,
    /// A press that moved less than this (screen units) may be a tap
    pub tap_max_distance: f32,
    /// Degrees of yaw/pitch per screen unit of drag in a panorama
    pub drag_scale: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            tap_max_ms: 300.0,
            tap_max_distance: 10.0,
            drag_scale: 0.3,
        }
    }
}

/// Panorama look and field-of-view limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookSettings {
    pub default_yaw: f32,
    pub default_pitch: f32,
    pub default_fov: f32,
    pub min_fov: f32,
    pub max_fov: f32,
    /// Pitch is clamped to ±this (degrees)
    pub pitch_limit: f32,
    /// Field-of-view change per wheel unit
    pub wheel_coefficient: f32,
    /// Field-of-view change per unit of pinch distance
    pub pinch_coefficient: f32,
    pub near: f32,
    pub far: f32,
}

impl LookSettings {
    /// Repair limits that would make clamping panic: non-finite values fall
    /// back to defaults, swapped fov bounds are reordered, pitch limit is
    /// taken as a magnitude.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if !self.min_fov.is_finite() {
            self.min_fov = defaults.min_fov;
        }
        if !self.max_fov.is_finite() {
            self.max_fov = defaults.max_fov;
        }
        if self.min_fov > self.max_fov {
            tracing::warn!(
                "min_fov {} exceeds max_fov {}, swapping",
                self.min_fov,
                self.max_fov
            );
            std::mem::swap(&mut self.min_fov, &mut self.max_fov);
        }
        self.pitch_limit = if self.pitch_limit.is_finite() {
            self.pitch_limit.abs()
        } else {
            defaults.pitch_limit
        };
        if !self.default_fov.is_finite() {
            self.default_fov = defaults.default_fov;
        }
        self
    }
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            default_yaw: 0.0,
            default_pitch: 0.0,
            default_fov: 75.0,
            min_fov: 30.0,
            max_fov: 100.0,
            pitch_limit: 85.0,
            wheel_coefficient: 0.05,
            pinch_coefficient: 0.15,
            near: 0.1,
            far: 1100.0,
        }
    }
}

/// Camera animation and fade timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    pub teleport_ms: f32,
    /// Extra distance factor when fitting the camera to the model
    pub fit_padding: f32,
    /// Opacity added per tick while a panorama fades in
    pub fade_step: f32,
    /// When set, fade over this many milliseconds instead of per tick
    pub fade_duration_ms: Option<f32>,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            teleport_ms: 1000.0,
            fit_padding: 1.5,
            fade_step: 0.05,
            fade_duration_ms: None,
        }
    }
}

/// Marker placement and pulse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    /// Distance of floor arrows from the viewer
    pub floor_radius: f32,
    /// Height of the floor plane below the viewer
    pub floor_height: f32,
    pub floor_size: f32,
    pub hotspot_size: f32,
    pub pulse_amplitude: f32,
    /// Radians per second
    pub pulse_speed: f32,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            floor_radius: 4.0,
            floor_height: -1.6,
            floor_size: 0.35,
            hotspot_size: 0.25,
            pulse_amplitude: 0.1,
            pulse_speed: 3.0,
        }
    }
}

/// All tour settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TourSettings {
    #[serde(default)]
    pub gesture: GestureSettings,
    #[serde(default)]
    pub look: LookSettings,
    #[serde(default)]
    pub transition: TransitionSettings,
    #[serde(default)]
    pub markers: MarkerSettings,
}

impl TourSettings {
    /// Settings with every section safe to use
    pub fn normalized(mut self) -> Self {
        self.look = self.look.normalized();
        self
    }

    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "walkthrough", "walkthrough")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return Self::normalized(settings),
                    Err(e) => tracing::warn!("Ignoring invalid settings {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }
}
