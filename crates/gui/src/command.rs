//! JSON command protocol for scripted tours.
//!
//! Each command maps onto a tour operation on the headless harness, so a
//! whole walkthrough can be replayed from a JSON array.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shared::NodeIndex;

use crate::fixtures;
use crate::harness::TestHarness;
use crate::loading::{LoadStatus, Progress};
use crate::sources;
use crate::tour::Mode;

fn default_steps() -> u32 {
    8
}

/// A command against a running tour
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TourCommand {
    /// Load a tour description file
    LoadTour { path: String },
    /// Install the built-in four-room sample
    LoadSample,
    EnterPanorama { node: NodeIndex },
    NavigateTo { node: NodeIndex },
    /// Next panorama in manifest order
    Next,
    /// Previous panorama in manifest order
    Prev,
    ExitPanorama,
    /// Eased camera move to a named viewpoint
    Teleport { viewpoint: String },
    /// Quick press/release at a screen point
    Tap { x: f32, y: f32 },
    Drag {
        from: [f32; 2],
        to: [f32; 2],
        #[serde(default = "default_steps")]
        steps: u32,
    },
    Wheel { delta: f32 },
    /// Two-finger distance change
    Pinch { from: f32, to: f32 },
    /// Advance animations by `ms`
    Tick { ms: f32 },
    /// Fulfil queued image and model loads
    CompleteLoads,
    /// Persist a hotspot position override
    SetHotspot { node: NodeIndex, position: [f32; 3] },
    /// Report mode, camera and marker state
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    /// Rejected transitions are not errors, just `changed: false`
    fn changed(changed: bool) -> Self {
        Self::ok_with_data(serde_json::json!({ "changed": changed }))
    }
}

fn status_json(status: &LoadStatus) -> serde_json::Value {
    match status {
        LoadStatus::Idle => serde_json::json!({ "state": "idle" }),
        LoadStatus::Loading { slot, progress } => serde_json::json!({
            "state": "loading",
            "slot": format!("{slot:?}").to_lowercase(),
            "progress": match progress {
                Progress::Determinate(p) => serde_json::json!(p),
                Progress::Indeterminate => serde_json::Value::Null,
            },
        }),
        LoadStatus::Failed { slot, message } => serde_json::json!({
            "state": "failed",
            "slot": format!("{slot:?}").to_lowercase(),
            "message": message,
        }),
    }
}

fn inspect(harness: &TestHarness) -> serde_json::Value {
    let tour = &harness.tour;
    let renderer = tour.renderer();
    let camera = renderer.camera;
    let look = tour.look();
    serde_json::json!({
        "mode": match tour.mode() {
            Mode::Dollhouse => "dollhouse",
            Mode::Panorama => "panorama",
        },
        "active": tour.active_node(),
        "label": renderer.label,
        "animating": tour.is_animating(),
        "node_count": tour.graph().len(),
        "hotspot_count": harness.hotspot_count(),
        "floor_targets": harness.floor_targets(),
        "camera": {
            "position": camera.position.to_array(),
            "target": camera.target.to_array(),
            "fov": camera.fov,
        },
        "look": {
            "yaw": look.yaw,
            "pitch": look.pitch,
            "fov": look.fov,
        },
        "viewpoints": tour.viewpoints().names().collect::<Vec<_>>(),
        "panorama": renderer.panorama,
        "status": status_json(&renderer.status),
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: TourCommand) -> CommandResponse {
    match cmd {
        TourCommand::LoadTour { path } => {
            match sources::load_tour(Path::new(&path), &harness.store) {
                Ok(resolved) => {
                    let name = resolved.name.clone();
                    harness.install(resolved);
                    CommandResponse::ok_with_data(serde_json::json!({
                        "name": name,
                        "node_count": harness.tour.graph().len(),
                    }))
                }
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        TourCommand::LoadSample => {
            harness.install(fixtures::sample_tour());
            CommandResponse::ok()
        }

        TourCommand::EnterPanorama { node } => {
            CommandResponse::changed(harness.tour.enter_panorama(node))
        }

        TourCommand::NavigateTo { node } => CommandResponse::changed(harness.tour.navigate_to(node)),

        TourCommand::Next => CommandResponse::changed(harness.tour.navigate_next()),

        TourCommand::Prev => CommandResponse::changed(harness.tour.navigate_prev()),

        TourCommand::ExitPanorama => CommandResponse::changed(harness.tour.exit_panorama()),

        TourCommand::Teleport { viewpoint } => {
            if harness.tour.viewpoints().get(&viewpoint).is_none() {
                return CommandResponse::err(format!("Unknown viewpoint: {viewpoint}"));
            }
            CommandResponse::changed(harness.tour.teleport(&viewpoint))
        }

        TourCommand::Tap { x, y } => CommandResponse::changed(harness.tap_at(Vec2::new(x, y))),

        TourCommand::Drag { from, to, steps } => {
            harness.drag(Vec2::from_array(from), Vec2::from_array(to), steps);
            CommandResponse::ok()
        }

        TourCommand::Wheel { delta } => {
            harness.wheel(delta);
            CommandResponse::ok()
        }

        TourCommand::Pinch { from, to } => {
            harness.pinch(from, to);
            CommandResponse::ok()
        }

        TourCommand::Tick { ms } => {
            if !ms.is_finite() || ms < 0.0 {
                return CommandResponse::err(format!("Invalid tick duration: {ms}"));
            }
            harness.advance(ms);
            CommandResponse::ok()
        }

        TourCommand::CompleteLoads => {
            let completed = harness.complete_pending_loads();
            CommandResponse::ok_with_data(serde_json::json!({ "completed": completed }))
        }

        TourCommand::SetHotspot { node, position } => {
            let position = Vec3::from_array(position);
            match harness
                .tour
                .set_hotspot_override(&mut harness.store, node, position)
            {
                Ok(applied) => CommandResponse::ok_with_data(serde_json::json!({ "applied": applied })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        TourCommand::Inspect => CommandResponse::ok_with_data(inspect(harness)),
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: TourCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<TourCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
