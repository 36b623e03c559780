// Library crate: the walkthrough engine, testable without a window.
// The egui viewer (app, ui, painter) stays in the binary crate.

pub mod assets;
pub mod command;
pub mod error;
pub mod fixtures;
pub mod gesture;
pub mod graph;
pub mod harness;
pub mod interaction;
pub mod loading;
pub mod look;
pub mod markers;
pub mod renderer;
pub mod settings;
pub mod sources;
pub mod store;
pub mod tour;
pub mod transition;

/// Camera, orbit control and marker picking shared by the engine and the
/// viewer's painter. Drawing lives in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod orbit;
    pub mod picking;
}
