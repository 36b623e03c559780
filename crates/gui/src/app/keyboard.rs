//! Keyboard shortcut handling

use eframe::egui;
use shared::OVERVIEW_VIEWPOINT;
use walkthrough_lib::tour::Mode;

use crate::viewport::ViewerTour;

const DIGITS: [egui::Key; 9] = [
    egui::Key::Num1,
    egui::Key::Num2,
    egui::Key::Num3,
    egui::Key::Num4,
    egui::Key::Num5,
    egui::Key::Num6,
    egui::Key::Num7,
    egui::Key::Num8,
    egui::Key::Num9,
];

/// Handle keyboard shortcuts for the walkthrough
pub fn handle_keyboard(ctx: &egui::Context, tour: &mut ViewerTour) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (escape, next, prev, overview, digit) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::Escape),
            i.key_pressed(egui::Key::ArrowRight),
            i.key_pressed(egui::Key::ArrowLeft),
            i.key_pressed(egui::Key::O) && !i.modifiers.command,
            DIGITS.iter().position(|k| i.key_pressed(*k)),
        )
    });

    match tour.mode() {
        Mode::Panorama => {
            // Escape — back to the dollhouse
            if escape {
                tour.exit_panorama();
            }
            if next {
                tour.navigate_next();
            }
            if prev {
                tour.navigate_prev();
            }
        }
        Mode::Dollhouse => {
            if overview {
                tour.teleport(OVERVIEW_VIEWPOINT);
            }
            // 1–9 — named viewpoints in sorted order
            if let Some(n) = digit {
                let name = tour.viewpoints().names().nth(n).map(str::to_string);
                if let Some(name) = name {
                    tour.teleport(&name);
                }
            }
        }
    }
}
