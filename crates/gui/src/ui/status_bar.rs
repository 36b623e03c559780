use egui::Ui;
use walkthrough_lib::loading::{LoadSlot, LoadStatus, Progress};
use walkthrough_lib::tour::Mode;

use crate::i18n::t;
use crate::viewport::ViewerTour;

pub fn show(ui: &mut Ui, tour: &ViewerTour, tour_name: Option<&str>, error: Option<&str>) {
    ui.horizontal(|ui| {
        match tour_name {
            Some(name) => ui.label(name),
            None => ui.weak(t("status.no_tour")),
        };
        ui.weak(format!("{}: {}", t("status.nodes"), tour.graph().len()));

        ui.separator();

        let mode = match tour.mode() {
            Mode::Dollhouse => t("status.dollhouse"),
            Mode::Panorama => t("status.panorama"),
        };
        ui.label(mode);
        if tour.is_animating() {
            ui.weak(t("status.moving"));
        }

        match tour.status() {
            LoadStatus::Idle => {}
            LoadStatus::Loading { slot, progress } => {
                ui.separator();
                ui.label(slot_label(*slot));
                match progress {
                    Progress::Determinate(fraction) => {
                        ui.add(
                            egui::ProgressBar::new(*fraction)
                                .desired_width(120.0)
                                .show_percentage(),
                        );
                    }
                    Progress::Indeterminate => {
                        ui.spinner();
                    }
                }
            }
            LoadStatus::Failed { slot, message } => {
                ui.separator();
                ui.colored_label(
                    egui::Color32::from_rgb(255, 120, 100),
                    format!("{} {}: {message}", slot_label(*slot), t("status.failed")),
                );
            }
        }

        if let Some(error) = error {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(255, 120, 100), error);
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("Walkthrough v", env!("CARGO_PKG_VERSION")));
        });
    });
}

fn slot_label(slot: LoadSlot) -> &'static str {
    match slot {
        LoadSlot::Model => t("status.model"),
        LoadSlot::Panorama => t("status.image"),
    }
}
