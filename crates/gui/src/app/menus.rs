//! Menu bar

use std::path::PathBuf;

use shared::OVERVIEW_VIEWPOINT;
use walkthrough_lib::tour::Mode;

use crate::i18n::{lang, set_lang, t, Lang};
use crate::viewport::ViewerTour;

/// Show the file menu; returns a tour description the user picked
pub fn file_menu(ui: &mut egui::Ui) -> Option<PathBuf> {
    let mut picked = None;
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.open")).clicked() {
            picked = rfd::FileDialog::new()
                .set_title(t("menu.open_title"))
                .add_filter("JSON", &["json"])
                .pick_file();
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
    picked
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, tour: &mut ViewerTour) {
    ui.menu_button(t("menu.view"), |ui| {
        let dollhouse = tour.mode() == Mode::Dollhouse;

        if ui
            .add_enabled(dollhouse, egui::Button::new(t("menu.overview")))
            .clicked()
        {
            tour.teleport(OVERVIEW_VIEWPOINT);
            ui.close_menu();
        }

        let names: Vec<String> = tour
            .viewpoints()
            .names()
            .filter(|name| *name != OVERVIEW_VIEWPOINT)
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            ui.menu_button(t("menu.viewpoints"), |ui| {
                for name in &names {
                    if ui.add_enabled(dollhouse, egui::Button::new(name.as_str())).clicked() {
                        tour.teleport(name);
                        ui.close_menu();
                    }
                }
            });
        }

        ui.separator();
        if ui
            .add_enabled(!dollhouse, egui::Button::new(t("menu.exit_panorama")))
            .clicked()
        {
            tour.exit_panorama();
            ui.close_menu();
        }
    });
}

/// Show the language menu
pub fn language_menu(ui: &mut egui::Ui) {
    ui.menu_button(t("menu.language"), |ui| {
        if ui.selectable_label(lang() == Lang::Ru, "Русский").clicked() {
            set_lang(Lang::Ru);
            ui.close_menu();
        }
        if ui.selectable_label(lang() == Lang::En, "English").clicked() {
            set_lang(Lang::En);
            ui.close_menu();
        }
    });
}
