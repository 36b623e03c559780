//! Toolbar: viewpoint buttons in the dollhouse, navigation in a panorama

use egui::Ui;
use shared::OVERVIEW_VIEWPOINT;
use walkthrough_lib::tour::Mode;

use crate::i18n::t;
use crate::viewport::ViewerTour;

pub fn show(ui: &mut Ui, tour: &mut ViewerTour) {
    ui.horizontal(|ui| match tour.mode() {
        Mode::Dollhouse => dollhouse_tools(ui, tour),
        Mode::Panorama => panorama_tools(ui, tour),
    });
}

fn dollhouse_tools(ui: &mut Ui, tour: &mut ViewerTour) {
    let idle = !tour.is_animating();

    if ui
        .add_enabled(idle, egui::Button::new(t("toolbar.overview")))
        .on_hover_text("O")
        .clicked()
    {
        tour.teleport(OVERVIEW_VIEWPOINT);
    }

    let names: Vec<String> = tour.viewpoints().names().map(str::to_string).collect();
    let others: Vec<(usize, &String)> = names
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_str() != OVERVIEW_VIEWPOINT)
        .collect();
    if !others.is_empty() {
        ui.separator();
    }
    for (i, name) in others {
        let mut button = ui.add_enabled(idle, egui::Button::new(name.as_str()));
        // Digit shortcuts count every viewpoint, overview included
        if i < 9 {
            button = button.on_hover_text(format!("{}", i + 1));
        }
        if button.clicked() {
            tour.teleport(name);
        }
    }

    ui.separator();
    ui.weak(t("toolbar.hint_dollhouse"));
}

fn panorama_tools(ui: &mut Ui, tour: &mut ViewerTour) {
    if ui.button(t("toolbar.exit")).on_hover_text("Esc").clicked() {
        tour.exit_panorama();
    }
    ui.separator();
    if ui.button("◀").on_hover_text(t("toolbar.prev")).clicked() {
        tour.navigate_prev();
    }
    if ui.button("▶").on_hover_text(t("toolbar.next")).clicked() {
        tour.navigate_next();
    }
    if let Some(label) = tour.renderer().label() {
        ui.separator();
        ui.strong(label.to_string());
    }
    ui.separator();
    ui.label(format!("{:.0}°", tour.look().fov));
}
