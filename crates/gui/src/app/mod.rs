//! Main application module

mod keyboard;
mod loader;
mod menus;

use std::path::{Path, PathBuf};

use eframe::egui;
use walkthrough_lib::settings::TourSettings;
use walkthrough_lib::sources;
use walkthrough_lib::store::{FileStore, KeyValueStore, MemoryStore};
use walkthrough_lib::tour::Tour;

use crate::ui::{status_bar, toolbar};
use crate::viewport::orbit::ArcBallOrbit;
use crate::viewport::{PainterRenderer, ViewerTour, ViewportPanel};
use loader::{AssetLoader, LoadEvent};

/// Main application
pub struct WalkthroughApp {
    tour: ViewerTour,
    viewport: ViewportPanel,
    loader: Option<AssetLoader>,
    store: Box<dyn KeyValueStore>,
    tour_name: Option<String>,
    error: Option<String>,
    texture_serial: u64,
}

impl WalkthroughApp {
    pub fn new(cc: &eframe::CreationContext<'_>, tour_path: Option<PathBuf>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let settings = TourSettings::load();
        let store: Box<dyn KeyValueStore> = match FileStore::open_default() {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!("Local storage unavailable, overrides will not persist: {e}");
                Box::new(MemoryStore::default())
            }
        };
        let loader = match AssetLoader::new() {
            Ok(loader) => Some(loader),
            Err(e) => {
                tracing::error!("Failed to start asset loader: {e}");
                None
            }
        };

        let mut app = Self {
            tour: Tour::new(settings, PainterRenderer::new(), ArcBallOrbit::new()),
            viewport: ViewportPanel::new(),
            loader,
            store,
            tour_name: None,
            error: None,
            texture_serial: 0,
        };
        if let Some(path) = tour_path {
            app.open_tour(&path);
        }
        app
    }

    /// Load a tour description and install it
    pub fn open_tour(&mut self, path: &Path) {
        match sources::load_tour(path, self.store.as_ref()) {
            Ok(resolved) => {
                tracing::info!("Opened tour {}", path.display());
                self.tour_name = Some(resolved.name.clone());
                self.error = None;
                self.tour.install(resolved);
            }
            Err(e) => {
                tracing::error!("Failed to open tour: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Hand new requests to the loader and feed finished loads back
    fn pump_loads(&mut self, ctx: &egui::Context) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        for request in self.tour.drain_load_requests() {
            loader.start(request, ctx.clone());
        }
        for event in loader.poll() {
            match event {
                LoadEvent::Progress {
                    ticket,
                    loaded,
                    total,
                } => self.tour.report_progress(ticket, loaded, total),
                LoadEvent::Image {
                    ticket,
                    reference,
                    result,
                } => {
                    let result = result.map(|image| {
                        self.texture_serial += 1;
                        ctx.load_texture(
                            format!("panorama-{}-{reference}", self.texture_serial),
                            image,
                            egui::TextureOptions::LINEAR_REPEAT,
                        )
                    });
                    self.tour
                        .complete_image(ticket, result.map_err(|e| e.to_string()));
                }
                LoadEvent::Model { ticket, result } => {
                    self.tour
                        .complete_model(ticket, result.map_err(|e| e.to_string()));
                }
            }
        }
    }
}

impl eframe::App for WalkthroughApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_loads(ctx);

        keyboard::handle_keyboard(ctx, &mut self.tour);

        // ── Menu bar ──────────────────────────────────────────
        let mut open_path = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                open_path = menus::file_menu(ui);
                menus::view_menu(ui, &mut self.tour);
                menus::language_menu(ui);
            });
        });
        if let Some(path) = open_path {
            self.open_tour(&path);
        }

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.tour);
            });

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.tour, self.tour_name.as_deref(), self.error.as_deref());
            });

        // ── Central panel: walkthrough viewport ──────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.tour);
            });

        let dt_ms = ctx.input(|i| i.stable_dt) * 1000.0;
        self.tour.tick(dt_ms);
        // Markers pulse continuously
        ctx.request_repaint();
    }
}
