mod app;
pub mod i18n;
mod ui;
mod viewport;

use std::path::PathBuf;

use app::WalkthroughApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walkthrough=info,walkthrough_lib=info".into()),
        )
        .init();

    // Parse --tour <path> argument
    let tour_path = parse_tour_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Walkthrough")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "walkthrough",
        native_options,
        Box::new(move |cc| Ok(Box::new(WalkthroughApp::new(cc, tour_path)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_tour_arg() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--tour" && i + 1 < args.len() {
            let path = PathBuf::from(&args[i + 1]);
            if path.is_file() {
                return Some(path);
            }
            tracing::error!("Tour file not found: {}", path.display());
            break;
        }
        i += 1;
    }
    None
}
