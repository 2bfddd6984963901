#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use release_timeline::app::TimelineApp;
use release_timeline::config::TimelineConfig;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> eframe::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let config_path = TimelineConfig::default_path();
    let config = TimelineConfig::load_or_default(&config_path);
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!(path = %config_path.display(), error = %e, "could not write default settings");
        }
    }
    info!(path = %config_path.display(), ?config, "starting release timeline");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Release Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Release Timeline",
        options,
        Box::new(|cc| Ok(Box::new(TimelineApp::new(cc, config)))),
    )
}
