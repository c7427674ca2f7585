mod app;
mod color;
mod ui;

use app::WasherInsightsApp;
use eframe::egui;
use washer_insights::config::Config;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::from_env();
    log::debug!("Startup config: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Washer Insights – Catalog Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(WasherInsightsApp::new(config)))),
    )
}
