mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::TmdbExplorerApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional file to open on start-up.
    let mut state = AppState::default();
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.load_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TMDb Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(TmdbExplorerApp::new(state)))),
    )
}
