use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Chart};

// ---------------------------------------------------------------------------
// Left side panel – question list and cleaning summary
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Questions");
    ui.separator();

    for chart in Chart::ALL {
        ui.selectable_value(&mut state.chart, chart, chart.label());
    }

    ui.add_space(8.0);
    ui.heading("Dataset");
    ui.separator();

    let Some(report) = &state.report else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(path) = &state.source {
                ui.label(RichText::new(path.display().to_string()).small());
            }
            egui::Grid::new("dataset_summary")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    if let Some(c) = &report.cleaning {
                        ui.label("Rows read");
                        ui.label(c.rows_in.to_string());
                        ui.end_row();
                        ui.label("Duplicates");
                        ui.label(c.duplicates_removed.to_string());
                        ui.end_row();
                        ui.label("Zero / missing");
                        ui.label(c.incomplete_removed.to_string());
                        ui.end_row();
                    }
                    ui.label("Movies kept");
                    ui.strong(report.movies.to_string());
                    ui.end_row();
                    for c in &report.centuries {
                        let color = state.colors.color_for(&c.century);
                        ui.label(RichText::new(c.century.to_string()).color(color));
                        ui.label(c.movies.to_string());
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(report) = &state.report {
            ui.label(format!(
                "{} movies, split at {}",
                report.movies, report.century_threshold
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
