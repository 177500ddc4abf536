use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::state::{AppState, Chart};
use tmdb_explorer::analysis::report::{AnalysisReport, CenturyStats, ExtremaSummary, MovieSummary};
use tmdb_explorer::analysis::tokens::TokenCount;

const RUNTIME_COLOR: Color32 = Color32::from_rgb(0x17, 0x4E, 0xA6);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the chart for the selected question.
pub fn chart_panel(ui: &mut Ui, state: &AppState) {
    let report = match &state.report {
        Some(r) => r,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a movie table to start  (File → Open…)");
            });
            return;
        }
    };

    ui.heading(state.chart.label());
    ui.separator();

    match state.chart {
        Chart::Extremes => extremes_table(ui, report),
        Chart::Runtime => runtime_histogram(ui, report),
        Chart::PopularityByYear => popularity_by_year(ui, report),
        Chart::Genres => token_bars(ui, state, report, |c| &c.top_genres, "genres"),
        Chart::Actors => token_bars(ui, state, report, |c| &c.top_actors, "actors"),
        Chart::BudgetRevenue => budget_revenue(ui, state, report),
    }
}

// ---------------------------------------------------------------------------
// Questions 1–3: extremes
// ---------------------------------------------------------------------------

fn extremes_table(ui: &mut Ui, report: &AnalysisReport) {
    egui::Grid::new("extremes")
        .num_columns(4)
        .striped(true)
        .spacing([24.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Column");
            ui.strong("");
            ui.strong("Movie");
            ui.strong("Value");
            ui.end_row();

            let rows: [&ExtremaSummary; 3] =
                [&report.popularity, &report.budget, &report.revenue];
            for ext in rows {
                for (label, movie) in [("highest", &ext.highest), ("lowest", &ext.lowest)] {
                    ui.label(&ext.column);
                    ui.label(label);
                    ui.label(movie_label(movie));
                    ui.label(format!("{}", movie.value));
                    ui.end_row();
                }
            }
        });

    ui.add_space(12.0);
    ui.strong("Most popular");
    egui::Grid::new("most_popular")
        .num_columns(3)
        .striped(true)
        .spacing([24.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            for (rank, movie) in report.most_popular.iter().enumerate() {
                ui.label(format!("{}.", rank + 1));
                ui.label(movie_label(movie));
                ui.label(format!("{:.3}", movie.value));
                ui.end_row();
            }
        });
}

fn movie_label(movie: &MovieSummary) -> String {
    match movie.release_year {
        Some(y) => format!("{} ({y})", movie.title),
        None => movie.title.clone(),
    }
}

// ---------------------------------------------------------------------------
// Question 4: runtime histogram
// ---------------------------------------------------------------------------

fn runtime_histogram(ui: &mut Ui, report: &AnalysisReport) {
    let r = &report.runtime;
    ui.label(format!(
        "mean {:.1} min · median {:.1} · min {} · max {}",
        r.mean, r.median, r.min, r.max
    ));

    let bars: Vec<Bar> = report
        .runtime_histogram
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.0}–{:.0} min", b.start, b.end))
        })
        .collect();

    Plot::new("runtime_plot")
        .x_axis_label("Runtime of movies (min)")
        .y_axis_label("No. of movies")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(RUNTIME_COLOR));
        });
}

// ---------------------------------------------------------------------------
// Question 5: popularity per year
// ---------------------------------------------------------------------------

fn popularity_by_year(ui: &mut Ui, report: &AnalysisReport) {
    let points: PlotPoints = report
        .popularity_by_year
        .iter()
        .map(|(&year, &total)| [year as f64, total])
        .collect();

    Plot::new("popularity_plot")
        .x_axis_label("Release year")
        .y_axis_label("Total popularity")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(RUNTIME_COLOR).width(1.5));
        });
}

// ---------------------------------------------------------------------------
// Questions 6–7: most frequent labels per century
// ---------------------------------------------------------------------------

fn token_bars(
    ui: &mut Ui,
    state: &AppState,
    report: &AnalysisReport,
    select: fn(&CenturyStats) -> &Vec<TokenCount>,
    what: &str,
) {
    ui.columns(report.centuries.len().max(1), |columns| {
        for (col, stats) in columns.iter_mut().zip(&report.centuries) {
            let color = state.colors.color_for(&stats.century);
            let counts = select(stats);
            col.label(
                RichText::new(format!("Most frequent {what}, {}", stats.century)).color(color),
            );

            // Largest at the top.
            let n = counts.len();
            let bars: Vec<Bar> = counts
                .iter()
                .enumerate()
                .map(|(i, t)| Bar::new((n - i) as f64, t.count as f64).name(&t.token))
                .collect();

            Plot::new(format!("{what}_{:?}", stats.century))
                .height(220.0)
                .show_axes([true, false])
                .allow_scroll(false)
                .show(col, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).horizontal().color(color));
                });

            egui::Grid::new(format!("{what}_{:?}_table", stats.century))
                .striped(true)
                .show(col, |ui: &mut Ui| {
                    for t in counts {
                        ui.label(&t.token);
                        ui.label(t.count.to_string());
                        ui.end_row();
                    }
                });
        }
    });
}

// ---------------------------------------------------------------------------
// Questions 8–9: average budget and revenue per century
// ---------------------------------------------------------------------------

fn budget_revenue(ui: &mut Ui, state: &AppState, report: &AnalysisReport) {
    let n = report.centuries.len().max(1) as f64;
    let width = 0.8 / n;

    ui.horizontal(|ui: &mut Ui| {
        for stats in &report.centuries {
            ui.label(
                RichText::new(format!(
                    "{}: budget {:.0}, revenue {:.0}",
                    stats.century, stats.mean_budget, stats.mean_revenue
                ))
                .color(state.colors.color_for(&stats.century)),
            );
        }
    });

    Plot::new("budget_revenue_plot")
        .legend(Legend::default())
        .y_axis_label("Average (currency units)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, stats) in report.centuries.iter().enumerate() {
                let offset = (i as f64 - (n - 1.0) / 2.0) * width;
                let bars = vec![
                    Bar::new(offset, stats.mean_budget)
                        .width(width)
                        .name("budget"),
                    Bar::new(1.0 + offset, stats.mean_revenue)
                        .width(width)
                        .name("revenue"),
                ];
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(stats.century.to_string())
                        .color(state.colors.color_for(&stats.century)),
                );
            }
        });
}
