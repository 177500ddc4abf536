use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::{century_colors, ColorMap};
use tmdb_explorer::analysis::report::AnalysisReport;
use tmdb_explorer::config::PipelineConfig;
use tmdb_explorer::data::partition::Century;

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

/// The research question shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    Extremes,
    Runtime,
    PopularityByYear,
    Genres,
    Actors,
    BudgetRevenue,
}

impl Chart {
    pub const ALL: [Chart; 6] = [
        Chart::Extremes,
        Chart::Runtime,
        Chart::PopularityByYear,
        Chart::Genres,
        Chart::Actors,
        Chart::BudgetRevenue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Chart::Extremes => "Most / least popular, budget, revenue",
            Chart::Runtime => "Runtime of all movies",
            Chart::PopularityByYear => "Popularity per year",
            Chart::Genres => "Genres by century",
            Chart::Actors => "Actors by century",
            Chart::BudgetRevenue => "Average budget & revenue",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Analysis of the loaded file (None until user loads a file).
    pub report: Option<AnalysisReport>,

    /// File the report was computed from.
    pub source: Option<PathBuf>,

    pub chart: Chart,

    pub config: PipelineConfig,

    /// One colour per century series.
    pub colors: ColorMap<Century>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            report: None,
            source: None,
            chart: Chart::Extremes,
            config: PipelineConfig::default(),
            colors: century_colors(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Run the pipeline on `path` and show the result, or the error.
    pub fn load_path(&mut self, path: &Path) {
        match self.analyse(path) {
            Ok(report) => {
                log::info!(
                    "Analysed {} movies from {}",
                    report.movies,
                    path.display()
                );
                self.set_report(path, report);
            }
            Err(e) => {
                log::error!("Failed to analyse file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn analyse(&self, path: &Path) -> Result<AnalysisReport> {
        tmdb_explorer::run(path, &self.config)
            .with_context(|| format!("analysing {}", path.display()))
    }

    /// Ingest a freshly computed report.
    pub fn set_report(&mut self, path: &Path, report: AnalysisReport) {
        self.report = Some(report);
        self.source = Some(path.to_path_buf());
        self.status_message = None;
    }
}
