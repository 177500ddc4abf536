//! Exploratory analysis of the TMDb movie dataset.
//!
//! The pipeline is an explicit chain of transforms:
//! [`load_file`](data::loader::load_file) → [`clean`](data::cleaner::clean)
//! → [`partition`](data::partition::partition), followed by read-only
//! queries in [`analysis`]. [`run`] composes the whole chain.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;

use std::path::Path;

use analysis::report::AnalysisReport;
use config::PipelineConfig;
use data::cleaner::{clean_with_report, CleanReport};
use data::model::Dataset;
use error::Result;

/// Load and clean a movie table.
pub fn load_clean(path: &Path, config: &PipelineConfig) -> Result<(Dataset, CleanReport)> {
    let raw = data::loader::load_file(path)?;
    clean_with_report(raw, config)
}

/// Load, clean and analyse `path` in one pass.
pub fn run(path: &Path, config: &PipelineConfig) -> Result<AnalysisReport> {
    let (dataset, cleaning) = load_clean(path, config)?;
    let mut report = AnalysisReport::build(&dataset, config)?;
    report.cleaning = Some(cleaning);
    Ok(report)
}
