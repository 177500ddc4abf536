//! Pipeline constants.
//!
//! The defaults reproduce the TMDb analysis: the columns it drops, the
//! columns where `0` means "unknown", the `|` label separator and the
//! 20th/21st century split at 2000.

use serde::{Deserialize, Serialize};

pub const POPULARITY: &str = "popularity";
pub const BUDGET: &str = "budget";
pub const REVENUE: &str = "revenue";
pub const RUNTIME: &str = "runtime";
pub const RELEASE_DATE: &str = "release_date";
pub const RELEASE_YEAR: &str = "release_year";
pub const GENRES: &str = "genres";
pub const CAST: &str = "cast";
pub const TITLE: &str = "original_title";

/// Columns every input must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    POPULARITY,
    BUDGET,
    REVENUE,
    RUNTIME,
    RELEASE_DATE,
    RELEASE_YEAR,
    GENRES,
    CAST,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Free-text and identifier columns removed before any analysis.
    pub dropped_columns: Vec<String>,
    /// Columns where a zero value marks the record as incomplete.
    pub zero_as_missing: Vec<String>,
    /// Columns truncated to whole numbers after filtering.
    pub integer_columns: Vec<String>,
    /// Separator inside delimiter-encoded columns (`genres`, `cast`).
    pub delimiter: char,
    /// First year of the "after" partition.
    pub century_threshold: i64,
    /// Bin count for the runtime histogram.
    pub histogram_bins: usize,
    /// Length of the most-popular listing.
    pub top_movies: usize,
    pub top_genres: usize,
    pub top_actors: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dropped_columns: [
                "imdb_id",
                "homepage",
                "tagline",
                "keywords",
                "overview",
                "budget_adj",
                "revenue_adj",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            zero_as_missing: vec![BUDGET.into(), REVENUE.into(), RUNTIME.into()],
            integer_columns: vec![BUDGET.into(), REVENUE.into()],
            delimiter: '|',
            century_threshold: 2000,
            histogram_bins: 35,
            top_movies: 5,
            top_genres: 5,
            top_actors: 10,
        }
    }
}
