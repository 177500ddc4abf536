use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::aggregate::{self, HistogramBin, Summary};
use super::ranker;
use super::tokens::{self, TokenCount};
use crate::config::{PipelineConfig, BUDGET, CAST, GENRES, POPULARITY, REVENUE, RUNTIME};
use crate::data::cleaner::CleanReport;
use crate::data::model::{Dataset, MovieRecord, View};
use crate::data::partition::{self, Century, CenturyPartition};
use crate::error::Result;

/// Just enough of a movie to name it in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub title: String,
    pub release_year: Option<i64>,
    pub value: f64,
}

impl MovieSummary {
    fn new(record: &MovieRecord, value: f64) -> Self {
        Self {
            title: record.title(),
            release_year: record.release_year(),
            value,
        }
    }
}

/// Highest and lowest movie by one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremaSummary {
    pub column: String,
    pub highest: MovieSummary,
    pub lowest: MovieSummary,
}

impl ExtremaSummary {
    fn build(view: &View<'_>, column: &str) -> Result<Self> {
        let ext = ranker::extrema(view, column)?;
        Ok(Self {
            column: column.to_string(),
            highest: MovieSummary::new(ext.max, ext.max_value),
            lowest: MovieSummary::new(ext.min, ext.min_value),
        })
    }
}

/// Per-century answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenturyStats {
    pub century: Century,
    pub movies: usize,
    pub top_genres: Vec<TokenCount>,
    pub top_actors: Vec<TokenCount>,
    pub mean_budget: f64,
    pub mean_revenue: f64,
}

impl CenturyStats {
    fn build(partition: &CenturyPartition<'_>, config: &PipelineConfig) -> Result<Self> {
        let view = partition.view();
        Ok(Self {
            century: partition.century,
            movies: partition.len(),
            top_genres: tokens::top_tokens(view, GENRES, config.delimiter, config.top_genres)?,
            top_actors: tokens::top_tokens(view, CAST, config.delimiter, config.top_actors)?,
            mean_budget: aggregate::mean(view, BUDGET)?,
            mean_revenue: aggregate::mean(view, REVENUE)?,
        })
    }
}

/// The full set of answers computed from one cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub cleaning: Option<CleanReport>,
    pub movies: usize,
    pub century_threshold: i64,
    pub popularity: ExtremaSummary,
    /// Most popular movies first.
    pub most_popular: Vec<MovieSummary>,
    pub budget: ExtremaSummary,
    pub revenue: ExtremaSummary,
    pub runtime: Summary,
    pub runtime_histogram: Vec<HistogramBin>,
    pub popularity_by_year: BTreeMap<i64, f64>,
    pub centuries: Vec<CenturyStats>,
}

impl AnalysisReport {
    /// Compute every answer from an already cleaned dataset.
    ///
    /// The two century partitions are summarised on separate scoped
    /// threads; both only read `dataset`.
    pub fn build(dataset: &Dataset, config: &PipelineConfig) -> Result<Self> {
        let view = dataset.view();

        let popularity = ExtremaSummary::build(&view, POPULARITY)?;
        let most_popular = ranker::top_n(&view, POPULARITY, config.top_movies, true)?
            .into_iter()
            .map(|(record, value)| MovieSummary::new(record, value))
            .collect();
        let budget = ExtremaSummary::build(&view, BUDGET)?;
        let revenue = ExtremaSummary::build(&view, REVENUE)?;

        let runtime_values = aggregate::column_values(&view, RUNTIME)?;
        let runtime_histogram = aggregate::histogram(&runtime_values, config.histogram_bins);
        let runtime = aggregate::describe(&view, RUNTIME)?;

        let popularity_by_year = aggregate::sum_by_year(&view, POPULARITY)?;

        let (before, after) = partition::partition(dataset, config.century_threshold)?;
        let centuries = std::thread::scope(|s| {
            let handles: Vec<_> = [&before, &after]
                .into_iter()
                .map(|p| s.spawn(move || CenturyStats::build(p, config)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(Self {
            cleaning: None,
            movies: dataset.len(),
            century_threshold: config.century_threshold,
            popularity,
            most_popular,
            budget,
            revenue,
            runtime,
            runtime_histogram,
            popularity_by_year,
            centuries,
        })
    }

    pub fn century(&self, century: Century) -> Option<&CenturyStats> {
        self.centuries.iter().find(|c| c.century == century)
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.release_year {
            Some(year) => write!(f, "{} ({year}): {}", self.title, self.value),
            None => write!(f, "{}: {}", self.title, self.value),
        }
    }
}

fn write_tokens(f: &mut fmt::Formatter<'_>, heading: &str, counts: &[TokenCount]) -> fmt::Result {
    writeln!(f, "    {heading}:")?;
    for t in counts {
        writeln!(f, "      {:<28} {}", t.token, t.count)?;
    }
    Ok(())
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = &self.cleaning {
            writeln!(
                f,
                "Cleaning: {} -> {} movies ({} duplicates, {} incomplete), dropped {:?}",
                c.rows_in, c.rows_out, c.duplicates_removed, c.incomplete_removed, c.dropped_columns
            )?;
        }
        writeln!(f, "Movies analysed: {}", self.movies)?;
        writeln!(f)?;

        for ext in [&self.popularity, &self.budget, &self.revenue] {
            writeln!(f, "Highest {}: {}", ext.column, ext.highest)?;
            writeln!(f, "Lowest {}:  {}", ext.column, ext.lowest)?;
        }
        writeln!(f)?;

        writeln!(f, "Most popular:")?;
        for (rank, movie) in self.most_popular.iter().enumerate() {
            writeln!(f, "    {}. {movie}", rank + 1)?;
        }
        writeln!(f)?;

        let r = &self.runtime;
        writeln!(
            f,
            "Runtime: mean {:.1} min, median {:.1}, min {}, max {} ({} bins)",
            r.mean,
            r.median,
            r.min,
            r.max,
            self.runtime_histogram.len()
        )?;

        if let (Some((first, _)), Some((last, _))) = (
            self.popularity_by_year.first_key_value(),
            self.popularity_by_year.last_key_value(),
        ) {
            let (peak_year, peak) = self
                .popularity_by_year
                .iter()
                .fold((first, &0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            writeln!(
                f,
                "Popularity by year: {first}-{last}, peak {peak:.2} in {peak_year}"
            )?;
        }
        writeln!(f)?;

        for c in &self.centuries {
            writeln!(
                f,
                "{} ({} movies, split at {}):",
                c.century, c.movies, self.century_threshold
            )?;
            writeln!(f, "    average budget:  {:.2}", c.mean_budget)?;
            writeln!(f, "    average revenue: {:.2}", c.mean_revenue)?;
            write_tokens(f, "top genres", &c.top_genres)?;
            write_tokens(f, "top actors", &c.top_actors)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cleaner::clean;
    use crate::data::model::CellValue;
    use crate::data::test_support::{movie, table};

    fn sample() -> Dataset {
        let mut rows = vec![
            movie(100, 500, 120, "1/1/95", 1995),
            movie(300, 200, 95, "5/5/2005", 2005),
            movie(50, 900, 150, "3/3/2010", 2010),
        ];
        rows[0]
            .fields
            .insert("genres".into(), CellValue::String("Action|Drama".into()));
        rows[2]
            .fields
            .insert("popularity".into(), CellValue::Float(9.5));
        rows[2]
            .fields
            .insert("original_title".into(), CellValue::String("Hit".into()));
        clean(table(rows), &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn answers_every_question() {
        let report = AnalysisReport::build(&sample(), &PipelineConfig::default()).unwrap();

        assert_eq!(report.movies, 3);
        assert_eq!(report.popularity.highest.title, "Hit");
        let ranked: Vec<f64> = report.most_popular.iter().map(|m| m.value).collect();
        assert_eq!(ranked, vec![9.5, 1.0, 1.0]);
        assert_eq!(report.most_popular[0].title, "Hit");
        // Equal popularity keeps dataset order.
        assert_eq!(report.most_popular[1].release_year, Some(1995));
        assert_eq!(report.budget.highest.value, 300.0);
        assert_eq!(report.budget.lowest.value, 50.0);
        assert_eq!(report.revenue.highest.value, 900.0);
        assert_eq!(report.runtime.count, 3);
        assert_eq!(report.runtime_histogram.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(report.popularity_by_year.len(), 3);

        let before = report.century(Century::Before).unwrap();
        assert_eq!(before.movies, 1);
        assert_eq!(before.mean_budget, 100.0);
        assert_eq!(before.top_genres[0].token, "Action");

        let after = report.century(Century::After).unwrap();
        assert_eq!(after.movies, 2);
        assert_eq!(after.mean_revenue, 550.0);
        assert_eq!(after.top_genres[0].count, 2);
    }

    #[test]
    fn empty_century_aborts_the_report() {
        let ds = clean(
            table(vec![movie(1, 1, 90, "1/1/2001", 2001)]),
            &PipelineConfig::default(),
        )
        .unwrap();
        let err = AnalysisReport::build(&ds, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AnalysisError::EmptyPartition { .. }
        ));
    }

    #[test]
    fn renders_text_and_json() {
        let report = AnalysisReport::build(&sample(), &PipelineConfig::default()).unwrap();

        let text = report.to_string();
        assert!(text.contains("Highest popularity: Hit (2010): 9.5"));
        assert!(text.contains("20th century (1 movies"));
        assert!(text.contains("Most popular:\n    1. Hit (2010): 9.5\n"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["movies"], 3);
        assert_eq!(json["most_popular"][0]["title"], "Hit");
        assert_eq!(json["centuries"][0]["century"], "before");
    }
}
