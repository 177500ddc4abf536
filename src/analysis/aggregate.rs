use std::collections::BTreeMap;

use serde::Serialize;

use super::numeric_cells;
use crate::config::RELEASE_YEAR;
use crate::data::model::View;
use crate::error::{AnalysisError, Result};

/// Arithmetic mean of a numeric column, skipping missing cells.
///
/// An empty view (or one with no values in `column`) is an error rather
/// than NaN.
pub fn mean(view: &View<'_>, column: &str) -> Result<f64> {
    let values = column_values(view, column)?;
    if values.is_empty() {
        return Err(AnalysisError::EmptyPartition {
            operation: "mean",
            column: column.to_string(),
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// The raw values of a numeric column in view order.
pub fn column_values(view: &View<'_>, column: &str) -> Result<Vec<f64>> {
    Ok(numeric_cells(view, column)?
        .into_iter()
        .map(|(_, v)| v)
        .collect())
}

/// Total of `column` per release year, ascending by year.
pub fn sum_by_year(view: &View<'_>, column: &str) -> Result<BTreeMap<i64, f64>> {
    view.require_column(RELEASE_YEAR)?;

    let mut totals = BTreeMap::new();
    for (row, (record, value)) in numeric_cells(view, column)?.into_iter().enumerate() {
        let year = record.release_year().ok_or_else(|| {
            AnalysisError::not_numeric(RELEASE_YEAR, row, record.get(RELEASE_YEAR))
        })?;
        *totals.entry(year).or_insert(0.0) += value;
    }
    Ok(totals)
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One equal-width bin. `start` is inclusive; `end` is exclusive except for
/// the last bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split `[min, max]` of `values` into `bins` equal-width bins.
///
/// When every value is the same the range is widened to `value ± 0.5`.
/// Returns no bins for empty input or `bins == 0`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + i as f64 * width,
            end: if i + 1 == bins {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let i = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[i].count += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Count, central tendency and spread of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

pub fn describe(view: &View<'_>, column: &str) -> Result<Summary> {
    let mut values = column_values(view, column)?;
    if values.is_empty() {
        return Err(AnalysisError::EmptyPartition {
            operation: "describe",
            column: column.to_string(),
        });
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Ok(Summary {
        count: n,
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[n - 1],
    })
}

/// Linear-interpolated quantile of sorted, non-empty `values`.
fn quantile(values: &[f64], q: f64) -> f64 {
    let pos = q * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Dataset};
    use crate::data::test_support::record;

    fn budgets(rows: &[(i64, Option<i64>)]) -> Dataset {
        Dataset::new(
            vec!["release_year".into(), "budget".into()],
            rows.iter()
                .map(|(year, budget)| {
                    record(&[
                        ("release_year", CellValue::Integer(*year)),
                        (
                            "budget",
                            budget.map(CellValue::Integer).unwrap_or(CellValue::Null),
                        ),
                    ])
                })
                .collect(),
        )
    }

    #[test]
    fn mean_of_partition() {
        let ds = budgets(&[(1990, Some(10)), (1991, Some(20)), (1992, Some(60))]);
        assert_eq!(mean(&ds.view(), "budget").unwrap(), 30.0);
    }

    #[test]
    fn mean_skips_missing_cells() {
        let ds = budgets(&[(1990, Some(10)), (1991, None), (1992, Some(20))]);
        assert_eq!(mean(&ds.view(), "budget").unwrap(), 15.0);
    }

    #[test]
    fn mean_of_empty_partition_is_an_error() {
        let ds = budgets(&[]);
        let err = mean(&ds.view(), "budget").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::EmptyPartition { operation: "mean", .. }
        ));
    }

    #[test]
    fn mean_of_absent_column_is_an_error() {
        let ds = budgets(&[(1990, Some(1))]);
        assert!(matches!(
            mean(&ds.view(), "revenue"),
            Err(AnalysisError::Column { .. })
        ));
    }

    #[test]
    fn sums_per_year_in_year_order() {
        let ds = budgets(&[(2001, Some(5)), (1999, Some(1)), (2001, Some(2))]);
        let totals = sum_by_year(&ds.view(), "budget").unwrap();
        assert_eq!(
            totals.into_iter().collect::<Vec<_>>(),
            vec![(1999, 1.0), (2001, 7.0)]
        );
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [90.0, 95.0, 100.0, 120.0, 180.0, 180.0];
        let bins = histogram(&values, 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins[0].start, 90.0);
        assert_eq!(bins[2].end, 180.0);
        assert_eq!(
            bins.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![3, 1, 2]
        );
    }

    #[test]
    fn histogram_of_constant_values() {
        let bins = histogram(&[100.0, 100.0], 2);
        assert_eq!(bins[0].start, 99.5);
        assert_eq!(bins[1].end, 100.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(histogram(&[], 10).is_empty());
    }

    #[test]
    fn describe_matches_hand_computation() {
        let ds = budgets(&[
            (1990, Some(1)),
            (1990, Some(2)),
            (1990, Some(3)),
            (1990, Some(4)),
        ]);
        let s = describe(&ds.view(), "budget").unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q25, 1.75);
        assert_eq!(s.q75, 3.25);
        let std = s.std.unwrap();
        assert!((std - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn describe_single_value_has_no_std() {
        let ds = budgets(&[(1990, Some(7))]);
        assert_eq!(describe(&ds.view(), "budget").unwrap().std, None);
    }
}
