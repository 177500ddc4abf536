use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::model::{CellValue, Dataset, MovieRecord};
use crate::config::{PipelineConfig, RELEASE_DATE, RELEASE_YEAR};
use crate::error::{AnalysisError, Result};

/// What each cleaning stage removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub dropped_columns: Vec<String>,
    pub duplicates_removed: usize,
    pub incomplete_removed: usize,
    pub rows_out: usize,
}

/// Run every cleaning stage and return the cleaned table.
pub fn clean(dataset: Dataset, config: &PipelineConfig) -> Result<Dataset> {
    clean_with_report(dataset, config).map(|(ds, _)| ds)
}

/// Cleaning stages, in order:
///
/// 1. drop the configured irrelevant columns (absent ones are skipped)
/// 2. drop exact duplicates, first occurrence wins
/// 3. drop records where any `zero_as_missing` column is `0` or missing
/// 4. parse `release_date`, derive or check `release_year`
/// 5. truncate `integer_columns` to whole numbers
///
/// Truncation can turn a value in `(0, 1)` into `0`, so the zero rule is
/// applied again after stage 5. Stages 4 and 5 can also make two distinct
/// raw rows identical (`6/9/15` and `2015-06-09`, `5.2` and `5.9`), so
/// duplicates are removed once more at the end. Running `clean` on its own output changes nothing.
pub fn clean_with_report(
    mut dataset: Dataset,
    config: &PipelineConfig,
) -> Result<(Dataset, CleanReport)> {
    let mut report = CleanReport {
        rows_in: dataset.len(),
        ..Default::default()
    };

    report.dropped_columns = drop_columns(&mut dataset, &config.dropped_columns);
    log::info!("Dropped columns {:?}", report.dropped_columns);

    report.duplicates_removed = drop_duplicates(&mut dataset.records);
    log::info!("Removed {} duplicate movies", report.duplicates_removed);

    report.incomplete_removed = drop_incomplete(&mut dataset, &config.zero_as_missing)?;
    log::info!(
        "Removed {} movies with zero or missing {:?}",
        report.incomplete_removed,
        config.zero_as_missing
    );

    parse_release_dates(&mut dataset)?;
    coerce_integers(&mut dataset, &config.integer_columns)?;

    // A fractional budget below one truncates to zero.
    let truncated_to_zero = retain_complete(&mut dataset.records, &config.zero_as_missing);
    if truncated_to_zero > 0 {
        log::info!("Removed {truncated_to_zero} movies whose values truncated to zero");
    }
    report.incomplete_removed += truncated_to_zero;

    let retyped_duplicates = drop_duplicates(&mut dataset.records);
    if retyped_duplicates > 0 {
        log::info!("Removed {retyped_duplicates} movies that became duplicates after retyping");
    }
    report.duplicates_removed += retyped_duplicates;

    report.rows_out = dataset.len();
    log::info!("Cleaning kept {} of {} movies", report.rows_out, report.rows_in);
    Ok((dataset, report))
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Returns the columns that were actually present and removed.
fn drop_columns(dataset: &mut Dataset, columns: &[String]) -> Vec<String> {
    let dropped: Vec<String> = dataset
        .columns
        .iter()
        .filter(|c| columns.contains(c))
        .cloned()
        .collect();
    if dropped.is_empty() {
        return dropped;
    }

    dataset.columns.retain(|c| !dropped.contains(c));
    for record in &mut dataset.records {
        for col in &dropped {
            record.fields.remove(col);
        }
    }
    dropped
}

fn drop_duplicates(records: &mut Vec<MovieRecord>) -> usize {
    let before = records.len();
    let keep: Vec<bool> = {
        let mut seen: HashSet<&MovieRecord> = HashSet::with_capacity(before);
        records.iter().map(|r| seen.insert(r)).collect()
    };
    let mut keep = keep.into_iter();
    records.retain(|_| keep.next().unwrap_or(false));
    before - records.len()
}

fn drop_incomplete(dataset: &mut Dataset, columns: &[String]) -> Result<usize> {
    for col in columns {
        if !dataset.has_column(col) {
            return Err(AnalysisError::missing_column(col));
        }
    }

    // Text in a numeric column is a parse failure, not a missing value.
    for (row, record) in dataset.records.iter().enumerate() {
        for col in columns {
            if let CellValue::String(s) = record.get(col) {
                return Err(AnalysisError::Parse {
                    column: col.clone(),
                    row,
                    value: s.clone(),
                    reason: "not a number".to_string(),
                });
            }
        }
    }

    Ok(retain_complete(&mut dataset.records, columns))
}

fn retain_complete(records: &mut Vec<MovieRecord>, columns: &[String]) -> usize {
    let before = records.len();
    records.retain(|record| {
        columns.iter().all(|col| {
            let cell = record.get(col);
            !cell.is_null() && cell.as_f64() != Some(0.0)
        })
    });
    before - records.len()
}

fn parse_release_dates(dataset: &mut Dataset) -> Result<()> {
    let derive_year = !dataset.has_column(RELEASE_YEAR);
    if derive_year {
        dataset.columns.push(RELEASE_YEAR.to_string());
    }

    for (row, record) in dataset.records.iter_mut().enumerate() {
        let year_hint = record.release_year();
        let date = match record.get(RELEASE_DATE) {
            CellValue::Date(d) => *d,
            CellValue::String(s) => {
                parse_release_date(s, year_hint).ok_or_else(|| AnalysisError::Parse {
                    column: RELEASE_DATE.to_string(),
                    row,
                    value: s.clone(),
                    reason: "unrecognised date format".to_string(),
                })?
            }
            other => {
                return Err(AnalysisError::Parse {
                    column: RELEASE_DATE.to_string(),
                    row,
                    value: other.to_string(),
                    reason: "expected a calendar date".to_string(),
                })
            }
        };

        let year = i64::from(date.year());
        match record.get(RELEASE_YEAR) {
            CellValue::Null => {}
            CellValue::Integer(y) if *y == year => {}
            other => {
                return Err(AnalysisError::Parse {
                    column: RELEASE_YEAR.to_string(),
                    row,
                    value: other.to_string(),
                    reason: format!("disagrees with release date {date}"),
                })
            }
        }

        record
            .fields
            .insert(RELEASE_DATE.to_string(), CellValue::Date(date));
        record
            .fields
            .insert(RELEASE_YEAR.to_string(), CellValue::Integer(year));
    }
    Ok(())
}

fn coerce_integers(dataset: &mut Dataset, columns: &[String]) -> Result<()> {
    for (row, record) in dataset.records.iter_mut().enumerate() {
        for col in columns {
            let coerced = match record.get(col) {
                CellValue::Integer(_) | CellValue::Null => continue,
                CellValue::Float(f) if f.is_finite() => CellValue::Integer(f.trunc() as i64),
                other => {
                    return Err(AnalysisError::Parse {
                        column: col.clone(),
                        row,
                        value: other.to_string(),
                        reason: "cannot convert to an integer".to_string(),
                    })
                }
            };
            record.fields.insert(col.clone(), coerced);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse `YYYY-MM-DD`, `M/D/YYYY` or TMDb's `M/D/YY`.
///
/// Two-digit years take the century of `year_hint` when its last two digits
/// match, so `6/9/66` with `release_year = 1966` is 1966 rather than 2066.
/// Without a usable hint, `00..=68` is 20xx and `69..=99` is 19xx.
pub fn parse_release_date(raw: &str, year_hint: Option<i64>) -> Option<NaiveDate> {
    let s = raw.trim();
    let s = s.split(['T', ' ']).next().unwrap_or(s);

    if s.contains('-') {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 || parts[0].len() != 4 || !all_digits(&parts) {
            return None;
        }
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    }

    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 || !all_digits(&parts) {
        return None;
    }
    let month: u32 = parts[0].parse().ok()?;
    let day: u32 = parts[1].parse().ok()?;
    let year: i32 = match parts[2].len() {
        4 => parts[2].parse().ok()?,
        2 => resolve_two_digit_year(parts[2].parse().ok()?, year_hint),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn all_digits(parts: &[&str]) -> bool {
    parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn resolve_two_digit_year(yy: i32, year_hint: Option<i64>) -> i32 {
    match year_hint.and_then(|h| i32::try_from(h).ok()) {
        Some(hint) if hint.rem_euclid(100) == yy => hint,
        _ if yy < 69 => 2000 + yy,
        _ => 1900 + yy,
    }
}
