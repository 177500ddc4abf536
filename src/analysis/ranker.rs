use serde::Serialize;

use super::numeric_cells;
use crate::data::model::{MovieRecord, View};
use crate::error::{AnalysisError, Result};

/// The records holding the largest and smallest value of a column.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Extrema<'a> {
    pub max: &'a MovieRecord,
    pub max_value: f64,
    pub min: &'a MovieRecord,
    pub min_value: f64,
}

/// Find the highest and lowest record by a numeric column.
///
/// Ties go to the earliest record in view order. Missing cells are skipped.
pub fn extrema<'a>(view: &View<'a>, column: &str) -> Result<Extrema<'a>> {
    let cells = numeric_cells(view, column)?;
    let mut iter = cells.into_iter();
    let Some((first, first_value)) = iter.next() else {
        return Err(AnalysisError::EmptyPartition {
            operation: "extrema",
            column: column.to_string(),
        });
    };

    let mut ext = Extrema {
        max: first,
        max_value: first_value,
        min: first,
        min_value: first_value,
    };
    for (record, value) in iter {
        if value > ext.max_value {
            ext.max = record;
            ext.max_value = value;
        }
        if value < ext.min_value {
            ext.min = record;
            ext.min_value = value;
        }
    }
    Ok(ext)
}

/// All records with a value in `column`, sorted by it.
///
/// The sort is stable, so equal values keep view order in both directions.
pub fn ranked_by<'a>(
    view: &View<'a>,
    column: &str,
    descending: bool,
) -> Result<Vec<(&'a MovieRecord, f64)>> {
    let mut cells = numeric_cells(view, column)?;
    if descending {
        cells.sort_by(|a, b| b.1.total_cmp(&a.1));
    } else {
        cells.sort_by(|a, b| a.1.total_cmp(&b.1));
    }
    Ok(cells)
}

/// First `n` entries of [`ranked_by`].
pub fn top_n<'a>(
    view: &View<'a>,
    column: &str,
    n: usize,
    descending: bool,
) -> Result<Vec<(&'a MovieRecord, f64)>> {
    let mut ranked = ranked_by(view, column, descending)?;
    ranked.truncate(n);
    Ok(ranked)
}
