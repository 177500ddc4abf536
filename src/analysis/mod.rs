//! Read-only queries over a cleaned dataset or one of its partitions.
//!
//! Nothing here mutates records, so any of these can run concurrently on
//! the same [`View`].

pub mod aggregate;
pub mod ranker;
pub mod report;
pub mod tokens;

use crate::data::model::{MovieRecord, View};
use crate::error::{AnalysisError, Result};

/// Numeric cells of `column` in view order, skipping missing values.
///
/// Fails if the column is absent or any present cell is not a number.
pub(crate) fn numeric_cells<'a>(
    view: &View<'a>,
    column: &str,
) -> Result<Vec<(&'a MovieRecord, f64)>> {
    view.require_column(column)?;

    let mut cells = Vec::with_capacity(view.len());
    for (row, record) in view.iter().enumerate() {
        let cell = record.get(column);
        if cell.is_null() {
            continue;
        }
        let value = cell
            .as_f64()
            .ok_or_else(|| AnalysisError::not_numeric(column, row, cell))?;
        cells.push((record, value));
    }
    Ok(cells)
}
