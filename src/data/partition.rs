use std::fmt;

use serde::Serialize;

use super::model::{Dataset, MovieRecord, View};
use crate::config::RELEASE_YEAR;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Century split
// ---------------------------------------------------------------------------

/// Which side of the year threshold a partition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Century {
    /// `release_year < threshold`
    Before,
    /// `release_year >= threshold`
    After,
}

impl Century {
    pub const ALL: [Century; 2] = [Century::Before, Century::After];
}

impl fmt::Display for Century {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Century::Before => write!(f, "20th century"),
            Century::After => write!(f, "21st century"),
        }
    }
}

/// Read-only slice of a cleaned dataset on one side of the threshold.
///
/// Records keep their dataset order and are addressed 1-based through
/// [`CenturyPartition::get`], independently of their position in the
/// full dataset.
#[derive(Debug, Clone)]
pub struct CenturyPartition<'a> {
    pub century: Century,
    pub threshold: i64,
    view: View<'a>,
}

impl<'a> CenturyPartition<'a> {
    pub fn view(&self) -> &View<'a> {
        &self.view
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// The `index`-th record, counting from 1.
    pub fn get(&self, index: usize) -> Option<&'a MovieRecord> {
        index
            .checked_sub(1)
            .and_then(|i| self.view.records.get(i))
            .copied()
    }
}

/// Split on `release_year < year_threshold` vs `>= year_threshold`.
///
/// Both halves borrow from `dataset`; together they cover every record
/// exactly once. Every record must carry an integer `release_year`.
pub fn partition(
    dataset: &Dataset,
    year_threshold: i64,
) -> Result<(CenturyPartition<'_>, CenturyPartition<'_>)> {
    if !dataset.has_column(RELEASE_YEAR) {
        return Err(AnalysisError::missing_column(RELEASE_YEAR));
    }

    let mut before = Vec::new();
    let mut after = Vec::new();
    for (row, record) in dataset.records.iter().enumerate() {
        let year = record.release_year().ok_or_else(|| {
            AnalysisError::not_numeric(RELEASE_YEAR, row, record.get(RELEASE_YEAR))
        })?;
        if year < year_threshold {
            before.push(record);
        } else {
            after.push(record);
        }
    }

    log::debug!(
        "Split at {year_threshold}: {} before, {} after",
        before.len(),
        after.len()
    );

    let make = |century, records| CenturyPartition {
        century,
        threshold: year_threshold,
        view: View {
            columns: &dataset.columns,
            records,
        },
    };
    Ok((make(Century::Before, before), make(Century::After, after)))
}
