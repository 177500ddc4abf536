use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the movie table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the column dtypes of the source table.
///
/// Equality, ordering and hashing all agree (floats compare by
/// `total_cmp`), so whole records can be hashed for duplicate detection.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Date(_) => 4,
                String(_) => 5,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Infer the cell type from raw text the way a CSV reader guesses dtypes.
    pub fn infer(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            // "NaN" is how pandas writes a missing float.
            if f.is_nan() {
                return CellValue::Null;
            }
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(raw.to_string())
    }

    /// Numeric view of the cell, `None` for anything but integers and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// MovieRecord – one row of the table
// ---------------------------------------------------------------------------

static NULL: CellValue = CellValue::Null;

/// One movie: column name → value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MovieRecord {
    pub fields: BTreeMap<String, CellValue>,
}

impl MovieRecord {
    pub fn new(fields: BTreeMap<String, CellValue>) -> Self {
        Self { fields }
    }

    /// Value of `column`; absent keys read as [`CellValue::Null`].
    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&NULL)
    }

    /// Human-readable label: the original title, falling back to the id.
    pub fn title(&self) -> String {
        for key in [crate::config::TITLE, "title", "id"] {
            match self.get(key) {
                CellValue::Null => continue,
                v => return v.to_string(),
            }
        }
        "<untitled>".to_string()
    }

    pub fn release_year(&self) -> Option<i64> {
        self.get(crate::config::RELEASE_YEAR).as_i64()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full table: ordered column names plus records in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<MovieRecord>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<MovieRecord>) -> Self {
        Self { columns, records }
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Borrow every record as a read-only view.
    pub fn view(&self) -> View<'_> {
        View {
            columns: &self.columns,
            records: self.records.iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// View – read-only subset of a Dataset
// ---------------------------------------------------------------------------

/// Borrowed, ordered subset of a dataset's records. All queries run on views.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub columns: &'a [String],
    pub records: Vec<&'a MovieRecord>,
}

impl<'a> View<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a MovieRecord> + '_ {
        self.records.iter().copied()
    }

    /// Fail with a column error unless `column` is part of the table.
    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.columns.iter().any(|c| c == column) {
            Ok(())
        } else {
            Err(AnalysisError::missing_column(column))
        }
    }
}
