use std::collections::HashMap;

use serde::Serialize;

use crate::data::model::{CellValue, View};
use crate::error::Result;

/// How often one label occurs in a delimiter-encoded column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Count the labels of a delimiter-encoded column (`genres`, `cast`).
///
/// Equivalent to joining every non-missing cell with `delimiter`, splitting
/// the result on `delimiter` and counting. Empty labels are dropped.
/// Sorted by descending count; equal counts keep first-appearance order.
pub fn token_counts(view: &View<'_>, column: &str, delimiter: char) -> Result<Vec<TokenCount>> {
    view.require_column(column)?;

    let mut counts: Vec<TokenCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in view.iter() {
        let text = match record.get(column) {
            CellValue::Null => continue,
            CellValue::String(s) => s.clone(),
            other => other.to_string(),
        };
        for token in text.split(delimiter).filter(|t| !t.is_empty()) {
            match index.get(token) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(token.to_string(), counts.len());
                    counts.push(TokenCount {
                        token: token.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

/// First `n` entries of [`token_counts`].
pub fn top_tokens(
    view: &View<'_>,
    column: &str,
    delimiter: char,
    n: usize,
) -> Result<Vec<TokenCount>> {
    let mut counts = token_counts(view, column, delimiter)?;
    counts.truncate(n);
    Ok(counts)
}
