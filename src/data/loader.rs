use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, MovieRecord};
use crate::config::REQUIRED_COLUMNS;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a movie table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one movie per line (the TMDb export)
/// * `.json`    – `[{ "budget": ..., "genres": "...", ... }, ...]`
/// * `.parquet` – one column per field (pandas / polars `to_parquet`)
///
/// Every format must provide [`REQUIRED_COLUMNS`]; other columns are kept
/// as passthrough fields.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(AnalysisError::Format(format!(
                "unsupported file extension: .{other}"
            )))
        }
    };

    check_required_columns(&dataset)?;
    log::info!(
        "Loaded {} movies with {} columns from {}",
        dataset.len(),
        dataset.columns.len(),
        path.display()
    );
    Ok(dataset)
}

fn check_required_columns(dataset: &Dataset) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !dataset.has_column(c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::Format(format!(
            "missing required columns: {}",
            missing.join(", ")
        )))
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every cell typed by
/// [`CellValue::infer`]. Quoted cells may contain commas (`"Action|Drama"`
/// and cast lists often do).
fn load_csv(path: &Path) -> Result<Dataset> {
    read_csv(open(path)?)
}

/// Parse CSV text from any reader.
pub fn read_csv<R: std::io::Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnalysisError::Format(format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(|e| AnalysisError::Format(format!("CSV row {row_no}: {e}")))?;

        let fields: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(row.iter())
            .map(|(col, value)| (col.clone(), CellValue::infer(value)))
            .collect();

        records.push(MovieRecord::new(fields));
    }

    Ok(Dataset::new(headers, records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id": 135397, "popularity": 32.98, "budget": 150000000, "genres": "Action|Adventure", ... },
///   ...
/// ]
/// ```
///
/// Columns are the union of all object keys.
fn load_json(path: &Path) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))
        .map_err(|e| AnalysisError::Format(format!("parsing JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| AnalysisError::Format("expected top-level JSON array".to_string()))?;

    let mut columns: BTreeSet<String> = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| AnalysisError::Format(format!("row {i} is not a JSON object")))?;

        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            columns.insert(key.clone());
            fields.insert(key.clone(), json_to_cell(val));
        }
        records.push(MovieRecord::new(fields));
    }

    // Rows that omit a key hold Null there, same as an explicit `null`.
    for record in &mut records {
        for col in &columns {
            record.fields.entry(col.clone()).or_insert(CellValue::Null);
        }
    }

    Ok(Dataset::new(columns.into_iter().collect(), records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file, one column per field.
///
/// Utf8, integer, float, boolean and Date32 columns map onto the matching
/// [`CellValue`]; anything else is kept as its debug text.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)
        .map_err(|e| AnalysisError::Format(format!("reading parquet metadata: {e}")))?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .build()
        .map_err(|e| AnalysisError::Format(format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| AnalysisError::Format(format!("reading parquet record batch: {e}")))?;

        for row in 0..batch.num_rows() {
            let fields: BTreeMap<String, CellValue> = columns
                .iter()
                .zip(batch.columns())
                .map(|(name, col)| (name.clone(), extract_cell(col, row)))
                .collect();
            records.push(MovieRecord::new(fields));
        }
    }

    Ok(Dataset::new(columns, records))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => float_cell(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => float_cell(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map(CellValue::Date)
            .unwrap_or(CellValue::Null),
        other => CellValue::String(format!("{other:?}")),
    }
}

fn float_cell(v: f64) -> CellValue {
    if v.is_nan() {
        CellValue::Null
    } else {
        CellValue::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::data::cleaner::clean;
    use std::io::Write;

    const HEADER: &str =
        "id,popularity,budget,revenue,original_title,cast,runtime,genres,release_date,release_year";

    #[test]
    fn reads_quoted_delimited_cells() {
        let text = format!(
            "{HEADER}\n135397,32.985763,150000000,1513528810,Jurassic World,\"Chris Pratt|Bryce Dallas Howard\",124,Action|Adventure,6/9/15,2015\n"
        );
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.columns.len(), 10);

        let rec = &ds.records[0];
        assert_eq!(rec.get("budget"), &CellValue::Integer(150000000));
        assert_eq!(rec.get("popularity"), &CellValue::Float(32.985763));
        assert_eq!(
            rec.get("cast"),
            &CellValue::String("Chris Pratt|Bryce Dallas Howard".into())
        );
        assert_eq!(rec.get("release_date"), &CellValue::String("6/9/15".into()));
    }

    #[test]
    fn empty_cells_are_null() {
        let text = format!("{HEADER}\n1,0.5,0,0,Untitled,,90,,1/1/99,1999\n");
        let ds = read_csv(text.as_bytes()).unwrap();
        assert!(ds.records[0].get("cast").is_null());
        assert!(ds.records[0].get("genres").is_null());
    }

    #[test]
    fn missing_required_column_is_format_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,popularity,budget").unwrap();
        writeln!(file, "1,0.5,10").unwrap();

        let err = load_file(file.path()).unwrap_err();
        match err {
            AnalysisError::Format(msg) => {
                assert!(msg.contains("revenue"));
                assert!(msg.contains("release_date"));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_source_is_io_error() {
        let err = load_file(Path::new("/definitely/not/here/movies.csv")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("movies.xlsx")).unwrap_err();
        assert!(matches!(err, AnalysisError::Format(_)));
    }

    #[test]
    fn json_records_become_movies() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "popularity": 1.5, "budget": 10, "revenue": 20, "runtime": 90,
                 "release_date": "2001-05-04", "release_year": 2001,
                 "genres": "Drama", "cast": "A|B", "homepage": null}}]"#
        )
        .unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert!(ds.has_column("homepage"));
        assert!(ds.records[0].get("homepage").is_null());
        assert_eq!(ds.records[0].get("runtime"), &CellValue::Integer(90));
    }

    #[test]
    fn omitted_json_keys_match_explicit_nulls() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id": 7, "popularity": 2.0, "budget": 10, "revenue": 20, "runtime": 95,
                 "release_date": "1999-03-31", "release_year": 1999,
                 "genres": "Action", "cast": "K|L", "vote_count": null}},
                {{"id": 7, "popularity": 2.0, "budget": 10, "revenue": 20, "runtime": 95,
                 "release_date": "1999-03-31", "release_year": 1999,
                 "genres": "Action", "cast": "K|L"}}]"#
        )
        .unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0], ds.records[1]);
        assert!(ds.records[1].fields.contains_key("vote_count"));

        let cleaned = clean(ds, &PipelineConfig::default()).unwrap();
        assert_eq!(cleaned.len(), 1);
    }
}
