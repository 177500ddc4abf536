use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use tmdb_explorer::analysis::{aggregate, ranker, tokens};
use tmdb_explorer::config::PipelineConfig;
use tmdb_explorer::data::cleaner::clean;
use tmdb_explorer::data::loader::load_file;
use tmdb_explorer::data::model::CellValue;
use tmdb_explorer::data::partition::{partition, Century};
use tmdb_explorer::error::AnalysisError;

const HEADER: &str = "id,imdb_id,popularity,budget,revenue,original_title,cast,homepage,tagline,keywords,overview,runtime,genres,release_date,vote_count,vote_average,release_year,budget_adj,revenue_adj";

const ROWS: &[&str] = &[
    "135397,tt0369610,32.985763,150000000,1513528810,Jurassic World,Chris Pratt|Bryce Dallas Howard|Irrfan Khan,http://www.jurassicworld.com/,The park is open.,monster|dna,Twenty-two years after...,124,Action|Adventure|Science Fiction|Thriller,6/9/15,5562,6.5,2015,137999939.3,1392445893",
    "76341,tt1392190,28.419936,150000000,378436354,Mad Max: Fury Road,Tom Hardy|Charlize Theron,http://www.madmaxmovie.com/,What a Lovely Day.,future|chase,An apocalyptic story...,120,Action|Adventure|Science Fiction|Thriller,5/13/15,6185,7.1,2015,137999939.3,348161292.5",
    // Duplicate of the row above.
    "76341,tt1392190,28.419936,150000000,378436354,Mad Max: Fury Road,Tom Hardy|Charlize Theron,http://www.madmaxmovie.com/,What a Lovely Day.,future|chase,An apocalyptic story...,120,Action|Adventure|Science Fiction|Thriller,5/13/15,6185,7.1,2015,137999939.3,348161292.5",
    // No budget on record.
    "265208,tt2231253,2.932340,0,0,Wild Card,Jason Statham|Michael Angarano,,Never bet against a man.,gambling,When a Las Vegas bodyguard...,92,Thriller|Crime|Drama,1/14/15,481,5.3,2015,0,0",
    "11,tt0076759,12.037933,11000000,775398007,Star Wars,Mark Hamill|Harrison Ford|Carrie Fisher,http://www.starwars.com,A long time ago.,android|galaxy,Princess Leia is captured...,121,Adventure|Action|Science Fiction,3/20/77,4428,7.9,1977,39575591.36,2789712242",
    "1578,tt0081398,0.520000,18000000,23380203,Raging Bull,Robert De Niro|Cathy Moriarty,,,boxer,The life of boxer Jake LaMotta...,129,Drama,11/14/80,437,7.4,1980,47609108.38,61840207.48",
];

fn sample_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in ROWS {
        writeln!(file, "{row}").unwrap();
    }
    file
}

#[test]
fn end_to_end_report() {
    let file = sample_csv();
    let report = tmdb_explorer::run(file.path(), &PipelineConfig::default()).unwrap();

    let cleaning = report.cleaning.as_ref().unwrap();
    assert_eq!(cleaning.rows_in, 6);
    assert_eq!(cleaning.duplicates_removed, 1);
    assert_eq!(cleaning.incomplete_removed, 1);
    assert_eq!(cleaning.dropped_columns.len(), 7);
    assert_eq!(report.movies, 4);

    assert_eq!(report.popularity.highest.title, "Jurassic World");
    assert_eq!(report.popularity.lowest.title, "Raging Bull");
    let popular: Vec<&str> = report.most_popular.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(
        popular,
        ["Jurassic World", "Mad Max: Fury Road", "Star Wars", "Raging Bull"]
    );
    // Tie on 150M: the first record wins.
    assert_eq!(report.budget.highest.title, "Jurassic World");
    assert_eq!(report.budget.lowest.title, "Star Wars");
    assert_eq!(report.revenue.highest.title, "Jurassic World");

    let before = report.century(Century::Before).unwrap();
    assert_eq!(before.movies, 2);
    assert_eq!(before.mean_budget, 14_500_000.0);
    let after = report.century(Century::After).unwrap();
    assert_eq!(after.movies, 2);
    assert_eq!(after.top_genres[0].token, "Action");
    assert_eq!(after.top_genres[0].count, 2);
    assert_eq!(after.top_actors.len(), 5);

    assert_eq!(
        report.popularity_by_year.keys().copied().collect::<Vec<_>>(),
        vec![1977, 1980, 2015]
    );
}

#[test]
fn stages_compose_explicitly() {
    let file = sample_csv();
    let config = PipelineConfig::default();
    let raw = load_file(file.path()).unwrap();
    assert!(raw.has_column("homepage"));

    let cleaned = clean(raw, &config).unwrap();
    assert!(!cleaned.has_column("homepage"));
    assert!(matches!(
        cleaned.records[0].get("release_date"),
        CellValue::Date(_)
    ));
    // "3/20/77" is 1977, not 2077.
    assert_eq!(cleaned.records[2].release_year(), Some(1977));

    let (before, after) = partition(&cleaned, config.century_threshold).unwrap();
    assert_eq!(before.len() + after.len(), cleaned.len());
    assert_eq!(before.get(1).map(|r| r.title()), Some("Star Wars".to_string()));

    let ext = ranker::extrema(after.view(), "revenue").unwrap();
    assert_eq!(ext.min.title(), "Mad Max: Fury Road");

    let actors = tokens::token_counts(before.view(), "cast", '|').unwrap();
    assert_eq!(actors.iter().map(|t| t.count).sum::<usize>(), 5);

    let runtimes = aggregate::column_values(&cleaned.view(), "runtime").unwrap();
    assert_eq!(runtimes, vec![124.0, 120.0, 121.0, 129.0]);

    assert!(matches!(
        aggregate::mean(before.view(), "vote_count"),
        Ok(m) if m == 2432.5
    ));
}

#[test]
fn parquet_input_matches_csv() {
    let csv_file = sample_csv();
    let raw = load_file(csv_file.path()).unwrap();

    let text = |col: &str| -> ArrayRef {
        Arc::new(StringArray::from(
            raw.records
                .iter()
                .map(|r| match r.get(col) {
                    CellValue::Null => None,
                    v => Some(v.to_string()),
                })
                .collect::<Vec<_>>(),
        ))
    };
    let int = |col: &str| -> ArrayRef {
        Arc::new(Int64Array::from(
            raw.records
                .iter()
                .map(|r| r.get(col).as_i64())
                .collect::<Vec<_>>(),
        ))
    };
    let float = |col: &str| -> ArrayRef {
        Arc::new(Float64Array::from(
            raw.records
                .iter()
                .map(|r| r.get(col).as_f64())
                .collect::<Vec<_>>(),
        ))
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("original_title", text("original_title")),
        ("popularity", float("popularity")),
        ("budget", int("budget")),
        ("revenue", int("revenue")),
        ("runtime", int("runtime")),
        ("release_date", text("release_date")),
        ("release_year", int("release_year")),
        ("genres", text("genres")),
        ("cast", text("cast")),
    ];
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, arr)| Field::new(*name, arr.data_type().clone(), true))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, a)| a).collect(),
    )
    .unwrap();

    let pq_file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(pq_file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let config = PipelineConfig::default();
    let from_parquet = tmdb_explorer::run(pq_file.path(), &config).unwrap();
    let from_csv = tmdb_explorer::run(csv_file.path(), &config).unwrap();

    assert_eq!(from_parquet.movies, from_csv.movies);
    assert_eq!(from_parquet.budget, from_csv.budget);
    assert_eq!(from_parquet.centuries, from_csv.centuries);
}

#[test]
fn malformed_date_aborts_the_run() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "{}", ROWS[0].replace("6/9/15", "sometime")).unwrap();

    let err = tmdb_explorer::run(file.path(), &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::Parse { ref column, .. } if column == "release_date"));
}

#[test]
fn missing_columns_are_reported_at_load() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "id,popularity,budget,revenue").unwrap();
    writeln!(file, "1,0.5,10,20").unwrap();

    let err = tmdb_explorer::run(file.path(), &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::Format(_)));
}
