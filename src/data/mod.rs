/// Data layer: core types, loading, cleaning and partitioning.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset (raw cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ cleaner  │  drop columns, duplicates, zero rows; retype
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ partition │  split by release year → two borrowed views
///   └───────────┘
/// ```
pub mod cleaner;
pub mod loader;
pub mod model;
pub mod partition;
