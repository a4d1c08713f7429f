/// Data layer: record model, loading, filtering, paging and export.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, fields of the first record
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  substring predicates → filtered records
///   └──────────┘
///        │                       │
///        ▼                       ▼
///   ┌──────────┐           ┌──────────┐
///   │   page    │ visible   │  export   │ flat CSV text
///   └──────────┘           └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod page;
