/// Data layer: core types, loading, and cleaning.
///
/// Architecture:
/// ```text
///  .csv / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw text cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  schema pass: one ColumnKind per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop duplicate rows → mean-fill numeric gaps
///   └──────────┘
/// ```

pub mod clean;
pub mod loader;
pub mod model;
