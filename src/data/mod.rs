/// Data layer: core types, loading, cleaning and projection.
///
/// Architecture:
/// ```text
///  .csv / .xlsx upload
///        │
///        ▼
///   ┌──────────┐
///   │  intake   │  classify by extension → SourceFormat
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  deduplicate / impute means (in place)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  project  │  selected columns → new Table
///   └──────────┘
///        │
///        ├──────────▶ chart    (numeric series for the plot)
///        ▼
///    crate::convert
/// ```

pub mod chart;
pub mod clean;
pub mod intake;
pub mod loader;
pub mod model;
pub mod project;
