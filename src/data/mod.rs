/// Data layer: core types, loading, derivation, caching and filtering.
///
/// Architecture:
/// ```text
///  marketing_campaign.csv  (';'-delimited)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (records + schema)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  age, total spend, gender, age bracket
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<Dataset> keyed by path, one clock read per session
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  marital status × age bracket × gender → Subset
///   └──────────┘
/// ```

pub mod cache;
pub mod derive;
pub mod filter;
pub mod loader;
pub mod model;
