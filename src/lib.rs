//! Segment Lens: customer segmentation over a marketing campaign export.
//!
//! The library holds the data pipeline (load, derive, cache, filter) and the
//! analysis that feeds the dashboard. The binary adds the egui front end.

pub mod analysis;
pub mod cli;
pub mod data;
pub mod error;

pub use analysis::report::SegmentReport;
pub use data::cache::DatasetCache;
pub use data::filter::{apply, FilterState, Subset};
pub use data::model::{AgeBracket, Dataset, EnrichedCustomerRecord, Gender};
pub use error::{AnalysisError, DataLoadError};
