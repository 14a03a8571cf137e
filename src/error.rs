use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a dataset from the input file. Fatal for the load.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read header row of {}: {source}", path.display())]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{} has no data rows", path.display())]
    Empty { path: PathBuf },
}

/// Recoverable failure of an aggregate or insight on too little data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("{operation} needs at least one customer")]
    EmptyInput { operation: &'static str },

    #[error("not enough data to compose insights")]
    InsufficientData,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
