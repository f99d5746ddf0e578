use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the employee analytics pipeline.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input table lacks one of the required columns.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The input table has no data rows.
    #[error("Input table is empty")]
    EmptyTable,

    /// A statistic was requested on a column that has no usable values.
    #[error("Cannot compute median on empty/fully-null column: {0}")]
    EmptyColumn(String),

    /// A JSON document could not be serialized.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the analytics crates.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
