//! Data ingestion, schema inference, and aggregation

pub mod aggregate;
pub mod infer;
pub mod source;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use aggregate::{aggregate, AggregationOutcome, PassThroughReason};
pub use infer::SchemaInferencer;
pub use source::CsvSource;

/// Errors that can occur while ingesting data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}
