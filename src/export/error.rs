use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build the {table} table")]
    Frame {
        table: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("I/O error on '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to write CSV file '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),

    #[error("Failed to read CSV file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Required column '{0}' not found in CSV file")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Column '{0}' does not hold the expected type")]
    ColumnType(String, #[source] PolarsError),

    #[error("Invalid value in row {row}, column '{column}': {message}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        message: String,
    },
}
