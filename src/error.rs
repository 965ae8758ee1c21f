//! Error types.
//!
//! - `DataError` is returned by the library layers (loading, extraction, index
//!   computation, gap filling). It names the dataset/row/column involved so a
//!   broken join can be traced back to the source file.
//! - `AppError` is what the binary reports: a message plus a process exit code.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::DatasetKind;

/// Failures raised while loading or deriving monthly data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {dataset} dataset '{path}': {source}")]
    Io {
        dataset: DatasetKind,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {dataset} dataset '{path}': {source}")]
    Csv {
        dataset: DatasetKind,
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{dataset} row {row} has no column {column}")]
    MissingColumn {
        dataset: DatasetKind,
        row: usize,
        column: usize,
    },

    #[error("{dataset} row {row}, column {column}: invalid value '{value}' ({reason})")]
    Parse {
        dataset: DatasetKind,
        row: usize,
        column: usize,
        value: String,
        reason: String,
    },

    #[error("no unemployment data for {month}: offset {offset} outside 0..{rows}")]
    UnemploymentOutOfRange {
        month: NaiveDate,
        offset: i64,
        rows: usize,
    },

    #[error("national COVID-19 cases for {month} sum to {total}")]
    NegativeCaseTotal { month: NaiveDate, total: i64 },

    #[error("basket '{commodity}' for {month} has no matching CPI entry")]
    MissingCpi { commodity: String, month: NaiveDate },

    #[error("basket category '{label}' for {month} appears before any top-level basket")]
    OrphanCategory { label: String, month: NaiveDate },

    #[error("cannot fill missing months: no month in the range has a spending index")]
    NoTrainingData,

    #[error("trend fit failed: {0}")]
    TrendFit(String),

    #[error("trend model produced a non-finite value for {month}")]
    NonFinitePrediction { month: NaiveDate },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_map_to_exit_code_three() {
        let err: AppError = DataError::NoTrainingData.into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("no month in the range"));
    }
}
