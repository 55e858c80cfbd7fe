//! Error types for the stock_dashboard crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the stock_dashboard crate
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A source file is missing, unreadable, or violates a loader precondition
    #[error("Data source error for '{path}': {reason}")]
    DataSource { path: String, reason: String },

    /// A requested column is not present in the unified table
    #[error("Field '{field}' not found; known columns: {known:?}")]
    FieldNotFound { field: String, known: Vec<String> },

    /// Too few usable observations for a forecast
    #[error("Insufficient data: {got} distinct timestamps, need at least {need}")]
    InsufficientData { got: usize, need: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    Forecasting(String),

    /// Error from serialization operations
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<PolarsError> for DashboardError {
    fn from(err: PolarsError) -> Self {
        DashboardError::PolarsError(err.to_string())
    }
}
