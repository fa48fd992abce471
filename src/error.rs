//! Error types for the resale valuation pipeline

use thiserror::Error;

/// Result type alias for valuation operations
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Main error type for the valuation pipeline
#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Unknown {} '{}', valid options: {}", .attribute, .value, .valid.join(", "))]
    UnknownCategory {
        attribute: String,
        value: String,
        valid: Vec<String>,
    },

    #[error("{attribute} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        attribute: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Model not trained")]
    ModelNotTrained,

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Label column not found: {0}")]
    MissingLabelColumn(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ValuationError {
    /// Whether a caller can recover by correcting the input and retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ValuationError::MissingAttribute(_)
                | ValuationError::UnknownCategory { .. }
                | ValuationError::OutOfRange { .. }
                | ValuationError::InvalidInput(_)
        )
    }
}

impl From<polars::error::PolarsError> for ValuationError {
    fn from(err: polars::error::PolarsError) -> Self {
        ValuationError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ValuationError {
    fn from(err: serde_json::Error) -> Self {
        ValuationError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ValuationError {
    fn from(err: ndarray::ShapeError) -> Self {
        ValuationError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
