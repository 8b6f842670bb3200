//! Quantization Error Types
//!
//! Error types for APoT quantization operations. Every failure is a caller
//! contract violation reported at the call that detects it.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use thiserror::Error;

/// Result type for quantization operations.
pub type QuantResult<T> = Result<T, QuantError>;

/// Errors that can occur during quantization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantError {
    /// `b`/`k` violate positivity, divisibility or the code width limit.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The calibration maximum is negative, non-finite or missing.
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    /// An input element cannot be mapped onto the codebook.
    #[error("Value {value} at position {index} is outside the quantization domain")]
    DomainError {
        /// Flat position of the element.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// A quantized index does not address a level.
    #[error("Index {index} out of range for a codebook of {len} levels")]
    IndexOutOfRange {
        /// The offending index.
        index: i64,
        /// Number of levels in the codebook.
        len: usize,
    },

    /// The operation is intentionally not implemented.
    #[error("Operation not supported: {0}")]
    NotSupported(&'static str),

    /// Shape mismatch between data and declared shape.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        actual: Vec<usize>,
    },

    /// Invalid quantized data.
    #[error("Invalid quantized data: {0}")]
    InvalidData(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration file could not be read or written.
    #[error("Config error: {0}")]
    Config(String),

    /// Tensor conversion error.
    #[error("Tensor conversion error: {0}")]
    TensorConversion(String),
}

impl From<apotml_tensor::Error> for QuantError {
    fn from(e: apotml_tensor::Error) -> Self {
        match e {
            apotml_tensor::Error::ShapeMismatch { expected, actual } => {
                QuantError::ShapeMismatch { expected, actual }
            }
            other => QuantError::TensorConversion(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for QuantError {
    fn from(e: serde_json::Error) -> Self {
        QuantError::Serialization(e.to_string())
    }
}
