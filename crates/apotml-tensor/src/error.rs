//! Error Types - Tensor Error Handling
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

use crate::dtype::DType;

/// The error type for tensor construction and conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape mismatch between data and requested shape.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },

    /// A value could not be represented in the target dtype.
    #[error("Cannot cast element {index} to {target}")]
    InvalidCast {
        /// Flat position of the offending element.
        index: usize,
        /// The target data type.
        target: DType,
    },

    /// Operation is undefined on an empty tensor.
    #[error("Operation `{0}` is undefined for an empty tensor")]
    EmptyTensor(&'static str),
}

impl Error {
    /// Creates a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

/// Result type for tensor operations.
pub type Result<T> = core::result::Result<T, Error>;
