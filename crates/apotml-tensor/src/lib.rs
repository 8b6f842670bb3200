//! Apotml Tensor - N-Dimensional Array Substrate
//!
//! This crate provides the `Tensor` type the quantization codec operates on:
//! a contiguous, row-major N-dimensional array that is generic over its
//! element type. It covers exactly what the codec needs from a tensor
//! library: construction from vectors and ranges, random factories,
//! reductions, shape-preserving maps, dtype casts and equality.
//!
//! # Example
//! ```rust
//! use apotml_tensor::{arange, Tensor};
//!
//! let t = Tensor::<f32>::from_vec(vec![0.25, 0.5, 0.75, 1.0], &[2, 2]).unwrap();
//! assert_eq!(t.max().unwrap().item().unwrap(), 1.0);
//!
//! let r = arange(0i32, 4, 1);
//! assert_eq!(r.shape(), &[4]);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// Modules
// =============================================================================

pub mod creation;
pub mod dtype;
pub mod error;
pub mod shape;
pub mod tensor;

// =============================================================================
// Re-exports
// =============================================================================

pub use creation::*;
pub use dtype::{DType, Float, Numeric, Scalar};
pub use error::{Error, Result};
pub use shape::Shape;
pub use tensor::Tensor;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::dtype::{DType, Float, Numeric, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::tensor::Tensor;
    pub use crate::{arange, full, rand, randint, zeros};
}
