//! Quantization Inputs
//!
//! The codec reads its input through [`QuantSource`] instead of a concrete
//! tensor type: anything that exposes a shape, flat elementwise reads and a
//! max reduction can be quantized.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use apotml_tensor::{Numeric, Tensor};

/// Read access the codec needs from a tensor-like input.
pub trait QuantSource: Sync {
    /// Dimensions of the input.
    fn dims(&self) -> &[usize];

    /// Number of elements.
    fn element_count(&self) -> usize;

    /// Element at flat row-major position `index`, widened to `f64`.
    fn element(&self, index: usize) -> f64;

    /// Largest element, or `None` for an empty input.
    fn max_element(&self) -> Option<f64> {
        (0..self.element_count())
            .map(|i| self.element(i))
            .reduce(f64::max)
    }

    /// Largest absolute element, or `None` for an empty input.
    fn max_abs_element(&self) -> Option<f64> {
        (0..self.element_count())
            .map(|i| self.element(i).abs())
            .reduce(f64::max)
    }
}

impl<T: Numeric> QuantSource for Tensor<T> {
    fn dims(&self) -> &[usize] {
        self.shape()
    }

    fn element_count(&self) -> usize {
        self.numel()
    }

    fn element(&self, index: usize) -> f64 {
        self.as_slice()[index].to_f64().unwrap_or(f64::NAN)
    }

    fn max_element(&self) -> Option<f64> {
        self.max().ok()?.item().ok()?.to_f64()
    }
}

// =============================================================================
// Tests
// =============================================================================
