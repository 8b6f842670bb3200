//! Tensor Creation Functions
//!
//! Factory functions for constant, range and random tensors.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::dtype::{Float, Numeric, Scalar};
use crate::shape::{numel, Shape};
use crate::tensor::Tensor;

// =============================================================================
// Constant Initialization
// =============================================================================

/// Creates a tensor filled with zeros.
///
/// # Example
/// ```rust
/// use apotml_tensor::zeros;
/// let t = zeros::<f32>(&[2, 3]);
/// assert_eq!(t.numel(), 6);
/// ```
#[must_use]
pub fn zeros<T: Scalar>(shape: &[usize]) -> Tensor<T> {
    full(shape, T::zeroed())
}

/// Creates a tensor filled with a specific value.
#[must_use]
pub fn full<T: Scalar>(shape: &[usize], value: T) -> Tensor<T> {
    Tensor {
        data: vec![value; numel(shape)],
        shape: Shape::from_slice(shape),
    }
}

// =============================================================================
// Ranges
// =============================================================================

/// Creates a 1-D tensor with values `start, start + step, ...` below `end`.
#[must_use]
pub fn arange<T: Numeric>(start: T, end: T, step: T) -> Tensor<T> {
    let mut data = Vec::new();
    let mut current = start;
    if step > T::ZERO {
        while current < end {
            data.push(current);
            current = current + step;
        }
    }
    let len = data.len();
    Tensor {
        data,
        shape: Shape::from_slice(&[len]),
    }
}

// =============================================================================
// Random Initialization
// =============================================================================

/// Creates a tensor with uniformly distributed random values in [0, 1).
#[must_use]
pub fn rand<T: Float>(shape: &[usize]) -> Tensor<T>
where
    Standard: Distribution<T>,
{
    let mut rng = rand::thread_rng();
    let data: Vec<T> = (0..numel(shape)).map(|_| rng.gen()).collect();
    Tensor {
        data,
        shape: Shape::from_slice(shape),
    }
}

/// Creates a tensor with uniformly distributed random values in [low, high).
///
/// # Panics
/// Panics if `low >= high`.
#[must_use]
pub fn randint<T: Numeric + SampleUniform>(low: T, high: T, shape: &[usize]) -> Tensor<T> {
    let mut rng = rand::thread_rng();
    let data: Vec<T> = (0..numel(shape))
        .map(|_| rng.gen_range(low..high))
        .collect();
    Tensor {
        data,
        shape: Shape::from_slice(shape),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_full() {
        let z = zeros::<f32>(&[2, 3]);
        assert_eq!(z.shape(), &[2, 3]);
        assert!(z.to_vec().iter().all(|&x| x == 0.0));

        let f = full::<u8>(&[4], 7);
        assert_eq!(f.to_vec(), vec![7, 7, 7, 7]);
    }

    #[test]
    fn test_arange() {
        let t = arange(0i32, 5, 1);
        assert_eq!(t.to_vec(), vec![0, 1, 2, 3, 4]);

        let t = arange(0.0f64, 1.0, 0.25);
        assert_eq!(t.to_vec(), vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_rand_range() {
        let t = rand::<f32>(&[16, 16]);
        assert_eq!(t.shape(), &[16, 16]);
        assert!(t.to_vec().iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_randint_range() {
        let t = randint(0i32, 64, &[8, 8, 8]);
        assert_eq!(t.numel(), 512);
        assert!(t.to_vec().iter().all(|&x| (0..64).contains(&x)));
    }
}
