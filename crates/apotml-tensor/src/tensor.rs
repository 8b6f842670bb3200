//! Tensor - Core N-Dimensional Array Type
//!
//! A contiguous, row-major N-dimensional array. The quantization codec only
//! needs shape bookkeeping, elementwise reads, shape-preserving maps,
//! reductions and dtype casts, so that is what this type provides.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;

use num_traits::NumCast;

use crate::dtype::{Float, Numeric, Scalar};
use crate::error::{Error, Result};
use crate::shape::{contiguous_strides, numel, Shape};

// =============================================================================
// Tensor Struct
// =============================================================================

/// An N-dimensional array of scalar values.
#[derive(Clone, PartialEq)]
pub struct Tensor<T: Scalar> {
    /// Flat row-major element buffer.
    pub(crate) data: Vec<T>,
    /// Shape of the tensor (dimensions).
    pub(crate) shape: Shape,
}

impl<T: Scalar> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a new tensor from a vector with the given shape.
    ///
    /// # Returns
    /// New tensor, or error if shape doesn't match data length.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let total = numel(shape);
        if total != data.len() {
            return Err(Error::shape_mismatch(shape, &[data.len()]));
        }

        Ok(Self {
            data,
            shape: Shape::from_slice(shape),
        })
    }

    /// Creates a new tensor by copying a slice into the given shape.
    pub fn from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Creates a scalar tensor (0-dimensional).
    pub fn scalar(value: T) -> Self {
        Self {
            data: vec![value],
            shape: Shape::new(),
        }
    }

    /// Creates a tensor filled with zeros.
    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        crate::creation::zeros(shape)
    }

    /// Creates a tensor with random values from uniform distribution [0, 1).
    #[must_use]
    pub fn rand(shape: &[usize]) -> Self
    where
        T: Float,
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        crate::creation::rand(shape)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the row-major strides of the tensor, in elements.
    #[must_use]
    pub fn strides(&self) -> Vec<usize> {
        contiguous_strides(&self.shape)
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the tensor has zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // =========================================================================
    // Element Access
    // =========================================================================

    /// Returns the element at the given multi-dimensional index.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        if indices.len() != self.ndim()
            || indices.iter().zip(self.shape.iter()).any(|(&i, &d)| i >= d)
        {
            return Err(Error::shape_mismatch(&self.shape, indices));
        }
        let offset: usize = indices
            .iter()
            .zip(self.strides())
            .map(|(&i, s)| i * s)
            .sum();
        Ok(self.data[offset])
    }

    /// Returns the single element of a one-element tensor.
    pub fn item(&self) -> Result<T> {
        if self.data.len() != 1 {
            return Err(Error::shape_mismatch(&[1], &self.shape));
        }
        Ok(self.data[0])
    }

    /// Borrows the flat row-major element buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copies the elements into a flat row-major vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Consumes the tensor, returning its flat buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    // =========================================================================
    // Shape Operations
    // =========================================================================

    /// Returns a tensor with the same data and a new shape.
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Self> {
        Self::from_vec(self.data.clone(), new_shape)
    }

    /// Returns a 1-D copy of this tensor.
    #[must_use]
    pub fn flatten(&self) -> Self {
        Self {
            data: self.data.clone(),
            shape: Shape::from_slice(&[self.data.len()]),
        }
    }

    // =========================================================================
    // Elementwise Operations
    // =========================================================================

    /// Applies `f` to every element, preserving the shape.
    pub fn map<U: Scalar, F: Fn(T) -> U>(&self, f: F) -> Tensor<U> {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
        }
    }
}

impl<T: Numeric> Tensor<T> {
    // =========================================================================
    // Reductions
    // =========================================================================

    /// Returns the maximum element as a scalar tensor.
    pub fn max(&self) -> Result<Self> {
        let first = *self.data.first().ok_or(Error::EmptyTensor("max"))?;
        let result = self
            .data
            .iter()
            .fold(first, |acc, &x| if x > acc { x } else { acc });
        Ok(Self::scalar(result))
    }

    /// Returns the minimum element as a scalar tensor.
    pub fn min(&self) -> Result<Self> {
        let first = *self.data.first().ok_or(Error::EmptyTensor("min"))?;
        let result = self
            .data
            .iter()
            .fold(first, |acc, &x| if x < acc { x } else { acc });
        Ok(Self::scalar(result))
    }

    /// Returns the sum of all elements as a scalar tensor.
    #[must_use]
    pub fn sum(&self) -> Self {
        Self::scalar(self.data.iter().fold(T::ZERO, |acc, &x| acc + x))
    }

    // =========================================================================
    // Type Conversion
    // =========================================================================

    /// Casts every element to another numeric type.
    ///
    /// Float-to-integer casts truncate toward zero; values that cannot be
    /// represented in `U` are reported with their flat position.
    pub fn cast<U: Numeric>(&self) -> Result<Tensor<U>> {
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(index, &x)| {
                <U as NumCast>::from(x).ok_or(Error::InvalidCast {
                    index,
                    target: U::DTYPE,
                })
            })
            .collect::<Result<Vec<U>>>()?;
        Ok(Tensor {
            data,
            shape: self.shape.clone(),
        })
    }

    /// Multiplies every element by a scalar.
    #[must_use]
    pub fn mul_scalar(&self, scalar: T) -> Self {
        self.map(|x| x * scalar)
    }
}

impl<T: Scalar> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape.as_slice())
            .field("dtype", &T::DTYPE)
            .field("data", &self.data)
            .finish()
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tensor(")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, ", shape={:?}, dtype={})", self.shape.as_slice(), T::DTYPE)
    }
}

// =============================================================================
// Tests
// =============================================================================
