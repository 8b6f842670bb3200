//! Data Types - Element Type System
//!
//! Defines the element types a `Tensor` can hold and the traits the codec
//! relies on. Floating point tensors carry raw data to quantize; unsigned
//! and signed integer tensors carry quantized indices.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use bytemuck::{Pod, Zeroable};
use num_traits::{Float as NumFloat, Num, NumCast, One, ToPrimitive, Zero};

use core::fmt::Debug;

// =============================================================================
// DType Enum
// =============================================================================

/// Runtime representation of tensor element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DType {
    /// 32-bit floating point.
    #[default]
    F32,
    /// 64-bit floating point.
    F64,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
}

impl DType {
    /// Returns the size in bytes of this data type.
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F64 | Self::I64 => 8,
        }
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns true if this is an integer type.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        !self.is_float()
    }

    /// Returns the name of this data type as a string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
        }
    }
}

impl core::fmt::Display for DType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Element Traits
// =============================================================================

/// Trait for all scalar types that can be stored in a tensor.
pub trait Scalar: Copy + Clone + Debug + Default + Send + Sync + Pod + Zeroable + 'static {
    /// The runtime dtype for this scalar type.
    const DTYPE: DType;

    /// Returns the dtype for this type.
    #[must_use]
    fn dtype() -> DType {
        Self::DTYPE
    }
}

/// Trait for numeric types that support arithmetic and lossy conversion.
pub trait Numeric: Scalar + Num + NumCast + ToPrimitive + PartialOrd + Zero + One {
    /// The zero value for this type.
    const ZERO: Self;

    /// The one value for this type.
    const ONE: Self;

    /// Returns the minimum value for this type.
    fn min_value() -> Self;

    /// Returns the maximum value for this type.
    fn max_value() -> Self;
}

/// Trait for floating point types.
pub trait Float: Numeric + NumFloat {}

// =============================================================================
// Implementations
// =============================================================================

macro_rules! impl_numeric {
    ($ty:ty, $dtype:expr, $zero:expr, $one:expr) => {
        impl Scalar for $ty {
            const DTYPE: DType = $dtype;
        }

        impl Numeric for $ty {
            const ZERO: Self = $zero;
            const ONE: Self = $one;

            fn min_value() -> Self {
                <$ty>::MIN
            }

            fn max_value() -> Self {
                <$ty>::MAX
            }
        }
    };
}

impl_numeric!(f32, DType::F32, 0.0, 1.0);
impl_numeric!(f64, DType::F64, 0.0, 1.0);
impl_numeric!(i8, DType::I8, 0, 1);
impl_numeric!(i16, DType::I16, 0, 1);
impl_numeric!(i32, DType::I32, 0, 1);
impl_numeric!(i64, DType::I64, 0, 1);
impl_numeric!(u8, DType::U8, 0, 1);
impl_numeric!(u16, DType::U16, 0, 1);
impl_numeric!(u32, DType::U32, 0, 1);

impl Float for f32 {}
impl Float for f64 {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_size() {
        assert_eq!(DType::F32.size_of(), 4);
        assert_eq!(DType::F64.size_of(), 8);
        assert_eq!(DType::U8.size_of(), 1);
        assert_eq!(DType::U16.size_of(), 2);
    }

    #[test]
    fn test_dtype_kind() {
        assert!(DType::F32.is_float());
        assert!(!DType::I32.is_float());
        assert!(DType::U16.is_integer());
    }

    #[test]
    fn test_scalar_dtype() {
        assert_eq!(f32::dtype(), DType::F32);
        assert_eq!(u16::dtype(), DType::U16);
        assert_eq!(i32::dtype(), DType::I32);
    }

    #[test]
    fn test_numeric_constants() {
        assert_eq!(f64::ZERO, 0.0);
        assert_eq!(u8::ONE, 1);
        assert_eq!(<u8 as Numeric>::max_value(), 255);
    }
}
