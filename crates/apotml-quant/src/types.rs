//! Quantized Tensor Types
//!
//! A quantized tensor stores one codebook index per element, in the
//! narrowest unsigned container that holds the configuration's code width,
//! together with the maximum it was calibrated against.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use apotml_tensor::Tensor;
use serde::{Deserialize, Serialize};

use crate::config::ApotConfig;
use crate::error::{QuantError, QuantResult};

// =============================================================================
// Index Storage
// =============================================================================

/// Index storage, by container width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "width", content = "values", rename_all = "lowercase")]
pub enum QuantizedData {
    /// Code width of 8 bits or less.
    U8(Vec<u8>),
    /// Code width of 9 to 16 bits.
    U16(Vec<u16>),
}

impl QuantizedData {
    /// Packs indices into the container `config` calls for.
    ///
    /// Indices must already be below `config.num_levels()`.
    pub fn from_indices(indices: &[usize], config: &ApotConfig) -> Self {
        if config.fits_u8() {
            QuantizedData::U8(indices.iter().map(|&i| i as u8).collect())
        } else {
            QuantizedData::U16(indices.iter().map(|&i| i as u16).collect())
        }
    }

    /// Returns the container width in bits.
    pub fn bits(&self) -> usize {
        match self {
            QuantizedData::U8(_) => 8,
            QuantizedData::U16(_) => 16,
        }
    }

    /// Returns the number of stored indices.
    pub fn len(&self) -> usize {
        match self {
            QuantizedData::U8(v) => v.len(),
            QuantizedData::U16(v) => v.len(),
        }
    }

    /// Returns true if no indices are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the index at flat position `i`.
    pub fn get(&self, i: usize) -> Option<usize> {
        match self {
            QuantizedData::U8(v) => v.get(i).map(|&x| usize::from(x)),
            QuantizedData::U16(v) => v.get(i).map(|&x| usize::from(x)),
        }
    }

    /// Widens every index to `usize`.
    pub fn to_indices(&self) -> Vec<usize> {
        match self {
            QuantizedData::U8(v) => v.iter().map(|&x| usize::from(x)).collect(),
            QuantizedData::U16(v) => v.iter().map(|&x| usize::from(x)).collect(),
        }
    }
}

// =============================================================================
// Quantized Tensor
// =============================================================================

/// A tensor quantized onto an APoT codebook.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedTensor {
    shape: Vec<usize>,
    config: ApotConfig,
    max_val: f64,
    data: QuantizedData,
}

impl QuantizedTensor {
    /// Creates a quantized tensor, checking that the data matches the shape,
    /// the container width and the codebook size.
    pub fn new(
        shape: Vec<usize>,
        config: ApotConfig,
        max_val: f64,
        data: QuantizedData,
    ) -> QuantResult<Self> {
        let numel: usize = shape.iter().product();
        if numel != data.len() {
            return Err(QuantError::ShapeMismatch {
                expected: shape,
                actual: vec![data.len()],
            });
        }
        let expected_bits = if config.fits_u8() { 8 } else { 16 };
        if data.bits() != expected_bits {
            return Err(QuantError::InvalidData(format!(
                "{config} stores {expected_bits}-bit indices, got {}-bit",
                data.bits()
            )));
        }
        if !max_val.is_finite() || max_val < 0.0 {
            return Err(QuantError::InvalidCalibration(format!(
                "max_val must be finite and non-negative, got {max_val}"
            )));
        }
        let len = config.num_levels();
        if let Some(index) = data.to_indices().into_iter().find(|&i| i >= len) {
            return Err(QuantError::IndexOutOfRange {
                index: index as i64,
                len,
            });
        }

        Ok(Self {
            shape,
            config,
            max_val,
            data,
        })
    }

    /// Returns the original tensor shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the codebook configuration.
    pub fn config(&self) -> &ApotConfig {
        &self.config
    }

    /// Returns the maximum the indices were calibrated against.
    pub fn max_val(&self) -> f64 {
        self.max_val
    }

    /// Returns the index storage.
    pub fn data(&self) -> &QuantizedData {
        &self.data
    }

    /// Returns the number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the index at flat position `i`.
    pub fn index(&self, i: usize) -> Option<usize> {
        self.data.get(i)
    }

    /// Returns every index widened to `usize`.
    pub fn indices(&self) -> Vec<usize> {
        self.data.to_indices()
    }

    /// Borrows the indices as bytes when they are stored 8-bit.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            QuantizedData::U8(v) => Some(v),
            QuantizedData::U16(_) => None,
        }
    }

    /// Returns the indices as an integer tensor of the original shape.
    pub fn int_repr(&self) -> QuantResult<Tensor<u16>> {
        let values = self.indices().into_iter().map(|i| i as u16).collect();
        Ok(Tensor::from_vec(values, &self.shape)?)
    }

    /// Returns the storage size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len() * self.data.bits() / 8
    }

    /// Returns the compression ratio compared to F32.
    pub fn compression_ratio(&self) -> f32 {
        32.0 / self.data.bits() as f32
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_width() {
        let small = ApotConfig::unsigned(8, 2).unwrap();
        assert_eq!(QuantizedData::from_indices(&[0, 255], &small).bits(), 8);

        let signed = ApotConfig::new(8, 2, true).unwrap();
        let data = QuantizedData::from_indices(&[0, 510], &signed);
        assert_eq!(data, QuantizedData::U16(vec![0, 510]));
    }

    #[test]
    fn test_quantized_tensor_accessors() {
        let config = ApotConfig::unsigned(4, 2).unwrap();
        let data = QuantizedData::from_indices(&[0, 3, 15, 7, 1, 2], &config);
        let q = QuantizedTensor::new(vec![2, 3], config, 1.0, data).unwrap();

        assert_eq!(q.numel(), 6);
        assert_eq!(q.index(2), Some(15));
        assert_eq!(q.index(6), None);
        assert_eq!(q.as_u8(), Some(&[0u8, 3, 15, 7, 1, 2][..]));
        assert_eq!(q.size_bytes(), 6);
        assert_eq!(q.compression_ratio(), 4.0);

        let ints = q.int_repr().unwrap();
        assert_eq!(ints.shape(), &[2, 3]);
        assert_eq!(ints.to_vec(), vec![0, 3, 15, 7, 1, 2]);
    }

    #[test]
    fn test_new_rejects_inconsistent_data() {
        let config = ApotConfig::unsigned(4, 2).unwrap();

        let short = QuantizedData::U8(vec![0, 1]);
        assert!(matches!(
            QuantizedTensor::new(vec![3], config, 1.0, short),
            Err(QuantError::ShapeMismatch { .. })
        ));

        let wide = QuantizedData::U16(vec![0, 1]);
        assert!(matches!(
            QuantizedTensor::new(vec![2], config, 1.0, wide),
            Err(QuantError::InvalidData(_))
        ));

        let out_of_range = QuantizedData::U8(vec![0, 16]);
        assert_eq!(
            QuantizedTensor::new(vec![2], config, 1.0, out_of_range),
            Err(QuantError::IndexOutOfRange { index: 16, len: 16 })
        );

        let bad_max = QuantizedData::U8(vec![0]);
        assert!(matches!(
            QuantizedTensor::new(vec![1], config, -1.0, bad_max),
            Err(QuantError::InvalidCalibration(_))
        ));
    }
}
