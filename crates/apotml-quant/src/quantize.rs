//! Quantization Functions
//!
//! Maps every element of a tensor to the index of its nearest APoT level.
//!
//! Out-of-range policy: finite values below the first or above the last
//! level saturate to that level. NaN and infinite values are rejected with
//! [`QuantError::DomainError`].
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use apotml_tensor::Tensor;
use rayon::prelude::*;
use tracing::debug;

use crate::config::ApotConfig;
use crate::error::{QuantError, QuantResult};
use crate::observer::{ApotObserver, Calibration};
use crate::source::QuantSource;
use crate::types::{QuantizedData, QuantizedTensor};

// =============================================================================
// Public API
// =============================================================================

/// Quantizes a tensor, calibrating from the tensor's own maximum.
///
/// # Example
/// ```rust
/// use apotml_quant::{quantize_tensor, ApotConfig};
/// use apotml_tensor::Tensor;
///
/// let tensor = Tensor::<f32>::from_vec(vec![0.0, 0.75, 1.5], &[3]).unwrap();
/// let quantized = quantize_tensor(&tensor, &ApotConfig::unsigned(4, 2).unwrap()).unwrap();
/// assert_eq!(quantized.indices(), vec![0, 11, 15]);
/// ```
pub fn quantize_tensor<S: QuantSource + ?Sized>(
    source: &S,
    config: &ApotConfig,
) -> QuantResult<QuantizedTensor> {
    check_domain(source)?;
    let calibration = ApotObserver::from_source(source, *config)?.calibrate()?;
    map_to_levels(source, &calibration)
}

/// Quantizes a tensor against an explicit calibration.
pub fn quantize_with_calibration<S: QuantSource + ?Sized>(
    source: &S,
    calibration: &Calibration,
) -> QuantResult<QuantizedTensor> {
    check_domain(source)?;
    map_to_levels(source, calibration)
}

/// Quantizes a model (collection of named tensors).
///
/// Each tensor is calibrated from its own maximum.
pub fn quantize_model(
    tensors: &[(&str, &Tensor<f32>)],
    config: &ApotConfig,
) -> QuantResult<Vec<(String, QuantizedTensor)>> {
    tensors
        .par_iter()
        .map(|(name, tensor)| {
            let quantized = quantize_tensor(*tensor, config)?;
            Ok((name.to_string(), quantized))
        })
        .collect()
}

// =============================================================================
// Element Mapping
// =============================================================================

/// Rejects NaN and infinite elements, reporting the first one.
pub(crate) fn check_domain<S: QuantSource + ?Sized>(source: &S) -> QuantResult<()> {
    match (0..source.element_count())
        .map(|i| (i, source.element(i)))
        .find(|(_, x)| !x.is_finite())
    {
        Some((index, value)) => Err(QuantError::DomainError { index, value }),
        None => Ok(()),
    }
}

/// Maps already domain-checked elements to their nearest level indices.
pub(crate) fn map_to_levels<S: QuantSource + ?Sized>(
    source: &S,
    calibration: &Calibration,
) -> QuantResult<QuantizedTensor> {
    let indices: Vec<usize> = (0..source.element_count())
        .into_par_iter()
        .map(|i| calibration.nearest_index(source.element(i)))
        .collect();

    let config = *calibration.config();
    debug!(%config, numel = indices.len(), max_val = calibration.max_val(), "quantized tensor");

    let data = QuantizedData::from_indices(&indices, &config);
    QuantizedTensor::new(
        source.dims().to_vec(),
        config,
        calibration.max_val(),
        data,
    )
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Computes the quantization error (RMSE) between original and dequantized.
pub fn compute_quantization_error(original: &[f32], dequantized: &[f32]) -> f32 {
    if original.len() != dequantized.len() || original.is_empty() {
        return f32::INFINITY;
    }

    let mse: f32 = original
        .iter()
        .zip(dequantized.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f32>()
        / original.len() as f32;

    mse.sqrt()
}

/// Statistics about quantization error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationStats {
    /// Root mean square error.
    pub rmse: f32,
    /// Maximum absolute error.
    pub max_error: f32,
    /// Mean absolute error.
    pub mean_error: f32,
    /// Compression ratio compared to F32.
    pub compression_ratio: f32,
}

/// Computes detailed quantization statistics.
///
/// Like [`compute_quantization_error`], mismatched or empty inputs report
/// infinite errors.
pub fn compute_quantization_stats(
    original: &[f32],
    dequantized: &[f32],
    config: &ApotConfig,
) -> QuantizationStats {
    let compression_ratio = 32.0 / config.code_bits() as f32;
    if original.len() != dequantized.len() || original.is_empty() {
        return QuantizationStats {
            rmse: f32::INFINITY,
            max_error: f32::INFINITY,
            mean_error: f32::INFINITY,
            compression_ratio,
        };
    }

    let errors: Vec<f32> = original
        .iter()
        .zip(dequantized.iter())
        .map(|(a, b)| (a - b).abs())
        .collect();
    let count = errors.len() as f32;

    let mse: f32 = errors.iter().map(|e| e.powi(2)).sum::<f32>() / count;
    let max_error = errors.iter().fold(0.0f32, |a, &b| a.max(b));
    let mean_error = errors.iter().sum::<f32>() / count;

    QuantizationStats {
        rmse: mse.sqrt(),
        max_error,
        mean_error,
        compression_ratio,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::calibrate;

    fn b4k2() -> ApotConfig {
        ApotConfig::unsigned(4, 2).unwrap()
    }

    #[test]
    fn test_quantize_shape_and_width() {
        let tensor = Tensor::<f32>::rand(&[3, 5]);
        let quantized = quantize_tensor(&tensor, &b4k2()).unwrap();
        assert_eq!(quantized.shape(), &[3, 5]);
        assert_eq!(quantized.numel(), 15);
        assert!(quantized.as_u8().is_some());
        assert!(quantized.indices().iter().all(|&i| i < 16));
    }

    #[test]
    fn test_max_element_maps_to_top_index() {
        let tensor = Tensor::<f32>::from_vec(vec![0.1, 0.9, 0.4], &[3]).unwrap();
        let quantized = quantize_tensor(&tensor, &b4k2()).unwrap();
        assert_eq!(quantized.index(1), Some(15));
        assert_eq!(quantized.max_val(), f64::from(0.9f32));
    }

    #[test]
    fn test_known_indices() {
        // max 3.0 gives levels 0, .0625, .125, .1875, .25, .375, .5, .5625, .75, 1, ...
        let tensor = Tensor::<f64>::from_vec(vec![0.0, 0.2, 0.875, 1.1, 3.0], &[5]).unwrap();
        let quantized = quantize_tensor(&tensor, &b4k2()).unwrap();
        assert_eq!(quantized.indices(), vec![0, 3, 8, 10, 15]);
    }

    #[test]
    fn test_explicit_calibration_clamps() {
        let calibration = calibrate(1.5, &b4k2()).unwrap();
        let tensor = Tensor::<f32>::from_vec(vec![-2.0, 0.5, 40.0], &[3]).unwrap();
        let quantized = quantize_with_calibration(&tensor, &calibration).unwrap();
        assert_eq!(quantized.indices(), vec![0, 9, 15]);
        assert_eq!(quantized.max_val(), 1.5);
    }

    #[test]
    fn test_rejects_non_finite() {
        let tensor = Tensor::<f32>::from_vec(vec![0.5, f32::NAN, f32::INFINITY], &[3]).unwrap();
        match quantize_tensor(&tensor, &b4k2()) {
            Err(QuantError::DomainError { index, value }) => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("expected DomainError, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_tensor_needs_calibration() {
        let tensor = Tensor::<f32>::from_vec(vec![], &[0]).unwrap();
        assert!(matches!(
            quantize_tensor(&tensor, &b4k2()),
            Err(QuantError::InvalidCalibration(_))
        ));

        let calibration = calibrate(1.0, &b4k2()).unwrap();
        let quantized = quantize_with_calibration(&tensor, &calibration).unwrap();
        assert_eq!(quantized.numel(), 0);
    }

    #[test]
    fn test_negative_unsigned_max_rejected() {
        let tensor = Tensor::<f32>::from_vec(vec![-0.5, -0.25], &[2]).unwrap();
        assert!(matches!(
            quantize_tensor(&tensor, &b4k2()),
            Err(QuantError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_signed_quantize() {
        let config = ApotConfig::new(4, 2, true).unwrap();
        let tensor = Tensor::<f32>::from_vec(vec![-3.0, 0.0, 3.0, -0.9], &[4]).unwrap();
        let quantized = quantize_tensor(&tensor, &config).unwrap();
        // zero sits at index 15; the ends at 0 and 30
        assert_eq!(quantized.indices(), vec![0, 15, 30, 6]);
    }

    #[test]
    fn test_wide_codes_use_u16() {
        let config = ApotConfig::unsigned(10, 2).unwrap();
        let tensor = Tensor::<f32>::rand(&[32]);
        let quantized = quantize_tensor(&tensor, &config).unwrap();
        assert!(quantized.as_u8().is_none());
        assert_eq!(quantized.data().bits(), 16);
    }

    #[test]
    fn test_quantize_model() {
        let a = Tensor::<f32>::rand(&[4, 4]);
        let b = Tensor::<f32>::from_vec(vec![0.0, 2.0], &[2]).unwrap();
        let quantized = quantize_model(&[("a", &a), ("b", &b)], &b4k2()).unwrap();
        assert_eq!(quantized.len(), 2);
        assert_eq!(quantized[0].0, "a");
        assert_eq!(quantized[1].1.indices(), vec![0, 15]);
        assert_eq!(quantized[1].1.max_val(), 2.0);
    }

    #[test]
    fn test_quantization_error() {
        let original = vec![1.0, 2.0, 3.0, 4.0];
        let dequantized = vec![1.1, 2.0, 2.9, 4.1];

        let rmse = compute_quantization_error(&original, &dequantized);
        assert!(rmse > 0.0);
        assert!(rmse < 0.2);
        assert_eq!(compute_quantization_error(&original, &[]), f32::INFINITY);
    }

    #[test]
    fn test_quantization_stats() {
        let stats = compute_quantization_stats(&[0.0, 1.0], &[0.5, 1.0], &b4k2());
        assert_eq!(stats.max_error, 0.5);
        assert_eq!(stats.mean_error, 0.25);
        assert_eq!(stats.compression_ratio, 8.0);
    }

    #[test]
    fn test_quantization_stats_length_mismatch() {
        let stats = compute_quantization_stats(&[0.0, 1.0, 2.0], &[0.0, 1.0], &b4k2());
        assert_eq!(stats.rmse, f32::INFINITY);
        assert_eq!(stats.max_error, f32::INFINITY);
        assert_eq!(stats.mean_error, f32::INFINITY);
        assert_eq!(stats.compression_ratio, 8.0);

        let empty = compute_quantization_stats(&[], &[], &b4k2());
        assert_eq!(empty.rmse, compute_quantization_error(&[], &[]));
    }
}
