//! Dequantization Functions
//!
//! Replaces every index with the calibrated level it addresses. The value
//! is looked up positionally in the calibration's level table, never
//! recomputed from the index.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use apotml_tensor::{Float, Numeric, Tensor};
use num_traits::{NumCast, PrimInt};
use rayon::prelude::*;
use tracing::debug;

use crate::config::ApotConfig;
use crate::error::{QuantError, QuantResult};
use crate::levels::{global_cache, LevelCache};
use crate::observer::{calibrate, ApotObserver, Calibration};
use crate::types::QuantizedTensor;

// =============================================================================
// Public API
// =============================================================================

/// Dequantizes a quantized tensor back to f32.
///
/// # Example
/// ```rust
/// use apotml_quant::{dequantize_tensor, quantize_tensor, ApotConfig};
/// use apotml_tensor::Tensor;
///
/// let tensor = Tensor::<f32>::from_vec(vec![0.0, 0.75, 1.5], &[3]).unwrap();
/// let quantized = quantize_tensor(&tensor, &ApotConfig::unsigned(4, 2).unwrap()).unwrap();
/// let restored = dequantize_tensor(&quantized).unwrap();
/// assert_eq!(restored.to_vec(), vec![0.0, 0.75, 1.5]);
/// ```
pub fn dequantize_tensor(quantized: &QuantizedTensor) -> QuantResult<Tensor<f32>> {
    dequantize_tensor_as(quantized)
}

/// Dequantizes a quantized tensor into any float element type.
pub fn dequantize_tensor_as<T: Float>(quantized: &QuantizedTensor) -> QuantResult<Tensor<T>> {
    let calibration = calibrate(quantized.max_val(), quantized.config())?;
    lookup_levels(&quantized.indices(), quantized.shape(), &calibration)
}

/// Dequantizes a quantized tensor against an explicit calibration.
pub fn dequantize_with_calibration(
    quantized: &QuantizedTensor,
    calibration: &Calibration,
) -> QuantResult<Tensor<f32>> {
    if calibration.config() != quantized.config() {
        return Err(QuantError::InvalidCalibration(format!(
            "calibration is for {}, tensor was quantized with {}",
            calibration.config(),
            quantized.config()
        )));
    }
    lookup_levels(&quantized.indices(), quantized.shape(), calibration)
}

/// Dequantizes a raw integer index tensor to f32.
///
/// The calibration maximum is taken from the index tensor itself: its
/// values are treated as data in the original domain, so the largest index
/// present becomes `max_val`.
pub fn dequantize_indices<I: Numeric + PrimInt>(
    indices: &Tensor<I>,
    config: &ApotConfig,
) -> QuantResult<Tensor<f32>> {
    dequantize_indices_as(indices, config)
}

/// Dequantizes a raw integer index tensor into any float element type.
pub fn dequantize_indices_as<I: Numeric + PrimInt, T: Float>(
    indices: &Tensor<I>,
    config: &ApotConfig,
) -> QuantResult<Tensor<T>> {
    dequantize_indices_with(indices, config, global_cache())
}

pub(crate) fn dequantize_indices_with<I: Numeric + PrimInt, T: Float>(
    indices: &Tensor<I>,
    config: &ApotConfig,
    cache: &LevelCache,
) -> QuantResult<Tensor<T>> {
    let positions = validate_indices(indices.as_slice(), config.num_levels())?;
    let max_val = positions.iter().max().map_or(0.0, |&m| m as f64);
    let calibration = ApotObserver::new(max_val, *config).calibrate_with(cache)?;
    lookup_levels(&positions, indices.shape(), &calibration)
}

// =============================================================================
// Lookup
// =============================================================================

/// Converts signed integer indices into positions, rejecting any outside `0..len`.
fn validate_indices<I: Numeric + PrimInt>(values: &[I], len: usize) -> QuantResult<Vec<usize>> {
    values
        .iter()
        .map(|&v| {
            let index = v.to_i64().unwrap_or(i64::MAX);
            usize::try_from(index)
                .ok()
                .filter(|&i| i < len)
                .ok_or(QuantError::IndexOutOfRange { index, len })
        })
        .collect()
}

fn lookup_levels<T: Float>(
    indices: &[usize],
    shape: &[usize],
    calibration: &Calibration,
) -> QuantResult<Tensor<T>> {
    let len = calibration.len();
    let data = indices
        .par_iter()
        .map(|&i| {
            let level = calibration.level(i).ok_or(QuantError::IndexOutOfRange {
                index: i as i64,
                len,
            })?;
            <T as NumCast>::from(level).ok_or_else(|| {
                QuantError::TensorConversion(format!("level {level} does not fit {}", T::DTYPE))
            })
        })
        .collect::<QuantResult<Vec<T>>>()?;

    debug!(config = %calibration.config(), numel = data.len(), "dequantized tensor");
    Ok(Tensor::from_vec(data, shape)?)
}

// =============================================================================
// Tests
// =============================================================================
