//! APoT Quantizer
//!
//! `ApotQuantizer` bundles a configuration with a level cache and exposes
//! the codec as methods.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::sync::Arc;

use apotml_tensor::{Numeric, Tensor};
use num_traits::PrimInt;

use crate::config::ApotConfig;
use crate::dequantize::{dequantize_indices_with, dequantize_with_calibration};
use crate::error::{QuantError, QuantResult};
use crate::levels::{LevelCache, LevelTable};
use crate::observer::{ApotObserver, Calibration};
use crate::quantize::{check_domain, map_to_levels, quantize_with_calibration};
use crate::source::QuantSource;
use crate::types::QuantizedTensor;

/// Reserved computation of the `alpha` scaling parameter.
///
/// Not implemented; always fails with [`QuantError::NotSupported`].
pub fn q_apot_alpha() -> QuantResult<f64> {
    Err(QuantError::NotSupported("q_apot_alpha"))
}

/// APoT codec bound to one configuration.
///
/// # Example
/// ```rust
/// use apotml_quant::ApotQuantizer;
/// use apotml_tensor::Tensor;
///
/// let quantizer = ApotQuantizer::new(4, 2, false).unwrap();
/// let tensor = Tensor::<f32>::from_vec(vec![0.0, 0.5, 1.5], &[3]).unwrap();
/// let quantized = quantizer.quantize(&tensor).unwrap();
/// let restored = quantizer.dequantize(&quantized).unwrap();
/// assert_eq!(restored.to_vec(), vec![0.0, 0.5, 1.5]);
/// ```
#[derive(Debug, Clone)]
pub struct ApotQuantizer {
    config: ApotConfig,
    cache: Arc<LevelCache>,
}

impl ApotQuantizer {
    /// Creates a quantizer with its own level cache.
    pub fn new(b: u32, k: u32, signed: bool) -> QuantResult<Self> {
        Ok(Self::from_config(ApotConfig::new(b, k, signed)?))
    }

    /// Creates a quantizer for a validated configuration.
    pub fn from_config(config: ApotConfig) -> Self {
        Self::with_cache(config, Arc::new(LevelCache::new()))
    }

    /// Creates a quantizer that shares `cache` with other quantizers.
    pub fn with_cache(config: ApotConfig, cache: Arc<LevelCache>) -> Self {
        Self { config, cache }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ApotConfig {
        &self.config
    }

    /// Returns the level table for this configuration.
    pub fn levels(&self) -> Arc<LevelTable> {
        self.cache.get_or_generate(&self.config)
    }

    /// Calibrates for an explicit maximum.
    pub fn calibrate(&self, max_val: f64) -> QuantResult<Calibration> {
        ApotObserver::new(max_val, self.config).calibrate_with(&self.cache)
    }

    /// Quantizes a tensor, calibrating from its own maximum.
    pub fn quantize<S: QuantSource + ?Sized>(&self, source: &S) -> QuantResult<QuantizedTensor> {
        check_domain(source)?;
        let observer = ApotObserver::from_source(source, self.config)?;
        let calibration = observer.calibrate_with(&self.cache)?;
        map_to_levels(source, &calibration)
    }

    /// Quantizes a tensor against an explicit maximum.
    pub fn quantize_with_max<S: QuantSource + ?Sized>(
        &self,
        source: &S,
        max_val: f64,
    ) -> QuantResult<QuantizedTensor> {
        quantize_with_calibration(source, &self.calibrate(max_val)?)
    }

    /// Dequantizes a tensor produced by this configuration.
    pub fn dequantize(&self, quantized: &QuantizedTensor) -> QuantResult<Tensor<f32>> {
        let calibration = self.calibrate(quantized.max_val())?;
        dequantize_with_calibration(quantized, &calibration)
    }

    /// Dequantizes a raw integer index tensor, calibrating from its maximum.
    pub fn dequantize_indices<I: Numeric + PrimInt>(
        &self,
        indices: &Tensor<I>,
    ) -> QuantResult<Tensor<f32>> {
        dequantize_indices_with(indices, &self.config, &self.cache)
    }

    /// Reserved; always fails with [`QuantError::NotSupported`].
    pub fn q_apot_alpha(&self) -> QuantResult<f64> {
        q_apot_alpha()
    }
}

// =============================================================================
// Tests
// =============================================================================
