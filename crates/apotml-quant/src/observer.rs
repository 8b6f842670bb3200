//! APoT Observer
//!
//! Turns an observed maximum into calibration parameters: the scale
//! (`gamma`) that stretches the raw codebook so its largest level equals
//! `max_val`, and the level table expressed in the input's own units.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::sync::Arc;

use tracing::debug;

use crate::config::ApotConfig;
use crate::error::{QuantError, QuantResult};
use crate::levels::{global_cache, LevelCache, LevelTable};
use crate::source::QuantSource;

// =============================================================================
// Calibration
// =============================================================================

/// Per-tensor calibration: the codebook scaled to the tensor's range.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    max_val: f64,
    scale: f64,
    levels: Vec<f64>,
    table: Arc<LevelTable>,
}

impl Calibration {
    /// Returns the configuration of the underlying codebook.
    pub fn config(&self) -> &ApotConfig {
        self.table.config()
    }

    /// Returns the calibrated maximum.
    pub fn max_val(&self) -> f64 {
        self.max_val
    }

    /// Returns the scale applied to raw levels.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the levels in tensor units, non-decreasing.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Returns the index set aligned with [`levels`](Self::levels).
    pub fn indices(&self) -> &[u16] {
        self.table.indices()
    }

    /// Returns the raw level table.
    pub fn table(&self) -> &LevelTable {
        &self.table
    }

    /// Returns the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if there are no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the level for `index`.
    pub fn level(&self, index: usize) -> Option<f64> {
        self.levels.get(index).copied()
    }

    /// Index of the level nearest to `x`; ties go to the lower index.
    ///
    /// Values beyond either end of the codebook map to that end. `x` must
    /// not be NaN.
    pub fn nearest_index(&self, x: f64) -> usize {
        let levels = &self.levels;
        let upper = levels.partition_point(|&l| l < x);
        let candidate = if upper == 0 {
            0
        } else if upper == levels.len() {
            levels.len() - 1
        } else if x - levels[upper - 1] <= levels[upper] - x {
            upper - 1
        } else {
            upper
        };
        // first of a run of equal levels
        levels.partition_point(|&l| l < levels[candidate])
    }
}

// =============================================================================
// Observer
// =============================================================================

/// Observer holding the calibration maximum for one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApotObserver {
    max_val: f64,
    config: ApotConfig,
}

impl ApotObserver {
    /// Creates an observer for an explicit maximum.
    pub fn new(max_val: f64, config: ApotConfig) -> Self {
        Self { max_val, config }
    }

    /// Creates an observer from the range of a tensor.
    ///
    /// Unsigned codebooks use the largest element, signed ones the largest
    /// magnitude.
    pub fn from_source<S: QuantSource + ?Sized>(source: &S, config: ApotConfig) -> QuantResult<Self> {
        let max_val = if config.signed() {
            source.max_abs_element()
        } else {
            source.max_element()
        };
        let max_val = max_val.ok_or_else(|| {
            QuantError::InvalidCalibration("an empty tensor has no maximum".to_string())
        })?;
        Ok(Self::new(max_val, config))
    }

    /// Returns the clipping range (`alpha`), equal to the observed maximum.
    pub fn alpha(&self) -> f64 {
        self.max_val
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ApotConfig {
        &self.config
    }

    /// Computes `(scale, levels, level_indices)`.
    pub fn calculate_qparams(&self) -> QuantResult<(f64, Vec<f64>, Vec<u16>)> {
        let calibration = self.calibrate()?;
        let indices = calibration.indices().to_vec();
        Ok((calibration.scale, calibration.levels, indices))
    }

    /// Computes the full calibration using the global level cache.
    pub fn calibrate(&self) -> QuantResult<Calibration> {
        self.calibrate_with(global_cache())
    }

    /// Computes the full calibration using `cache` for the level table.
    pub fn calibrate_with(&self, cache: &LevelCache) -> QuantResult<Calibration> {
        if !self.max_val.is_finite() || self.max_val < 0.0 {
            return Err(QuantError::InvalidCalibration(format!(
                "max_val must be finite and non-negative, got {}",
                self.max_val
            )));
        }

        let table = cache.get_or_generate(&self.config);
        let scale = self.max_val / table.max_raw();
        let levels = table.levels().iter().map(|&l| scale * l).collect();
        debug!(config = %self.config, max_val = self.max_val, scale, "calibrated");

        Ok(Calibration {
            max_val: self.max_val,
            scale,
            levels,
            table,
        })
    }
}

/// Calibrates `config` for tensors whose maximum is `max_val`.
pub fn calibrate(max_val: f64, config: &ApotConfig) -> QuantResult<Calibration> {
    ApotObserver::new(max_val, *config).calibrate()
}

// =============================================================================
// Tests
// =============================================================================
