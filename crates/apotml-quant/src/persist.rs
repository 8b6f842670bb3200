//! Quantized Tensor Persistence
//!
//! A versioned JSON record for quantized tensors. The configuration is
//! stored as its own sub-object and re-validated on load, as are the
//! indices against the codebook size.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde::{Deserialize, Serialize};

use crate::config::ApotConfig;
use crate::error::{QuantError, QuantResult};
use crate::types::{QuantizedData, QuantizedTensor};

/// Current record format version.
pub const FORMAT_VERSION: u32 = 1;

/// Serializable form of a [`QuantizedTensor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizedRecord {
    /// Record format version.
    pub format_version: u32,
    /// Codebook configuration.
    pub config: ApotConfig,
    /// Original tensor shape.
    pub shape: Vec<usize>,
    /// Calibration maximum.
    pub max_val: f64,
    /// Index storage.
    pub data: QuantizedData,
}

impl From<&QuantizedTensor> for QuantizedRecord {
    fn from(tensor: &QuantizedTensor) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            config: *tensor.config(),
            shape: tensor.shape().to_vec(),
            max_val: tensor.max_val(),
            data: tensor.data().clone(),
        }
    }
}

impl TryFrom<QuantizedRecord> for QuantizedTensor {
    type Error = QuantError;

    fn try_from(record: QuantizedRecord) -> QuantResult<Self> {
        if record.format_version != FORMAT_VERSION {
            return Err(QuantError::InvalidData(format!(
                "unsupported record version {} (expected {FORMAT_VERSION})",
                record.format_version
            )));
        }
        QuantizedTensor::new(record.shape, record.config, record.max_val, record.data)
    }
}

impl QuantizedTensor {
    /// Serializes this tensor as a versioned JSON record.
    pub fn to_json(&self) -> QuantResult<String> {
        Ok(serde_json::to_string(&QuantizedRecord::from(self))?)
    }

    /// Restores a tensor from a JSON record.
    pub fn from_json(json: &str) -> QuantResult<Self> {
        let record: QuantizedRecord = serde_json::from_str(json)?;
        QuantizedTensor::try_from(record)
    }
}

// =============================================================================
// Tests
// =============================================================================
