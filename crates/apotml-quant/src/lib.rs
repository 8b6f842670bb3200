//! Apotml Quant - Additive Power-of-Two Quantization
//!
//! Non-uniform quantization onto codebooks whose levels are sums of powers
//! of two. A configuration `(b, k, signed)` selects the codebook:
//!
//! - **b**: bit-width; the unsigned codebook has `2^b` levels
//! - **k**: bits per additive term; each level sums `n = b / k` terms
//! - **signed**: mirror the codebook about zero
//!
//! Quantized tensors store the dense rank (index) of the nearest level, not
//! the level itself. Dequantization looks the index up in the codebook
//! calibrated to the tensor's maximum.
//!
//! # Example
//! ```rust
//! use apotml_quant::{dequantize_tensor, quantize_tensor, ApotConfig};
//! use apotml_tensor::Tensor;
//!
//! let config = ApotConfig::new(4, 2, false).unwrap();
//! let tensor = Tensor::<f32>::from_vec(vec![0.0, 0.1, 0.7, 1.5], &[2, 2]).unwrap();
//! let quantized = quantize_tensor(&tensor, &config).unwrap();
//! let restored = dequantize_tensor(&quantized).unwrap();
//! assert_eq!(restored.shape(), &[2, 2]);
//! ```
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod dequantize;
pub mod error;
pub mod levels;
pub mod observer;
pub mod persist;
pub mod quantize;
pub mod quantizer;
pub mod source;
pub mod types;

pub use config::{ApotConfig, CodecSettings, MAX_CODE_BITS};
pub use dequantize::{
    dequantize_indices, dequantize_indices_as, dequantize_tensor, dequantize_tensor_as,
    dequantize_with_calibration,
};
pub use error::{QuantError, QuantResult};
pub use levels::{generate_levels, global_cache, LevelCache, LevelTable};
pub use observer::{calibrate, ApotObserver, Calibration};
pub use persist::{QuantizedRecord, FORMAT_VERSION};
pub use quantize::{
    compute_quantization_error, compute_quantization_stats, quantize_model, quantize_tensor,
    quantize_with_calibration, QuantizationStats,
};
pub use quantizer::{q_apot_alpha, ApotQuantizer};
pub use source::QuantSource;
pub use types::{QuantizedData, QuantizedTensor};
