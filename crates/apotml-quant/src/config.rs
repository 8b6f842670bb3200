//! Codec Configuration
//!
//! `ApotConfig` is the validated `(b, k, signed)` triple that selects an APoT
//! codebook. It can only be constructed through validation, including when
//! it is deserialized. `CodecSettings` is the TOML file wrapper.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuantError, QuantResult};

/// Widest quantized index supported, in bits.
pub const MAX_CODE_BITS: u32 = 16;

// =============================================================================
// ApotConfig
// =============================================================================

/// Validated APoT quantization configuration.
///
/// * `b` - total bit-width of the unsigned codebook (`2^b` levels)
/// * `k` - bits per additive term; `n = b / k` terms make up each level
/// * `signed` - mirror the codebook about zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawApotConfig", into = "RawApotConfig")]
pub struct ApotConfig {
    b: u32,
    k: u32,
    signed: bool,
}

impl ApotConfig {
    /// Validates and creates a configuration.
    pub fn new(b: u32, k: u32, signed: bool) -> QuantResult<Self> {
        if b == 0 {
            return Err(QuantError::InvalidConfiguration(
                "bit-width b must be positive".to_string(),
            ));
        }
        if k == 0 {
            return Err(QuantError::InvalidConfiguration(
                "split factor k must be positive".to_string(),
            ));
        }
        if b % k != 0 {
            return Err(QuantError::InvalidConfiguration(format!(
                "bit-width b={b} is not divisible by k={k}"
            )));
        }
        let code_bits = b + u32::from(signed);
        if code_bits > MAX_CODE_BITS {
            return Err(QuantError::InvalidConfiguration(format!(
                "indices need {code_bits} bits, at most {MAX_CODE_BITS} are supported"
            )));
        }
        let n = u64::from(b / k);
        let deepest = smallest_term_exponent(b, k);
        // a lone term only has to stay a normal f64; sums of terms must fit the mantissa
        let limit = if n == 1 {
            (1 - f64::MIN_EXP) as u64
        } else {
            u64::from(f64::MANTISSA_DIGITS - 1)
        };
        if deepest > limit {
            return Err(QuantError::InvalidConfiguration(format!(
                "b={b}, k={k} needs terms down to 2^-{deepest}, levels would not be distinct in f64"
            )));
        }
        Ok(Self { b, k, signed })
    }

    /// Creates an unsigned configuration.
    pub fn unsigned(b: u32, k: u32) -> QuantResult<Self> {
        Self::new(b, k, false)
    }

    /// Returns the bit-width `b`.
    pub fn b(&self) -> u32 {
        self.b
    }

    /// Returns the split factor `k`.
    pub fn k(&self) -> u32 {
        self.k
    }

    /// Returns true for a sign-mirrored codebook.
    pub fn signed(&self) -> bool {
        self.signed
    }

    /// Number of additive terms per level.
    pub fn n(&self) -> u32 {
        self.b / self.k
    }

    /// Number of choices for each additive term, zero included.
    pub fn terms_per_position(&self) -> usize {
        1usize << self.k
    }

    /// Number of bits a quantized index needs.
    pub fn code_bits(&self) -> u32 {
        self.b + u32::from(self.signed)
    }

    /// Number of levels in the codebook.
    ///
    /// The signed codebook shares its zero level between both halves.
    pub fn num_levels(&self) -> usize {
        let unsigned = 1usize << self.b;
        if self.signed {
            2 * unsigned - 1
        } else {
            unsigned
        }
    }

    /// Returns true if indices fit in a byte.
    pub fn fits_u8(&self) -> bool {
        self.code_bits() <= 8
    }
}

/// Exponent `e` of the smallest non-zero term `2^-e`: position `n - 1`, last choice.
fn smallest_term_exponent(b: u32, k: u32) -> u64 {
    let n = u64::from(b / k);
    (n - 1) + ((1u64 << k) - 2) * n
}

impl Default for ApotConfig {
    fn default() -> Self {
        Self {
            b: 4,
            k: 2,
            signed: false,
        }
    }
}

impl fmt::Display for ApotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signed { "signed" } else { "unsigned" };
        write!(f, "APoT(b={}, k={}, {})", self.b, self.k, sign)
    }
}

/// Unvalidated wire form of [`ApotConfig`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawApotConfig {
    b: u32,
    k: u32,
    #[serde(default)]
    signed: bool,
}

impl TryFrom<RawApotConfig> for ApotConfig {
    type Error = QuantError;

    fn try_from(raw: RawApotConfig) -> QuantResult<Self> {
        ApotConfig::new(raw.b, raw.k, raw.signed)
    }
}

impl From<ApotConfig> for RawApotConfig {
    fn from(config: ApotConfig) -> Self {
        Self {
            b: config.b,
            k: config.k,
            signed: config.signed,
        }
    }
}

// =============================================================================
// Settings File
// =============================================================================

/// Codec settings file (`apotml.toml`).
///
/// ```toml
/// [codec]
/// b = 6
/// k = 2
/// signed = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodecSettings {
    /// Codebook selection.
    #[serde(default)]
    pub codec: ApotConfig,
}

impl CodecSettings {
    /// Parses settings from TOML text.
    pub fn from_toml_str(content: &str) -> QuantResult<Self> {
        toml::from_str(content).map_err(|e| QuantError::Config(e.to_string()))
    }

    /// Loads settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> QuantResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| QuantError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Saves settings to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> QuantResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| QuantError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| QuantError::Config(format!("{}: {e}", path.as_ref().display())))
    }
}

// =============================================================================
// Tests
// =============================================================================
