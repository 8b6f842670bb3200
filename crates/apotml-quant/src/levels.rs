//! APoT Level Generation
//!
//! Builds the sorted codebook for a configuration. With `n = b / k`
//! additive positions, position `i` contributes one of the `2^k` terms
//!
//! ```text
//! 0, 2^-(i), 2^-(i+n), 2^-(i+2n), ..., 2^-(i+(2^k-2)n)
//! ```
//!
//! and a level is the sum of one term per position. The largest term of
//! position `i` is `2^-i`, so the largest level is `sum_i 2^-i`. Levels are
//! kept in the raw (unscaled) domain here; calibration scales them.
//!
//! A combination is encoded as a base-`2^k` number with position 0 as the
//! most significant digit. Indices are dense ranks in the sorted table and
//! never reinterpret the encoding.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::ApotConfig;
use crate::error::QuantResult;

// =============================================================================
// Level Table
// =============================================================================

/// Sorted APoT codebook with its positional index set.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    config: ApotConfig,
    /// Raw levels, non-decreasing.
    levels: Vec<f64>,
    /// Dense index of each level (`indices[i] == i`).
    indices: Vec<u16>,
    /// Term-choice encoding each level was built from.
    encodings: Vec<u32>,
    /// Largest achievable raw sum.
    max_raw: f64,
}

impl LevelTable {
    /// Generates the codebook for a validated configuration.
    pub fn generate(config: &ApotConfig) -> Self {
        let n = config.n() as usize;
        let per_position = config.terms_per_position();
        let terms: Vec<Vec<f64>> = (0..n)
            .map(|i| position_terms(i, n, per_position))
            .collect();
        let max_raw: f64 = terms.iter().map(|t| t[1]).sum();

        let combinations = 1usize << config.b();
        let mut entries: Vec<(u32, f64)> = (0..combinations)
            .map(|code| (code as u32, combination_sum(code, &terms, config.k())))
            .collect();

        if config.signed() {
            let sign_bit = 1u32 << config.b();
            let negatives: Vec<(u32, f64)> = entries
                .iter()
                .filter(|&&(code, _)| code != 0)
                .map(|&(code, value)| (code | sign_bit, -value))
                .collect();
            entries.extend(negatives);
        }

        // ties resolve to the smallest encoding
        entries.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let (encodings, levels): (Vec<u32>, Vec<f64>) = entries.into_iter().unzip();
        let indices = (0..levels.len()).map(|i| i as u16).collect();

        Self {
            config: *config,
            levels,
            indices,
            encodings,
            max_raw,
        }
    }

    /// Returns the configuration this table was generated for.
    pub fn config(&self) -> &ApotConfig {
        &self.config
    }

    /// Returns the sorted raw levels.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Returns the dense index set, aligned with [`levels`](Self::levels).
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Returns the term-choice encoding of every level.
    pub fn encodings(&self) -> &[u32] {
        &self.encodings
    }

    /// Returns the largest achievable raw sum.
    pub fn max_raw(&self) -> f64 {
        self.max_raw
    }

    /// Returns the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if the table has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the raw level at `index`.
    pub fn level(&self, index: usize) -> Option<f64> {
        self.levels.get(index).copied()
    }

    /// Index of the zero level.
    pub fn zero_index(&self) -> usize {
        if self.config.signed() {
            (1usize << self.config.b()) - 1
        } else {
            0
        }
    }
}

/// Term choices for additive position `i` of `n`.
fn position_terms(i: usize, n: usize, per_position: usize) -> Vec<f64> {
    std::iter::once(0.0)
        .chain((0..per_position - 1).map(|j| 2f64.powi(-((i + j * n) as i32))))
        .collect()
}

/// Sums the terms selected by `code`, position 0 being the most significant digit.
fn combination_sum(code: usize, terms: &[Vec<f64>], k: u32) -> f64 {
    let mask = (1usize << k) - 1;
    let n = terms.len();
    terms
        .iter()
        .enumerate()
        .map(|(i, t)| t[(code >> (k as usize * (n - 1 - i))) & mask])
        .sum()
}

// =============================================================================
// Cache
// =============================================================================

/// Memoizes level tables per configuration.
///
/// Lookups take a shared read lock. A miss takes the write lock and checks
/// again before generating, so each key is computed once.
#[derive(Debug, Default)]
pub struct LevelCache {
    tables: RwLock<HashMap<ApotConfig, Arc<LevelTable>>>,
}

impl LevelCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for `config`, generating it on first use.
    pub fn get_or_generate(&self, config: &ApotConfig) -> Arc<LevelTable> {
        if let Some(table) = self.tables.read().get(config) {
            trace!(%config, "level table cache hit");
            return Arc::clone(table);
        }

        let mut tables = self.tables.write();
        if let Some(table) = tables.get(config) {
            return Arc::clone(table);
        }

        let table = Arc::new(LevelTable::generate(config));
        debug!(%config, levels = table.len(), "generated level table");
        tables.insert(*config, Arc::clone(&table));
        table
    }

    /// Returns the number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    /// Drops every cached table.
    pub fn clear(&self) {
        self.tables.write().clear();
    }
}

/// Process-wide level cache.
pub fn global_cache() -> &'static LevelCache {
    static CACHE: OnceLock<LevelCache> = OnceLock::new();
    CACHE.get_or_init(LevelCache::new)
}

/// Generates (or fetches from the global cache) the codebook for `(b, k, signed)`.
///
/// # Example
/// ```rust
/// use apotml_quant::generate_levels;
///
/// let table = generate_levels(4, 2, false).unwrap();
/// assert_eq!(table.len(), 16);
/// assert_eq!(table.levels()[0], 0.0);
/// assert_eq!(table.levels()[15], 1.5);
/// ```
pub fn generate_levels(b: u32, k: u32, signed: bool) -> QuantResult<Arc<LevelTable>> {
    let config = ApotConfig::new(b, k, signed)?;
    Ok(global_cache().get_or_generate(&config))
}

// =============================================================================
// Tests
// =============================================================================
