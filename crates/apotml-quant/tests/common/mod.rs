//! Common test utilities for integration tests

#![allow(dead_code)]

use apotml_tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Installs a test-writer tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seeded RNG so failures reproduce.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random shape with every extent in `1..=max_extent`.
pub fn random_shape(rng: &mut StdRng, ndim: usize, max_extent: usize) -> Vec<usize> {
    (0..ndim).map(|_| rng.gen_range(1..=max_extent)).collect()
}

/// Uniform affine quantizer to 8-bit codes.
///
/// Computes `clamp(round_half_even(x / scale) + zero_point, 0, 255)`.
pub fn quantize_uniform(values: &[f32], scale: f32, zero_point: i32) -> Vec<u8> {
    values
        .iter()
        .map(|&x| {
            let q = (x / scale).round_ties_even() as i32 + zero_point;
            q.clamp(0, 255) as u8
        })
        .collect()
}

/// Index of the first level closest to `x`, by linear scan.
pub fn nearest_by_scan(levels: &[f64], x: f64) -> usize {
    let mut best = 0;
    for (i, &level) in levels.iter().enumerate() {
        if (x - level).abs() < (x - levels[best]).abs() {
            best = i;
        }
    }
    best
}

/// Converts an index tensor into a float tensor holding the same values.
pub fn indices_as_f32(indices: &Tensor<u16>) -> Vec<f32> {
    indices.as_slice().iter().map(|&i| f32::from(i)).collect()
}
