//! Quantization integration tests
//!
//! Checks APoT quantization against a linear nearest-level scan, and that
//! the byte container holds exactly the codes a uniform 8-bit quantizer
//! gives for the same indices.

mod common;

use apotml_quant::{
    calibrate, generate_levels, q_apot_alpha, quantize_tensor, ApotConfig, ApotQuantizer,
    QuantError,
};
use apotml_tensor::Tensor;
use rand::Rng;

use common::{indices_as_f32, init_tracing, nearest_by_scan, quantize_uniform, seeded_rng};

fn assert_u8_container_holds_indices(tensor: &Tensor<f32>, config: &ApotConfig) {
    let quantized = quantize_tensor(tensor, config).unwrap();
    assert_eq!(quantized.shape(), tensor.shape());

    let codes = quantized.int_repr().unwrap();
    let uniform = quantize_uniform(&indices_as_f32(&codes), 1.0, 0);
    assert_eq!(quantized.as_u8().unwrap(), uniform.as_slice());
}

#[test]
fn test_quantize_1d_u8_codes() {
    init_tracing();
    let config = ApotConfig::unsigned(4, 2).unwrap();
    let mut rng = seeded_rng(0x41);

    for _ in 0..32 {
        let size = rng.gen_range(1..=16);
        assert_u8_container_holds_indices(&Tensor::<f32>::rand(&[size]), &config);
    }
}

#[test]
fn test_quantize_2d_u8_codes() {
    init_tracing();
    let config = ApotConfig::unsigned(6, 2).unwrap();
    let mut rng = seeded_rng(0x42);

    for _ in 0..8 {
        let shape = common::random_shape(&mut rng, 2, 64);
        assert_u8_container_holds_indices(&Tensor::<f32>::rand(&shape), &config);
    }
}

#[test]
fn test_quantize_matches_linear_scan() {
    for config in [
        ApotConfig::unsigned(4, 2).unwrap(),
        ApotConfig::unsigned(6, 2).unwrap(),
        ApotConfig::unsigned(6, 3).unwrap(),
        ApotConfig::new(4, 2, true).unwrap(),
    ] {
        let tensor = if config.signed() {
            Tensor::<f32>::rand(&[256]).map(|x| 2.0 * x - 1.0)
        } else {
            Tensor::<f32>::rand(&[256])
        };
        let quantized = quantize_tensor(&tensor, &config).unwrap();
        let calibration = calibrate(quantized.max_val(), &config).unwrap();

        for (p, &x) in tensor.as_slice().iter().enumerate() {
            let expected = nearest_by_scan(calibration.levels(), f64::from(x));
            assert_eq!(quantized.index(p), Some(expected), "{config} at {p}: {x}");
        }
    }
}

#[test]
fn test_quantize_is_deterministic() {
    let config = ApotConfig::unsigned(6, 2).unwrap();
    let tensor = Tensor::<f32>::rand(&[17, 9]);

    let first = quantize_tensor(&tensor, &config).unwrap();
    let second = quantize_tensor(&tensor, &config).unwrap();
    assert_eq!(first, second);

    let quantizer = ApotQuantizer::from_config(config);
    assert_eq!(quantizer.quantize(&tensor).unwrap(), first);
}

#[test]
fn test_levels_generated_once_per_config() {
    let a = generate_levels(8, 4, false).unwrap();
    let b = generate_levels(8, 4, false).unwrap();
    assert_eq!(a.levels(), b.levels());
    assert_eq!(a.len(), 256);
    assert_eq!(a.levels()[0], 0.0);
}

#[test]
fn test_boundary_configurations() {
    let single = ApotConfig::unsigned(1, 1).unwrap();
    let tensor = Tensor::<f32>::from_vec(vec![0.0, 0.2, 0.6, 1.0], &[4]).unwrap();
    let quantized = quantize_tensor(&tensor, &single).unwrap();
    assert_eq!(quantized.indices(), vec![0, 0, 1, 1]);

    let widest = ApotConfig::unsigned(16, 2).unwrap();
    let quantized = quantize_tensor(&Tensor::<f32>::rand(&[8]), &widest).unwrap();
    assert_eq!(quantized.data().bits(), 16);

    assert!(matches!(
        ApotConfig::unsigned(16, 16),
        Err(QuantError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        ApotConfig::unsigned(17, 1),
        Err(QuantError::InvalidConfiguration(_))
    ));
    for (b, k) in [(0, 2), (4, 0), (5, 2)] {
        assert!(matches!(
            ApotConfig::unsigned(b, k),
            Err(QuantError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn test_q_apot_alpha_reserved() {
    assert!(matches!(q_apot_alpha(), Err(QuantError::NotSupported(_))));
}
