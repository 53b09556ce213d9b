//! Property checks for smoothing and baseline correction on noisy responses

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use vbn_processing::{
    baseline_subtract, convolve_same, exponential_convolve, BoundaryMode, ConvolutionMethod,
    ExponentialKernel, ProcessingConfig,
};
use vbn_core::ResponseVector;

/// Noisy step response: resting level, then an elevated plateau
fn noisy_response(rng: &mut StdRng, len: usize, noise: f64) -> Vec<f64> {
    let normal = Normal::new(0.0, noise).unwrap();
    (0..len)
        .map(|i| {
            let level = if i < len / 3 { 1.0 } else { 4.0 };
            level + normal.sample(rng)
        })
        .collect()
}

#[test]
fn output_length_matches_input() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let len = rng.gen_range(1..400);
        let tau = rng.gen_range(0.1..12.0);
        let symmetrical = rng.gen_bool(0.5);
        let response = noisy_response(&mut rng, len, 0.5);

        let smoothed = exponential_convolve(&response, tau, symmetrical).unwrap();
        assert_eq!(smoothed.len(), len, "tau {} symmetrical {}", tau, symmetrical);
    }
}

#[test]
fn kernel_weights_sum_to_one() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..100 {
        let tau = rng.gen_range(0.06..50.0);
        let kernel = ExponentialKernel::new(tau, rng.gen_bool(0.5)).unwrap();
        assert!((kernel.sum() - 1.0).abs() < 1e-9, "tau {}", tau);
        assert!(kernel.weights().iter().all(|&w| w >= 0.0));
    }
}

#[test]
fn smoothing_reduces_noise() {
    let mut rng = StdRng::seed_from_u64(3);
    let response = noisy_response(&mut rng, 600, 1.0);

    let smoothed = exponential_convolve(&response, 3.0, true).unwrap();

    let plateau = 300..500;
    let raw = ResponseVector::new(response[plateau.clone()].to_vec()).stats();
    let filtered = ResponseVector::new(smoothed[plateau].to_vec()).stats();

    assert!(filtered.std_dev < raw.std_dev / 2.0);
    assert!((filtered.mean - 4.0).abs() < 0.3);
}

#[test]
fn fft_and_direct_agree_on_long_kernels() {
    let mut rng = StdRng::seed_from_u64(19);
    let response = noisy_response(&mut rng, 2_000, 0.8);

    for symmetrical in [false, true] {
        let kernel = ExponentialKernel::new(15.0, symmetrical).unwrap();
        for boundary in [
            BoundaryMode::Zero,
            BoundaryMode::Reflect,
            BoundaryMode::Nearest,
            BoundaryMode::Wrap,
        ] {
            let direct = kernel.apply(&response, boundary, ConvolutionMethod::Direct).unwrap();
            let fft = kernel.apply(&response, boundary, ConvolutionMethod::Fft).unwrap();
            for (a, b) in direct.iter().zip(&fft) {
                assert!((a - b).abs() < 1e-9 * a.abs().max(1.0));
            }
        }
    }
}

#[test]
fn edge_preserving_boundaries_keep_constants() {
    let constant = vec![2.5; 30];
    let kernel = ExponentialKernel::new(2.0, false).unwrap();

    for boundary in [BoundaryMode::Reflect, BoundaryMode::Nearest, BoundaryMode::Wrap] {
        let output = convolve_same(
            &constant,
            kernel.weights(),
            kernel.anchor(),
            boundary,
            ConvolutionMethod::Direct,
        )
        .unwrap();
        assert!(output.iter().all(|v| (v - 2.5).abs() < 1e-12), "{:?}", boundary);
    }
}

#[test]
fn baseline_corrected_rest_has_zero_mean() {
    let mut rng = StdRng::seed_from_u64(5);
    let response = noisy_response(&mut rng, 90, 0.3);

    let corrected = baseline_subtract(&response, 0..20).unwrap();
    let rest_mean: f64 = corrected[..20].iter().sum::<f64>() / 20.0;
    assert!(rest_mean.abs() < 1e-12);
}

#[test]
fn default_config_pipeline_runs_on_noisy_response() {
    let mut rng = StdRng::seed_from_u64(23);
    let response = ResponseVector::new(noisy_response(&mut rng, 120, 0.4))
        .with_sampling_rate(30.0)
        .unwrap();

    let mut pipeline = ProcessingConfig::default().build_pipeline().unwrap();
    let result = pipeline.process(&response).unwrap();

    assert!(result.success());
    assert_eq!(result.output.len(), response.len());
    assert_eq!(result.output.sampling_rate, Some(30.0));
    assert!(result.output.samples[100] > 2.0);
}
