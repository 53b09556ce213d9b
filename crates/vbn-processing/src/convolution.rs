//! Same-length discrete convolution with explicit boundary handling

use num_complex::Complex;
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vbn_core::{VbnError, VbnResult};

/// Kernels at least this long use the FFT path under [`ConvolutionMethod::Auto`]
pub const FFT_MIN_TAPS: usize = 64;

/// Largest `signal_len * taps` product `Auto` still convolves directly
pub const AUTO_DIRECT_MAX_WORK: usize = 1 << 26;

/// How samples outside the signal are supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Zeros outside the signal
    #[default]
    Zero,
    /// Half-sample symmetric mirror: `d c b a | a b c d | d c b a`
    Reflect,
    /// Repeat the edge sample
    Nearest,
    /// Periodic continuation
    Wrap,
}

impl BoundaryMode {
    /// Value at `index`, resolving out-of-range positions by the mode
    pub fn sample(self, signal: &[f64], index: isize) -> f64 {
        let n = signal.len() as isize;
        if n == 0 {
            return 0.0;
        }
        if (0..n).contains(&index) {
            return signal[index as usize];
        }

        match self {
            BoundaryMode::Zero => 0.0,
            BoundaryMode::Nearest => signal[index.clamp(0, n - 1) as usize],
            BoundaryMode::Wrap => signal[index.rem_euclid(n) as usize],
            BoundaryMode::Reflect => {
                let period = 2 * n;
                let folded = index.rem_euclid(period);
                let idx = if folded < n { folded } else { period - 1 - folded };
                signal[idx as usize]
            }
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundaryMode::Zero => "zero",
            BoundaryMode::Reflect => "reflect",
            BoundaryMode::Nearest => "nearest",
            BoundaryMode::Wrap => "wrap",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for BoundaryMode {
    type Err = VbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" | "constant" => Ok(BoundaryMode::Zero),
            "reflect" => Ok(BoundaryMode::Reflect),
            "nearest" => Ok(BoundaryMode::Nearest),
            "wrap" => Ok(BoundaryMode::Wrap),
            other => Err(VbnError::ConfigurationError {
                message: format!(
                    "Unknown boundary mode '{}' (expected zero, reflect, nearest or wrap)",
                    other
                ),
            }),
        }
    }
}

/// Convolution algorithm selection
///
/// Only `Direct` is exact per sample: the FFT path spreads rounding error
/// across the whole output, so a huge sample perturbs outputs that a causal
/// kernel never reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvolutionMethod {
    /// Sliding dot product, O(n * taps)
    #[default]
    Direct,
    /// Real FFT, O((n + taps) log(n + taps))
    Fft,
    /// FFT for long kernels or large workloads, direct otherwise
    Auto,
}

impl ConvolutionMethod {
    /// Concrete method for a signal and kernel size
    pub fn resolve(self, signal_len: usize, taps: usize) -> ConvolutionMethod {
        match self {
            ConvolutionMethod::Auto => {
                let long_kernel = taps >= FFT_MIN_TAPS && signal_len > taps;
                if long_kernel || signal_len.saturating_mul(taps) > AUTO_DIRECT_MAX_WORK {
                    ConvolutionMethod::Fft
                } else {
                    ConvolutionMethod::Direct
                }
            }
            method => method,
        }
    }
}

impl fmt::Display for ConvolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConvolutionMethod::Direct => "direct",
            ConvolutionMethod::Fft => "fft",
            ConvolutionMethod::Auto => "auto",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ConvolutionMethod {
    type Err = VbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(ConvolutionMethod::Direct),
            "fft" => Ok(ConvolutionMethod::Fft),
            "auto" => Ok(ConvolutionMethod::Auto),
            other => Err(VbnError::ConfigurationError {
                message: format!(
                    "Unknown convolution method '{}' (expected direct, fft or auto)",
                    other
                ),
            }),
        }
    }
}

/// Convolve `signal` with `weights`, returning a vector of the same length
///
/// Output sample `i` is `sum_k weights[k] * signal[i + anchor - k]`, with
/// out-of-range samples supplied by `boundary`. An empty signal yields an
/// empty output. Signals holding NaN or infinite samples always take the
/// direct path so a gap only affects the outputs whose window covers it.
pub fn convolve_same(
    signal: &[f64],
    weights: &[f64],
    anchor: usize,
    boundary: BoundaryMode,
    method: ConvolutionMethod,
) -> VbnResult<Vec<f64>> {
    if weights.is_empty() {
        return Err(VbnError::ProcessingError {
            message: "Convolution kernel is empty".to_string(),
        });
    }
    if anchor >= weights.len() {
        return Err(VbnError::ProcessingError {
            message: format!(
                "Kernel anchor {} outside kernel of {} taps",
                anchor,
                weights.len()
            ),
        });
    }
    if signal.is_empty() {
        return Ok(Vec::new());
    }

    match method.resolve(signal.len(), weights.len()) {
        ConvolutionMethod::Fft if signal.iter().all(|v| v.is_finite()) => {
            convolve_fft(signal, weights, anchor, boundary)
        }
        ConvolutionMethod::Fft => {
            tracing::debug!(samples = signal.len(), "non-finite samples, using direct convolution");
            Ok(convolve_direct(signal, weights, anchor, boundary))
        }
        _ => Ok(convolve_direct(signal, weights, anchor, boundary)),
    }
}

fn convolve_direct(
    signal: &[f64],
    weights: &[f64],
    anchor: usize,
    boundary: BoundaryMode,
) -> Vec<f64> {
    let reversed: Vec<f64> = weights.iter().rev().copied().collect();
    // Samples the reversed kernel reaches behind the current one
    let lead = (weights.len() - 1 - anchor) as isize;

    (0..signal.len())
        .map(|i| {
            let start = i as isize - lead;
            reversed
                .iter()
                .enumerate()
                .map(|(m, w)| w * boundary.sample(signal, start + m as isize))
                .sum()
        })
        .collect()
}

fn convolve_fft(
    signal: &[f64],
    weights: &[f64],
    anchor: usize,
    boundary: BoundaryMode,
) -> VbnResult<Vec<f64>> {
    let n = signal.len();
    let taps = weights.len();
    let lead = (taps - 1 - anchor) as isize;

    // Signal extended by the boundary policy on both sides
    let extended_len = n + taps - 1;
    let fft_len = (extended_len + taps - 1).next_power_of_two().max(2);

    let mut planner = RealFftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut padded_signal = forward.make_input_vec();
    for (t, slot) in padded_signal.iter_mut().take(extended_len).enumerate() {
        *slot = boundary.sample(signal, t as isize - lead);
    }
    let mut padded_kernel = forward.make_input_vec();
    padded_kernel[..taps].copy_from_slice(weights);

    let mut signal_spectrum = forward.make_output_vec();
    let mut kernel_spectrum = forward.make_output_vec();
    forward
        .process(&mut padded_signal, &mut signal_spectrum)
        .map_err(fft_error)?;
    forward
        .process(&mut padded_kernel, &mut kernel_spectrum)
        .map_err(fft_error)?;

    multiply_spectra(&mut signal_spectrum, &kernel_spectrum);

    let mut output = inverse.make_output_vec();
    inverse
        .process(&mut signal_spectrum, &mut output)
        .map_err(fft_error)?;

    let scale = 1.0 / fft_len as f64;
    Ok(output[taps - 1..taps - 1 + n]
        .iter()
        .map(|value| value * scale)
        .collect())
}

/// Pointwise product, leaving DC and Nyquist bins purely real for the inverse transform
fn multiply_spectra(target: &mut [Complex<f64>], other: &[Complex<f64>]) {
    for (a, b) in target.iter_mut().zip(other) {
        *a = *a * *b;
    }
    if let Some(first) = target.first_mut() {
        first.im = 0.0;
    }
    if let Some(last) = target.last_mut() {
        last.im = 0.0;
    }
}

fn fft_error(err: realfft::FftError) -> VbnError {
    VbnError::ProcessingError {
        message: format!("FFT convolution failed: {}", err),
    }
}
