//! Exponential decay kernels

use crate::convolution::{convolve_same, BoundaryMode, ConvolutionMethod};
use serde::{Deserialize, Serialize};
use vbn_core::{VbnError, VbnResult};

/// Kernel length in units of tau
pub const KERNEL_SPAN_TAUS: f64 = 10.0;

/// Upper bound on kernel taps
pub const MAX_KERNEL_TAPS: usize = 1 << 24;

/// Normalized exponential weighting kernel
///
/// Weights follow `exp(-|k - center| / tau)` for `k` in `[0, len)` and sum
/// to one. A causal kernel has its peak at index 0; a symmetric kernel peaks
/// at its midpoint. The `anchor` is the index whose weight multiplies the
/// current sample during convolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExponentialKernel {
    weights: Vec<f64>,
    anchor: usize,
    tau: f64,
    symmetrical: bool,
}

impl ExponentialKernel {
    /// Build a kernel of `round(10 * tau)` taps
    pub fn new(tau: f64, symmetrical: bool) -> VbnResult<Self> {
        let length = kernel_length(tau)?;

        let center = if symmetrical {
            (length - 1) as f64 / 2.0
        } else {
            0.0
        };

        let mut weights: Vec<f64> = (0..length)
            .map(|k| (-(k as f64 - center).abs() / tau).exp())
            .collect();

        let total: f64 = weights.iter().sum();
        for weight in &mut weights {
            *weight /= total;
        }

        let anchor = if symmetrical { (length - 1) / 2 } else { 0 };

        Ok(ExponentialKernel {
            weights,
            anchor,
            tau,
            symmetrical,
        })
    }

    /// Normalized weights in kernel order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weights in reverse order, as slid across the signal
    pub fn reversed(&self) -> Vec<f64> {
        self.weights.iter().rev().copied().collect()
    }

    /// Number of taps
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false; construction rejects zero-length kernels
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Index of the weight applied to the current sample
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn is_symmetrical(&self) -> bool {
        self.symmetrical
    }

    /// Sum of the weights (one up to rounding)
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Convolve a signal with this kernel, keeping its length
    pub fn apply(
        &self,
        signal: &[f64],
        boundary: BoundaryMode,
        method: ConvolutionMethod,
    ) -> VbnResult<Vec<f64>> {
        convolve_same(signal, &self.weights, self.anchor, boundary, method)
    }
}

/// Number of taps for a decay constant
pub fn kernel_length(tau: f64) -> VbnResult<usize> {
    if !tau.is_finite() || tau <= 0.0 {
        return Err(VbnError::InvalidTau { tau });
    }

    let length = (KERNEL_SPAN_TAUS * tau).round();
    if length < 1.0 {
        return Err(VbnError::InvalidTau { tau });
    }
    if length > MAX_KERNEL_TAPS as f64 {
        return Err(VbnError::ConfigurationError {
            message: format!(
                "tau {} gives a kernel of {} taps, maximum is {}",
                tau, length, MAX_KERNEL_TAPS
            ),
        });
    }

    Ok(length as usize)
}
