//! Exponential smoothing of response vectors

use crate::convolution::{BoundaryMode, ConvolutionMethod};
use crate::kernel::{kernel_length, ExponentialKernel};
use crate::processor::{ProcessorConfig, ProcessorType, SignalProcessor};
use serde::{Deserialize, Serialize};
use vbn_core::{ResponseVector, VbnError, VbnResult};

/// Smooth a response with a normalized exponential kernel
///
/// The kernel spans `round(10 * tau)` samples. With `symmetrical == false`
/// each output sample is a weighted average of the current sample and the
/// samples before it, the current one weighted heaviest. With
/// `symmetrical == true` the weights decay on both sides of the current
/// sample. Samples before the start or past the end count as zero.
///
/// The output has the same length as the input; an empty input gives an
/// empty output. Convolution is direct, so a NaN sample only reaches the
/// outputs whose kernel window covers it.
///
/// # Errors
///
/// [`VbnError::InvalidTau`] if `tau` is not positive and finite, or so small
/// that the kernel would have no taps.
pub fn exponential_convolve(
    response_vector: &[f64],
    tau: f64,
    symmetrical: bool,
) -> VbnResult<Vec<f64>> {
    ExponentialKernel::new(tau, symmetrical)?.apply(
        response_vector,
        BoundaryMode::default(),
        ConvolutionMethod::default(),
    )
}

/// Smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Decay constant in samples
    pub tau: f64,
    /// Two-sided kernel instead of a causal one
    pub symmetrical: bool,
    /// Edge handling
    pub boundary: BoundaryMode,
    /// Convolution algorithm
    pub method: ConvolutionMethod,
}

impl SmoothingConfig {
    pub fn causal(tau: f64) -> Self {
        Self {
            tau,
            ..Self::default()
        }
    }

    pub fn symmetric(tau: f64) -> Self {
        Self {
            tau,
            symmetrical: true,
            ..Self::default()
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryMode) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_method(mut self, method: ConvolutionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn validate(&self) -> VbnResult<()> {
        kernel_length(self.tau).map(|_| ())
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            tau: 1.0,
            symmetrical: false,
            boundary: BoundaryMode::Zero,
            method: ConvolutionMethod::Direct,
        }
    }
}

/// Exponential smoothing stage
pub struct ExponentialSmoother {
    config: ProcessorConfig,
    settings: SmoothingConfig,
    kernel: ExponentialKernel,
}

impl ExponentialSmoother {
    /// Create new smoother, building its kernel up front
    pub fn new(settings: SmoothingConfig) -> VbnResult<Self> {
        let kernel = ExponentialKernel::new(settings.tau, settings.symmetrical)?;

        let mut config = ProcessorConfig::new("exponential_smoother", ProcessorType::Filter);
        config.set_parameter("tau", settings.tau.into());
        config.set_parameter("symmetrical", settings.symmetrical.into());
        config.set_parameter("boundary", settings.boundary.to_string().into());
        config.set_parameter("method", settings.method.to_string().into());

        Ok(ExponentialSmoother {
            config,
            settings,
            kernel,
        })
    }

    pub fn settings(&self) -> &SmoothingConfig {
        &self.settings
    }

    pub fn kernel(&self) -> &ExponentialKernel {
        &self.kernel
    }

    /// Smooth a bare slice
    pub fn smooth(&self, samples: &[f64]) -> VbnResult<Vec<f64>> {
        self.kernel
            .apply(samples, self.settings.boundary, self.settings.method)
    }
}

impl SignalProcessor for ExponentialSmoother {
    fn process(&mut self, input: &ResponseVector) -> VbnResult<ResponseVector> {
        let smoothed = self.smooth(input.as_slice())?;
        tracing::debug!(
            samples = smoothed.len(),
            taps = self.kernel.len(),
            tau = self.settings.tau,
            "exponential smoothing applied"
        );
        Ok(input.with_samples(smoothed))
    }

    fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn update_config(&mut self, config: ProcessorConfig) -> VbnResult<()> {
        let mut settings = self.settings.clone();

        if let Some(tau) = config.get_parameter("tau") {
            settings.tau = tau.as_float().ok_or_else(|| VbnError::ConfigurationError {
                message: "Parameter 'tau' must be numeric".to_string(),
            })?;
        }
        if let Some(symmetrical) = config.get_parameter("symmetrical") {
            settings.symmetrical = symmetrical.as_bool().ok_or_else(|| {
                VbnError::ConfigurationError {
                    message: "Parameter 'symmetrical' must be a boolean".to_string(),
                }
            })?;
        }
        if let Some(boundary) = config.get_str("boundary") {
            settings.boundary = boundary.parse()?;
        }
        if let Some(method) = config.get_str("method") {
            settings.method = method.parse()?;
        }

        // Rebuild before committing so a bad tau leaves the smoother unchanged
        self.kernel = ExponentialKernel::new(settings.tau, settings.symmetrical)?;
        self.settings = settings;
        self.config = config;
        Ok(())
    }

    fn name(&self) -> &str {
        "Exponential Smoother"
    }
}
