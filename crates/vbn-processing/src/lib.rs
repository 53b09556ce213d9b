//! VBN-Processing: Response smoothing and baseline correction
//!
//! Exponential-kernel smoothing with explicit boundary handling, baseline
//! subtraction, and a small pipeline for chaining the two.

pub mod baseline;
pub mod config;
pub mod convolution;
pub mod kernel;
pub mod pipeline;
pub mod processor;
pub mod smoothing;

pub use baseline::{baseline_subtract, BaselineSubtractor, BaselineWindow};
pub use config::{ErrorHandling, ProcessingConfig, StageConfig};
pub use convolution::{convolve_same, BoundaryMode, ConvolutionMethod};
pub use kernel::ExponentialKernel;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineResult};
pub use processor::{
    ParameterValue, ProcessingMetrics, ProcessorConfig, ProcessorType, SignalProcessor,
};
pub use smoothing::{exponential_convolve, ExponentialSmoother, SmoothingConfig};
