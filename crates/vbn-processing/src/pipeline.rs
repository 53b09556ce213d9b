//! Processing pipeline for chaining processors

use crate::processor::{ProcessingMetrics, SignalProcessor};
use std::time::Instant;
use vbn_core::{ResponseVector, VbnResult};

/// Processing pipeline that chains multiple processors
pub struct Pipeline {
    name: String,
    processors: Vec<Box<dyn SignalProcessor>>,
    bypass_on_error: bool,
}

/// Pipeline builder for constructing processing chains
pub struct PipelineBuilder {
    name: String,
    processors: Vec<Box<dyn SignalProcessor>>,
    bypass_on_error: bool,
}

/// Pipeline execution result with per-stage metrics
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub output: ResponseVector,
    pub metrics: Vec<ProcessingMetrics>,
    pub total_time_us: u64,
    pub warnings: Vec<String>,
}

impl PipelineResult {
    /// True when every stage ran without error
    pub fn success(&self) -> bool {
        self.metrics.iter().all(|m| m.success)
    }
}

impl Pipeline {
    /// Create new empty pipeline
    pub fn new(name: &str) -> Self {
        Pipeline {
            name: name.to_string(),
            processors: Vec::new(),
            bypass_on_error: false,
        }
    }

    /// Add processor to pipeline
    pub fn add_processor(&mut self, processor: Box<dyn SignalProcessor>) {
        self.processors.push(processor);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Run a response through every enabled stage in order
    ///
    /// A failing stage aborts the run unless the pipeline was built with
    /// bypass enabled, in which case the stage is skipped and a warning is
    /// recorded.
    pub fn process(&mut self, input: &ResponseVector) -> VbnResult<PipelineResult> {
        let start_time = Instant::now();
        let mut current = input.clone();
        let mut metrics = Vec::with_capacity(self.processors.len());
        let mut warnings = Vec::new();

        for processor in self.processors.iter_mut() {
            // Skip disabled processors
            if !processor.config().enabled {
                tracing::debug!(stage = processor.name(), "stage disabled, skipping");
                continue;
            }

            let timer = ProcessingMetrics::start_timing(processor.name());

            match processor.process(&current) {
                Ok(processed) => {
                    metrics.push(timer.finish(processed.len()));
                    current = processed;
                }
                Err(e) => {
                    metrics.push(timer.finish_with_error(&e));

                    if !self.bypass_on_error {
                        tracing::warn!(
                            pipeline = %self.name,
                            stage = processor.name(),
                            error = %e,
                            "stage failed"
                        );
                        return Err(e);
                    }

                    tracing::warn!(
                        pipeline = %self.name,
                        stage = processor.name(),
                        error = %e,
                        "stage failed, bypassing"
                    );
                    warnings.push(format!(
                        "Processor '{}' failed: {}, bypassing",
                        processor.name(),
                        e
                    ));
                }
            }
        }

        let total_time_us = start_time.elapsed().as_micros() as u64;
        tracing::debug!(
            pipeline = %self.name,
            stages = metrics.len(),
            total_time_us,
            "pipeline finished"
        );

        Ok(PipelineResult {
            output: current,
            metrics,
            total_time_us,
            warnings,
        })
    }
}

impl PipelineBuilder {
    pub fn new(name: &str) -> Self {
        PipelineBuilder {
            name: name.to_string(),
            processors: Vec::new(),
            bypass_on_error: false,
        }
    }

    pub fn add_processor(&mut self, processor: Box<dyn SignalProcessor>) -> &mut Self {
        self.processors.push(processor);
        self
    }

    pub fn set_bypass_on_error(&mut self, enabled: bool) -> &mut Self {
        self.bypass_on_error = enabled;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            name: self.name,
            processors: self.processors,
            bypass_on_error: self.bypass_on_error,
        }
    }
}
