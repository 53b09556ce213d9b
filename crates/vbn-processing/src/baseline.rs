//! Baseline subtraction

use crate::processor::{ProcessorConfig, ProcessorType, SignalProcessor};
use num_traits::{Float, NumCast};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use vbn_core::{ResponseVector, VbnError, VbnResult};

/// Default baseline window end (exclusive)
pub const DEFAULT_BASELINE_END: usize = 20;

/// Index range `[start, end)` whose mean is the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineWindow {
    pub start: usize,
    pub end: usize,
}

impl BaselineWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the window against a vector length
    pub fn check(&self, len: usize) -> VbnResult<()> {
        if self.is_empty() {
            return Err(VbnError::EmptyWindow {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > len {
            return Err(VbnError::WindowOutOfRange {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }
}

impl Default for BaselineWindow {
    fn default() -> Self {
        Self::new(0, DEFAULT_BASELINE_END)
    }
}

impl From<Range<usize>> for BaselineWindow {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Mean of `values[window]`, computed in the element type
pub fn window_mean<T: Float>(values: &[T], window: BaselineWindow) -> VbnResult<T> {
    window.check(values.len())?;

    let selected = &values[window.range()];
    let total = selected.iter().fold(T::zero(), |acc, &v| acc + v);
    let count = <T as NumCast>::from(selected.len()).ok_or_else(|| VbnError::ProcessingError {
        message: format!("Window length {} not representable", selected.len()),
    })?;

    Ok(total / count)
}

/// Subtract the mean of `baseline_window` from every element
///
/// # Errors
///
/// [`VbnError::EmptyWindow`] when the window selects nothing and
/// [`VbnError::WindowOutOfRange`] when it extends past the vector. The window
/// is never clipped to the available samples.
pub fn baseline_subtract<T: Float>(
    response_vector: &[T],
    baseline_window: impl Into<BaselineWindow>,
) -> VbnResult<Vec<T>> {
    let baseline = window_mean(response_vector, baseline_window.into())?;
    Ok(response_vector.iter().map(|&v| v - baseline).collect())
}

/// Baseline correction stage
pub struct BaselineSubtractor {
    config: ProcessorConfig,
    window: BaselineWindow,
}

impl BaselineSubtractor {
    pub fn new(window: BaselineWindow) -> Self {
        let mut config = ProcessorConfig::new("baseline_subtractor", ProcessorType::Baseline);
        config.set_parameter("start", window.start.into());
        config.set_parameter("end", window.end.into());

        BaselineSubtractor { config, window }
    }

    pub fn window(&self) -> BaselineWindow {
        self.window
    }
}

impl SignalProcessor for BaselineSubtractor {
    fn process(&mut self, input: &ResponseVector) -> VbnResult<ResponseVector> {
        let corrected = baseline_subtract(input.as_slice(), self.window)?;
        Ok(input.with_samples(corrected))
    }

    fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn update_config(&mut self, config: ProcessorConfig) -> VbnResult<()> {
        let start = config.get_int("start", self.window.start as i64);
        let end = config.get_int("end", self.window.end as i64);
        if start < 0 || end < 0 {
            return Err(VbnError::ConfigurationError {
                message: format!("Baseline window [{}, {}) has negative bounds", start, end),
            });
        }

        self.window = BaselineWindow::new(start as usize, end as usize);
        self.config = config;
        Ok(())
    }

    fn name(&self) -> &str {
        "Baseline Subtractor"
    }

    fn can_process(&self, response: &ResponseVector) -> bool {
        self.window.check(response.len()).is_ok()
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Baseline
    }
}
