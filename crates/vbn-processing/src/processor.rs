//! Core signal processor trait and types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use vbn_core::{ResponseVector, VbnError, VbnResult};

/// Core trait for all response processors
pub trait SignalProcessor: Send + Sync {
    /// Process a response vector and return the processed result
    fn process(&mut self, input: &ResponseVector) -> VbnResult<ResponseVector>;

    /// Get processor configuration
    fn config(&self) -> &ProcessorConfig;

    /// Update processor configuration
    fn update_config(&mut self, config: ProcessorConfig) -> VbnResult<()>;

    /// Get processor name/identifier
    fn name(&self) -> &str;

    /// Check if processor can handle the given response
    fn can_process(&self, response: &ResponseVector) -> bool {
        !response.is_empty()
    }

    /// Get processor type for pipeline organization
    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Filter
    }
}

/// Types of response processors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessorType {
    /// Smoothing filters
    Filter,
    /// Baseline correction and other level adjustments
    Baseline,
}

/// Generic processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Processor name
    pub name: String,
    /// Processor type
    pub processor_type: ProcessorType,
    /// Enabled/disabled state
    pub enabled: bool,
    /// Processing parameters
    pub parameters: HashMap<String, ParameterValue>,
}

/// Parameter value types for flexible configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Float(f64),
    Integer(i64),
    Boolean(bool),
    String(String),
}

/// Performance metrics for processing operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetrics {
    /// Processor that produced these metrics
    pub processor: String,
    /// Actual processing time in microseconds
    pub processing_time_us: u64,
    /// Number of samples processed
    pub samples: usize,
    /// Success/failure status
    pub success: bool,
    /// Error message if processing failed
    pub error_message: Option<String>,
}

impl ProcessorConfig {
    /// Create new processor configuration
    pub fn new(name: &str, processor_type: ProcessorType) -> Self {
        Self {
            name: name.to_string(),
            processor_type,
            enabled: true,
            parameters: HashMap::new(),
        }
    }

    /// Set a parameter value
    pub fn set_parameter(&mut self, key: &str, value: ParameterValue) {
        self.parameters.insert(key.to_string(), value);
    }

    /// Get a parameter value
    pub fn get_parameter(&self, key: &str) -> Option<&ParameterValue> {
        self.parameters.get(key)
    }

    /// Get integer parameter with default
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_parameter(key)
            .and_then(ParameterValue::as_int)
            .unwrap_or(default)
    }

    /// Get string parameter
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get_parameter(key) {
            Some(ParameterValue::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> VbnResult<()> {
        if self.name.is_empty() {
            return Err(VbnError::ConfigurationError {
                message: "Processor name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl ProcessingMetrics {
    /// Start timing a processing operation
    pub fn start_timing(processor: &str) -> ProcessingTimer {
        ProcessingTimer {
            start_time: Instant::now(),
            metrics: ProcessingMetrics {
                processor: processor.to_string(),
                processing_time_us: 0,
                samples: 0,
                success: true,
                error_message: None,
            },
        }
    }
}

/// Helper for timing processing operations
pub struct ProcessingTimer {
    start_time: Instant,
    metrics: ProcessingMetrics,
}

impl ProcessingTimer {
    /// Finish timing and return metrics
    pub fn finish(mut self, samples: usize) -> ProcessingMetrics {
        self.metrics.processing_time_us = self.start_time.elapsed().as_micros() as u64;
        self.metrics.samples = samples;
        self.metrics
    }

    /// Finish with error
    pub fn finish_with_error(mut self, error: &VbnError) -> ProcessingMetrics {
        self.metrics.processing_time_us = self.start_time.elapsed().as_micros() as u64;
        self.metrics.success = false;
        self.metrics.error_message = Some(error.to_string());
        self.metrics
    }
}

impl ParameterValue {
    /// Convert to f64 if possible
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Convert to i64 if possible
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(v) => Some(*v),
            ParameterValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// Convert to bool if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<usize> for ParameterValue {
    fn from(value: usize) -> Self {
        ParameterValue::Integer(value as i64)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Boolean(value)
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_config() {
        let mut config = ProcessorConfig::new("smoother", ProcessorType::Filter);

        config.set_parameter("tau", ParameterValue::Float(2.5));
        config.set_parameter("start", ParameterValue::Integer(4));
        config.set_parameter("symmetrical", ParameterValue::Boolean(true));
        config.set_parameter("boundary", "reflect".into());

        assert_eq!(config.get_parameter("tau"), Some(&ParameterValue::Float(2.5)));
        assert_eq!(config.get_int("start", 0), 4);
        assert_eq!(config.get_int("missing", 7), 7);
        assert_eq!(config.get_str("boundary"), Some("reflect"));
        assert_eq!(config.get_str("tau"), None);

        assert!(config.validate().is_ok());
        config.name.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_processing_metrics() {
        let timer = ProcessingMetrics::start_timing("test");
        let metrics = timer.finish(128);

        assert_eq!(metrics.processor, "test");
        assert_eq!(metrics.samples, 128);
        assert!(metrics.success);
        assert!(metrics.error_message.is_none());

        let timer = ProcessingMetrics::start_timing("test");
        let metrics = timer.finish_with_error(&VbnError::InvalidTau { tau: -1.0 });
        assert!(!metrics.success);
        assert!(metrics.error_message.unwrap().contains("tau"));
    }

    #[test]
    fn test_parameter_value_conversions() {
        let float_param = ParameterValue::Float(3.0);
        let fractional = ParameterValue::Float(3.5);
        let int_param = ParameterValue::Integer(42);
        let bool_param = ParameterValue::Boolean(true);

        assert_eq!(float_param.as_float(), Some(3.0));
        assert_eq!(int_param.as_int(), Some(42));
        assert_eq!(bool_param.as_bool(), Some(true));

        // Cross-type conversions
        assert_eq!(int_param.as_float(), Some(42.0));
        assert_eq!(float_param.as_int(), Some(3));
        assert_eq!(fractional.as_int(), None);
        assert_eq!(bool_param.as_float(), None);
    }
}
