//! Configuration management for response processing

use crate::baseline::{BaselineSubtractor, BaselineWindow};
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::smoothing::{ExponentialSmoother, SmoothingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vbn_core::{VbnError, VbnResult};

/// Named processing chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Configuration name/profile
    pub name: String,
    /// Error handling strategy
    #[serde(default)]
    pub error_handling: ErrorHandling,
    /// Stages in execution order
    pub stages: Vec<StageConfig>,
}

/// Error handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHandling {
    /// Stop processing on any error
    #[default]
    Strict,
    /// Continue processing, bypassing failed stages
    Bypass,
}

/// One pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageConfig {
    /// Exponential smoothing
    Smooth(SmoothingConfig),
    /// Baseline subtraction
    Baseline(BaselineWindow),
}

/// Preset configurations for common scenarios
impl ProcessingConfig {
    /// Causal smoothing followed by baseline subtraction
    pub fn causal_response(tau: f64) -> Self {
        ProcessingConfig {
            name: "Causal response".to_string(),
            error_handling: ErrorHandling::Strict,
            stages: vec![
                StageConfig::Smooth(SmoothingConfig::causal(tau)),
                StageConfig::Baseline(BaselineWindow::default()),
            ],
        }
    }

    /// Symmetric smoothing only, for offline display
    pub fn symmetric_display(tau: f64) -> Self {
        ProcessingConfig {
            name: "Symmetric display".to_string(),
            error_handling: ErrorHandling::Strict,
            stages: vec![StageConfig::Smooth(SmoothingConfig::symmetric(tau))],
        }
    }

    /// Validate entire configuration
    pub fn validate(&self) -> VbnResult<()> {
        if self.name.is_empty() {
            return Err(VbnError::ConfigurationError {
                message: "Configuration name cannot be empty".to_string(),
            });
        }

        if self.stages.is_empty() {
            return Err(VbnError::ConfigurationError {
                message: format!("Configuration '{}' has no stages", self.name),
            });
        }

        for (index, stage) in self.stages.iter().enumerate() {
            match stage {
                StageConfig::Smooth(smoothing) => {
                    smoothing.validate().map_err(|e| VbnError::ConfigurationError {
                        message: format!("Stage {} (smooth) invalid: {}", index, e),
                    })?;
                }
                StageConfig::Baseline(window) => {
                    if window.is_empty() {
                        return Err(VbnError::ConfigurationError {
                            message: format!(
                                "Stage {} (baseline) has empty window [{}, {})",
                                index, window.start, window.end
                            ),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Build the pipeline described by this configuration
    pub fn build_pipeline(&self) -> VbnResult<Pipeline> {
        self.validate()?;

        let mut builder = PipelineBuilder::new(&self.name);
        builder.set_bypass_on_error(self.error_handling == ErrorHandling::Bypass);

        for stage in &self.stages {
            match stage {
                StageConfig::Smooth(smoothing) => {
                    builder.add_processor(Box::new(ExponentialSmoother::new(smoothing.clone())?));
                }
                StageConfig::Baseline(window) => {
                    builder.add_processor(Box::new(BaselineSubtractor::new(*window)));
                }
            }
        }

        Ok(builder.build())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> VbnResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> VbnResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and validate configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> VbnResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| VbnError::io(path, e))?;
        let config = Self::from_json(&json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self::causal_response(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convolution::BoundaryMode;

    #[test]
    fn test_default_config() {
        let config = ProcessingConfig::default();
        assert_eq!(config.stages.len(), 2);
        assert!(config.validate().is_ok());

        let pipeline = config.build_pipeline().unwrap();
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ProcessingConfig::symmetric_display(1.0);
        assert!(config.validate().is_ok());

        config.stages.push(StageConfig::Smooth(SmoothingConfig::causal(-1.0)));
        assert!(config.validate().is_err());

        config.stages = vec![StageConfig::Baseline(BaselineWindow::new(4, 4))];
        assert!(config.validate().is_err());

        config.stages.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_serialization() {
        let mut config = ProcessingConfig::causal_response(2.5);
        config.error_handling = ErrorHandling::Bypass;

        let json = config.to_json().unwrap();
        assert!(json.contains("\"type\": \"smooth\""));

        let deserialized = ProcessingConfig::from_json(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "name": "minimal",
            "stages": [
                {"type": "smooth", "tau": 2.0, "boundary": "reflect"},
                {"type": "baseline", "start": 0, "end": 10}
            ]
        }"#;

        let config = ProcessingConfig::from_json(json).unwrap();
        assert_eq!(config.error_handling, ErrorHandling::Strict);
        match &config.stages[0] {
            StageConfig::Smooth(smoothing) => {
                assert_eq!(smoothing.tau, 2.0);
                assert!(!smoothing.symmetrical);
                assert_eq!(smoothing.boundary, BoundaryMode::Reflect);
            }
            other => panic!("unexpected stage {:?}", other),
        }
        assert_eq!(config.stages[1], StageConfig::Baseline(BaselineWindow::new(0, 10)));
    }

    #[test]
    fn test_from_file_missing() {
        let result = ProcessingConfig::from_file("/nonexistent/vbn/pipeline.json");
        assert!(matches!(result, Err(VbnError::FileNotFound { .. })));
    }
}
