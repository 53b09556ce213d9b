//! ResponseVector: container for a 1-D response trace

use crate::error::{VbnError, VbnResult};
use serde::{Deserialize, Serialize};

/// Time-ordered sequence of scalar measurements (e.g. a neural response)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseVector {
    /// Sample values, one per time step
    pub samples: Vec<f64>,
    /// Sampling rate in Hz, when known
    pub sampling_rate: Option<f64>,
    /// Free-form label (column name, unit id, ...)
    pub label: Option<String>,
}

impl ResponseVector {
    /// Create a response vector from raw samples
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            sampling_rate: None,
            label: None,
        }
    }

    /// Attach a sampling rate
    pub fn with_sampling_rate(mut self, sampling_rate: f64) -> VbnResult<Self> {
        if !(sampling_rate.is_finite() && sampling_rate > 0.0) {
            return Err(VbnError::ConfigurationError {
                message: format!("Sampling rate must be positive, got {}", sampling_rate),
            });
        }
        self.sampling_rate = Some(sampling_rate);
        Ok(self)
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replace the samples, keeping sampling rate and label
    pub fn with_samples(&self, samples: Vec<f64>) -> Self {
        Self {
            samples,
            sampling_rate: self.sampling_rate,
            label: self.label.clone(),
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the vector holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrow the samples
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Duration in seconds, when the sampling rate is known
    pub fn duration(&self) -> Option<f64> {
        self.sampling_rate.map(|rate| self.samples.len() as f64 / rate)
    }

    /// Time of each sample in seconds; sample indices when no rate is set
    pub fn time_vector(&self) -> Vec<f64> {
        let dt = self.sampling_rate.map_or(1.0, |rate| 1.0 / rate);

        (0..self.samples.len()).map(|i| i as f64 * dt).collect()
    }

    /// Summary statistics over all samples
    pub fn stats(&self) -> ResponseStats {
        ResponseStats::calculate(&self.samples)
    }
}

impl From<Vec<f64>> for ResponseVector {
    fn from(samples: Vec<f64>) -> Self {
        ResponseVector::new(samples)
    }
}

/// Basic statistics for a response vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ResponseStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                count: 0,
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;

        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            count: data.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_vector_creation() {
        let response = ResponseVector::new(vec![0.0; 100])
            .with_sampling_rate(50.0)
            .unwrap()
            .with_label("unit_42");

        assert_eq!(response.len(), 100);
        assert_eq!(response.duration(), Some(2.0));
        assert_eq!(response.label.as_deref(), Some("unit_42"));
    }

    #[test]
    fn test_invalid_sampling_rate() {
        assert!(ResponseVector::new(vec![1.0]).with_sampling_rate(0.0).is_err());
        assert!(ResponseVector::new(vec![1.0])
            .with_sampling_rate(f64::NAN)
            .is_err());
    }

    #[test]
    fn test_time_vector() {
        let response = ResponseVector::new(vec![0.0; 4]).with_sampling_rate(2.0).unwrap();
        assert_eq!(response.time_vector(), vec![0.0, 0.5, 1.0, 1.5]);

        let response = ResponseVector::new(vec![0.0; 3]);
        assert_eq!(response.time_vector(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_stats() {
        let stats = ResponseVector::new(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).stats();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);

        let empty = ResponseStats::calculate(&[]);
        assert_eq!(empty.count, 0);
    }

    #[test]
    fn test_with_samples_keeps_metadata() {
        let response = ResponseVector::new(vec![1.0, 2.0])
            .with_sampling_rate(10.0)
            .unwrap()
            .with_label("trace");
        let replaced = response.with_samples(vec![3.0, 4.0]);
        assert_eq!(replaced.samples, vec![3.0, 4.0]);
        assert_eq!(replaced.sampling_rate, Some(10.0));
        assert_eq!(replaced.label.as_deref(), Some("trace"));
    }
}
