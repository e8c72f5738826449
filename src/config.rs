//! Detector configuration.

use crate::error::FairnessError;
use crate::metric::BiasMetric;
use serde::{Deserialize, Serialize};

/// Configuration for a [`BiasDetector`](crate::detector::BiasDetector).
///
/// Read-only after the detector is constructed; this is the only state an
/// evaluation depends on besides its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Name of the model being audited (carried through to report metadata).
    pub model_name: String,
    /// Protected attribute column names. Must be non-empty.
    pub protected_attributes: Vec<String>,
    /// Disparity threshold above which bias is flagged.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Metrics to compute.
    #[serde(default = "default_metrics")]
    pub metrics: Vec<BiasMetric>,
}

fn default_threshold() -> f64 {
    0.05
}

fn default_metrics() -> Vec<BiasMetric> {
    BiasMetric::all().to_vec()
}

impl DetectorConfig {
    /// Config for `model_name` auditing `protected_attributes`, with the
    /// default threshold and all metrics.
    pub fn new(
        model_name: impl Into<String>,
        protected_attributes: Vec<String>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            protected_attributes,
            threshold: default_threshold(),
            metrics: default_metrics(),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<BiasMetric>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Check constructor invariants: non-empty attribute set, threshold >= 0.
    pub fn validate(&self) -> Result<(), FairnessError> {
        if self.protected_attributes.is_empty() {
            return Err(FairnessError::config(
                "At least one protected attribute is required",
            ));
        }
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(FairnessError::config(format!(
                "Threshold must be >= 0, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::new("loan_model", vec!["gender".into()]);
        assert_eq!(config.threshold, 0.05);
        assert_eq!(config.metrics, BiasMetric::all().to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_attributes_rejected() {
        let config = DetectorConfig::new("loan_model", vec![]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, FairnessError::Config(_)));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config =
            DetectorConfig::new("loan_model", vec!["gender".into()]).with_threshold(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = DetectorConfig::new("loan_model", vec!["gender".into()])
            .with_threshold(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_fills_defaults() {
        let config: DetectorConfig = serde_json::from_str(
            r#"{"model_name": "m", "protected_attributes": ["gender"]}"#,
        )
        .unwrap();
        assert_eq!(config.threshold, 0.05);
        assert_eq!(config.metrics.len(), 4);
    }
}
