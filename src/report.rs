//! Evaluation report types.

use crate::metric::BiasMetric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a bias evaluation. Immutable once constructed; owned by the
/// caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasReport {
    /// Mean of the per-metric disparity scores (skipped metrics count 0.0).
    pub overall_bias_score: f64,
    /// Whether `overall_bias_score` exceeds the configured threshold.
    pub bias_detected: bool,
    /// Worst-case disparity per metric, across all configured attributes.
    pub metric_scores: BTreeMap<BiasMetric, f64>,
    /// Diagnostic per-group rates, keyed `"{attribute}_{group}_{metric}"`.
    pub group_scores: BTreeMap<String, f64>,
    /// Remediation guidance, metric-specific entries first.
    pub recommendations: Vec<String>,
    pub metadata: ReportMetadata,
}

/// Context captured alongside the scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub model_name: String,
    pub sample_size: usize,
    pub protected_attributes: Vec<String>,
    pub metrics_computed: Vec<BiasMetric>,
    /// Metrics requested but skipped for missing data (contributed 0.0).
    pub metrics_skipped: Vec<BiasMetric>,
    pub threshold: f64,
    pub timestamp: DateTime<Utc>,
}

impl BiasReport {
    /// Group-score key for an (attribute, group, metric) triple.
    pub fn group_key(attribute: &str, group: &str, metric: BiasMetric) -> String {
        format!("{attribute}_{group}_{}", metric.key())
    }
}
