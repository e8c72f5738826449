//! Group-fairness evaluation of binary classifier output.

use crate::config::DetectorConfig;
use crate::data::GroupTable;
use crate::error::FairnessError;
use crate::metric::BiasMetric;
use crate::recommend;
use crate::report::{BiasReport, ReportMetadata};
use chrono::Utc;
use std::collections::BTreeMap;

/// Number of equal-width probability bins used by the calibration metric.
const CALIBRATION_BINS: usize = 10;

/// Computes group-disaggregated fairness metrics over a batch of binary
/// predictions.
///
/// Holds no mutable state between calls; [`evaluate`](Self::evaluate) is a
/// pure function of its inputs and the read-only configuration, so a single
/// detector can score independent batches from separate threads.
#[derive(Debug)]
pub struct BiasDetector {
    config: DetectorConfig,
}

impl BiasDetector {
    /// Construct a detector, validating the configuration.
    pub fn new(config: DetectorConfig) -> Result<Self, FairnessError> {
        config.validate()?;
        tracing::info!(model = %config.model_name, "Initialized bias detector");
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Evaluate one batch of predictions against true labels and group
    /// membership.
    ///
    /// `predictions` and `true_labels` must be binary (0 or 1) and the same
    /// length; `groups` must have one row per prediction and contain every
    /// configured protected attribute as a column. `probabilities`, when
    /// supplied, must align with `predictions` and is only consulted by the
    /// calibration metric.
    ///
    /// Validation failures abort before any metric is computed. A metric
    /// whose required data is absent (calibration without probabilities)
    /// contributes 0.0 and is listed in `metadata.metrics_skipped`.
    pub fn evaluate(
        &self,
        predictions: &[u8],
        true_labels: &[u8],
        groups: &GroupTable,
        probabilities: Option<&[f64]>,
    ) -> Result<BiasReport, FairnessError> {
        self.validate_inputs(predictions, true_labels, groups, probabilities)?;

        let mut metric_scores = BTreeMap::new();
        let mut group_scores = BTreeMap::new();
        let mut metrics_skipped = Vec::new();

        for &metric in &self.config.metrics {
            let score = match metric {
                BiasMetric::DemographicParity => {
                    self.demographic_parity(predictions, groups)
                }
                BiasMetric::EqualizedOdds => {
                    self.equalized_odds(predictions, true_labels, groups)
                }
                BiasMetric::EqualOpportunity => {
                    self.equal_opportunity(predictions, true_labels, groups)
                }
                BiasMetric::Calibration => match probabilities {
                    Some(probs) => self.calibration(probs, true_labels, groups),
                    None => {
                        tracing::warn!(
                            "Calibration requires prediction probabilities, skipping"
                        );
                        metrics_skipped.push(metric);
                        0.0
                    }
                },
            };
            metric_scores.insert(metric, score);
            self.record_group_scores(
                metric,
                predictions,
                true_labels,
                groups,
                &mut group_scores,
            );
        }

        let overall_bias_score = if metric_scores.is_empty() {
            0.0
        } else {
            metric_scores.values().sum::<f64>() / metric_scores.len() as f64
        };
        let bias_detected = overall_bias_score > self.config.threshold;

        let recommendations = recommend::generate(
            &self.config.metrics,
            &metric_scores,
            self.config.threshold,
        );

        let metadata = ReportMetadata {
            model_name: self.config.model_name.clone(),
            sample_size: predictions.len(),
            protected_attributes: self.config.protected_attributes.clone(),
            metrics_computed: self.config.metrics.clone(),
            metrics_skipped,
            threshold: self.config.threshold,
            timestamp: Utc::now(),
        };

        tracing::info!(
            model = %self.config.model_name,
            overall_bias_score,
            bias_detected,
            "Bias evaluation completed"
        );

        Ok(BiasReport {
            overall_bias_score,
            bias_detected,
            metric_scores,
            group_scores,
            recommendations,
            metadata,
        })
    }

    fn validate_inputs(
        &self,
        predictions: &[u8],
        true_labels: &[u8],
        groups: &GroupTable,
        probabilities: Option<&[f64]>,
    ) -> Result<(), FairnessError> {
        if predictions.len() != true_labels.len() {
            return Err(FairnessError::validation(format!(
                "Predictions and true labels must have same length ({} vs {})",
                predictions.len(),
                true_labels.len()
            )));
        }
        if groups.row_count() != predictions.len() {
            return Err(FairnessError::validation(format!(
                "Group table must have one row per prediction ({} vs {})",
                groups.row_count(),
                predictions.len()
            )));
        }
        for attr in &self.config.protected_attributes {
            if !groups.has_column(attr) {
                return Err(FairnessError::validation(format!(
                    "Protected attribute '{attr}' not found in group table"
                )));
            }
        }
        if predictions.iter().any(|&v| v > 1) {
            return Err(FairnessError::validation(
                "Predictions must be binary (0 or 1)",
            ));
        }
        if true_labels.iter().any(|&v| v > 1) {
            return Err(FairnessError::validation(
                "True labels must be binary (0 or 1)",
            ));
        }
        if let Some(probs) = probabilities {
            if probs.len() != predictions.len() {
                return Err(FairnessError::validation(format!(
                    "Prediction probabilities must align with predictions ({} vs {})",
                    probs.len(),
                    predictions.len()
                )));
            }
        }
        Ok(())
    }

    /// Max spread of positive-prediction rates across groups, worst
    /// attribute.
    fn demographic_parity(&self, predictions: &[u8], groups: &GroupTable) -> f64 {
        let mut max_bias = 0.0f64;
        for attr in &self.config.protected_attributes {
            let values = groups.distinct_values(attr);
            if values.len() < 2 {
                continue;
            }
            let rates: Vec<f64> = values
                .iter()
                .map(|group| {
                    mean_at(predictions, &groups.member_indices(attr, group))
                })
                .collect();
            if let Some(s) = spread(&rates) {
                max_bias = max_bias.max(s);
            }
        }
        max_bias
    }

    /// Max of the TPR spread and the FPR spread across groups, worst
    /// attribute. Groups without positive (resp. negative) members are
    /// excluded from the TPR (resp. FPR) spread.
    fn equalized_odds(
        &self,
        predictions: &[u8],
        true_labels: &[u8],
        groups: &GroupTable,
    ) -> f64 {
        let mut max_bias = 0.0f64;
        for attr in &self.config.protected_attributes {
            let values = groups.distinct_values(attr);
            if values.len() < 2 {
                continue;
            }
            let mut tpr_scores = Vec::new();
            let mut fpr_scores = Vec::new();
            for group in values {
                let members = groups.member_indices(attr, group);
                if let Some(tpr) = label_rate(predictions, true_labels, &members, 1) {
                    tpr_scores.push(tpr);
                }
                if let Some(fpr) = label_rate(predictions, true_labels, &members, 0) {
                    fpr_scores.push(fpr);
                }
            }
            if let Some(s) = spread(&tpr_scores) {
                max_bias = max_bias.max(s);
            }
            if let Some(s) = spread(&fpr_scores) {
                max_bias = max_bias.max(s);
            }
        }
        max_bias
    }

    /// TPR spread only (positive class).
    fn equal_opportunity(
        &self,
        predictions: &[u8],
        true_labels: &[u8],
        groups: &GroupTable,
    ) -> f64 {
        let mut max_bias = 0.0f64;
        for attr in &self.config.protected_attributes {
            let values = groups.distinct_values(attr);
            if values.len() < 2 {
                continue;
            }
            let tpr_scores: Vec<f64> = values
                .iter()
                .filter_map(|group| {
                    let members = groups.member_indices(attr, group);
                    label_rate(predictions, true_labels, &members, 1)
                })
                .collect();
            if let Some(s) = spread(&tpr_scores) {
                max_bias = max_bias.max(s);
            }
        }
        max_bias
    }

    /// Spread of per-group mean calibration error, worst attribute.
    /// Probabilities are binned into ten equal-width bins on [0, 1); within
    /// each occupied bin the error is |mean(probability) - mean(label)|.
    fn calibration(
        &self,
        probabilities: &[f64],
        true_labels: &[u8],
        groups: &GroupTable,
    ) -> f64 {
        let mut max_bias = 0.0f64;
        for attr in &self.config.protected_attributes {
            let values = groups.distinct_values(attr);
            if values.len() < 2 {
                continue;
            }
            let mut group_errors = Vec::new();
            for group in values {
                let members = groups.member_indices(attr, group);
                let mut bin_errors = Vec::new();
                for bin in 0..CALIBRATION_BINS {
                    let lo = bin as f64 / CALIBRATION_BINS as f64;
                    let hi = (bin + 1) as f64 / CALIBRATION_BINS as f64;
                    let in_bin: Vec<usize> = members
                        .iter()
                        .copied()
                        .filter(|&i| probabilities[i] >= lo && probabilities[i] < hi)
                        .collect();
                    if !in_bin.is_empty() {
                        let predicted = mean_f64_at(probabilities, &in_bin);
                        let actual = mean_at(true_labels, &in_bin);
                        bin_errors.push((predicted - actual).abs());
                    }
                }
                if !bin_errors.is_empty() {
                    let mean_error =
                        bin_errors.iter().sum::<f64>() / bin_errors.len() as f64;
                    group_errors.push(mean_error);
                }
            }
            if let Some(s) = spread(&group_errors) {
                max_bias = max_bias.max(s);
            }
        }
        max_bias
    }

    /// Record the diagnostic per-group rate for every (attribute, group)
    /// pair under this metric: positive-prediction rate for demographic
    /// parity, TPR for the equalized-odds family, 0.0 where the metric has
    /// no natural per-group rate.
    fn record_group_scores(
        &self,
        metric: BiasMetric,
        predictions: &[u8],
        true_labels: &[u8],
        groups: &GroupTable,
        group_scores: &mut BTreeMap<String, f64>,
    ) {
        for attr in &self.config.protected_attributes {
            for group in groups.distinct_values(attr) {
                let members = groups.member_indices(attr, group);
                if members.is_empty() {
                    continue;
                }
                let score = match metric {
                    BiasMetric::DemographicParity => mean_at(predictions, &members),
                    BiasMetric::EqualizedOdds | BiasMetric::EqualOpportunity => {
                        label_rate(predictions, true_labels, &members, 1).unwrap_or(0.0)
                    }
                    BiasMetric::Calibration => 0.0,
                };
                group_scores.insert(BiasReport::group_key(attr, group, metric), score);
            }
        }
    }
}

/// Mean of binary values at the given indices. Returns 0.0 for no indices.
fn mean_at(values: &[u8], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let sum: u64 = indices.iter().map(|&i| values[i] as u64).sum();
    sum as f64 / indices.len() as f64
}

fn mean_f64_at(values: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| values[i]).sum::<f64>() / indices.len() as f64
}

/// Mean prediction among members whose true label equals `label`, or `None`
/// if no member has that label.
fn label_rate(
    predictions: &[u8],
    true_labels: &[u8],
    members: &[usize],
    label: u8,
) -> Option<f64> {
    let subset: Vec<usize> = members
        .iter()
        .copied()
        .filter(|&i| true_labels[i] == label)
        .collect();
    if subset.is_empty() {
        None
    } else {
        Some(mean_at(predictions, &subset))
    }
}

/// Max minus min, or `None` for fewer than two rates.
fn spread(rates: &[f64]) -> Option<f64> {
    if rates.len() < 2 {
        return None;
    }
    let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
    Some(max - min)
}
