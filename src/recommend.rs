//! Remediation guidance derived from metric scores.

use crate::metric::BiasMetric;
use std::collections::BTreeMap;

const GENERAL_SUGGESTIONS: &[&str] = &[
    "Retrain model with fairness-aware algorithms",
    "Collect more representative training data",
    "Apply bias mitigation techniques (preprocessing, in-processing, or post-processing)",
    "Conduct regular bias audits with domain experts",
    "Review model decisions with affected stakeholders",
];

/// Build the recommendation list for a set of metric scores.
///
/// One metric-specific entry per metric whose own score exceeds `threshold`
/// (in the order metrics were configured), followed by the fixed general
/// suggestions. When no metric exceeds the threshold, a single no-bias
/// notice is returned instead.
pub fn generate(
    metrics: &[BiasMetric],
    metric_scores: &BTreeMap<BiasMetric, f64>,
    threshold: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    for metric in metrics {
        let score = metric_scores.get(metric).copied().unwrap_or(0.0);
        if score > threshold {
            recommendations.push(metric_recommendation(*metric).to_string());
        }
    }

    if recommendations.is_empty() {
        return vec!["No significant bias detected. Continue monitoring.".to_string()];
    }

    recommendations.extend(GENERAL_SUGGESTIONS.iter().map(|s| s.to_string()));
    recommendations
}

fn metric_recommendation(metric: BiasMetric) -> &'static str {
    match metric {
        BiasMetric::DemographicParity => {
            "Demographic parity violation detected. Consider rebalancing training data \
             or applying fairness constraints during training."
        }
        BiasMetric::EqualizedOdds => {
            "Equalized odds violation detected. Consider post-processing techniques \
             to equalize true positive and false positive rates across groups."
        }
        BiasMetric::EqualOpportunity => {
            "Equal opportunity violation detected. Focus on equalizing true positive \
             rates across protected groups."
        }
        BiasMetric::Calibration => {
            "Calibration bias detected. Consider recalibrating model predictions \
             separately for each protected group."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_bias_notice_when_all_below_threshold() {
        let scores = BTreeMap::from([
            (BiasMetric::DemographicParity, 0.01),
            (BiasMetric::EqualOpportunity, 0.0),
        ]);
        let recs = generate(&BiasMetric::all(), &scores, 0.05);
        assert_eq!(
            recs,
            vec!["No significant bias detected. Continue monitoring.".to_string()]
        );
    }

    #[test]
    fn test_metric_specific_then_general() {
        let scores = BTreeMap::from([
            (BiasMetric::DemographicParity, 0.3),
            (BiasMetric::EqualizedOdds, 0.01),
        ]);
        let recs = generate(&BiasMetric::all(), &scores, 0.05);
        assert!(recs[0].starts_with("Demographic parity violation"));
        assert_eq!(recs.len(), 1 + GENERAL_SUGGESTIONS.len());
    }

    #[test]
    fn test_individual_scores_gate_independently_of_overall() {
        // Overall mean can be below threshold while one metric is above it.
        let scores = BTreeMap::from([
            (BiasMetric::DemographicParity, 0.08),
            (BiasMetric::EqualizedOdds, 0.0),
            (BiasMetric::EqualOpportunity, 0.0),
            (BiasMetric::Calibration, 0.0),
        ]);
        let recs = generate(&BiasMetric::all(), &scores, 0.05);
        assert!(recs[0].starts_with("Demographic parity violation"));
    }

    #[test]
    fn test_deterministic() {
        let scores = BTreeMap::from([(BiasMetric::Calibration, 0.2)]);
        let a = generate(&BiasMetric::all(), &scores, 0.05);
        let b = generate(&BiasMetric::all(), &scores, 0.05);
        assert_eq!(a, b);
    }
}
