//! Seeded synthetic data with a known injected bias.
//!
//! Produces a loan-approval-style batch: unbiased ground truth drawn from a
//! logistic score over age and income, and predictions drawn from the same
//! score skewed by gender. Useful for exercising the detector in tests and
//! demos with a disparity that is known to exist.

use crate::data::GroupTable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GENDERS: &[&str] = &["M", "F"];
const RACES: &[&str] = &["White", "Black", "Hispanic", "Asian"];

/// A generated batch of predictions with group membership.
#[derive(Debug, Clone)]
pub struct SyntheticBatch {
    pub predictions: Vec<u8>,
    pub true_labels: Vec<u8>,
    /// The (biased) score each prediction was drawn from.
    pub probabilities: Vec<f64>,
    pub groups: GroupTable,
}

/// Generate `n_samples` loan-style samples with a gender skew of
/// `gender_bias` added to the approval score for men and subtracted for
/// women. Deterministic for a given seed.
pub fn biased_loan_batch(n_samples: usize, gender_bias: f64, seed: u64) -> SyntheticBatch {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut predictions = Vec::with_capacity(n_samples);
    let mut true_labels = Vec::with_capacity(n_samples);
    let mut probabilities = Vec::with_capacity(n_samples);
    let mut gender_col = Vec::with_capacity(n_samples);
    let mut race_col = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let age = sample_normal(&mut rng, 40.0, 15.0);
        let income = sample_normal(&mut rng, 50_000.0, 20_000.0);
        let gender = GENDERS[rng.gen_range(0..GENDERS.len())];
        let race = RACES[rng.gen_range(0..RACES.len())];

        let base_prob = logistic(age * 0.02 + income * 0.00001 - 2.0);
        let skew = if gender == "M" { gender_bias } else { -gender_bias };
        let biased_prob = (base_prob + skew).clamp(0.0, 1.0);

        predictions.push(u8::from(rng.gen_bool(biased_prob)));
        true_labels.push(u8::from(rng.gen_bool(base_prob)));
        probabilities.push(biased_prob);
        gender_col.push(gender.to_string());
        race_col.push(race.to_string());
    }

    // Column lengths match by construction, so this cannot fail.
    let groups = GroupTable::from_columns([("gender", gender_col), ("race", race_col)])
        .unwrap_or_default();

    SyntheticBatch {
        predictions,
        true_labels,
        probabilities,
        groups,
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Approximate normal sample via the Irwin-Hall sum of twelve uniforms.
fn sample_normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = (0..12).map(|_| rng.gen_range(0.0..1.0)).sum::<f64>() - 6.0;
    mean + std_dev * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::detector::BiasDetector;
    use crate::metric::BiasMetric;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_batch_is_aligned_and_binary() {
        let batch = biased_loan_batch(200, 0.1, 42);
        assert_eq!(batch.predictions.len(), 200);
        assert_eq!(batch.true_labels.len(), 200);
        assert_eq!(batch.probabilities.len(), 200);
        assert_eq!(batch.groups.row_count(), 200);
        assert!(batch.predictions.iter().all(|&v| v <= 1));
        assert!(batch.true_labels.iter().all(|&v| v <= 1));
        assert!(batch.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = biased_loan_batch(50, 0.1, 7);
        let b = biased_loan_batch(50, 0.1, 7);
        assert_eq!(a.predictions, b.predictions);
        assert_eq!(a.true_labels, b.true_labels);
    }

    #[test]
    fn test_injected_gender_skew_is_detectable() {
        let batch = biased_loan_batch(2000, 0.25, 42);
        let config = DetectorConfig::new("loan_approval_model", vec!["gender".into()]);
        let detector = BiasDetector::new(config).unwrap();
        let report = detector
            .evaluate(
                &batch.predictions,
                &batch.true_labels,
                &batch.groups,
                Some(&batch.probabilities),
            )
            .unwrap();

        // A 0.25 score skew between genders shows up as a clear parity gap.
        assert!(
            report.metric_scores[&BiasMetric::DemographicParity] > 0.1,
            "expected a visible parity gap, got {:?}",
            report.metric_scores
        );
        assert!(report.bias_detected);
    }

    #[test]
    fn test_unbiased_generation_stays_below_large_threshold() {
        let batch = biased_loan_batch(2000, 0.0, 42);
        let config = DetectorConfig::new("loan_approval_model", vec!["gender".into()])
            .with_threshold(0.2);
        let detector = BiasDetector::new(config).unwrap();
        let report = detector
            .evaluate(
                &batch.predictions,
                &batch.true_labels,
                &batch.groups,
                Some(&batch.probabilities),
            )
            .unwrap();
        assert!(!report.bias_detected, "score {}", report.overall_bias_score);
    }
}
