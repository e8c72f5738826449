//! The fixed set of supported fairness metrics.
//!
//! The metric set is small and fixed by the fairness literature, so this is a
//! closed enum with an associated description table rather than an extensible
//! registry.

use serde::{Deserialize, Serialize};

/// A group-fairness criterion over binary predictions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BiasMetric {
    /// Equal positive-prediction rate across groups.
    DemographicParity,
    /// Equal true-positive and false-positive rates across groups.
    EqualizedOdds,
    /// Equal true-positive rate across groups (positive class only).
    EqualOpportunity,
    /// Equal correspondence between predicted probability and observed
    /// outcome frequency across groups.
    Calibration,
}

/// Static description of a metric: display name, what it enforces, and the
/// probability statement it checks.
#[derive(Debug, Clone, Copy)]
pub struct MetricInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
}

impl BiasMetric {
    /// All supported metrics, in canonical order.
    pub fn all() -> [BiasMetric; 4] {
        [
            Self::DemographicParity,
            Self::EqualizedOdds,
            Self::EqualOpportunity,
            Self::Calibration,
        ]
    }

    /// Stable snake_case identifier, matching the serde representation.
    /// Used as the metric segment of group-score keys.
    pub fn key(&self) -> &'static str {
        match self {
            Self::DemographicParity => "demographic_parity",
            Self::EqualizedOdds => "equalized_odds",
            Self::EqualOpportunity => "equal_opportunity",
            Self::Calibration => "calibration",
        }
    }

    pub fn info(&self) -> MetricInfo {
        match self {
            Self::DemographicParity => MetricInfo {
                name: "Demographic Parity",
                description: "Ensures equal positive prediction rates across groups",
                formula: "P(Y_hat=1|A=0) = P(Y_hat=1|A=1)",
            },
            Self::EqualizedOdds => MetricInfo {
                name: "Equalized Odds",
                description: "Ensures equal TPR and FPR across groups",
                formula: "P(Y_hat=1|Y=y,A=0) = P(Y_hat=1|Y=y,A=1) for y in {0,1}",
            },
            Self::EqualOpportunity => MetricInfo {
                name: "Equal Opportunity",
                description: "Ensures equal TPR across groups",
                formula: "P(Y_hat=1|Y=1,A=0) = P(Y_hat=1|Y=1,A=1)",
            },
            Self::Calibration => MetricInfo {
                name: "Calibration",
                description: "Ensures equal calibration across groups",
                formula: "P(Y=1|Y_hat=v,A=0) = P(Y=1|Y_hat=v,A=1) for all v",
            },
        }
    }
}

impl std::fmt::Display for BiasMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
