//! # fairaudit — group-fairness bias detection for binary classifiers
//!
//! Given per-sample predictions, true labels, and protected-attribute group
//! membership, computes group-disaggregated rates for a fixed set of
//! fairness metrics (demographic parity, equalized odds, equal opportunity,
//! calibration), reports the worst-case disparity per metric, and flags bias
//! against a configurable threshold.
//!
//! Evaluation is a pure, single-pass computation over an in-memory batch: no
//! I/O during scoring, no mutable state between calls, so one detector can
//! score independent batches concurrently.
//!
//! ```
//! use fairaudit::{BiasDetector, DetectorConfig, GroupTable};
//!
//! let config = DetectorConfig::new("loan_model", vec!["gender".into()]);
//! let detector = BiasDetector::new(config)?;
//!
//! let groups = GroupTable::from_columns([(
//!     "gender",
//!     vec!["M".into(), "M".into(), "F".into(), "F".into()],
//! )])?;
//! let report = detector.evaluate(&[1, 1, 0, 0], &[1, 0, 0, 1], &groups, None)?;
//! assert!(report.bias_detected);
//! # Ok::<(), fairaudit::FairnessError>(())
//! ```

pub mod config;
pub mod data;
pub mod detector;
pub mod error;
pub mod metric;
pub mod persistence;
pub mod recommend;
pub mod report;
pub mod synthetic;

// Re-exports
pub use config::DetectorConfig;
pub use data::GroupTable;
pub use detector::BiasDetector;
pub use error::FairnessError;
pub use metric::{BiasMetric, MetricInfo};
pub use persistence::{load_detector, save_detector, DetectorSnapshot};
pub use report::{BiasReport, ReportMetadata};
