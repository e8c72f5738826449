//! Detector snapshot persistence.
//!
//! Only the configuration is persisted — model name, protected attributes,
//! threshold, and metric list — never raw sample data. The snapshot is a
//! versioned JSON document with a content digest so that schema drift or
//! file corruption fails loudly on load instead of silently reconstructing
//! a different detector.

use crate::config::DetectorConfig;
use crate::detector::BiasDetector;
use crate::error::FairnessError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk form of a detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorSnapshot {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub config: DetectorConfig,
    /// SHA-256 of the canonical config JSON.
    pub digest: String,
}

impl DetectorSnapshot {
    pub fn new(config: DetectorConfig) -> Result<Self, FairnessError> {
        let digest = config_digest(&config)?;
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            config,
            digest,
        })
    }
}

/// Save a detector's configuration to `path` as a versioned snapshot.
pub fn save_detector(detector: &BiasDetector, path: &Path) -> Result<(), FairnessError> {
    let snapshot = DetectorSnapshot::new(detector.config().clone())?;
    atomic_write_json(path, &snapshot)?;
    tracing::info!(path = %path.display(), "Bias detector saved");
    Ok(())
}

/// Load a snapshot from `path` and reconstruct an identically configured
/// detector.
///
/// Fails with [`FairnessError::Snapshot`] on a missing file, an unknown
/// schema version, or a digest mismatch.
pub fn load_detector(path: &Path) -> Result<BiasDetector, FairnessError> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        FairnessError::snapshot(format!("Cannot read {}: {e}", path.display()))
    })?;
    let snapshot: DetectorSnapshot = serde_json::from_str(&data)?;

    if snapshot.schema_version != SCHEMA_VERSION {
        return Err(FairnessError::snapshot(format!(
            "Unsupported snapshot schema version {} (expected {SCHEMA_VERSION})",
            snapshot.schema_version
        )));
    }
    let expected = config_digest(&snapshot.config)?;
    if snapshot.digest != expected {
        return Err(FairnessError::snapshot(
            "Snapshot digest mismatch, file may be corrupted or edited",
        ));
    }

    let detector = BiasDetector::new(snapshot.config)?;
    tracing::info!(path = %path.display(), "Bias detector loaded");
    Ok(detector)
}

fn config_digest(config: &DetectorConfig) -> Result<String, FairnessError> {
    let canonical = serde_json::to_vec(config)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Atomically write pretty-printed JSON: write to a `.tmp` sibling, then
/// rename over the target. Creates parent directories if needed.
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), FairnessError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json.as_bytes())?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::BiasMetric;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_config() -> DetectorConfig {
        DetectorConfig::new(
            "loan_approval_model",
            vec!["gender".into(), "race".into()],
        )
        .with_threshold(0.1)
        .with_metrics(vec![BiasMetric::DemographicParity, BiasMetric::Calibration])
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("detector.json");

        let detector = BiasDetector::new(sample_config()).unwrap();
        save_detector(&detector, &path).unwrap();

        let loaded = load_detector(&path).unwrap();
        assert_eq!(loaded.config(), &sample_config());
    }

    #[test]
    fn test_no_tmp_leftover() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("detector.json");
        let detector = BiasDetector::new(sample_config()).unwrap();
        save_detector(&detector, &path).unwrap();
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_tampered_snapshot_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("detector.json");
        let detector = BiasDetector::new(sample_config()).unwrap();
        save_detector(&detector, &path).unwrap();

        // Rewrite a protected attribute without updating the digest.
        let content = std::fs::read_to_string(&path)
            .unwrap()
            .replace("\"race\"", "\"caste\"");
        std::fs::write(&path, content).unwrap();

        let err = load_detector(&path).unwrap_err();
        assert!(matches!(err, FairnessError::Snapshot(_)));
    }

    #[test]
    fn test_unknown_schema_version_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("detector.json");

        let mut snapshot = DetectorSnapshot::new(sample_config()).unwrap();
        snapshot.schema_version = 99;
        atomic_write_json(&path, &snapshot).unwrap();

        let err = load_detector(&path).unwrap_err();
        assert!(err.to_string().contains("schema version"));
    }

    #[test]
    fn test_missing_file_is_snapshot_error() {
        let err = load_detector(Path::new("/nonexistent/detector.json")).unwrap_err();
        assert!(matches!(err, FairnessError::Snapshot(_)));
    }

    #[test]
    fn test_snapshot_never_contains_sample_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("detector.json");
        let detector = BiasDetector::new(sample_config()).unwrap();
        save_detector(&detector, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let snapshot: DetectorSnapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(snapshot.schema_version, SCHEMA_VERSION);
        // The file holds configuration only.
        assert!(!content.contains("predictions"));
        assert!(!content.contains("group_scores"));
    }
}
