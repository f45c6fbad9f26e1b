//! Process-wide artifact cache.
//!
//! Successful loads are cached once for the process lifetime and handed out
//! as shared `Arc`s. Failed loads are returned to the caller but never
//! cached, so a later request retries the load and the service heals once a
//! valid artifact appears on disk.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::info;

use crate::artifacts::loader::{ArtifactLoader, LoadError};
use crate::config::ArtifactsConfig;
use crate::models::inference::{InferenceError, InferencePipeline};
use crate::models::{LinearRegressor, StandardScaler};

/// Load state of one cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    NotLoaded,
    Loaded,
}

/// Failure to produce a working predictor from the cached artifacts.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictorError {
    /// Short class label used for failure counters.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Load(e) => e.class(),
            Self::Inference(e) => e.class(),
        }
    }
}

/// Caches the fitted scaler and model for the lifetime of the process.
pub struct ArtifactCache {
    scaler_path: PathBuf,
    model_path: PathBuf,
    loader: ArtifactLoader,
    scaler: Mutex<Option<Arc<StandardScaler>>>,
    model: Mutex<Option<Arc<LinearRegressor>>>,
    disk_reads: AtomicU64,
}

impl ArtifactCache {
    /// Create a cache over the two artifact paths. Nothing is read until the
    /// first access or an explicit [`warm`](Self::warm).
    pub fn new(scaler_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            scaler_path: scaler_path.into(),
            model_path: model_path.into(),
            loader: ArtifactLoader::new(),
            scaler: Mutex::new(None),
            model: Mutex::new(None),
            disk_reads: AtomicU64::new(0),
        }
    }

    /// Create a cache from the artifacts configuration section.
    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self::new(&config.scaler_path, &config.model_path)
    }

    /// Get the fitted scaler, loading it on first access.
    pub fn scaler(&self) -> Result<Arc<StandardScaler>, LoadError> {
        let mut slot = self.scaler.lock().map_err(|_| LoadError::Unknown {
            path: self.scaler_path.clone(),
            reason: "artifact cache lock poisoned".to_string(),
        })?;

        if let Some(scaler) = slot.as_ref() {
            return Ok(scaler.clone());
        }

        self.disk_reads.fetch_add(1, Ordering::Relaxed);
        let scaler = Arc::new(self.loader.load_scaler(&self.scaler_path)?);
        *slot = Some(scaler.clone());
        Ok(scaler)
    }

    /// Get the fitted model, loading it on first access.
    pub fn model(&self) -> Result<Arc<LinearRegressor>, LoadError> {
        let mut slot = self.model.lock().map_err(|_| LoadError::Unknown {
            path: self.model_path.clone(),
            reason: "artifact cache lock poisoned".to_string(),
        })?;

        if let Some(model) = slot.as_ref() {
            return Ok(model.clone());
        }

        self.disk_reads.fetch_add(1, Ordering::Relaxed);
        let model = Arc::new(self.loader.load_model(&self.model_path)?);
        *slot = Some(model.clone());
        Ok(model)
    }

    /// Eagerly load both artifacts, returning the first failure.
    pub fn warm(&self) -> Result<(), LoadError> {
        self.scaler()?;
        self.model()?;
        info!(
            scaler = %self.scaler_path.display(),
            model = %self.model_path.display(),
            "Artifact cache warmed"
        );
        Ok(())
    }

    /// Assemble an inference pipeline from the cached artifact pair.
    pub fn pipeline(&self) -> Result<InferencePipeline, PredictorError> {
        let scaler = self.scaler()?;
        let model = self.model()?;
        Ok(InferencePipeline::new(scaler, model)?)
    }

    /// Load state of the scaler slot.
    pub fn scaler_status(&self) -> ArtifactStatus {
        match self.scaler.lock() {
            Ok(slot) if slot.is_some() => ArtifactStatus::Loaded,
            _ => ArtifactStatus::NotLoaded,
        }
    }

    /// Load state of the model slot.
    pub fn model_status(&self) -> ArtifactStatus {
        match self.model.lock() {
            Ok(slot) if slot.is_some() => ArtifactStatus::Loaded,
            _ => ArtifactStatus::NotLoaded,
        }
    }

    /// Number of disk load attempts made so far.
    pub fn disk_reads(&self) -> u64 {
        self.disk_reads.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::format::{encode_artifact, ArtifactKind};
    use std::fs;
    use std::path::Path;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    fn demo_feature_names() -> Vec<String> {
        names(&[
            "parental_income",
            "education_years",
            "gender",
            "urban_residence",
            "minority_status",
            "age",
        ])
    }

    fn write_demo_scaler(path: &Path) {
        let scaler = StandardScaler::new(
            demo_feature_names(),
            vec![45000.0, 12.0, 0.5, 0.6, 0.2, 38.0],
            vec![22000.0, 3.0, 0.5, 0.5, 0.4, 12.0],
        );
        let bytes = encode_artifact(ArtifactKind::Scaler, 6, &scaler).unwrap();
        fs::write(path, bytes).unwrap();
    }

    fn write_demo_model(path: &Path) {
        let model = LinearRegressor::new(
            demo_feature_names(),
            vec![-0.08, -0.05, 0.01, -0.03, 0.04, 0.006],
            0.41,
            "ige-ols-1.0",
        );
        let bytes = encode_artifact(ArtifactKind::Model, 6, &model).unwrap();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn second_access_reuses_cached_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.igea");
        write_demo_scaler(&scaler_path);

        let cache = ArtifactCache::new(&scaler_path, dir.path().join("model.igea"));

        let first = cache.scaler().unwrap();
        let second = cache.scaler().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.disk_reads(), 1);
        assert_eq!(cache.scaler_status(), ArtifactStatus::Loaded);
    }

    #[test]
    fn failed_load_is_retried_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.igea");

        let cache = ArtifactCache::new(&scaler_path, dir.path().join("model.igea"));

        let err = cache.scaler().unwrap_err();
        assert!(matches!(err, LoadError::Missing { .. }));
        assert_eq!(cache.scaler_status(), ArtifactStatus::NotLoaded);
        assert_eq!(cache.disk_reads(), 1);

        write_demo_scaler(&scaler_path);

        assert!(cache.scaler().is_ok());
        assert_eq!(cache.disk_reads(), 2);
        assert_eq!(cache.scaler_status(), ArtifactStatus::Loaded);
    }

    #[test]
    fn pipeline_predicts_from_loaded_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.igea");
        let model_path = dir.path().join("model.igea");
        write_demo_scaler(&scaler_path);
        write_demo_model(&model_path);

        let cache = ArtifactCache::new(&scaler_path, &model_path);
        cache.warm().unwrap();

        let pipeline = cache.pipeline().unwrap();
        let prediction = pipeline
            .predict(&[30000.0, 12.0, 1.0, 1.0, 0.0, 30.0])
            .unwrap();

        assert!(prediction.elasticity.is_finite());
        assert_eq!(prediction.model_version, "ige-ols-1.0");
    }

    #[test]
    fn missing_model_disables_pipeline_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.igea");
        write_demo_scaler(&scaler_path);

        let cache = ArtifactCache::new(&scaler_path, dir.path().join("model.igea"));

        let err = cache.pipeline().unwrap_err();
        assert!(matches!(err, PredictorError::Load(LoadError::Missing { .. })));
        assert_eq!(err.class(), "missing");
    }

    #[test]
    fn incompatible_model_is_distinct_from_missing() {
        let dir = tempfile::tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.igea");
        let model_path = dir.path().join("model.igea");
        write_demo_scaler(&scaler_path);
        write_demo_model(&model_path);

        // Stamp a future format version on the model file.
        let mut bytes = fs::read(&model_path).unwrap();
        bytes[4] = 9;
        fs::write(&model_path, bytes).unwrap();

        let cache = ArtifactCache::new(&scaler_path, &model_path);
        let incompatible = cache.pipeline().unwrap_err();

        let other = ArtifactCache::new(&scaler_path, dir.path().join("gone.igea"));
        let missing = other.pipeline().unwrap_err();

        assert_eq!(incompatible.class(), "incompatible");
        assert_eq!(missing.class(), "missing");
        assert_ne!(incompatible.to_string(), missing.to_string());
    }

    #[test]
    fn mismatched_artifact_pair_is_incompatible() {
        let dir = tempfile::tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.igea");
        let model_path = dir.path().join("model.igea");
        write_demo_scaler(&scaler_path);

        // Model fitted on a different schema than the scaler.
        let model = LinearRegressor::new(
            names(&["parental_income", "age"]),
            vec![-0.1, 0.01],
            0.4,
            "ige-ols-0.3",
        );
        let bytes = encode_artifact(ArtifactKind::Model, 2, &model).unwrap();
        fs::write(&model_path, bytes).unwrap();

        let cache = ArtifactCache::new(&scaler_path, &model_path);
        let err = cache.pipeline().unwrap_err();

        assert!(matches!(
            err,
            PredictorError::Inference(InferenceError::Incompatible(_))
        ));
    }
}
