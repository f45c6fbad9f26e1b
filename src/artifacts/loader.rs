//! Artifact loading with failure classification.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::artifacts::format::{self, ArtifactHeader, ArtifactKind, FormatError};
use crate::models::{LinearRegressor, RegressionModel, StandardScaler};

/// Why an artifact could not be loaded.
///
/// The four classes carry distinct user-facing messages; the boundary shows
/// them to the requester verbatim.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Path does not exist or is not readable.
    #[error("artifact file {path} was not found", path = .path.display())]
    Missing { path: PathBuf },

    /// The byte stream is malformed.
    #[error("artifact file {path} is corrupt: {reason}", path = .path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The bytes decode but the object cannot be used by this runtime.
    #[error("artifact file {path} is incompatible with this runtime: {reason}", path = .path.display())]
    Incompatible { path: PathBuf, reason: String },

    /// Any other failure, captured with the underlying message.
    #[error("unexpected error loading artifact {path}: {reason}", path = .path.display())]
    Unknown { path: PathBuf, reason: String },
}

impl LoadError {
    /// Short class label used for failure counters.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing",
            Self::Corrupt { .. } => "corrupt",
            Self::Incompatible { .. } => "incompatible",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Loader for fitted artifacts.
pub struct ArtifactLoader;

impl ArtifactLoader {
    /// Create a new artifact loader.
    pub fn new() -> Self {
        Self
    }

    /// Load a fitted scaler artifact from file.
    pub fn load_scaler<P: AsRef<Path>>(&self, path: P) -> Result<StandardScaler, LoadError> {
        let path = path.as_ref();
        let (header, scaler): (_, StandardScaler) =
            self.read_artifact(path, ArtifactKind::Scaler)?;

        check_payload(path, &header, scaler.num_features(), scaler.validate())?;

        info!(
            path = %path.display(),
            features = scaler.num_features(),
            "Scaler artifact loaded"
        );

        Ok(scaler)
    }

    /// Load a fitted regression model artifact from file.
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<LinearRegressor, LoadError> {
        let path = path.as_ref();
        let (header, model): (_, LinearRegressor) = self.read_artifact(path, ArtifactKind::Model)?;

        check_payload(path, &header, model.num_features(), model.validate())?;

        info!(
            path = %path.display(),
            features = model.num_features(),
            version = %model.version(),
            "Model artifact loaded"
        );

        Ok(model)
    }

    fn read_artifact<T: DeserializeOwned>(
        &self,
        path: &Path,
        kind: ArtifactKind,
    ) -> Result<(ArtifactHeader, T), LoadError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => LoadError::Missing {
                path: path.to_path_buf(),
            },
            _ => LoadError::Unknown {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        format::decode_artifact(kind, &bytes).map_err(|e| classify(path, e))
    }
}

impl Default for ArtifactLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(path: &Path, err: FormatError) -> LoadError {
    if err.is_incompatibility() {
        LoadError::Incompatible {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    } else {
        LoadError::Corrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

fn check_payload(
    path: &Path,
    header: &ArtifactHeader,
    payload_features: usize,
    validation: Result<(), String>,
) -> Result<(), LoadError> {
    if header.num_features as usize != payload_features {
        return Err(LoadError::Incompatible {
            path: path.to_path_buf(),
            reason: format!(
                "header declares {} features but payload carries {}",
                header.num_features, payload_features
            ),
        });
    }

    validation.map_err(|reason| LoadError::Incompatible {
        path: path.to_path_buf(),
        reason,
    })
}
