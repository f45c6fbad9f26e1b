//! Artifact storage: container format, loading, process-wide cache.

pub mod cache;
pub mod format;
pub mod loader;

pub use cache::{ArtifactCache, PredictorError};
pub use format::ArtifactKind;
pub use loader::{ArtifactLoader, LoadError};
