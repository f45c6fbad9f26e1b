//! Configuration management for the mobility prediction pipeline

use crate::types::prediction::MobilityThresholds;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub artifacts: ArtifactsConfig,
    pub interpretation: InterpretationConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming prediction requests
    pub request_subject: String,
    /// Subject for outgoing prediction responses
    pub response_subject: String,
}

/// Fitted artifact locations
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Path to the fitted scaler artifact
    #[serde(default = "default_scaler_path")]
    pub scaler_path: String,
    /// Path to the fitted regression model artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,
}

fn default_scaler_path() -> String {
    "artifacts/scaler.igea".to_string()
}

fn default_model_path() -> String {
    "artifacts/best_ige_model.igea".to_string()
}

/// Result interpretation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InterpretationConfig {
    /// Elasticity cutoffs for the mobility levels
    #[serde(default)]
    pub mobility_levels: MobilityThresholds,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of worker tasks processing requests concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file location
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "mobility.requests".to_string(),
                response_subject: "mobility.predictions".to_string(),
            },
            artifacts: ArtifactsConfig {
                scaler_path: default_scaler_path(),
                model_path: default_model_path(),
            },
            interpretation: InterpretationConfig {
                mobility_levels: MobilityThresholds::default(),
            },
            pipeline: PipelineConfig {
                workers: default_workers(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.artifacts.scaler_path, "artifacts/scaler.igea");
        assert_eq!(config.artifacts.model_path, "artifacts/best_ige_model.igea");
        assert_eq!(config.pipeline.workers, 4);
    }

    #[test]
    fn test_mobility_thresholds_order() {
        let thresholds = MobilityThresholds::default();
        assert!(thresholds.moderate < thresholds.low);
    }
}
