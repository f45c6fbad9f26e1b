//! Demo Artifact Generator
//!
//! Writes a fitted scaler/model artifact pair so the service can run end to
//! end without a separate training step. The coefficients are a plausible
//! six-feature elasticity fit, not a trained model.

use anyhow::{Context, Result};
use mobility_prediction_pipeline::artifacts::format::{encode_artifact, ArtifactKind};
use mobility_prediction_pipeline::models::{LinearRegressor, StandardScaler};
use std::fs;
use std::path::Path;
use tracing::info;

fn feature_names() -> Vec<String> {
    [
        "parental_income",
        "education_years",
        "gender",
        "urban_residence",
        "minority_status",
        "age",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gen_artifacts=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let out_dir = args.get(1).map(|s| s.as_str()).unwrap_or("artifacts");
    let out_dir = Path::new(out_dir);

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let scaler = StandardScaler::new(
        feature_names(),
        vec![45000.0, 12.0, 0.5, 0.6, 0.2, 38.0],
        vec![22000.0, 3.0, 0.5, 0.5, 0.4, 12.0],
    );
    let scaler_bytes = encode_artifact(ArtifactKind::Scaler, 6, &scaler)?;
    let scaler_path = out_dir.join("scaler.igea");
    fs::write(&scaler_path, scaler_bytes)
        .with_context(|| format!("Failed to write {}", scaler_path.display()))?;
    info!(path = %scaler_path.display(), "Scaler artifact written");

    let model = LinearRegressor::new(
        feature_names(),
        vec![-0.08, -0.05, 0.01, -0.03, 0.04, 0.006],
        0.41,
        "ige-ols-1.0",
    );
    let model_bytes = encode_artifact(ArtifactKind::Model, 6, &model)?;
    let model_path = out_dir.join("best_ige_model.igea");
    fs::write(&model_path, model_bytes)
        .with_context(|| format!("Failed to write {}", model_path.display()))?;
    info!(path = %model_path.display(), version = "ige-ols-1.0", "Model artifact written");

    Ok(())
}
