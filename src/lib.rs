//! Mobility Prediction Pipeline Library
//!
//! Loads a pre-fitted feature scaler and regression model from disk and
//! serves intergenerational income elasticity predictions over a message
//! boundary.

pub mod artifacts;
pub mod config;
pub mod consumer;
pub mod features;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod types;

pub use artifacts::cache::ArtifactCache;
pub use config::AppConfig;
pub use consumer::ProfileConsumer;
pub use features::FeatureExtractor;
pub use models::inference::InferencePipeline;
pub use producer::ResponseProducer;
pub use types::{prediction::PredictionResponse, profile::IndicatorProfile};
