//! Mobility Prediction Pipeline - Main Entry Point
//!
//! Consumes indicator profiles from NATS, runs scaler plus regression model
//! inference, and publishes prediction responses. When the artifacts fail to
//! load the service stays up and answers every request with the load error
//! until a valid artifact appears on disk.

use anyhow::Result;
use futures::StreamExt;
use mobility_prediction_pipeline::{
    artifacts::cache::ArtifactCache,
    config::AppConfig,
    consumer::ProfileConsumer,
    metrics::{MetricsReporter, ServiceMetrics},
    producer::ResponseProducer,
    types::prediction::PredictionResponse,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mobility_prediction_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Mobility Prediction Pipeline");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");
    info!(
        "Mobility levels: high<{:.2}, moderate<{:.2}, low>={:.2}",
        config.interpretation.mobility_levels.moderate,
        config.interpretation.mobility_levels.low,
        config.interpretation.mobility_levels.low
    );

    // Initialize metrics
    let metrics = Arc::new(ServiceMetrics::new());

    // Initialize the artifact cache and try to warm it up front
    let cache = Arc::new(ArtifactCache::from_config(&config.artifacts));
    match cache.warm() {
        Ok(()) => match cache.pipeline() {
            Ok(pipeline) => info!(
                model_version = %pipeline.model_version(),
                features = pipeline.schema().len(),
                "Inference pipeline ready"
            ),
            Err(e) => warn!(error = %e, "Artifacts loaded but pipeline assembly failed, running degraded"),
        },
        Err(e) => {
            warn!(error = %e, "Artifact warm-up failed, running degraded until artifacts appear");
        }
    }

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = ProfileConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = Arc::new(ResponseProducer::new(
        client.clone(),
        &config.nats.response_subject,
    ));

    let num_workers = config.pipeline.workers;
    info!(
        "Starting request processing loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", config.nats.request_subject);
    info!("Publishing responses to: {}", config.nats.response_subject);

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Wrap config in Arc for sharing
    let config = Arc::new(config);

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Process requests in parallel
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        // Acquire permit (limits concurrent tasks)
        let permit = semaphore.clone().acquire_owned().await.unwrap();

        // Clone shared resources for the spawned task
        let cache = cache.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let config = config.clone();
        let processed_count = processed_count.clone();

        // Spawn task to process this request
        tokio::spawn(async move {
            let start_time = Instant::now();

            match serde_json::from_slice::<mobility_prediction_pipeline::IndicatorProfile>(
                &message.payload,
            ) {
                Ok(profile) => {
                    let request_id = profile.request_id.clone();

                    // The cache retries the load while artifacts are absent,
                    // so a degraded service heals without a restart.
                    let response = match cache.pipeline() {
                        Ok(pipeline) => match pipeline.predict_profile(&profile) {
                            Ok(prediction) => {
                                let processing_time = start_time.elapsed();
                                metrics.record_prediction(processing_time, prediction.elasticity);

                                debug!(
                                    request_id = %request_id,
                                    elasticity = prediction.elasticity,
                                    processing_time_us = processing_time.as_micros(),
                                    "Prediction served"
                                );

                                prediction.to_response(
                                    &request_id,
                                    &config.interpretation.mobility_levels,
                                )
                            }
                            Err(e) => {
                                metrics.record_failure(e.class());
                                error!(
                                    request_id = %request_id,
                                    error = %e,
                                    "Error during prediction"
                                );
                                PredictionResponse::failure(
                                    request_id.clone(),
                                    format!("Error during prediction: {e}"),
                                )
                            }
                        },
                        Err(e) => {
                            metrics.record_failure(e.class());
                            warn!(
                                request_id = %request_id,
                                error = %e,
                                "Predictor unavailable"
                            );
                            PredictionResponse::failure(
                                request_id.clone(),
                                format!("Prediction is unavailable: {e}"),
                            )
                        }
                    };

                    if let Err(e) = producer.publish(&response).await {
                        error!(
                            request_id = %request_id,
                            error = %e,
                            "Failed to publish prediction response"
                        );
                    }

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

                    // Log progress every 100 requests
                    if count % 100 == 0 {
                        let throughput = metrics.get_throughput();
                        let processing_stats = metrics.get_processing_stats();
                        info!(
                            processed = count,
                            throughput = format!("{:.1} req/s", throughput),
                            avg_latency_us = processing_stats.mean_us,
                            "Processing milestone"
                        );
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize indicator profile");
                }
            }

            // Release permit when done
            drop(permit);
        });
    }

    // Print final summary
    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}
