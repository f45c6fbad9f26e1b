//! Test Profile Producer
//!
//! Generates and publishes test indicator profiles to NATS for pipeline
//! testing.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Indicator profile structure matching the pipeline's expected format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndicatorProfile {
    request_id: String,
    parental_income: f64,
    parental_education_years: f64,
    education_years: f64,
    gender: i32,
    urban_residence: i32,
    minority_status: i32,
    age: i32,
    household_size: i32,
    region_income_index: f64,
    public_school: i32,
    timestamp: chrono::DateTime<Utc>,
}

/// Profile generator for testing
struct ProfileGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl ProfileGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    /// Generate a profile from the middle of the indicator distributions
    fn generate_typical(&mut self) -> IndicatorProfile {
        self.request_counter += 1;

        IndicatorProfile {
            request_id: format!("req_{:012}", self.request_counter),
            parental_income: self.rng.gen_range(20000.0..90000.0),
            parental_education_years: self.rng.gen_range(8.0..18.0),
            education_years: self.rng.gen_range(10.0..18.0),
            gender: self.rng.gen_range(0..2),
            urban_residence: i32::from(self.rng.gen_bool(0.6)),
            minority_status: i32::from(self.rng.gen_bool(0.2)),
            age: self.rng.gen_range(22..60),
            household_size: self.rng.gen_range(2..7),
            region_income_index: self.rng.gen_range(0.7..1.3),
            public_school: i32::from(self.rng.gen_bool(0.8)),
            timestamp: Utc::now(),
        }
    }

    /// Generate a profile from the edges of the indicator distributions
    fn generate_edge(&mut self) -> IndicatorProfile {
        self.request_counter += 1;

        let advantaged = self.rng.gen_bool(0.5);

        IndicatorProfile {
            request_id: format!("req_{:012}", self.request_counter),
            parental_income: if advantaged {
                self.rng.gen_range(150000.0..400000.0)
            } else {
                self.rng.gen_range(5000.0..15000.0)
            },
            parental_education_years: if advantaged {
                self.rng.gen_range(16.0..22.0)
            } else {
                self.rng.gen_range(0.0..8.0)
            },
            education_years: if advantaged {
                self.rng.gen_range(16.0..22.0)
            } else {
                self.rng.gen_range(6.0..10.0)
            },
            gender: self.rng.gen_range(0..2),
            urban_residence: i32::from(advantaged),
            minority_status: i32::from(!advantaged && self.rng.gen_bool(0.5)),
            age: if self.rng.gen_bool(0.5) {
                self.rng.gen_range(18..22)
            } else {
                self.rng.gen_range(60..70)
            },
            household_size: if advantaged {
                self.rng.gen_range(2..4)
            } else {
                self.rng.gen_range(5..10)
            },
            region_income_index: if advantaged {
                self.rng.gen_range(1.2..1.6)
            } else {
                self.rng.gen_range(0.4..0.8)
            },
            public_school: i32::from(!advantaged),
            timestamp: Utc::now(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Profile Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("mobility.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let edge_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        edge_rate = edge_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, edge_rate, delay_ms).await;
        }
    };

    // Generate and publish profiles
    let mut generator = ProfileGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Starting to publish {} profiles...", count);

    let mut typical_count = 0;
    let mut edge_count = 0;

    for i in 0..count {
        let profile = if rng.gen_bool(edge_rate) {
            edge_count += 1;
            generator.generate_edge()
        } else {
            typical_count += 1;
            generator.generate_typical()
        };

        let payload = serde_json::to_vec(&profile)?;

        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} profiles ({} typical, {} edge)",
                i + 1,
                count,
                typical_count,
                edge_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Published {} profiles ({} typical, {} edge)",
        count, typical_count, edge_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, edge_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = ProfileGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let profile = if rng.gen_bool(edge_rate) {
            generator.generate_edge()
        } else {
            generator.generate_typical()
        };

        let json = serde_json::to_string_pretty(&profile)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample profile {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
