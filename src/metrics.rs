//! Performance metrics and statistics tracking for the prediction service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the prediction service
pub struct ServiceMetrics {
    /// Total predictions served
    pub predictions_served: AtomicU64,
    /// Total failed requests
    pub failures: AtomicU64,
    /// Failures by error class (missing, corrupt, incompatible, mismatch, unknown)
    failures_by_class: RwLock<HashMap<String, u64>>,
    /// Request processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Predicted elasticity distribution buckets over [0, 1)
    elasticity_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            failures_by_class: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            elasticity_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(&self, processing_time: Duration, elasticity: f64) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent window for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        // Out-of-range values (atypical fits) land in the edge buckets
        let bucket = (elasticity * 10.0).clamp(0.0, 9.0) as usize;
        if let Ok(mut buckets) = self.elasticity_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a failed request by error class
    pub fn record_failure(&self, class: &str) {
        self.failures.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_class) = self.failures_by_class.write() {
            *by_class.entry(class.to_string()).or_insert(0) += 1;
        }
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get the elasticity distribution
    pub fn get_elasticity_distribution(&self) -> [u64; 10] {
        *self.elasticity_buckets.read().unwrap()
    }

    /// Get failures by error class
    pub fn get_failures_by_class(&self) -> HashMap<String, u64> {
        self.failures_by_class.read().unwrap().clone()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let failed = self.failures.load(Ordering::Relaxed);
        let total = served + failed;
        let failure_rate = if total > 0 {
            (failed as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();
        let failures_by_class = self.get_failures_by_class();
        let distribution = self.get_elasticity_distribution();

        info!("=== Mobility Prediction Service - Metrics Summary ===");
        info!(
            "Predictions served: {} | Failures: {} ({:.1}%) | Throughput: {:.1} req/s",
            served, failed, failure_rate, throughput
        );
        info!(
            "Processing time (us): mean={} p50={} p95={} p99={} max={}",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us,
            processing.max_us
        );

        if !failures_by_class.is_empty() {
            for (class, count) in &failures_by_class {
                info!("Failures [{}]: {}", class, count);
            }
        }

        let bucket_total: u64 = distribution.iter().sum();
        if bucket_total > 0 {
            for (i, &count) in distribution.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let pct = (count as f64 / bucket_total as f64) * 100.0;
                info!(
                    "Elasticity {:.1}-{:.1}: {} ({:.1}%)",
                    i as f64 / 10.0,
                    (i + 1) as f64 / 10.0,
                    count,
                    pct
                );
            }
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = ServiceMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), 0.42);
        metrics.record_prediction(Duration::from_micros(200), 0.17);
        metrics.record_failure("missing");
        metrics.record_failure("mismatch");

        assert_eq!(metrics.predictions_served.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.failures.load(Ordering::Relaxed), 2);

        let by_class = metrics.get_failures_by_class();
        assert_eq!(by_class.get("missing"), Some(&1));
        assert_eq!(by_class.get("mismatch"), Some(&1));
    }

    #[test]
    fn test_elasticity_distribution() {
        let metrics = ServiceMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), 0.05);
        metrics.record_prediction(Duration::from_micros(100), 0.42);
        metrics.record_prediction(Duration::from_micros(100), 0.45);
        // Atypical fit outside [0, 1) lands in the top bucket
        metrics.record_prediction(Duration::from_micros(100), 1.7);

        let distribution = metrics.get_elasticity_distribution();
        assert_eq!(distribution[0], 1);
        assert_eq!(distribution[4], 2);
        assert_eq!(distribution[9], 1);
    }

    #[test]
    fn test_processing_stats() {
        let metrics = ServiceMetrics::new();

        for us in [100u64, 200, 300, 400, 500] {
            metrics.record_prediction(Duration::from_micros(us), 0.4);
        }

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean_us, 300);
        assert_eq!(stats.max_us, 500);
    }
}
