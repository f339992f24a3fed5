//! Performance metrics and statistics tracking for the prediction service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the request/response cycle
pub struct ServiceMetrics {
    /// Total requests received
    pub requests_received: AtomicU64,
    /// Requests that produced a formatted price
    pub predictions_succeeded: AtomicU64,
    /// Requests that failed inside the predict call
    pub predictions_failed: AtomicU64,
    /// Requests rejected by range validation
    pub validation_rejections: AtomicU64,
    /// Handling times (in microseconds)
    handle_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_received: AtomicU64::new(0),
            predictions_succeeded: AtomicU64::new(0),
            predictions_failed: AtomicU64::new(0),
            validation_rejections: AtomicU64::new(0),
            handle_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a handled request
    pub fn record_request(&self, handle_time: Duration) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.handle_times.write() {
            times.push(handle_time.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Record a successful prediction
    pub fn record_success(&self) {
        self.predictions_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed predict call
    pub fn record_failure(&self) {
        self.predictions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a range-validation rejection
    pub fn record_rejection(&self) {
        self.validation_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Get handling time statistics
    pub fn get_handling_stats(&self) -> HandlingStats {
        let times = self.handle_times.read().unwrap();
        if times.is_empty() {
            return HandlingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        HandlingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_received.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let received = self.requests_received.load(Ordering::Relaxed);
        let succeeded = self.predictions_succeeded.load(Ordering::Relaxed);
        let failed = self.predictions_failed.load(Ordering::Relaxed);
        let rejected = self.validation_rejections.load(Ordering::Relaxed);
        let stats = self.get_handling_stats();

        info!(
            requests = received,
            succeeded = succeeded,
            failed = failed,
            rejected = rejected,
            throughput = format!("{:.1} req/s", self.get_throughput()),
            "Service metrics summary"
        );
        info!(
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p95_us = stats.p95_us,
            p99_us = stats.p99_us,
            max_us = stats.max_us,
            "Handling time (μs)"
        );
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Handling time statistics
#[derive(Debug, Default)]
pub struct HandlingStats {
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

        metrics.record_request(Duration::from_micros(100));
        metrics.record_request(Duration::from_micros(200));
        metrics.record_success();
        metrics.record_failure();

        assert_eq!(metrics.requests_received.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.predictions_succeeded.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.predictions_failed.load(Ordering::Relaxed), 1);

        let stats = metrics.get_handling_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 150);
    }

    #[test]
    fn test_empty_stats() {
        let metrics = ServiceMetrics::new();
        let stats = metrics.get_handling_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.p99_us, 0);
    }
}
