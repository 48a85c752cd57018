//! Request metrics and statistics tracking for the prediction service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the prediction endpoints
pub struct ServiceMetrics {
    /// Total prediction requests handled (success or failure)
    pub requests_handled: AtomicU64,
    /// Successful predictions by label ("Phishing", "Fraudulent", ...)
    predictions_by_label: RwLock<HashMap<String, u64>>,
    /// Failures by error kind ("invalid_input", "model_unavailable", "internal")
    errors_by_kind: RwLock<HashMap<String, u64>>,
    /// Request handling times (in microseconds)
    request_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_handled: AtomicU64::new(0),
            predictions_by_label: RwLock::new(HashMap::new()),
            errors_by_kind: RwLock::new(HashMap::new()),
            request_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a handled prediction request
    pub fn record_request(&self, handling_time: Duration) {
        self.requests_handled.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.request_times.write() {
            times.push(handling_time.as_micros() as u64);
            // Keep only recent samples for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Record a successful prediction label
    pub fn record_prediction(&self, label: &str) {
        if let Ok(mut by_label) = self.predictions_by_label.write() {
            *by_label.entry(label.to_string()).or_insert(0) += 1;
        }
    }

    /// Record a failed prediction by error kind
    pub fn record_error(&self, kind: &str) {
        if let Ok(mut by_kind) = self.errors_by_kind.write() {
            *by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    /// Get request handling time statistics
    pub fn get_handling_stats(&self) -> HandlingStats {
        let times = self.request_times.read().unwrap();
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
            self.requests_handled.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get prediction counts by label
    pub fn get_predictions_by_label(&self) -> HashMap<String, u64> {
        self.predictions_by_label.read().unwrap().clone()
    }

    /// Get error counts by kind
    pub fn get_errors_by_kind(&self) -> HashMap<String, u64> {
        self.errors_by_kind.read().unwrap().clone()
    }

    /// Log summary statistics
    pub fn log_summary(&self) {
        let requests = self.requests_handled.load(Ordering::Relaxed);
        let stats = self.get_handling_stats();
        let throughput = self.get_throughput();

        info!(
            requests = requests,
            throughput = format!("{:.1} req/s", throughput),
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p95_us = stats.p95_us,
            p99_us = stats.p99_us,
            "Service metrics summary"
        );

        for (label, count) in self.get_predictions_by_label() {
            info!(label = %label, count = count, "Predictions by label");
        }
        for (kind, count) in self.get_errors_by_kind() {
            info!(kind = %kind, count = count, "Errors by kind");
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Request handling time statistics
#[derive(Debug, Default)]
pub struct HandlingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodic metrics reporter task
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

    /// Start the periodic reporting loop
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // Skip the immediate first tick
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.log_summary();
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
        metrics.record_prediction("Phishing");
        metrics.record_prediction("Phishing");
        metrics.record_error("invalid_input");

        assert_eq!(metrics.requests_handled.load(Ordering::Relaxed), 2);
        assert_eq!(
            metrics.get_predictions_by_label().get("Phishing"),
            Some(&2)
        );
        assert_eq!(metrics.get_errors_by_kind().get("invalid_input"), Some(&1));
    }

    #[test]
    fn test_handling_stats() {
        let metrics = ServiceMetrics::new();
        for us in [100, 200, 300, 400] {
            metrics.record_request(Duration::from_micros(us));
        }

        let stats = metrics.get_handling_stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean_us, 250);
        assert_eq!(stats.max_us, 400);
    }

    #[test]
    fn test_empty_stats() {
        let metrics = ServiceMetrics::new();
        let stats = metrics.get_handling_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_us, 0);
    }
}
