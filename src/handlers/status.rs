//! `/health` and `/status`
//!
//! `/status` reports uptime, how many extractions succeeded or failed, and
//! the latency distribution of extractions served over HTTP:
//!
//! ```json
//! {
//!   "service": { "name": "linkedin-post-extractor", "version": "0.1.0" },
//!   "uptime_seconds": 3600,
//!   "extractions": { "succeeded": 39, "failed": 3 },
//!   "latency": {
//!     "samples": 42,
//!     "mean_ms": 1400.2,
//!     "p50_ms": 850.0,
//!     "p90_ms": 4100.0,
//!     "p99_ms": 9100.0,
//!     "max_ms": 9300.0
//!   },
//!   "timestamp": "2026-01-01T12:00:00+00:00"
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Slowest extraction the histogram distinguishes; slower ones saturate
const MAX_TRACKED_MS: u64 = 10 * 60 * 1000;

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" whenever the server answers
    pub status: String,
    /// Package name
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: crate::NAME.to_string(),
        }
    }
}

/// Body of `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Package name and version
    pub service: ServiceInfo,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    /// Outcome counters
    pub extractions: ExtractionCounts,
    /// Extraction latency distribution
    pub latency: LatencySummary,
    /// RFC 3339 time the snapshot was taken
    pub timestamp: String,
}

/// Package identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Package name
    pub name: String,
    /// Package version
    pub version: String,
}

/// Extraction outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionCounts {
    /// Results with `success == true`
    pub succeeded: u64,
    /// Results with `success == false`, invalid URLs included
    pub failed: u64,
}

/// Latency percentiles in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Number of recorded extractions
    pub samples: u64,
    /// Arithmetic mean
    pub mean_ms: f64,
    /// Median
    pub p50_ms: f64,
    /// 90th percentile
    pub p90_ms: f64,
    /// 99th percentile
    pub p99_ms: f64,
    /// Slowest recorded extraction
    pub max_ms: f64,
}

/// Millisecond-resolution extraction latency histogram
#[derive(Debug)]
pub struct LatencyHistogram {
    inner: Mutex<Histogram<u64>>,
}

impl LatencyHistogram {
    /// Empty histogram covering 1 ms to ten minutes
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, MAX_TRACKED_MS, 3)
            .expect("constant histogram bounds are valid");
        Self {
            inner: Mutex::new(histogram),
        }
    }

    /// Record one extraction; sub-millisecond runs count as 1 ms
    pub fn record(&self, elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX).max(1);
        self.inner.lock().saturating_record(ms);
    }

    /// Number of samples recorded
    pub fn count(&self) -> u64 {
        self.inner.lock().len()
    }

    /// Snapshot of the distribution
    pub fn summary(&self) -> LatencySummary {
        let hist = self.inner.lock();
        if hist.is_empty() {
            return LatencySummary::default();
        }

        LatencySummary {
            samples: hist.len(),
            mean_ms: hist.mean(),
            p50_ms: hist.value_at_quantile(0.50) as f64,
            p90_ms: hist.value_at_quantile(0.90) as f64,
            p99_ms: hist.value_at_quantile(0.99) as f64,
            max_ms: hist.max() as f64,
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters behind `/status`, fed by every extraction the HTTP transport runs
#[derive(Debug)]
pub struct ServerMetrics {
    started: Instant,
    succeeded: AtomicU64,
    failed: AtomicU64,
    latency: LatencyHistogram,
}

impl ServerMetrics {
    /// Start counting from now
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            latency: LatencyHistogram::new(),
        }
    }

    /// Record one finished extraction
    pub fn record_extraction(&self, elapsed: Duration, success: bool) {
        self.latency.record(elapsed);
        let counter = if success { &self.succeeded } else { &self.failed };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Outcome counters so far
    pub fn counts(&self) -> ExtractionCounts {
        ExtractionCounts {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Seconds since [`ServerMetrics::new`]
    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Full `/status` snapshot
    pub fn snapshot(&self) -> StatusResponse {
        StatusResponse {
            service: ServiceInfo {
                name: crate::NAME.to_string(),
                version: crate::VERSION.to_string(),
            },
            uptime_seconds: self.uptime_seconds(),
            extractions: self.counts(),
            latency: self.latency.summary(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// `GET /health`
#[instrument(skip_all)]
pub async fn health_handler() -> Json<HealthResponse> {
    debug!("Health check");
    Json(HealthResponse::default())
}

/// `GET /status`
#[instrument(skip_all)]
pub async fn status_handler(State(metrics): State<Arc<ServerMetrics>>) -> Json<StatusResponse> {
    debug!("Status snapshot");
    Json(metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_health_body() {
        let value = serde_json::to_value(HealthResponse::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "healthy", "service": "linkedin-post-extractor"})
        );
    }

    #[test]
    fn test_counts_split_by_outcome() {
        let metrics = ServerMetrics::new();
        metrics.record_extraction(Duration::from_millis(800), true);
        metrics.record_extraction(Duration::from_millis(40), false);
        metrics.record_extraction(Duration::from_secs(9), true);

        assert_eq!(
            metrics.counts(),
            ExtractionCounts {
                succeeded: 2,
                failed: 1
            }
        );

        let latency = metrics.snapshot().latency;
        assert_eq!(latency.samples, 3);
        assert!(latency.p50_ms >= 40.0);
        assert!(latency.p99_ms >= latency.p50_ms);
        assert!(latency.max_ms >= 9000.0);
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        assert_eq!(LatencyHistogram::new().summary(), LatencySummary::default());
    }

    #[test]
    fn test_out_of_range_latency_saturates() {
        let histogram = LatencyHistogram::new();
        histogram.record(Duration::from_secs(3600));
        histogram.record(Duration::ZERO);
        assert_eq!(histogram.count(), 2);
        assert!(histogram.summary().max_ms <= (MAX_TRACKED_MS as f64) * 1.001);
    }

    #[test]
    fn test_concurrent_recording() {
        use std::thread;

        let metrics = Arc::new(ServerMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..500 {
                        metrics.record_extraction(Duration::from_millis(5), i % 2 == 0);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.counts().succeeded, 2000);
        assert_eq!(metrics.counts().failed, 2000);
        assert_eq!(metrics.snapshot().latency.samples, 4000);
    }

    #[tokio::test]
    async fn test_status_handler_reports_service() {
        let metrics = Arc::new(ServerMetrics::new());
        metrics.record_extraction(Duration::from_millis(5), true);

        let Json(status) = status_handler(State(metrics)).await;
        assert_eq!(status.service.name, crate::NAME);
        assert_eq!(status.extractions.succeeded, 1);
        assert_eq!(status.latency.samples, 1);
    }
}
