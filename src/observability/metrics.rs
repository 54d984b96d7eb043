//! Metrics collection and reporting

use crate::embedding::ContentType;
use crate::error::EmbeddingError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot of embedding metrics
#[derive(Debug, Clone)]
pub struct EmbeddingMetrics {
    /// Total embedding calls
    pub total_requests: u64,

    /// Total failed calls
    pub total_errors: u64,

    /// Calls per content type
    pub requests_by_type: Vec<(ContentType, u64)>,

    /// Calls rejected before a content type was resolved
    pub rejected_requests: u64,

    /// Failures per error kind
    pub errors_by_kind: Vec<(&'static str, u64)>,

    /// Average call latency (ms)
    pub avg_latency_ms: f64,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Latency histogram buckets (in milliseconds)
const LATENCY_BUCKETS: &[f64] = &[
    5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
];

const ERROR_KINDS: [&str; 6] = [
    "unsupported_content_type",
    "malformed_input",
    "encoding_failure",
    "provider_failure",
    "decode_failure",
    "cancelled",
];

/// Histogram for tracking latency distribution
#[derive(Debug, Clone)]
pub struct Histogram {
    buckets: Vec<(f64, Arc<AtomicU64>)>,
    sum: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
}

impl Histogram {
    fn new(buckets: &[f64]) -> Self {
        let bucket_counters = buckets
            .iter()
            .map(|&b| (b, Arc::new(AtomicU64::new(0))))
            .collect();

        Self {
            buckets: bucket_counters,
            sum: Arc::new(AtomicU64::new(0)),
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    fn observe(&self, value: f64) {
        self.sum.fetch_add(value as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        // Cumulative buckets
        for (bucket, counter) in &self.buckets {
            if value <= *bucket {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn export_prometheus(&self, name: &str, help: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("# HELP {} {}\n", name, help));
        output.push_str(&format!("# TYPE {} histogram\n", name));

        for (bucket, counter) in &self.buckets {
            let count = counter.load(Ordering::Relaxed);
            output.push_str(&format!("{}_bucket{{le=\"{}\"}} {}\n", name, bucket, count));
        }

        let total_count = self.count.load(Ordering::Relaxed);
        output.push_str(&format!("{}_bucket{{le=\"+Inf\"}} {}\n", name, total_count));

        let sum = self.sum.load(Ordering::Relaxed) as f64;
        output.push_str(&format!("{}_sum {:.3}\n", name, sum));
        output.push_str(&format!("{}_count {}\n", name, total_count));

        output
    }
}

/// Metrics collector for embedding calls
pub struct MetricsCollector {
    start_time: Instant,
    requests_by_type: [AtomicU64; 3],
    rejected_requests: AtomicU64,
    errors_by_kind: [AtomicU64; 6],
    total_latency_ms: AtomicU64,
    embedding_latency: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            requests_by_type: Default::default(),
            rejected_requests: AtomicU64::new(0),
            errors_by_kind: Default::default(),
            total_latency_ms: AtomicU64::new(0),
            embedding_latency: Histogram::new(LATENCY_BUCKETS),
        }
    }

    fn type_slot(content_type: ContentType) -> usize {
        match content_type {
            ContentType::Text => 0,
            ContentType::Image => 1,
            ContentType::MultiImages => 2,
        }
    }

    /// Record an embedding call for a content type
    pub fn record_request(&self, content_type: ContentType) {
        self.requests_by_type[Self::type_slot(content_type)].fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call rejected before dispatch; counts as a request and a failure
    pub fn record_rejected(&self, error: &EmbeddingError) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
        self.record_error(error);
    }

    /// Record embedding call latency
    pub fn record_embedding_latency(&self, duration: Duration) {
        let ms = duration.as_millis() as u64;
        self.total_latency_ms.fetch_add(ms, Ordering::Relaxed);
        self.embedding_latency.observe(ms as f64);
    }

    /// Record a failed call
    pub fn record_error(&self, error: &EmbeddingError) {
        if let Some(slot) = ERROR_KINDS.iter().position(|kind| *kind == error.kind()) {
            self.errors_by_kind[slot].fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics
    pub fn get_metrics(&self) -> EmbeddingMetrics {
        let requests_by_type: Vec<(ContentType, u64)> = ContentType::ALL
            .iter()
            .map(|ty| (*ty, self.requests_by_type[Self::type_slot(*ty)].load(Ordering::Relaxed)))
            .collect();
        let errors_by_kind: Vec<(&'static str, u64)> = ERROR_KINDS
            .iter()
            .zip(&self.errors_by_kind)
            .map(|(kind, counter)| (*kind, counter.load(Ordering::Relaxed)))
            .collect();

        let rejected_requests = self.rejected_requests.load(Ordering::Relaxed);
        let total_requests =
            requests_by_type.iter().map(|(_, n)| n).sum::<u64>() + rejected_requests;
        let total_errors = errors_by_kind.iter().map(|(_, n)| n).sum::<u64>();
        let observed = self.embedding_latency.count.load(Ordering::Relaxed);

        let avg_latency_ms = if observed > 0 {
            self.total_latency_ms.load(Ordering::Relaxed) as f64 / observed as f64
        } else {
            0.0
        };

        EmbeddingMetrics {
            total_requests,
            total_errors,
            requests_by_type,
            rejected_requests,
            errors_by_kind,
            avg_latency_ms,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let metrics = self.get_metrics();
        let mut output = String::new();

        output.push_str("# HELP embedding_requests_total Embedding calls by content type\n");
        output.push_str("# TYPE embedding_requests_total counter\n");
        for (content_type, count) in &metrics.requests_by_type {
            output.push_str(&format!(
                "embedding_requests_total{{content_type=\"{}\"}} {}\n",
                content_type, count
            ));
        }
        output.push_str(&format!(
            "embedding_requests_total{{content_type=\"rejected\"}} {}\n",
            metrics.rejected_requests
        ));

        output.push_str("# HELP embedding_errors_total Failed embedding calls by error kind\n");
        output.push_str("# TYPE embedding_errors_total counter\n");
        for (kind, count) in &metrics.errors_by_kind {
            output.push_str(&format!("embedding_errors_total{{kind=\"{}\"}} {}\n", kind, count));
        }

        output.push_str(&self.embedding_latency.export_prometheus(
            "embedding_latency_ms",
            "Embedding call latency in milliseconds",
        ));

        output.push_str("# HELP uptime_seconds Process uptime\n");
        output.push_str("# TYPE uptime_seconds gauge\n");
        output.push_str(&format!("uptime_seconds {}\n", metrics.uptime_secs));

        output
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
