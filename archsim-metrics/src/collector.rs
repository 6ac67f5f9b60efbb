//! In-memory metrics collection for simulation runs
//!
//! Stores counters, gauges and histograms keyed by name and labels, plus
//! high-resolution latency histograms for percentile analysis. Values can
//! come from the engine directly (via [`crate::recorder`]) or from a
//! finished [`SimulationOutput`].

use archsim_core::SimulationOutput;
use hdrhistogram::Histogram as HdrHistogram;
use std::collections::{BTreeMap, HashMap};

/// Key identifying a metric with its labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MetricKey {
    name: String,
    labels: BTreeMap<String, String>,
}

impl MetricKey {
    fn new(name: &str, labels: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn from_owned(name: &str, labels: &[(String, String)]) -> Self {
        Self {
            name: name.to_string(),
            labels: labels.iter().cloned().collect(),
        }
    }
}

/// Summary statistics for a histogram metric.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramStats {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p95: f64,
    pub p99: f64,
}

impl HistogramStats {
    fn from_values(mut values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                sum: 0.0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                median: 0.0,
                p95: 0.0,
                p99: 0.0,
            };
        }

        values.sort_by(f64::total_cmp);
        let count = values.len();
        let sum: f64 = values.iter().sum();

        let percentile = |p: f64| -> f64 {
            let index = ((count as f64 - 1.0) * p).round() as usize;
            values[index.min(count - 1)]
        };

        Self {
            count,
            sum,
            min: values[0],
            max: values[count - 1],
            mean: sum / count as f64,
            median: percentile(0.5),
            p95: percentile(0.95),
            p99: percentile(0.99),
        }
    }
}

/// High-resolution latency statistics, in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub p999_ms: f64,
}

/// Metrics collector for simulation observability.
#[derive(Debug, Default)]
pub struct SimulationMetrics {
    counters: HashMap<MetricKey, u64>,
    gauges: HashMap<MetricKey, f64>,
    histograms: HashMap<MetricKey, Vec<f64>>,
    latency_histograms: HashMap<String, HdrHistogram<u64>>,
}

impl SimulationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_counter_by(&mut self, name: &str, value: u64, labels: &[(&str, &str)]) {
        *self.counters.entry(MetricKey::new(name, labels)).or_insert(0) += value;
    }

    pub fn record_gauge(&mut self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.gauges.insert(MetricKey::new(name, labels), value);
    }

    pub fn record_histogram(&mut self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.histograms
            .entry(MetricKey::new(name, labels))
            .or_default()
            .push(value);
    }

    /// Record a latency sample into a high-resolution histogram. Values are
    /// stored at microsecond resolution from 1µs to 60s.
    pub fn record_latency_ms(&mut self, name: &str, latency_ms: f64) {
        let histogram = self.latency_histograms.entry(name.to_string()).or_insert_with(|| {
            HdrHistogram::new_with_bounds(1, 60_000_000, 3)
                .expect("static histogram bounds are valid")
        });

        let micros = (latency_ms * 1000.0).max(0.0) as u64;
        if let Err(e) = histogram.record(micros.max(1)) {
            tracing::warn!("failed to record latency sample: {}", e);
        }
    }

    // Owned-label variants used by the recorder, which receives owned keys
    // from the `metrics` facade.

    pub fn increment_counter_by_owned(&mut self, name: &str, value: u64, labels: &[(String, String)]) {
        *self
            .counters
            .entry(MetricKey::from_owned(name, labels))
            .or_insert(0) += value;
    }

    pub fn set_counter_absolute_owned(&mut self, name: &str, value: u64, labels: &[(String, String)]) {
        self.counters.insert(MetricKey::from_owned(name, labels), value);
    }

    pub fn record_gauge_owned(&mut self, name: &str, value: f64, labels: &[(String, String)]) {
        self.gauges.insert(MetricKey::from_owned(name, labels), value);
    }

    pub fn increment_gauge_owned(&mut self, name: &str, delta: f64, labels: &[(String, String)]) {
        *self
            .gauges
            .entry(MetricKey::from_owned(name, labels))
            .or_insert(0.0) += delta;
    }

    pub fn record_histogram_owned(&mut self, name: &str, value: f64, labels: &[(String, String)]) {
        self.histograms
            .entry(MetricKey::from_owned(name, labels))
            .or_default()
            .push(value);
    }

    pub fn get_counter(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64> {
        self.counters.get(&MetricKey::new(name, labels)).copied()
    }

    pub fn get_gauge(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        self.gauges.get(&MetricKey::new(name, labels)).copied()
    }

    pub fn get_histogram_stats(&self, name: &str, labels: &[(&str, &str)]) -> Option<HistogramStats> {
        self.histograms
            .get(&MetricKey::new(name, labels))
            .map(|values| HistogramStats::from_values(values.clone()))
    }

    /// High-resolution latency statistics for a named latency series.
    pub fn latency_stats(&self, name: &str) -> Option<LatencyStats> {
        self.latency_histograms.get(name).map(|hist| LatencyStats {
            count: hist.len(),
            min_ms: hist.min() as f64 / 1000.0,
            max_ms: hist.max() as f64 / 1000.0,
            mean_ms: hist.mean() / 1000.0,
            p50_ms: hist.value_at_quantile(0.5) as f64 / 1000.0,
            p95_ms: hist.value_at_quantile(0.95) as f64 / 1000.0,
            p99_ms: hist.value_at_quantile(0.99) as f64 / 1000.0,
            p999_ms: hist.value_at_quantile(0.999) as f64 / 1000.0,
        })
    }

    /// Fold a finished run into the collector: request counters, throughput
    /// and error-rate gauges, and every node latency sample from the time
    /// series into the `node_latency` histogram.
    pub fn record_run(&mut self, output: &SimulationOutput) {
        let metrics = &output.metrics;
        self.increment_counter_by("sim_requests_total", metrics.total_requests, &[]);
        self.increment_counter_by("sim_requests_failed", metrics.failed_requests, &[]);
        self.record_gauge("sim_throughput_rps", metrics.throughput, &[]);
        self.record_gauge("sim_error_rate", metrics.error_rate, &[]);
        self.record_gauge("sim_cache_hit_rate", metrics.cache_hit_rate, &[]);

        for point in &output.time_series {
            self.record_histogram("sim_tick_p95_ms", point.latency.p95, &[]);
            for node in point.node_metrics.values() {
                if node.latency_ms > 0.0 {
                    self.record_latency_ms("node_latency", node.latency_ms);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.counters.clear();
        self.gauges.clear();
        self.histograms.clear();
        self.latency_histograms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_gauges_and_histograms_round_trip() {
        let mut metrics = SimulationMetrics::new();

        metrics.increment_counter_by("requests", 3, &[("node", "api")]);
        metrics.increment_counter_by("requests", 2, &[("node", "api")]);
        metrics.record_gauge("depth", 7.0, &[]);
        metrics.record_histogram("latency", 12.5, &[]);
        metrics.record_histogram("latency", 37.5, &[]);

        assert_eq!(metrics.get_counter("requests", &[("node", "api")]), Some(5));
        assert_eq!(metrics.get_counter("requests", &[]), None);
        assert_eq!(metrics.get_gauge("depth", &[]), Some(7.0));

        let stats = metrics.get_histogram_stats("latency", &[]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 25.0);
        assert_eq!(stats.min, 12.5);
        assert_eq!(stats.max, 37.5);
    }

    #[test]
    fn latency_percentiles_are_ordered() {
        let mut metrics = SimulationMetrics::new();
        for i in 1..=1000 {
            metrics.record_latency_ms("latency", i as f64);
        }

        let stats = metrics.latency_stats("latency").unwrap();
        assert_eq!(stats.count, 1000);
        assert!(stats.p50_ms <= stats.p95_ms);
        assert!(stats.p95_ms <= stats.p99_ms);
        assert!(stats.p99_ms <= stats.p999_ms);
        assert!(stats.p999_ms <= stats.max_ms);
        // p50 of 1..=1000 ms lands near 500ms
        assert!((stats.p50_ms - 500.0).abs() < 5.0);
    }

    #[test]
    fn empty_histogram_stats_are_zero() {
        let stats = HistogramStats::from_values(vec![]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.p99, 0.0);
        assert_eq!(SimulationMetrics::new().latency_stats("nope"), None);
    }
}
