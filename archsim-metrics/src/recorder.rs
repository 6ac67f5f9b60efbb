//! A `metrics::Recorder` backed by [`SimulationMetrics`]
//!
//! Lets the engine (and anything else in-process) emit standard `metrics`
//! counters/gauges/histograms and have them collected into an in-memory
//! [`SimulationMetrics`] instance. Prefer a local recorder over a global
//! one so parallel runs don't share state:
//!
//! ```rust,no_run
//! # use std::sync::{Arc, Mutex};
//! # use archsim_metrics::{SimulationMetrics, with_simulation_metrics_recorder};
//! let collected = Arc::new(Mutex::new(SimulationMetrics::new()));
//! with_simulation_metrics_recorder(&collected, || {
//!     metrics::counter!("sim_requests_total").increment(1);
//! });
//! ```

use crate::collector::SimulationMetrics;
use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SimulationRecorder {
    metrics: Arc<Mutex<SimulationMetrics>>,
}

impl SimulationRecorder {
    pub fn new(metrics: Arc<Mutex<SimulationMetrics>>) -> Self {
        Self { metrics }
    }
}

/// Run `f` with a local recorder capturing all `metrics` macros into
/// `metrics`.
pub fn with_simulation_metrics_recorder<T>(
    metrics: &Arc<Mutex<SimulationMetrics>>,
    f: impl FnOnce() -> T,
) -> T {
    let recorder = SimulationRecorder::new(metrics.clone());
    metrics::with_local_recorder(&recorder, f)
}

struct CounterHandle {
    metrics: Arc<Mutex<SimulationMetrics>>,
    name: String,
    labels: Vec<(String, String)>,
}

impl metrics::CounterFn for CounterHandle {
    fn increment(&self, value: u64) {
        let mut m = self.metrics.lock().expect("SimulationMetrics mutex poisoned");
        m.increment_counter_by_owned(&self.name, value, &self.labels);
    }

    fn absolute(&self, value: u64) {
        let mut m = self.metrics.lock().expect("SimulationMetrics mutex poisoned");
        m.set_counter_absolute_owned(&self.name, value, &self.labels);
    }
}

struct GaugeHandle {
    metrics: Arc<Mutex<SimulationMetrics>>,
    name: String,
    labels: Vec<(String, String)>,
}

impl metrics::GaugeFn for GaugeHandle {
    fn increment(&self, value: f64) {
        let mut m = self.metrics.lock().expect("SimulationMetrics mutex poisoned");
        m.increment_gauge_owned(&self.name, value, &self.labels);
    }

    fn decrement(&self, value: f64) {
        let mut m = self.metrics.lock().expect("SimulationMetrics mutex poisoned");
        m.increment_gauge_owned(&self.name, -value, &self.labels);
    }

    fn set(&self, value: f64) {
        let mut m = self.metrics.lock().expect("SimulationMetrics mutex poisoned");
        m.record_gauge_owned(&self.name, value, &self.labels);
    }
}

struct HistogramHandle {
    metrics: Arc<Mutex<SimulationMetrics>>,
    name: String,
    labels: Vec<(String, String)>,
}

impl metrics::HistogramFn for HistogramHandle {
    fn record(&self, value: f64) {
        let mut m = self.metrics.lock().expect("SimulationMetrics mutex poisoned");
        m.record_histogram_owned(&self.name, value, &self.labels);
    }
}

fn key_to_owned_parts(key: &Key) -> (String, Vec<(String, String)>) {
    let name = key.name().to_string();
    let labels = key
        .labels()
        .map(|l| (l.key().to_string(), l.value().to_string()))
        .collect::<Vec<_>>();
    (name, labels)
}

impl Recorder for SimulationRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        let (name, labels) = key_to_owned_parts(key);
        Counter::from_arc(Arc::new(CounterHandle {
            metrics: self.metrics.clone(),
            name,
            labels,
        }))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        let (name, labels) = key_to_owned_parts(key);
        Gauge::from_arc(Arc::new(GaugeHandle {
            metrics: self.metrics.clone(),
            name,
            labels,
        }))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        let (name, labels) = key_to_owned_parts(key);
        Histogram::from_arc(Arc::new(HistogramHandle {
            metrics: self.metrics.clone(),
            name,
            labels,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_captures_metrics_macros() {
        let collected = Arc::new(Mutex::new(SimulationMetrics::new()));

        with_simulation_metrics_recorder(&collected, || {
            metrics::counter!("sim_requests_total", "run" => "demo").increment(2);
            metrics::gauge!("sim_tick_rps", "run" => "demo").set(1500.0);
            metrics::histogram!("node_latency_ms", "run" => "demo").record(12.5);
        });

        let locked = collected.lock().unwrap();
        assert_eq!(
            locked.get_counter("sim_requests_total", &[("run", "demo")]),
            Some(2)
        );
        assert_eq!(
            locked.get_gauge("sim_tick_rps", &[("run", "demo")]),
            Some(1500.0)
        );
        let hist = locked
            .get_histogram_stats("node_latency_ms", &[("run", "demo")])
            .unwrap();
        assert_eq!(hist.count, 1);
    }

    #[test]
    fn engine_emissions_are_captured_during_a_run() {
        use archsim_core::{Engine, SimulationInput};

        let raw = serde_json::json!({
            "nodes": [
                {"id": "c", "type": "client", "data": {"label": "C", "nodeType": "client", "config": {}}},
                {"id": "a", "type": "api_server", "data": {"label": "A", "nodeType": "api_server",
                    "config": {"capacityRPS": 2000, "latencyMS": 20}}}
            ],
            "edges": [{"id": "e", "source": "c", "target": "a"}],
            "workload": {"rps": 1000, "durationSeconds": 5, "mode": "constant", "seed": 7}
        });
        let input: SimulationInput = serde_json::from_value(raw).unwrap();

        let collected = Arc::new(Mutex::new(SimulationMetrics::new()));
        let output = with_simulation_metrics_recorder(&collected, || {
            Engine::new(input).run().unwrap()
        });

        let locked = collected.lock().unwrap();
        assert_eq!(
            locked.get_counter("archsim_requests_total", &[]),
            Some(output.metrics.total_requests)
        );
        assert_eq!(locked.get_counter("archsim_requests_failed", &[]), Some(0));
        assert_eq!(locked.get_gauge("archsim_tick_rps", &[]), Some(1000.0));
    }
}
