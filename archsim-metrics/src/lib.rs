//! Metrics collection and observability for architecture simulations
//!
//! This crate sits next to the engine: it captures the counters and gauges
//! the engine emits through the `metrics` facade, folds finished results
//! into high-resolution latency histograms, and exports result documents
//! to JSON or CSV for analysis.

pub mod collector;
pub mod error;
pub mod export;
pub mod recorder;

pub use collector::{HistogramStats, LatencyStats, SimulationMetrics};
pub use error::MetricsError;
pub use export::{export_csv, export_json, CsvExporter, JsonExporter, ResultExporter};
pub use recorder::{with_simulation_metrics_recorder, SimulationRecorder};
