//! Discrete-event simulation engine for cloud architecture graphs.
//!
//! The engine takes a user-drawn architecture (a directed graph of typed
//! infrastructure components) plus a synthetic workload description, and
//! produces time-series metrics, aggregate SLA statistics, bottleneck
//! diagnoses and cost estimates. No real traffic is generated and nothing
//! is invoked: each tick models one second, traffic is propagated across
//! the graph with fan-out splitting and fan-in aggregation, and every node
//! is pushed through a per-type resource model.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use archsim_core::{Engine, SimulationInput};
//!
//! let input: SimulationInput = serde_json::from_str("...").unwrap();
//! let mut engine = Engine::new(input);
//! let output = engine.run().unwrap();
//! println!("p95 = {}ms", output.metrics.latency.p95);
//! ```
//!
//! A run is single-threaded and, given a `workload.seed`, deterministic.
//! Independent runs can execute in parallel; the only shared state are the
//! read-only hardware and pricing catalogs.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod dynamics;
pub mod engine;
pub mod error;
pub mod failures;
pub mod graph;
pub mod logging;
pub mod regions;
pub mod resources;
pub mod router;
pub mod state;
pub mod types;
pub mod workload;

pub use cost::{CostBreakdown, CostEstimate};
pub use engine::Engine;
pub use error::SimError;
pub use logging::{init_simulation_logging, init_simulation_logging_with_level};
pub use resources::{ResourceDimension, ResourceUsage};
pub use types::{
    AggregateMetrics, Bottleneck, FailureInjection, FailureKind, LatencyMetrics, NodeMetrics,
    NodeStatus, Severity, SimEdge, SimNode, SimNodeData, SimulationInput, SimulationOutput,
    SlaConfig, SlaStatus, TimeSeriesPoint, WorkloadConfig,
};
pub use workload::WorkloadMode;
