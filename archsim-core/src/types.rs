//! The frozen JSON contract: simulation input and output documents
//!
//! Field names follow the camelCase wire format the web layer already speaks.
//! `SimulationInput` is what the caller sends; `SimulationOutput` is the full
//! result document assembled at the end of a run.

use crate::config::ConfigMap;
use crate::error::SimError;
use crate::resources::ResourceDimension;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read/write distribution of the workload, in integer percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadWriteRatio {
    pub read: i64,
    pub write: i64,
}

/// A fault to inject over a tick window. A `startTick`/`endTick` of 0 leaves
/// that side of the window unbounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureInjection {
    #[serde(rename = "type")]
    pub kind: FailureKind,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub delay_ms: i64,
    #[serde(default)]
    pub start_tick: u64,
    #[serde(default)]
    pub end_tick: u64,
}

/// Recognized failure injection types. Unknown strings deserialize to
/// [`FailureKind::Unknown`] and are ignored by the injector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    #[serde(rename = "nodeFail")]
    NodeFail,
    #[serde(rename = "regionFail")]
    RegionFail,
    #[serde(rename = "cacheFail")]
    CacheFail,
    #[serde(rename = "dbFail")]
    DbFail,
    #[serde(rename = "networkDelay")]
    NetworkDelay,
    #[serde(other)]
    Unknown,
}

impl FailureKind {
    /// The wire string, as recorded in `failuresActive`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NodeFail => "nodeFail",
            FailureKind::RegionFail => "regionFail",
            FailureKind::CacheFail => "cacheFail",
            FailureKind::DbFail => "dbFail",
            FailureKind::NetworkDelay => "networkDelay",
            FailureKind::Unknown => "unknown",
        }
    }
}

/// The synthetic workload description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadConfig {
    pub rps: i64,
    #[serde(default)]
    pub read_write_ratio: ReadWriteRatio,
    /// One of `constant`, `burst`, `spike`; anything else behaves as constant.
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub duration_seconds: i64,
    #[serde(default)]
    pub failures: Vec<FailureInjection>,
    /// Optional RNG seed. Runs with the same input and seed are identical.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// A node of the drawn architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub data: SimNodeData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimNodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub node_type: String,
    #[serde(default)]
    pub config: ConfigMap,
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// SLA targets to evaluate the run against. A target of 0 is not checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaConfig {
    #[serde(default)]
    pub p95_latency_ms: f64,
    #[serde(default)]
    pub p99_latency_ms: f64,
    #[serde(default)]
    pub error_rate_percent: f64,
    #[serde(default)]
    pub availability_percent: f64,
    #[serde(default, rename = "minThroughputRPS")]
    pub min_throughput_rps: f64,
}

/// The complete simulation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub nodes: Vec<SimNode>,
    #[serde(default)]
    pub edges: Vec<SimEdge>,
    pub workload: WorkloadConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_config: Option<SlaConfig>,
}

impl SimulationInput {
    /// Apply the documented input defaults in place: a non-positive duration
    /// becomes 30 seconds, an empty mode becomes constant, a fully-zero
    /// read/write ratio becomes 80/20, and nodes missing `data.nodeType`
    /// inherit their outer type tag.
    pub fn normalize(&mut self) {
        if self.workload.duration_seconds <= 0 {
            self.workload.duration_seconds = 30;
        }
        if self.workload.mode.is_empty() {
            self.workload.mode = "constant".to_string();
        }
        if self.workload.read_write_ratio.read == 0 && self.workload.read_write_ratio.write == 0 {
            self.workload.read_write_ratio = ReadWriteRatio { read: 80, write: 20 };
        }
        for node in &mut self.nodes {
            if node.data.node_type.is_empty() {
                node.data.node_type = node.kind.clone();
            }
        }
    }

    /// Shape validation. A run never starts on an input that fails here.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.nodes.is_empty() {
            return Err(SimError::InvalidInput("no nodes provided".to_string()));
        }
        if self.workload.rps <= 0 {
            return Err(SimError::InvalidInput(
                "workload RPS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Latency percentiles in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyMetrics {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub avg: f64,
    pub max: f64,
}

/// Aggregate metrics over the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub latency: LatencyMetrics,
    pub throughput: f64,
    pub error_rate: f64,
    pub cache_hit_rate: f64,
    pub queue_depth: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub autoscaling_events: Vec<AutoscalingEvent>,
}

/// Per-node snapshot included in each time-series point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    pub node_id: String,
    #[serde(rename = "rpsIn")]
    pub rps_in: f64,
    #[serde(rename = "rpsOut")]
    pub rps_out: f64,
    pub latency_ms: f64,
    #[serde(rename = "cpuPercent")]
    pub cpu_percent: f64,
    pub mem_percent: f64,
    #[serde(rename = "diskIOPercent")]
    pub disk_io_percent: f64,
    pub network_percent: f64,
    pub errors: u64,
    pub queue_depth: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_hit_rate: Option<f64>,
    pub status: NodeStatus,
    pub success_rate: f64,
    pub replicas: u32,
    pub bottleneck: ResourceDimension,
}

/// Health classification of a node at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Normal,
    Warning,
    Danger,
    Failed,
}

/// SLA status reported per tick and for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlaStatus {
    Good,
    Warning,
    Fail,
}

impl SlaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlaStatus::Good => "GOOD",
            SlaStatus::Warning => "WARNING",
            SlaStatus::Fail => "FAIL",
        }
    }
}

/// Metrics captured at one simulation tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub tick: u64,
    #[serde(rename = "incomingRPS")]
    pub incoming_rps: f64,
    #[serde(rename = "throughputRPS")]
    pub throughput_rps: f64,
    #[serde(rename = "totalRPS")]
    pub total_rps: f64,
    pub latency: LatencyMetrics,
    pub error_rate_percent: f64,
    pub queue_depth: u64,
    pub queue_wait_time: f64,
    pub cache_hit_ratio: f64,
    pub drop_rate: f64,
    #[serde(rename = "cpuUsagePercent")]
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub network_latency_ms: f64,
    pub region_latency_map: HashMap<String, f64>,
    pub region_traffic_map: HashMap<String, f64>,
    pub region_error_rate_map: HashMap<String, f64>,
    pub node_metrics: HashMap<String, NodeMetrics>,
    pub failures_active: Vec<String>,
    #[serde(rename = "slaStatus")]
    pub sla_status: SlaStatus,
    pub scaling_events: Vec<AutoscalingEvent>,
}

/// A detected performance bottleneck with remediation suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    pub node_id: String,
    pub issue: String,
    pub root_cause: String,
    pub impact: String,
    pub suggestions: Vec<String>,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Auto-scaling is intentionally disabled; this surface is kept for output
/// compatibility and is always empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscalingEvent {
    pub tick: u64,
    pub node_id: String,
    pub old_value: u32,
    pub new_value: u32,
    pub reason: String,
}

/// Cost breakdown for the simulated duration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostMetrics {
    #[serde(rename = "totalCostUSD")]
    pub total_cost_usd: f64,
    pub compute: HashMap<String, f64>,
    pub storage: HashMap<String, f64>,
    pub network: HashMap<String, f64>,
    pub per_region: HashMap<String, f64>,
}

/// The complete simulation result document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutput {
    pub metrics: AggregateMetrics,
    pub time_series: Vec<TimeSeriesPoint>,
    pub bottlenecks: Vec<Bottleneck>,
    pub sla_violations: Vec<String>,
    pub cost_metrics: CostMetrics,
    pub duration_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}
