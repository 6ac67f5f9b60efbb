//! Engine-internal runtime state
//!
//! One [`NodeState`] per node and one [`SimulationState`] per run, built at
//! initialization and discarded once the result document is assembled.

use crate::graph::Graph;
use std::collections::HashMap;

/// Runtime state of a single node. Hardware-derived fields are fixed at
/// initialization; traffic and resource fields mutate every tick.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub id: String,
    pub node_type: String,
    pub instance_type: String,
    pub storage_type: String,
    pub lb_type: String,
    pub access_type: String,
    pub base_capacity_rps: f64,
    /// Hardware latency, never mutated after init.
    pub base_latency_ms: f64,
    /// This tick's latency, recomputed from `base_latency_ms` each tick.
    pub latency_ms: f64,
    pub replicas: u32,
    pub storage_size_gb: f64,
    pub ttl_ms: i64,
    pub consistency: String,
    pub region: String,
    pub current_load: f64,
    pub rps_in: f64,
    pub rps_out: f64,
    pub queue_depth: u64,
    pub max_queue_depth: u64,
    pub cache_hit_rate: f64,
    /// Configured hit rate, restored when a cacheFail window closes.
    pub base_cache_hit_rate: f64,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_io_usage: f64,
    pub network_usage: f64,
    pub error_count: u64,
    pub failed: bool,
    pub partitioned: bool,
    /// Percentage of operations that are reads (0-100).
    pub read_ratio: i64,
}

impl NodeState {
    /// Capacity with replication factored in.
    pub fn effective_capacity(&self) -> f64 {
        self.base_capacity_rps * f64::from(self.replicas)
    }

    pub fn is_cache(&self) -> bool {
        matches!(self.node_type.as_str(), "cache_redis" | "cache_memcached")
    }

    /// Database types whose outgoing traffic is CDC events (writes only).
    pub fn emits_cdc(&self) -> bool {
        matches!(
            self.node_type.as_str(),
            "database_sql"
                | "database_nosql"
                | "database_postgres"
                | "database_mysql"
                | "database_mongodb"
        )
    }

    /// Database types eligible for `dbFail` injection. A different set than
    /// [`NodeState::emits_cdc`]: the managed engines (postgres, mysql,
    /// mongodb) emit CDC events but are not dbFail targets.
    pub fn is_database(&self) -> bool {
        matches!(
            self.node_type.as_str(),
            "database_sql" | "database_nosql" | "database_graph" | "database_timeseries"
        )
    }

    /// Queue-like nodes buffer and drain rather than forward.
    pub fn is_queue_like(&self) -> bool {
        matches!(
            self.node_type.as_str(),
            "queue" | "message_broker" | "event_bus"
        ) || self.node_type.starts_with("queue_")
    }

    pub fn is_client(&self) -> bool {
        self.node_type == "client"
    }

    /// Fraction of writes, derived from the read ratio.
    pub fn write_fraction(&self) -> f64 {
        1.0 - (self.read_ratio as f64 / 100.0)
    }
}

/// Engine-wide mutable state for one run.
#[derive(Debug, Default)]
pub struct SimulationState {
    pub tick: u64,
    pub current_workload_rps: f64,
    pub node_states: HashMap<String, NodeState>,
    /// Node ids in input order; iteration over the state map goes through
    /// this so runs are deterministic.
    pub node_order: Vec<String>,
    pub graph: Graph,
    pub entry_nodes: Vec<String>,
    /// Mean cross-region latency addend per node, fixed by the topology.
    pub cross_region_ms: HashMap<String, f64>,
    pub latency_history: Vec<f64>,
    pub throughput_history: Vec<f64>,
    pub error_history: Vec<u64>,
    pub queue_history: Vec<u64>,
    pub total_requests: u64,
    pub failed_requests: u64,
    pub dropped_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub active_failures: Vec<String>,
}

impl SimulationState {
    /// Sum of current queue depths across queue-like nodes.
    pub fn total_queue_depth(&self) -> u64 {
        self.node_states
            .values()
            .filter(|n| n.is_queue_like())
            .map(|n| n.queue_depth)
            .sum()
    }

    /// Successful requests, always derived; per-node success counters
    /// double-count on multi-hop paths.
    pub fn successful_requests(&self) -> u64 {
        self.total_requests.saturating_sub(self.failed_requests)
    }
}
