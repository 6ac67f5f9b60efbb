//! Shared builders for engine integration tests

use archsim_core::{SimEdge, SimNode, SimNodeData, SimulationInput, WorkloadConfig};
use serde_json::{Map, Value};

pub fn node(id: &str, node_type: &str, config: Value) -> SimNode {
    let config = match config {
        Value::Object(map) => map.into_iter().collect(),
        _ => Default::default(),
    };
    SimNode {
        id: id.to_string(),
        kind: node_type.to_string(),
        data: SimNodeData {
            label: id.to_string(),
            node_type: node_type.to_string(),
            config,
        },
    }
}

pub fn client(id: &str) -> SimNode {
    node(id, "client", Value::Object(Map::new()))
}

pub fn edge(source: &str, target: &str) -> SimEdge {
    SimEdge {
        id: format!("{source}-{target}"),
        source: source.to_string(),
        target: target.to_string(),
    }
}

pub fn workload(rps: i64, duration_seconds: i64) -> WorkloadConfig {
    WorkloadConfig {
        rps,
        duration_seconds,
        mode: "constant".to_string(),
        seed: Some(42),
        ..WorkloadConfig::default()
    }
}

pub fn input(nodes: Vec<SimNode>, edges: Vec<SimEdge>, workload: WorkloadConfig) -> SimulationInput {
    SimulationInput {
        nodes,
        edges,
        workload,
        sla_config: None,
    }
}
