//! Cost accounting: per-run cost attribution and monthly estimation

use crate::catalog;
use crate::state::SimulationState;
use crate::types::{CostMetrics, SimulationInput};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const HOURS_PER_MONTH: f64 = 730.0;

/// Monthly cost estimate returned before any simulation runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub total_monthly_cost: f64,
    pub breakdown: CostBreakdown,
    pub component_costs: HashMap<String, f64>,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub compute: f64,
    pub storage: f64,
    pub network: f64,
    pub other: f64,
    pub data_transfer: f64,
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Hourly storage cost for a given size, derived from the GB-month price.
pub fn storage_cost_hourly(storage_type: &str, size_gb: f64) -> f64 {
    catalog::storage_cost_per_gb_month(storage_type) * size_gb / HOURS_PER_MONTH
}

/// Cost of the simulated window, categorized into compute, storage and
/// network, with a per-region split. The total keeps 4 decimals so very
/// short simulations still show a nonzero cost.
pub fn run_cost(state: &SimulationState, duration_seconds: u64) -> CostMetrics {
    let mut compute: HashMap<String, f64> = HashMap::new();
    let mut storage: HashMap<String, f64> = HashMap::new();
    let mut network: HashMap<String, f64> = HashMap::new();
    let mut per_region: HashMap<String, f64> = HashMap::new();

    let mut total_compute = 0.0;
    let mut total_storage = 0.0;
    let mut total_network = 0.0;

    let duration_hours = duration_seconds as f64 / 3600.0;
    let duration_secs = duration_seconds as f64;

    for id in &state.node_order {
        let node = &state.node_states[id.as_str()];
        let replicas = f64::from(node.replicas);
        let mut node_cost = 0.0;

        match node.node_type.as_str() {
            "api_server" | "compute" | "web_server" | "microservice" => {
                let hourly = if node.instance_type.is_empty() {
                    0.096
                } else {
                    catalog::instance_cost(&node.instance_type)
                };
                node_cost = hourly * replicas * duration_hours;
                *compute.entry("compute_instances".to_string()).or_default() += node_cost;
                total_compute += node_cost;
            }

            "load_balancer" => {
                let hourly = if node.lb_type.is_empty() {
                    0.0225
                } else {
                    catalog::lb_cost(&node.lb_type)
                };
                // Hourly charge plus per-request extras at $0.008 per 1k
                node_cost = hourly * duration_hours
                    + node.rps_out * duration_secs * 0.001 * 0.008;
                *compute.entry("load_balancer".to_string()).or_default() += node_cost;
                total_compute += node_cost;
            }

            "database_sql" | "database_nosql" | "database_postgres" | "database_mysql"
            | "database_mongodb" => {
                let hourly = if node.instance_type.is_empty() {
                    0.188
                } else {
                    catalog::instance_cost(&node.instance_type)
                };
                node_cost = hourly * replicas * duration_hours;
                *compute.entry("database".to_string()).or_default() += node_cost;
                total_compute += node_cost;

                if node.storage_size_gb > 0.0 {
                    let storage_cost =
                        node.storage_size_gb * 0.10 * (duration_hours / 720.0);
                    *storage.entry("database_storage".to_string()).or_default() += storage_cost;
                    total_storage += storage_cost;
                }
            }

            "cache_redis" | "cache_memcached" => {
                let hourly = if node.instance_type.is_empty() {
                    0.136
                } else {
                    catalog::instance_cost(&node.instance_type)
                };
                node_cost = hourly * replicas * duration_hours;
                *compute.entry("cache".to_string()).or_default() += node_cost;
                total_compute += node_cost;
            }

            "queue" | "message_broker" => {
                // $0.01 per million messages
                let messages = node.rps_out * duration_secs;
                node_cost = (messages / 1_000_000.0) * 0.01;
                *compute.entry("queue".to_string()).or_default() += node_cost;
                total_compute += node_cost;
            }

            "cdn" => {
                // $0.085 per GB transferred
                let data_gb = node.rps_out * duration_secs * 0.001;
                node_cost = data_gb * 0.085;
                *network.entry("cdn".to_string()).or_default() += node_cost;
                total_network += node_cost;
            }

            "object_storage" => {
                if node.storage_size_gb > 0.0 {
                    let storage_cost =
                        node.storage_size_gb * 0.023 * (duration_hours / 720.0);
                    *storage.entry("object_storage".to_string()).or_default() += storage_cost;
                    total_storage += storage_cost;
                }
                let data_out_gb = node.rps_out * duration_secs * 0.001;
                let egress = data_out_gb * 0.09;
                *network.entry("egress".to_string()).or_default() += egress;
                total_network += egress;
                node_cost = egress;
            }

            _ => {}
        }

        let region = if node.region.is_empty() {
            "default"
        } else {
            node.region.as_str()
        };
        *per_region.entry(region.to_string()).or_default() += node_cost;
    }

    // Internal transfer between nodes: $0.01 per million successful requests
    let internal_transfer = state.successful_requests() as f64 * 0.000_01;
    network.insert("internal_transfer".to_string(), internal_transfer);
    total_network += internal_transfer;

    CostMetrics {
        total_cost_usd: round4(total_compute + total_storage + total_network),
        compute,
        storage,
        network,
        per_region,
    }
}

/// Steady-state monthly cost of the architecture: instances, gp3 storage
/// and an estimated data-transfer bill.
pub fn total_monthly_cost(state: &SimulationState) -> f64 {
    let mut total = 0.0;
    for node in state.node_states.values() {
        if !node.instance_type.is_empty() {
            total += catalog::instance_cost(&node.instance_type)
                * HOURS_PER_MONTH
                * f64::from(node.replicas);
        }
        if node.storage_size_gb > 0.0 {
            total += storage_cost_hourly("gp3", node.storage_size_gb) * HOURS_PER_MONTH;
        }
    }
    total += estimate_data_transfer_cost(state);
    round2(total)
}

/// Rough monthly transfer bill: 100 KB per request over a 30-day month at
/// an averaged $0.05/GB. Deliberately coarse.
pub fn estimate_data_transfer_cost(state: &SimulationState) -> f64 {
    let mut transfer_gb = 0.0;
    for node in state.node_states.values() {
        transfer_gb += node.rps_out * 100.0 * 86_400.0 * 30.0 / (1024.0 * 1024.0 * 1024.0);
    }
    transfer_gb * 0.05
}

/// Monthly estimate for the estimate-cost endpoint: per-node instance and
/// storage costs at 730 hours, categorized by component family.
pub fn estimate(input: &SimulationInput, state: &SimulationState) -> CostEstimate {
    let mut breakdown = CostBreakdown::default();
    let mut component_costs: HashMap<String, f64> = HashMap::new();

    for node in &input.nodes {
        let node_type = node.data.node_type.as_str();
        let mut node_cost = 0.0;

        let instance_type = crate::config::get_str(&node.data.config, "instanceType", "");
        if !instance_type.is_empty() {
            node_cost += catalog::instance_cost(&instance_type) * HOURS_PER_MONTH;
        }

        let storage_size_gb = crate::config::get_f64(&node.data.config, "storage_size_gb", 0.0);
        if storage_size_gb > 0.0 {
            let storage_type = crate::config::get_str(&node.data.config, "storageType", "gp3");
            node_cost += storage_cost_hourly(&storage_type, storage_size_gb) * HOURS_PER_MONTH;
        }

        match node_type {
            "api_server" | "web_server" | "microservice" | "worker" => {
                breakdown.compute += node_cost;
            }
            "database_sql" | "database_nosql" | "object_storage" | "cache_redis" => {
                breakdown.storage += node_cost;
            }
            "load_balancer" | "api_gateway" | "cdn" => {
                breakdown.network += node_cost;
            }
            _ => breakdown.other += node_cost,
        }

        component_costs.insert(node_type.to_string(), node_cost);
    }

    breakdown.data_transfer = estimate_data_transfer_cost(state);
    breakdown.network += breakdown.data_transfer;

    CostEstimate {
        total_monthly_cost: total_monthly_cost(state),
        breakdown,
        component_costs,
        node_count: input.nodes.len(),
        edge_count: input.edges.len(),
    }
}
