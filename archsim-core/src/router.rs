//! Traffic router: propagates attempted load across the graph each tick
//!
//! Phase A settles attempted load over the graph: fan-in aggregation with an
//! equal fan-out split at the source, bounded so cycles terminate (a node is
//! processed at most once per tick and back-edges keep the earlier value).
//! Phase B then processes every node with its aggregated incoming: capacity
//! clipping, overflow accounting, resource usage, and queueing latency.

use crate::dynamics;
use crate::resources;
use crate::state::{NodeState, SimulationState};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Queueing surcharge per 100% of overload, in multiples of base latency.
pub const QUEUEING_DELAY_FACTOR: f64 = 5.0;

/// Hard ceiling on any recorded latency; real systems time out.
pub const LATENCY_CEILING_MS: f64 = 30_000.0;

/// Share of upstream throughput copied to telemetry sidecars.
pub const TELEMETRY_SAMPLE_RATE: f64 = 0.10;

/// Upper bound on settle-loop passes; cycles never make progress forever.
const MAX_SETTLE_ITERATIONS: usize = 20;

/// Targets that receive a traffic copy instead of a fan-out share.
pub fn is_telemetry_target(node_type: &str) -> bool {
    matches!(node_type, "monitoring" | "logging")
}

/// Number of a node's children that participate in the fan-out split.
fn mainline_child_count(state: &SimulationState, id: &str) -> usize {
    state
        .graph
        .children(id)
        .iter()
        .filter(|child| {
            state
                .node_states
                .get(child.as_str())
                .map(|n| !is_telemetry_target(&n.node_type))
                .unwrap_or(true)
        })
        .count()
}

/// How much a queue-like node can hand downstream per tick: its own
/// capacity, further bounded by what its consumers can absorb.
fn deliverable_rate(state: &SimulationState, node: &NodeState) -> f64 {
    let own = node.effective_capacity();
    let consumers: f64 = state
        .graph
        .children(&node.id)
        .iter()
        .filter_map(|child| state.node_states.get(child.as_str()))
        .filter(|n| !is_telemetry_target(&n.node_type))
        .map(NodeState::effective_capacity)
        .sum();
    if consumers > 0.0 {
        own.min(consumers)
    } else {
        own
    }
}

/// The type-specific outgoing transform, applied to a node's incoming in
/// Phase A and re-applied to its clipped throughput in Phase B.
fn transform_outgoing(node: &NodeState, amount: f64, deliverable: Option<f64>) -> f64 {
    if node.failed {
        return 0.0;
    }

    if node.is_cache() {
        let hit_rate = if node.cache_hit_rate < 0.0 {
            0.75
        } else {
            node.cache_hit_rate
        };
        // Only misses continue downstream
        return amount * (1.0 - hit_rate);
    }

    if node.emits_cdc() {
        // CDC: reads terminate at the database, writes emit change events
        let write_fraction = node.write_fraction();
        return if write_fraction > 0.0 {
            amount * write_fraction
        } else {
            0.0
        };
    }

    if node.is_queue_like() {
        // Queues hand over at most what they can drain; the rest buffers
        return amount.min(deliverable.unwrap_or(f64::INFINITY));
    }

    // Clients and everything else forward in full; downstream enforces
    // its own capacity
    amount
}

/// Route one tick of traffic. Returns the set of nodes that carried traffic
/// this tick so queue maintenance can tell idle queues apart.
pub fn route_requests(state: &mut SimulationState, rps: f64) -> HashSet<String> {
    state.total_requests += rps.round() as u64;

    let mut carried = HashSet::new();

    if state.entry_nodes.is_empty() {
        state.failed_requests += rps.round() as u64;
        return carried;
    }

    let mut incoming: HashMap<String, f64> = HashMap::new();
    let mut outgoing: HashMap<String, f64> = HashMap::new();
    let mut settled: HashSet<&str> = HashSet::new();

    let per_entry = rps / state.entry_nodes.len() as f64;
    for id in &state.entry_nodes {
        incoming.insert(id.clone(), per_entry);
    }

    // Phase A: settle attempted load over the graph.
    for _ in 0..MAX_SETTLE_ITERATIONS {
        let mut progressed = false;

        for id in &state.node_order {
            if settled.contains(id.as_str()) {
                continue;
            }
            let Some(node) = state.node_states.get(id.as_str()) else {
                continue;
            };

            if !incoming.contains_key(id.as_str()) {
                // Fan-in: sum each parent's share directed at this node
                let mut total = 0.0;
                for parent in state.graph.parents(id) {
                    let Some(&parent_out) = outgoing.get(parent.as_str()) else {
                        continue;
                    };
                    if is_telemetry_target(&node.node_type) {
                        total += parent_out * TELEMETRY_SAMPLE_RATE;
                    } else {
                        let fan_out = mainline_child_count(state, parent);
                        if fan_out > 0 {
                            total += parent_out / fan_out as f64;
                        }
                    }
                }
                if total > 0.0 {
                    incoming.insert(id.clone(), total);
                }
            }

            if incoming.contains_key(id.as_str()) && !outgoing.contains_key(id.as_str()) {
                let deliverable = node
                    .is_queue_like()
                    .then(|| deliverable_rate(state, node));
                let out = transform_outgoing(node, incoming[id.as_str()], deliverable);
                outgoing.insert(id.clone(), out);
                settled.insert(id.as_str());
                progressed = true;
            }
        }

        if !progressed {
            break;
        }
    }

    // Phase B: process each node with its final aggregated incoming.
    let order = state.node_order.clone();
    for id in &order {
        let Some(&rps_in) = incoming.get(id.as_str()) else {
            continue;
        };
        if rps_in > 0.0 {
            process_node(state, id, rps_in);
            carried.insert(id.clone());
        }
    }

    carried
}

/// Process one node: clip against capacity, account overflow as errors,
/// recompute outgoing at the throughput level, and derive this tick's
/// resource usage and latency.
fn process_node(state: &mut SimulationState, id: &str, incoming: f64) {
    let cross_region = state.cross_region_ms.get(id).copied().unwrap_or(0.0);
    let deliverable = {
        let node = &state.node_states[id];
        node.is_queue_like().then(|| deliverable_rate(state, node))
    };

    let SimulationState {
        node_states,
        latency_history,
        failed_requests,
        dropped_requests,
        cache_hits,
        cache_misses,
        ..
    } = state;
    let Some(node) = node_states.get_mut(id) else {
        return;
    };

    node.rps_in = incoming;

    if node.failed {
        *failed_requests += incoming as u64;
        node.error_count += incoming as u64;
        node.rps_out = 0.0;
        return;
    }

    node.current_load = incoming;

    let capacity = node.effective_capacity();
    let throughput = incoming.min(capacity);
    let overflow = (incoming - capacity).max(0.0);
    if overflow > 0.0 {
        node.error_count += overflow as u64;
        *failed_requests += overflow as u64;
        trace!(
            node = id,
            overflow,
            capacity,
            "capacity exceeded, counting overflow as failures"
        );
    }

    if node.is_queue_like() {
        dynamics::absorb(
            node,
            throughput,
            deliverable.unwrap_or(capacity),
            failed_requests,
            dropped_requests,
        );
    } else {
        node.rps_out = transform_outgoing(node, throughput, None);
    }

    if node.is_cache() {
        dynamics::record_cache_access(node, incoming, cache_hits, cache_misses);
    }

    let usage = resources::usage_for(node, incoming, capacity);
    node.cpu_usage = usage.cpu_percent;
    node.memory_usage = usage.memory_percent;
    node.disk_io_usage = usage.disk_io_percent;
    node.network_usage = usage.network_percent;

    // Latency always restarts from the hardware baseline; the previous
    // tick's value must not compound.
    let baseline = node.base_latency_ms;
    let latency = if incoming > capacity && capacity > 0.0 {
        let overload_ratio = (incoming - capacity) / capacity;
        baseline + baseline * overload_ratio * QUEUEING_DELAY_FACTOR + cross_region
    } else {
        baseline + cross_region
    };
    node.latency_ms = latency.min(LATENCY_CEILING_MS);
    // Clients generate traffic, they don't serve it; their zero-latency
    // samples would drag every percentile down.
    if !node.is_client() {
        latency_history.push(node.latency_ms);
    }
}
