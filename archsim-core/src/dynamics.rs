//! Queue and cache dynamics: buffering, drain, drop and hit/miss accounting

use crate::state::{NodeState, SimulationState};
use std::collections::HashSet;

/// Buffer this tick's throughput in a queue-like node, drain what the
/// consumers can take, and drop anything beyond the depth limit. Dropped
/// items count as both dropped and failed.
pub fn absorb(
    node: &mut NodeState,
    throughput: f64,
    drain_rate: f64,
    failed_requests: &mut u64,
    dropped_requests: &mut u64,
) {
    node.queue_depth += throughput as u64;

    let drained = node.queue_depth.min(drain_rate as u64);
    node.queue_depth -= drained;
    node.rps_out = drained as f64;

    if node.queue_depth > node.max_queue_depth {
        let excess = node.queue_depth - node.max_queue_depth;
        *failed_requests += excess;
        *dropped_requests += excess;
        node.queue_depth = node.max_queue_depth;
    }
}

/// Accumulate cache hit/miss counters for one tick of traffic through a
/// cache node. Reads are the node's read share of incoming requests.
pub fn record_cache_access(
    node: &NodeState,
    incoming: f64,
    cache_hits: &mut u64,
    cache_misses: &mut u64,
) {
    let hit_rate = if node.cache_hit_rate < 0.0 {
        0.75
    } else {
        node.cache_hit_rate
    };
    let reads = incoming * (node.read_ratio as f64 / 100.0);
    let hits = (reads * hit_rate) as u64;
    let misses = (reads as u64).saturating_sub(hits);
    *cache_hits += hits;
    *cache_misses += misses;
}

/// Natural drain for queue-like nodes that carried no traffic this tick:
/// the backlog keeps emptying at the node's own rate.
pub fn drain_idle_queues(state: &mut SimulationState, carried: &HashSet<String>) {
    for node in state.node_states.values_mut() {
        if !node.is_queue_like() || carried.contains(&node.id) {
            continue;
        }
        if node.queue_depth > 0 {
            let drained = node.queue_depth.min(node.effective_capacity() as u64);
            node.queue_depth -= drained;
        }
    }
}
