//! Failure injection: applies fault windows to node state each tick

use crate::state::SimulationState;
use crate::types::{FailureInjection, FailureKind};
use tracing::debug;

/// Whether a failure window covers a tick. A bound of 0 is open-ended.
fn window_contains(failure: &FailureInjection, tick: u64) -> bool {
    if failure.start_tick > 0 && tick < failure.start_tick {
        return false;
    }
    if failure.end_tick > 0 && tick > failure.end_tick {
        return false;
    }
    true
}

/// Apply every failure whose window covers `tick`, recording the active
/// failure type strings for this tick's time-series point.
///
/// Failure effects are scoped to their window: every tick starts from the
/// healthy configuration and active failures re-assert themselves, so a
/// node recovers the tick after its window closes.
pub fn apply_failures(
    state: &mut SimulationState,
    failures: &[FailureInjection],
    workload_regions: &[String],
    tick: u64,
) {
    state.active_failures.clear();

    for node in state.node_states.values_mut() {
        node.failed = false;
        node.cache_hit_rate = node.base_cache_hit_rate;
        node.latency_ms = node.base_latency_ms;
    }

    for failure in failures {
        if !window_contains(failure, tick) {
            continue;
        }
        if failure.kind == FailureKind::Unknown {
            continue;
        }

        state.active_failures.push(failure.kind.as_str().to_string());
        debug!(tick, kind = failure.kind.as_str(), "applying failure injection");

        match failure.kind {
            FailureKind::NodeFail => {
                if let Some(node) = state.node_states.get_mut(&failure.node_id) {
                    node.failed = true;
                }
            }
            FailureKind::RegionFail => {
                for node in state.node_states.values_mut() {
                    if node.region == failure.region {
                        node.failed = true;
                    }
                }
            }
            FailureKind::CacheFail => {
                if let Some(node) = state.node_states.get_mut(&failure.node_id) {
                    if node.is_cache() {
                        node.cache_hit_rate = 0.0;
                    }
                }
            }
            FailureKind::DbFail => {
                if let Some(node) = state.node_states.get_mut(&failure.node_id) {
                    if node.is_database() {
                        node.failed = true;
                    }
                }
            }
            FailureKind::NetworkDelay => {
                // The delay lands on the current latency; the router later
                // recomputes latency from the hardware baseline for any node
                // it processes this tick.
                if workload_regions.iter().any(|r| *r == failure.region) {
                    for node in state.node_states.values_mut() {
                        node.latency_ms += failure.delay_ms as f64;
                    }
                }
            }
            FailureKind::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NodeState;

    fn node(id: &str, node_type: &str, region: &str) -> NodeState {
        NodeState {
            id: id.to_string(),
            node_type: node_type.to_string(),
            instance_type: String::new(),
            storage_type: String::new(),
            lb_type: String::new(),
            access_type: String::new(),
            base_capacity_rps: 1000.0,
            base_latency_ms: 10.0,
            latency_ms: 10.0,
            replicas: 1,
            storage_size_gb: 0.0,
            ttl_ms: 0,
            consistency: String::new(),
            region: region.to_string(),
            current_load: 0.0,
            rps_in: 0.0,
            rps_out: 0.0,
            queue_depth: 0,
            max_queue_depth: 100_000,
            cache_hit_rate: 0.8,
            base_cache_hit_rate: 0.8,
            cpu_usage: 0.0,
            memory_usage: 20.0,
            disk_io_usage: 0.0,
            network_usage: 0.0,
            error_count: 0,
            failed: false,
            partitioned: false,
            read_ratio: 80,
        }
    }

    fn state_with(nodes: Vec<NodeState>) -> SimulationState {
        let mut state = SimulationState::default();
        for n in nodes {
            state.node_order.push(n.id.clone());
            state.node_states.insert(n.id.clone(), n);
        }
        state
    }

    fn failure(kind: FailureKind) -> FailureInjection {
        FailureInjection {
            kind,
            node_id: String::new(),
            region: String::new(),
            delay_ms: 0,
            start_tick: 0,
            end_tick: 0,
        }
    }

    #[test]
    fn node_fail_respects_the_window() {
        let mut state = state_with(vec![node("a", "api_server", "default")]);
        let failures = vec![FailureInjection {
            node_id: "a".into(),
            start_tick: 3,
            end_tick: 5,
            ..failure(FailureKind::NodeFail)
        }];

        apply_failures(&mut state, &failures, &[], 2);
        assert!(!state.node_states["a"].failed);
        assert!(state.active_failures.is_empty());

        apply_failures(&mut state, &failures, &[], 3);
        assert!(state.node_states["a"].failed);
        assert_eq!(state.active_failures, ["nodeFail"]);

        // Past the window the node recovers on its own
        apply_failures(&mut state, &failures, &[], 6);
        assert!(!state.node_states["a"].failed);
        assert!(state.active_failures.is_empty());
    }

    #[test]
    fn region_fail_only_hits_matching_nodes() {
        let mut state = state_with(vec![
            node("a", "api_server", "us-east"),
            node("b", "api_server", "eu-central"),
        ]);
        let failures = vec![FailureInjection {
            region: "eu-central".into(),
            ..failure(FailureKind::RegionFail)
        }];

        apply_failures(&mut state, &failures, &[], 1);
        assert!(!state.node_states["a"].failed);
        assert!(state.node_states["b"].failed);
    }

    #[test]
    fn cache_fail_zeroes_hit_rate_on_caches_only() {
        let mut state = state_with(vec![
            node("r", "cache_redis", "default"),
            node("d", "database_postgres", "default"),
        ]);
        let mut f1 = failure(FailureKind::CacheFail);
        f1.node_id = "r".into();
        let mut f2 = failure(FailureKind::CacheFail);
        f2.node_id = "d".into();

        apply_failures(&mut state, &[f1, f2], &[], 1);
        assert_eq!(state.node_states["r"].cache_hit_rate, 0.0);
        assert_eq!(state.node_states["d"].cache_hit_rate, 0.8);
    }

    #[test]
    fn db_fail_only_hits_eligible_database_types() {
        let eligible = ["database_sql", "database_nosql", "database_graph", "database_timeseries"];
        // Managed engines emit CDC events but are not dbFail targets
        let ineligible = ["database_postgres", "database_mysql", "database_mongodb", "api_server"];

        let mut nodes = Vec::new();
        for ty in eligible.iter().chain(&ineligible) {
            nodes.push(node(ty, ty, "default"));
        }
        let mut state = state_with(nodes);

        let failures: Vec<FailureInjection> = eligible
            .iter()
            .chain(&ineligible)
            .map(|ty| FailureInjection {
                node_id: ty.to_string(),
                ..failure(FailureKind::DbFail)
            })
            .collect();

        apply_failures(&mut state, &failures, &[], 1);

        for ty in eligible {
            assert!(state.node_states[ty].failed, "{ty} should fail");
        }
        for ty in ineligible {
            assert!(!state.node_states[ty].failed, "{ty} should not fail");
        }
    }

    #[test]
    fn network_delay_applies_when_region_in_workload() {
        let mut state = state_with(vec![node("a", "api_server", "us-east")]);
        let mut f = failure(FailureKind::NetworkDelay);
        f.region = "us-east".into();
        f.delay_ms = 40;

        apply_failures(&mut state, std::slice::from_ref(&f), &["us-east".into()], 1);
        assert_eq!(state.node_states["a"].latency_ms, 50.0);

        // Region not part of the workload: latency returns to baseline
        apply_failures(&mut state, &[f], &["eu-west".into()], 1);
        assert_eq!(state.node_states["a"].latency_ms, 10.0);
    }

    #[test]
    fn cache_recovers_after_the_window() {
        let mut state = state_with(vec![node("r", "cache_redis", "default")]);
        let failures = vec![FailureInjection {
            node_id: "r".into(),
            start_tick: 1,
            end_tick: 2,
            ..failure(FailureKind::CacheFail)
        }];

        apply_failures(&mut state, &failures, &[], 2);
        assert_eq!(state.node_states["r"].cache_hit_rate, 0.0);

        apply_failures(&mut state, &failures, &[], 3);
        assert_eq!(state.node_states["r"].cache_hit_rate, 0.8);
    }
}
