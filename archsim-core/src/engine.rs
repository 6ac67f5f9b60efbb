//! Engine driver: state initialization, the tick loop, and output assembly

use crate::aggregate;
use crate::catalog;
use crate::config;
use crate::cost::{self, CostEstimate};
use crate::dynamics;
use crate::failures;
use crate::graph::Graph;
use crate::router;
use crate::state::{NodeState, SimulationState};
use crate::types::{SimulationInput, SimulationOutput};
use crate::workload::WorkloadMode;
use crate::{regions, SimError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info, instrument};

const DEFAULT_MAX_QUEUE_DEPTH: i64 = 100_000;

/// One simulation run over a validated input. A run is strictly
/// single-threaded; independent runs may execute in parallel since the only
/// shared data are the static catalogs.
pub struct Engine {
    input: SimulationInput,
    state: SimulationState,
    rng: StdRng,
}

impl Engine {
    /// Create an engine for the given input, applying the documented input
    /// defaults. The RNG is seeded from `workload.seed` when present, so
    /// seeded runs are reproducible.
    pub fn new(mut input: SimulationInput) -> Self {
        input.normalize();
        let rng = match input.workload.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            input,
            state: SimulationState::default(),
            rng,
        }
    }

    pub fn input(&self) -> &SimulationInput {
        &self.input
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Build the runtime state: node states from hardware catalogs and node
    /// configuration, adjacency maps, entry nodes, round-robin region
    /// assignment and the per-node cross-region latency addends.
    ///
    /// Public because cost estimation needs initialized state without
    /// running any ticks.
    pub fn initialize_state(&mut self) -> Result<(), SimError> {
        if self.input.nodes.is_empty() {
            return Err(SimError::InvalidInput("no nodes provided".to_string()));
        }

        let mut state = SimulationState::default();
        let workload_regions = &self.input.workload.regions;

        for (idx, node) in self.input.nodes.iter().enumerate() {
            let region = if workload_regions.is_empty() {
                "default".to_string()
            } else {
                workload_regions[idx % workload_regions.len()].clone()
            };

            let cfg = &node.data.config;
            let node_type = node.data.node_type.clone();
            let (capacity_rps, latency_ms) = catalog::hardware_performance(&node_type, cfg);

            let default_hit_rate =
                if matches!(node_type.as_str(), "cache_redis" | "cache_memcached") {
                    0.80
                } else {
                    0.75
                };
            let cache_hit_rate =
                config::get_f64(cfg, "cacheHitRate", default_hit_rate).clamp(0.0, 1.0);

            let node_state = NodeState {
                id: node.id.clone(),
                node_type,
                instance_type: config::get_str(cfg, "instanceType", ""),
                storage_type: config::get_str(cfg, "storageType", ""),
                lb_type: config::get_str(cfg, "lbType", ""),
                access_type: config::get_str(cfg, "accessType", "external"),
                base_capacity_rps: capacity_rps,
                base_latency_ms: latency_ms,
                latency_ms,
                replicas: config::get_i64(cfg, "replicas", 1).max(0) as u32,
                storage_size_gb: config::get_f64(cfg, "storage_size_gb", 0.0),
                ttl_ms: config::get_i64(cfg, "ttl_ms", 3_600_000),
                consistency: config::get_str(cfg, "consistency", "strong"),
                region,
                current_load: 0.0,
                rps_in: 0.0,
                rps_out: 0.0,
                queue_depth: 0,
                max_queue_depth: config::get_i64(cfg, "maxQueueDepth", DEFAULT_MAX_QUEUE_DEPTH)
                    .max(0) as u64,
                cache_hit_rate,
                base_cache_hit_rate: cache_hit_rate,
                cpu_usage: 0.0,
                memory_usage: 20.0,
                disk_io_usage: 0.0,
                network_usage: 0.0,
                error_count: 0,
                failed: false,
                partitioned: false,
                read_ratio: config::get_i64(cfg, "readRatio", 80),
            };

            state.node_order.push(node.id.clone());
            state.node_states.insert(node.id.clone(), node_state);
        }

        state.graph = Graph::from_edges(&self.input.edges);
        state.entry_nodes = state.graph.entry_nodes(&self.input.nodes);

        // Cross-region addends are fixed by topology and region assignment:
        // the mean matrix latency over a node's cross-region parents.
        for id in &state.node_order {
            let node_region = state.node_states[id.as_str()].region.clone();
            let mut total = 0.0;
            let mut count = 0u32;
            for parent in state.graph.parents(id) {
                if let Some(parent_state) = state.node_states.get(parent.as_str()) {
                    if regions::is_cross_region(&parent_state.region, &node_region) {
                        total += regions::region_latency(&parent_state.region, &node_region);
                        count += 1;
                    }
                }
            }
            if count > 0 {
                state
                    .cross_region_ms
                    .insert(id.clone(), total / f64::from(count));
            }
        }

        debug!(
            nodes = state.node_order.len(),
            entries = state.entry_nodes.len(),
            "simulation state initialized"
        );

        self.state = state;
        Ok(())
    }

    /// Execute the simulation and assemble the result document.
    ///
    /// Simulated-runtime failures (overload, drops, injected faults) are
    /// captured in the metrics of a successful result; only shape-invalid
    /// input produces an error.
    #[instrument(skip(self), fields(
        nodes = self.input.nodes.len(),
        rps = self.input.workload.rps,
        duration = self.input.workload.duration_seconds,
    ))]
    pub fn run(&mut self) -> Result<SimulationOutput, SimError> {
        let started = Instant::now();

        self.input.validate()?;
        self.initialize_state()?;

        let duration = self.input.workload.duration_seconds as u64;
        let base_rps = self.input.workload.rps as f64;
        let mode: WorkloadMode = self.input.workload.mode.parse().unwrap_or_default();

        let mut time_series = Vec::with_capacity(duration as usize);

        for tick in 1..=duration {
            self.state.tick = tick;
            let current_rps = mode.rate_for_tick(tick, duration, base_rps, &mut self.rng);
            self.state.current_workload_rps = current_rps;
            metrics::gauge!("archsim_tick_rps").set(current_rps);

            failures::apply_failures(
                &mut self.state,
                &self.input.workload.failures,
                &self.input.workload.regions,
                tick,
            );

            let carried = router::route_requests(&mut self.state, current_rps);
            dynamics::drain_idle_queues(&mut self.state, &carried);

            self.state.queue_history.push(self.state.total_queue_depth());
            self.state.error_history.push(self.state.failed_requests);
            self.state
                .throughput_history
                .push(self.state.successful_requests() as f64 / tick as f64);

            time_series.push(aggregate::time_series_point(
                &self.state,
                self.input.sla_config.as_ref(),
                tick,
                current_rps,
                duration,
            ));
        }

        let metrics_summary = aggregate::aggregate_metrics(&self.state, duration);
        let bottlenecks = aggregate::detect_bottlenecks(&self.state);
        let (_, sla_violations) = aggregate::check_sla(
            self.input.sla_config.as_ref(),
            &metrics_summary.latency,
            metrics_summary.error_rate,
            metrics_summary.throughput,
        );
        let cost_metrics = cost::run_cost(&self.state, duration);

        metrics::counter!("archsim_requests_total").increment(metrics_summary.total_requests);
        metrics::counter!("archsim_requests_failed").increment(metrics_summary.failed_requests);

        info!(
            total_requests = metrics_summary.total_requests,
            failed_requests = metrics_summary.failed_requests,
            p95_ms = metrics_summary.latency.p95,
            bottlenecks = bottlenecks.len(),
            "simulation run complete"
        );

        Ok(SimulationOutput {
            metrics: metrics_summary,
            time_series,
            bottlenecks,
            sla_violations,
            cost_metrics,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
            success: true,
            error: String::new(),
        })
    }

    /// Monthly cost estimate over initialized state, without running ticks.
    pub fn estimate_costs(&mut self) -> Result<CostEstimate, SimError> {
        self.initialize_state()?;
        Ok(cost::estimate(&self.input, &self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SimNode, SimNodeData, WorkloadConfig};
    use serde_json::json;

    fn two_node_input(rps: i64) -> SimulationInput {
        SimulationInput {
            nodes: vec![
                SimNode {
                    id: "c".into(),
                    kind: "client".into(),
                    data: SimNodeData {
                        label: "Client".into(),
                        node_type: "client".into(),
                        config: Default::default(),
                    },
                },
                SimNode {
                    id: "a".into(),
                    kind: "api_server".into(),
                    data: SimNodeData {
                        label: "API".into(),
                        node_type: "api_server".into(),
                        config: [("replicas".to_string(), json!(2))].into_iter().collect(),
                    },
                },
            ],
            edges: vec![crate::types::SimEdge {
                id: "e".into(),
                source: "c".into(),
                target: "a".into(),
            }],
            workload: WorkloadConfig {
                rps,
                duration_seconds: 5,
                regions: vec!["us-east".into(), "eu-central".into()],
                seed: Some(1),
                ..WorkloadConfig::default()
            },
            sla_config: None,
        }
    }

    #[test]
    fn init_assigns_regions_round_robin() {
        let mut engine = Engine::new(two_node_input(100));
        engine.initialize_state().unwrap();

        assert_eq!(engine.state().node_states["c"].region, "us-east");
        assert_eq!(engine.state().node_states["a"].region, "eu-central");
        assert_eq!(engine.state().entry_nodes, ["c"]);
    }

    #[test]
    fn init_precomputes_cross_region_addend() {
        let mut engine = Engine::new(two_node_input(100));
        engine.initialize_state().unwrap();

        // us-east -> eu-central is 85ms in the matrix
        assert_eq!(engine.state().cross_region_ms["a"], 85.0);
        assert!(!engine.state().cross_region_ms.contains_key("c"));
    }

    #[test]
    fn run_rejects_invalid_shapes() {
        let mut input = two_node_input(100);
        input.workload.rps = 0;
        assert!(Engine::new(input).run().is_err());

        let mut input = two_node_input(100);
        input.nodes.clear();
        assert!(Engine::new(input).run().is_err());
    }

    #[test]
    fn seeded_runs_are_identical() {
        let mut input = two_node_input(3000);
        input.workload.mode = "burst".into();

        let a = Engine::new(input.clone()).run().unwrap();
        let b = Engine::new(input).run().unwrap();

        assert_eq!(a.metrics.total_requests, b.metrics.total_requests);
        assert_eq!(a.metrics.failed_requests, b.metrics.failed_requests);
        assert_eq!(a.metrics.latency, b.metrics.latency);
        let rates_a: Vec<f64> = a.time_series.iter().map(|p| p.incoming_rps).collect();
        let rates_b: Vec<f64> = b.time_series.iter().map(|p| p.incoming_rps).collect();
        assert_eq!(rates_a, rates_b);
    }

    #[test]
    fn estimate_does_not_require_positive_rps() {
        let mut input = two_node_input(100);
        input.workload.rps = 0;
        let mut engine = Engine::new(input);
        let estimate = engine.estimate_costs().unwrap();
        assert_eq!(estimate.node_count, 2);
        assert_eq!(estimate.edge_count, 1);
    }
}
