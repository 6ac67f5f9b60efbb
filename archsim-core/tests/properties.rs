//! Invariant checks over randomized shape-valid inputs

mod common;

use archsim_core::{Engine, SimEdge, SimNode, SimulationInput};
use common::{client, edge, input, node, workload};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

/// Random layered architecture: clients feeding a service layer feeding a
/// storage layer. Capacities are pinned through config so the capacity-clip
/// invariant can be checked from the outside.
fn random_input(seed: u64) -> (SimulationInput, Vec<(String, f64)>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut nodes: Vec<SimNode> = Vec::new();
    let mut edges: Vec<SimEdge> = Vec::new();
    let mut capacities: Vec<(String, f64)> = Vec::new();

    let client_count = rng.gen_range(1..=2);
    for i in 0..client_count {
        nodes.push(client(&format!("client{i}")));
    }

    let service_types = ["api_server", "microservice", "load_balancer", "grpc_server"];
    let service_count = rng.gen_range(1..=3);
    for i in 0..service_count {
        let ty = service_types[rng.gen_range(0..service_types.len())];
        let capacity = rng.gen_range(500..20_000) as f64;
        let id = format!("svc{i}");
        nodes.push(node(
            &id,
            ty,
            json!({
                "capacityRPS": capacity,
                "latencyMS": rng.gen_range(1..50),
                "replicas": rng.gen_range(1..4),
            }),
        ));
        capacities.push((id, capacity));
    }

    let backend_types = ["database_postgres", "cache_redis", "queue", "database_nosql"];
    let backend_count = rng.gen_range(1..=3);
    for i in 0..backend_count {
        let ty = backend_types[rng.gen_range(0..backend_types.len())];
        let capacity = rng.gen_range(200..10_000) as f64;
        let id = format!("backend{i}");
        nodes.push(node(
            &id,
            ty,
            json!({
                "capacityRPS": capacity,
                "latencyMS": rng.gen_range(1..30),
                "readRatio": rng.gen_range(0..=100),
            }),
        ));
        capacities.push((id, capacity));
    }

    for i in 0..client_count {
        let target = rng.gen_range(0..service_count);
        edges.push(edge(&format!("client{i}"), &format!("svc{target}")));
    }
    for i in 0..service_count {
        let target = rng.gen_range(0..backend_count);
        edges.push(edge(&format!("svc{i}"), &format!("backend{target}")));
        // Occasionally fan out to a second backend
        if rng.gen_bool(0.4) {
            let second = rng.gen_range(0..backend_count);
            if second != target {
                edges.push(edge(&format!("svc{i}"), &format!("backend{second}")));
            }
        }
    }

    let mut w = workload(rng.gen_range(100..20_000), rng.gen_range(5..20));
    w.mode = ["constant", "burst", "spike"][rng.gen_range(0..3)].to_string();
    w.seed = Some(seed);

    (input(nodes, edges, w), capacities)
}

#[test]
fn traffic_is_conserved_at_entries() {
    for seed in 0..20 {
        let (spec, _) = random_input(seed);
        let output = Engine::new(spec).run().unwrap();

        let dispatched: u64 = output
            .time_series
            .iter()
            .map(|p| p.incoming_rps.round() as u64)
            .sum();
        assert_eq!(
            output.metrics.total_requests, dispatched,
            "seed {seed}: totalRequests must equal the dispatched workload"
        );
    }
}

#[test]
fn error_rates_stay_in_bounds() {
    for seed in 0..20 {
        let (spec, _) = random_input(seed);
        let output = Engine::new(spec).run().unwrap();
        let metrics = &output.metrics;

        assert!(metrics.failed_requests <= metrics.total_requests, "seed {seed}");
        assert!((0.0..=1.0).contains(&metrics.error_rate), "seed {seed}");
        for point in &output.time_series {
            assert!(
                (0.0..=100.0).contains(&point.error_rate_percent),
                "seed {seed}, tick {}",
                point.tick
            );
        }
    }
}

#[test]
fn latency_never_exceeds_the_ceiling() {
    for seed in 0..20 {
        let (spec, _) = random_input(seed);
        let output = Engine::new(spec).run().unwrap();

        assert!(output.metrics.latency.max <= 30_000.0, "seed {seed}");
        for point in &output.time_series {
            assert!(point.latency.max <= 30_000.0, "seed {seed}");
            for metrics in point.node_metrics.values() {
                assert!(metrics.latency_ms <= 30_000.0, "seed {seed}");
            }
        }
    }
}

#[test]
fn percentiles_are_monotonic() {
    for seed in 0..20 {
        let (spec, _) = random_input(seed);
        let output = Engine::new(spec).run().unwrap();

        let latency = &output.metrics.latency;
        assert!(latency.p50 <= latency.p95, "seed {seed}");
        assert!(latency.p95 <= latency.p99, "seed {seed}");
        assert!(latency.p99 <= latency.max, "seed {seed}");

        for point in &output.time_series {
            assert!(point.latency.p50 <= point.latency.p95, "seed {seed}");
            assert!(point.latency.p95 <= point.latency.p99, "seed {seed}");
        }
    }
}

#[test]
fn outgoing_never_exceeds_capacity() {
    for seed in 0..20 {
        let (spec, capacities) = random_input(seed);
        let replicas: std::collections::HashMap<String, f64> = spec
            .nodes
            .iter()
            .map(|n| {
                let r = n
                    .data
                    .config
                    .get("replicas")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(1.0);
                (n.id.clone(), r)
            })
            .collect();
        let output = Engine::new(spec).run().unwrap();

        for point in &output.time_series {
            for (id, capacity) in &capacities {
                let node_metrics = &point.node_metrics[id];
                let limit = capacity * replicas[id];
                // rpsOut is rounded to one decimal in the snapshot
                assert!(
                    node_metrics.rps_out <= limit + 0.05,
                    "seed {seed}: {id} emitted {} over capacity {limit}",
                    node_metrics.rps_out
                );
            }
        }
    }
}

#[test]
fn identical_seeds_give_identical_outputs() {
    for seed in [3, 11, 17] {
        let (spec, _) = random_input(seed);
        let a = Engine::new(spec.clone()).run().unwrap();
        let b = Engine::new(spec).run().unwrap();

        assert_eq!(a.metrics.total_requests, b.metrics.total_requests);
        assert_eq!(a.metrics.failed_requests, b.metrics.failed_requests);
        assert_eq!(a.metrics.latency, b.metrics.latency);
        assert_eq!(a.time_series.len(), b.time_series.len());
        for (pa, pb) in a.time_series.iter().zip(&b.time_series) {
            assert_eq!(pa.incoming_rps, pb.incoming_rps);
            assert_eq!(pa.queue_depth, pb.queue_depth);
        }
    }
}

#[test]
fn perfect_cache_starves_the_database() {
    let spec = input(
        vec![
            client("c"),
            node(
                "r",
                "cache_redis",
                json!({"capacityRPS": 50000, "latencyMS": 2, "cacheHitRate": 1.0}),
            ),
            node(
                "d",
                "database_postgres",
                json!({"capacityRPS": 500, "latencyMS": 5}),
            ),
        ],
        vec![edge("c", "r"), edge("r", "d")],
        workload(2000, 10),
    );

    let output = Engine::new(spec).run().unwrap();
    let last = output.time_series.last().unwrap();
    assert_eq!(last.node_metrics["d"].rps_in, 0.0);
    assert_eq!(last.node_metrics["d"].rps_out, 0.0);
}
