//! Export integration: run a small simulation, export and read back

use archsim_core::{Engine, SimulationInput, SimulationOutput};
use archsim_metrics::{export_csv, export_json, SimulationMetrics};

fn run_small_simulation() -> SimulationOutput {
    let raw = serde_json::json!({
        "nodes": [
            {"id": "c", "type": "client", "data": {"label": "C", "nodeType": "client", "config": {}}},
            {"id": "a", "type": "api_server", "data": {"label": "A", "nodeType": "api_server",
                "config": {"capacityRPS": 2000, "latencyMS": 20}}},
            {"id": "d", "type": "database_postgres", "data": {"label": "D", "nodeType": "database_postgres",
                "config": {"capacityRPS": 800, "latencyMS": 10}}}
        ],
        "edges": [
            {"id": "e1", "source": "c", "target": "a"},
            {"id": "e2", "source": "a", "target": "d"}
        ],
        "workload": {"rps": 1000, "durationSeconds": 8, "mode": "constant", "seed": 11}
    });
    let input: SimulationInput = serde_json::from_value(raw).unwrap();
    Engine::new(input).run().unwrap()
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("archsim-{}-{}", std::process::id(), name))
}

#[test]
fn json_export_round_trips() {
    let output = run_small_simulation();
    let path = temp_path("result.json");

    export_json(&output, &path, true).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: SimulationOutput = serde_json::from_str(&raw).unwrap();

    assert_eq!(parsed.metrics.total_requests, output.metrics.total_requests);
    assert_eq!(parsed.time_series.len(), 8);
    assert!(parsed.success);

    std::fs::remove_file(&path).ok();
}

#[test]
fn csv_export_has_one_row_per_tick() {
    let output = run_small_simulation();
    let path = temp_path("series.csv");

    export_csv(&output, &path).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = raw.lines().collect();

    // Header plus one row per tick
    assert_eq!(lines.len(), 9);
    assert!(lines[0].starts_with("tick,incomingRPS"));
    assert!(lines[1].starts_with("1,1000"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn record_run_builds_latency_histograms() {
    let output = run_small_simulation();

    let mut collected = SimulationMetrics::new();
    collected.record_run(&output);

    assert_eq!(
        collected.get_counter("sim_requests_total", &[]),
        Some(output.metrics.total_requests)
    );

    let stats = collected.latency_stats("node_latency").unwrap();
    assert!(stats.count > 0);
    assert!(stats.p50_ms <= stats.p99_ms);
    // The overloaded database queues: 10 + 10 * (200/800) * 5 = 22.5ms
    assert!(stats.max_ms >= 22.0 && stats.max_ms <= 23.0);
}
