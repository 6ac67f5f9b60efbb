//! Aggregation: percentiles, time-series points, per-node snapshots,
//! bottleneck diagnoses and SLA evaluation

use crate::resources::{self, ResourceDimension};
use crate::state::{NodeState, SimulationState};
use crate::types::{
    AggregateMetrics, Bottleneck, LatencyMetrics, NodeMetrics, NodeStatus, Severity, SlaConfig,
    SlaStatus, TimeSeriesPoint,
};
use std::collections::HashMap;

/// Samples per rolling window for time-series percentiles.
const ROLLING_WINDOW: usize = 100;

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Nearest-rank percentile over a sorted sample set: `ceil(p·n) − 1`,
/// clamped to the valid index range.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = ((p * sorted.len() as f64).ceil() as isize - 1)
        .clamp(0, sorted.len() as isize - 1) as usize;
    sorted[index]
}

fn latency_from_sorted(sorted: &[f64]) -> LatencyMetrics {
    if sorted.is_empty() {
        return LatencyMetrics::default();
    }
    let sum: f64 = sorted.iter().sum();
    LatencyMetrics {
        p50: percentile(sorted, 0.50),
        p95: percentile(sorted, 0.95),
        p99: percentile(sorted, 0.99),
        avg: sum / sorted.len() as f64,
        max: sorted[sorted.len() - 1],
    }
}

/// Final metrics over the whole run. Success is derived from
/// `total − failed`; failed is defensively capped at total and the error
/// rate clamped to [0, 1].
pub fn aggregate_metrics(state: &SimulationState, duration_seconds: u64) -> AggregateMetrics {
    let mut sorted = state.latency_history.clone();
    sorted.sort_by(f64::total_cmp);

    let mut latency = latency_from_sorted(&sorted);
    latency.p50 = round2(latency.p50);
    latency.p95 = round2(latency.p95);
    latency.p99 = round2(latency.p99);
    latency.avg = round2(latency.avg);
    latency.max = round2(latency.max);

    let failed = state.failed_requests.min(state.total_requests);
    let successful = state.total_requests - failed;
    let throughput = successful as f64 / duration_seconds.max(1) as f64;

    let error_rate = if state.total_requests > 0 {
        (failed as f64 / state.total_requests as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let cache_accesses = state.cache_hits + state.cache_misses;
    let cache_hit_rate = if cache_accesses > 0 {
        state.cache_hits as f64 / cache_accesses as f64
    } else {
        0.0
    };

    AggregateMetrics {
        latency,
        throughput,
        error_rate,
        cache_hit_rate,
        queue_depth: state.total_queue_depth(),
        total_requests: state.total_requests,
        successful_requests: successful,
        failed_requests: failed,
        autoscaling_events: Vec::new(),
    }
}

/// Metrics for one tick, with percentiles over the last 100 latency samples.
pub fn time_series_point(
    state: &SimulationState,
    sla: Option<&SlaConfig>,
    tick: u64,
    incoming_rps: f64,
    duration_seconds: u64,
) -> TimeSeriesPoint {
    let window_start = state.latency_history.len().saturating_sub(ROLLING_WINDOW);
    let mut window: Vec<f64> = state.latency_history[window_start..].to_vec();
    window.sort_by(f64::total_cmp);
    let latency = latency_from_sorted(&window);

    let throughput = state.successful_requests() as f64 / tick.max(1) as f64;

    let error_rate = if state.total_requests > 0 {
        (state.failed_requests as f64 / state.total_requests as f64).min(1.0)
    } else {
        0.0
    };
    let drop_rate = if state.total_requests > 0 {
        state.dropped_requests as f64 / state.total_requests as f64
    } else {
        0.0
    };

    let cache_accesses = state.cache_hits + state.cache_misses;
    let cache_hit_ratio = if cache_accesses > 0 {
        state.cache_hits as f64 / cache_accesses as f64
    } else {
        0.0
    };

    // Queue backlog and an estimated wait from depth over drain rate
    let mut queue_depth = 0u64;
    let mut queue_wait_time = 0.0;
    let mut queue_count = 0u32;
    for node in state.node_states.values() {
        if node.is_queue_like() {
            queue_depth += node.queue_depth;
            if node.queue_depth > 0 && node.base_capacity_rps > 0.0 {
                queue_wait_time += node.queue_depth as f64 / node.effective_capacity() * 1000.0;
                queue_count += 1;
            }
        }
    }
    if queue_count > 0 {
        queue_wait_time /= f64::from(queue_count);
    }

    let node_count = state.node_states.len();
    let (mut cpu_sum, mut mem_sum) = (0.0, 0.0);
    for node in state.node_states.values() {
        cpu_sum += node.cpu_usage;
        mem_sum += node.memory_usage;
    }
    let (avg_cpu, avg_mem) = if node_count > 0 {
        (cpu_sum / node_count as f64, mem_sum / node_count as f64)
    } else {
        (0.0, 20.0)
    };

    let (region_latency, region_traffic, region_error_rate) =
        regional_metrics(state, duration_seconds);

    let (sla_status, _) = check_sla(sla, &latency, error_rate, throughput);

    TimeSeriesPoint {
        tick,
        incoming_rps,
        throughput_rps: throughput,
        total_rps: throughput,
        latency,
        error_rate_percent: error_rate * 100.0,
        queue_depth,
        queue_wait_time,
        cache_hit_ratio,
        drop_rate,
        cpu_usage_percent: avg_cpu,
        memory_usage_percent: avg_mem,
        // Coarse approximation: a tenth of the average latency is wire time
        network_latency_ms: latency.avg * 0.1,
        region_latency_map: region_latency,
        region_traffic_map: region_traffic,
        region_error_rate_map: region_error_rate,
        node_metrics: node_metrics_snapshot(state),
        failures_active: state.active_failures.clone(),
        sla_status,
        scaling_events: Vec::new(),
    }
}

/// Detailed per-node metrics for a time-series point.
pub fn node_metrics_snapshot(state: &SimulationState) -> HashMap<String, NodeMetrics> {
    let mut metrics = HashMap::with_capacity(state.node_states.len());

    for (id, node) in &state.node_states {
        let is_client = node.is_client();
        let capacity = node.effective_capacity();

        let usage = if is_client {
            None
        } else {
            Some(resources::usage_for(node, node.current_load, capacity))
        };
        let (cpu, mem, disk, net, bottleneck) = match &usage {
            Some(u) => (
                u.cpu_percent,
                u.memory_percent,
                u.disk_io_percent,
                u.network_percent,
                u.bottleneck,
            ),
            None => (0.0, 0.0, 0.0, 0.0, ResourceDimension::None),
        };

        let status = if is_client {
            NodeStatus::Normal
        } else if node.failed {
            NodeStatus::Failed
        } else if cpu > 90.0 || mem > 90.0 || disk > 90.0 || node.error_count > 100 {
            NodeStatus::Danger
        } else if cpu > 75.0 || mem > 75.0 || disk > 75.0 || node.error_count > 10 {
            NodeStatus::Warning
        } else {
            NodeStatus::Normal
        };

        let cache_hit_rate = node.is_cache().then_some(node.cache_hit_rate);

        let success_rate = if node.rps_in > 0.0 {
            ((node.rps_in - node.error_count as f64) / node.rps_in * 100.0).max(0.0)
        } else {
            100.0
        };

        metrics.insert(
            id.clone(),
            NodeMetrics {
                node_id: id.clone(),
                rps_in: round1(node.rps_in),
                rps_out: round1(node.rps_out),
                latency_ms: round2(node.latency_ms),
                cpu_percent: round1(cpu),
                mem_percent: round1(mem),
                disk_io_percent: round1(disk),
                network_percent: round1(net),
                errors: node.error_count,
                queue_depth: node.queue_depth,
                cache_hit_rate,
                status,
                success_rate: round1(success_rate),
                replicas: node.replicas,
                bottleneck,
            },
        );
    }

    metrics
}

/// Per-region latency, traffic and error-rate aggregation. Request totals
/// come from entry nodes only so multi-hop paths are not double counted;
/// single-region setups reuse the global error rate.
fn regional_metrics(
    state: &SimulationState,
    duration_seconds: u64,
) -> (
    HashMap<String, f64>,
    HashMap<String, f64>,
    HashMap<String, f64>,
) {
    let mut region_latency: HashMap<String, f64> = HashMap::new();
    let mut region_traffic: HashMap<String, f64> = HashMap::new();
    let mut region_errors: HashMap<String, f64> = HashMap::new();
    let mut region_counts: HashMap<String, u32> = HashMap::new();
    let mut region_total_requests: HashMap<String, u64> = HashMap::new();
    let mut region_failed_requests: HashMap<String, u64> = HashMap::new();

    for node in state.node_states.values() {
        let region = if node.region.is_empty() {
            "default"
        } else {
            node.region.as_str()
        };

        if node.latency_ms > 0.0 {
            *region_latency.entry(region.to_string()).or_default() += node.latency_ms;
            *region_counts.entry(region.to_string()).or_default() += 1;
        }

        *region_traffic.entry(region.to_string()).or_default() += node.rps_in;

        if crate::graph::is_entry_type(&node.node_type) {
            let total = (node.rps_out * duration_seconds as f64) as u64;
            *region_total_requests.entry(region.to_string()).or_default() += total;
        }
        *region_failed_requests.entry(region.to_string()).or_default() += node.error_count;
    }

    for (region, total) in region_latency.iter_mut() {
        if let Some(count) = region_counts.get(region) {
            if *count > 0 {
                *total /= f64::from(*count);
            }
        }
    }

    let single_region = region_total_requests.is_empty()
        || (region_total_requests.len() == 1 && state.total_requests > 0);
    if single_region {
        let global = if state.total_requests > 0 {
            round1(state.failed_requests as f64 / state.total_requests as f64 * 100.0)
        } else {
            0.0
        };
        for region in region_traffic.keys() {
            region_errors.insert(region.clone(), global);
        }
    } else {
        for (region, total) in &region_total_requests {
            let rate = if *total > 0 {
                round1(
                    *region_failed_requests.get(region).unwrap_or(&0) as f64 / *total as f64
                        * 100.0,
                )
            } else {
                0.0
            };
            region_errors.insert(region.clone(), rate);
        }
    }

    (region_latency, region_traffic, region_errors)
}

fn overload_suggestions(node: &NodeState) -> Vec<String> {
    let mut suggestions = vec![
        "Increase replica count".to_string(),
        "Add horizontal scaling".to_string(),
        "Optimize request processing".to_string(),
    ];
    if matches!(node.node_type.as_str(), "database_sql" | "database_nosql") {
        suggestions.push("Add read replicas".to_string());
        suggestions.push("Enable caching layer".to_string());
    }
    suggestions
}

/// Diagnose performance bottlenecks across all nodes: overload, saturated
/// resource dimensions, queue backlog and poor cache hit rates.
pub fn detect_bottlenecks(state: &SimulationState) -> Vec<Bottleneck> {
    let mut bottlenecks = Vec::new();

    for id in &state.node_order {
        let node = &state.node_states[id.as_str()];
        let capacity = node.effective_capacity();
        let usage = resources::usage_for(node, node.current_load, capacity);

        if node.current_load > capacity * 1.2 {
            let severity = if node.current_load > capacity * 2.0 {
                Severity::Critical
            } else {
                Severity::High
            };
            bottlenecks.push(Bottleneck {
                node_id: id.clone(),
                issue: "Overloaded".to_string(),
                root_cause: format!(
                    "Incoming load ({:.0} RPS) exceeds capacity ({:.0} RPS)",
                    node.current_load, capacity
                ),
                impact: "High latency, request dropping, potential failures".to_string(),
                suggestions: overload_suggestions(node),
                severity,
            });
        }

        match usage.bottleneck {
            ResourceDimension::Cpu => {
                if usage.cpu_percent > 85.0 && !node.failed {
                    let mut suggestions = vec![
                        "Scale horizontally".to_string(),
                        "Optimize algorithms".to_string(),
                    ];
                    if matches!(node.node_type.as_str(), "database_sql" | "database_graph") {
                        suggestions.push("Optimize queries".to_string());
                        suggestions.push("Add indexes".to_string());
                    }
                    bottlenecks.push(Bottleneck {
                        node_id: id.clone(),
                        issue: "High CPU Usage".to_string(),
                        root_cause: format!(
                            "CPU at {:.1}% (CPU-bound workload)",
                            usage.cpu_percent
                        ),
                        impact: "Degraded performance, increased latency".to_string(),
                        suggestions,
                        severity: Severity::Medium,
                    });
                }
            }
            ResourceDimension::Memory => {
                if usage.memory_percent > 85.0 {
                    let suggestions = if node.is_cache() {
                        vec![
                            "Increase cache size".to_string(),
                            "Implement eviction policy".to_string(),
                            "Add cache sharding".to_string(),
                        ]
                    } else if node.node_type == "database_nosql" {
                        vec![
                            "Increase memory".to_string(),
                            "Optimize document size".to_string(),
                            "Add sharding".to_string(),
                        ]
                    } else {
                        vec![
                            "Increase instance size".to_string(),
                            "Add more memory".to_string(),
                        ]
                    };
                    bottlenecks.push(Bottleneck {
                        node_id: id.clone(),
                        issue: "High Memory Usage".to_string(),
                        root_cause: format!(
                            "Memory at {:.1}% (memory-bound workload)",
                            usage.memory_percent
                        ),
                        impact: "Risk of OOM errors, swapping, performance degradation"
                            .to_string(),
                        suggestions,
                        severity: Severity::High,
                    });
                }
            }
            ResourceDimension::Disk => {
                if usage.disk_io_percent > 85.0 {
                    let suggestions = if node.node_type == "database_timeseries" {
                        vec![
                            "Increase write buffer".to_string(),
                            "Optimize retention policy".to_string(),
                            "Use faster storage".to_string(),
                        ]
                    } else {
                        let mut s = vec![
                            "Upgrade storage type (e.g., gp3 \u{2192} io2)".to_string(),
                            "Add read replicas".to_string(),
                        ];
                        if node.node_type == "database_sql" {
                            s.push("Optimize indexes".to_string());
                            s.push("Partition tables".to_string());
                        }
                        s
                    };
                    bottlenecks.push(Bottleneck {
                        node_id: id.clone(),
                        issue: "High Disk I/O".to_string(),
                        root_cause: format!(
                            "Disk I/O at {:.1}% (I/O-bound workload)",
                            usage.disk_io_percent
                        ),
                        impact: "Slow queries, write delays, increased latency".to_string(),
                        suggestions,
                        severity: Severity::High,
                    });
                }
            }
            ResourceDimension::Network => {
                if usage.network_percent > 90.0 {
                    let suggestions = if node.node_type == "load_balancer" {
                        vec![
                            "Upgrade to NLB for higher throughput".to_string(),
                            "Add more load balancers".to_string(),
                            "Enable connection pooling".to_string(),
                        ]
                    } else {
                        vec![
                            "Upgrade instance type for better network".to_string(),
                            "Add CDN".to_string(),
                            "Implement compression".to_string(),
                        ]
                    };
                    bottlenecks.push(Bottleneck {
                        node_id: id.clone(),
                        issue: "Network Saturation".to_string(),
                        root_cause: format!(
                            "Network at {:.1}% (network-bound)",
                            usage.network_percent
                        ),
                        impact: "Packet loss, connection timeouts, degraded throughput"
                            .to_string(),
                        suggestions,
                        severity: Severity::High,
                    });
                }
            }
            ResourceDimension::None => {}
        }

        if node.is_queue_like()
            && node.max_queue_depth > 0
            && node.queue_depth as f64 > node.max_queue_depth as f64 * 0.5
        {
            let fill = node.queue_depth as f64 / node.max_queue_depth as f64;
            let severity = if node.queue_depth >= node.max_queue_depth {
                Severity::Critical
            } else if fill > 0.8 {
                Severity::High
            } else {
                Severity::Medium
            };
            bottlenecks.push(Bottleneck {
                node_id: id.clone(),
                issue: "Queue Backlog".to_string(),
                root_cause: format!(
                    "Queue filling up: {}/{} ({:.0}%)",
                    node.queue_depth,
                    node.max_queue_depth,
                    fill * 100.0
                ),
                impact: "Increased wait times, potential message loss".to_string(),
                suggestions: vec![
                    "Increase queue capacity".to_string(),
                    "Add more consumers (workers)".to_string(),
                    "Implement backpressure".to_string(),
                ],
                severity,
            });
        }

        if node.is_cache() && node.cache_hit_rate < 0.5 {
            bottlenecks.push(Bottleneck {
                node_id: id.clone(),
                issue: "Low Cache Hit Rate".to_string(),
                root_cause: format!("Cache hit rate at {:.1}%", node.cache_hit_rate * 100.0),
                impact: "Database overload, increased latency".to_string(),
                suggestions: vec![
                    "Increase cache size".to_string(),
                    "Optimize TTL strategy".to_string(),
                    "Review caching patterns".to_string(),
                    "Pre-warm cache".to_string(),
                ],
                severity: Severity::Medium,
            });
        }
    }

    bottlenecks
}

/// Evaluate SLA targets. Zero violations is GOOD, one or two WARNING,
/// three or more FAIL. Without a config everything is GOOD.
pub fn check_sla(
    sla: Option<&SlaConfig>,
    latency: &LatencyMetrics,
    error_rate: f64,
    throughput: f64,
) -> (SlaStatus, Vec<String>) {
    let Some(sla) = sla else {
        return (SlaStatus::Good, Vec::new());
    };

    let mut violations = Vec::new();

    if sla.p95_latency_ms > 0.0 && latency.p95 > sla.p95_latency_ms {
        violations.push(format!(
            "P95 latency ({:.1}ms) exceeds target ({:.1}ms)",
            latency.p95, sla.p95_latency_ms
        ));
    }
    if sla.p99_latency_ms > 0.0 && latency.p99 > sla.p99_latency_ms {
        violations.push(format!(
            "P99 latency ({:.1}ms) exceeds target ({:.1}ms)",
            latency.p99, sla.p99_latency_ms
        ));
    }
    if sla.error_rate_percent > 0.0 && error_rate * 100.0 > sla.error_rate_percent {
        violations.push(format!(
            "Error rate ({:.2}%) exceeds target ({:.2}%)",
            error_rate * 100.0,
            sla.error_rate_percent
        ));
    }
    if sla.min_throughput_rps > 0.0 && throughput < sla.min_throughput_rps {
        violations.push(format!(
            "Throughput ({:.0} RPS) below target ({:.0} RPS)",
            throughput, sla.min_throughput_rps
        ));
    }

    let status = match violations.len() {
        0 => SlaStatus::Good,
        1 | 2 => SlaStatus::Warning,
        _ => SlaStatus::Fail,
    };
    (status, violations)
}
