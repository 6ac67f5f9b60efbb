//! Per-component-type resource model
//!
//! Maps a node's load ratio (and read/write mix or queue depth where that
//! matters) to CPU, memory, disk I/O and network utilization, and names the
//! dominant bottleneck. Each component class has its own saturation profile:
//! caches are memory-bound, load balancers network-bound, SQL databases go
//! to disk first, and so on. All outputs are clamped to the documented caps.

use crate::state::NodeState;
use serde::{Deserialize, Serialize};

/// The resource dimension that saturates first for a node under load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceDimension {
    Cpu,
    Memory,
    Disk,
    Network,
    None,
}

impl ResourceDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceDimension::Cpu => "cpu",
            ResourceDimension::Memory => "memory",
            ResourceDimension::Disk => "disk",
            ResourceDimension::Network => "network",
            ResourceDimension::None => "none",
        }
    }
}

/// Utilization percentages plus the dominant bottleneck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceUsage {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_io_percent: f64,
    pub network_percent: f64,
    pub bottleneck: ResourceDimension,
}

/// Compute resource usage for a node given its incoming load and effective
/// capacity. Zero capacity yields the idle baseline.
pub fn usage_for(node: &NodeState, incoming_rps: f64, effective_capacity: f64) -> ResourceUsage {
    if effective_capacity == 0.0 {
        return ResourceUsage {
            cpu_percent: 0.0,
            memory_percent: 20.0,
            disk_io_percent: 0.0,
            network_percent: 0.0,
            bottleneck: ResourceDimension::None,
        };
    }

    let r = (incoming_rps / effective_capacity).max(0.0);

    match node.node_type.as_str() {
        "api_server" | "web_server" | "microservice" => compute_usage(r),
        "database_sql" | "database_postgres" | "database_mysql" => sql_database_usage(node, r),
        "database_nosql" | "database_mongodb" => nosql_database_usage(node, r),
        "database_graph" => graph_database_usage(r),
        "database_timeseries" => timeseries_database_usage(r),
        "cache_redis" | "cache_memcached" => cache_usage(r),
        "queue" | "message_broker" | "event_bus" => queue_usage(node, r),
        "load_balancer" | "api_gateway" | "reverse_proxy" => load_balancer_usage(r),
        "worker" => worker_usage(r),
        "object_storage" | "file_storage" => storage_usage(r),
        "cdn" => cdn_usage(r),
        "search" => search_usage(r),
        "monitoring" | "logging" | "analytics_service" => telemetry_usage(r),
        "apm" => apm_usage(r),
        "sidecar_proxy" => sidecar_proxy_usage(r),
        "rum" => rum_usage(r),
        "synthetic_monitoring" => synthetic_monitoring_usage(r),
        "graphql_gateway" => graphql_gateway_usage(r),
        "grpc_server" => grpc_server_usage(r),
        "wasm_runtime" => wasm_runtime_usage(r),
        "blockchain_node" => blockchain_node_usage(r),
        "lambda_function" | "cloud_function" | "azure_function" => serverless_usage(r),
        "sagemaker_endpoint" | "vertex_ai_endpoint" | "azure_ml_endpoint" => ml_endpoint_usage(r),
        "k8s_pod" => k8s_pod_usage(r),
        "k8s_service" => k8s_service_usage(r),
        "k8s_ingress" => k8s_ingress_usage(r),
        "azure_app_service" | "gcp_app_engine" => paas_web_app_usage(r),
        "azure_cosmos_db" => cosmos_db_usage(r),
        "gcp_firestore" => firestore_usage(r),
        "azure_service_bus" | "gcp_pub_sub" => managed_messaging_usage(r),
        _ => default_usage(r),
    }
}

/// API/web servers: CPU-bound with moderate memory.
fn compute_usage(r: f64) -> ResourceUsage {
    let cpu = (r * 100.0).min(100.0);
    let memory = (30.0 + r * 40.0).min(90.0);

    let bottleneck = if cpu > 85.0 {
        ResourceDimension::Cpu
    } else if memory > 85.0 {
        ResourceDimension::Memory
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: memory,
        disk_io_percent: 10.0,
        network_percent: (r * 80.0).min(100.0),
        bottleneck,
    }
}

/// SQL databases: CPU for query work, disk for WAL and data pages, buffer
/// pool memory driven by the read share.
fn sql_database_usage(node: &NodeState, r: f64) -> ResourceUsage {
    let read_ratio = node.read_ratio as f64 / 100.0;
    let write_ratio = 1.0 - read_ratio;

    // Writes cost ~1.5x in locks, constraints and WAL
    let cpu = ((20.0 + r * 60.0) * (1.0 + write_ratio * 0.5)).min(100.0);
    // Writes always hit disk; reads can be served from the buffer pool
    let disk_io = ((10.0 + r * 50.0) * (0.5 + write_ratio * 2.0)).min(100.0);
    let memory = ((40.0 + r * 40.0) * (0.8 + read_ratio * 0.4)).min(95.0);

    let bottleneck = if disk_io > 85.0 {
        ResourceDimension::Disk
    } else if cpu > 85.0 {
        ResourceDimension::Cpu
    } else if memory > 85.0 {
        ResourceDimension::Memory
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: memory,
        disk_io_percent: disk_io,
        network_percent: (r * 60.0).min(100.0),
        bottleneck,
    }
}

/// NoSQL stores: lighter CPU than SQL, memory weighted toward reads,
/// write-heavy disk from append logs and compaction.
fn nosql_database_usage(node: &NodeState, r: f64) -> ResourceUsage {
    let read_ratio = node.read_ratio as f64 / 100.0;
    let write_ratio = 1.0 - read_ratio;

    let cpu = ((15.0 + r * 45.0) * (1.0 + write_ratio * 0.3)).min(100.0);
    let memory = ((40.0 + r * 40.0) * (0.7 + read_ratio * 0.6)).min(95.0);
    let disk_io = ((10.0 + r * 50.0) * (0.6 + write_ratio * 1.8)).min(100.0);

    let bottleneck = if memory > 90.0 {
        ResourceDimension::Memory
    } else if disk_io > 85.0 {
        ResourceDimension::Disk
    } else if cpu > 85.0 {
        ResourceDimension::Cpu
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: memory,
        disk_io_percent: disk_io,
        network_percent: (r * 70.0).min(100.0),
        bottleneck,
    }
}

/// Graph databases keep the graph in RAM and burn CPU on traversals.
fn graph_database_usage(r: f64) -> ResourceUsage {
    let cpu = (30.0 + r * 65.0).min(100.0);
    let memory = (60.0 + r * 30.0).min(95.0);

    let bottleneck = if memory > 90.0 {
        ResourceDimension::Memory
    } else {
        ResourceDimension::Cpu
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: memory,
        disk_io_percent: (20.0 + r * 50.0).min(100.0),
        network_percent: (r * 50.0).min(100.0),
        bottleneck,
    }
}

/// Time-series stores are write-heavy; disk saturates first.
fn timeseries_database_usage(r: f64) -> ResourceUsage {
    let cpu = (25.0 + r * 55.0).min(100.0);

    let bottleneck = if cpu > 90.0 {
        ResourceDimension::Cpu
    } else {
        ResourceDimension::Disk
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: (35.0 + r * 50.0).min(90.0),
        disk_io_percent: (30.0 + r * 65.0).min(100.0),
        network_percent: (r * 75.0).min(100.0),
        bottleneck,
    }
}

/// Caches are memory-bound; CPU stays low even at full load.
fn cache_usage(r: f64) -> ResourceUsage {
    let memory = (40.0 + r * 50.0).min(95.0);
    let network = (r * 90.0).min(100.0);

    let bottleneck = if memory > 85.0 {
        ResourceDimension::Memory
    } else if network > 90.0 {
        ResourceDimension::Network
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: (5.0 + r * 15.0).min(25.0),
        memory_percent: memory,
        disk_io_percent: 0.0,
        network_percent: network,
        bottleneck,
    }
}

/// Queues route messages over the network; memory tracks the backlog, and
/// persistent brokers additionally pay disk.
fn queue_usage(node: &NodeState, r: f64) -> ResourceUsage {
    let queue_utilization = if node.max_queue_depth > 0 {
        node.queue_depth as f64 / node.max_queue_depth as f64
    } else {
        0.0
    };
    let memory = (20.0 + queue_utilization * 70.0).min(95.0);
    let network = (r * 95.0).min(100.0);
    let disk_io = if node.node_type == "message_broker" {
        (10.0 + r * 60.0).min(100.0)
    } else {
        0.0
    };

    let bottleneck = if queue_utilization > 0.8 {
        ResourceDimension::Memory
    } else if network > 90.0 {
        ResourceDimension::Network
    } else if disk_io > 85.0 {
        ResourceDimension::Disk
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: (3.0 + r * 12.0).min(20.0),
        memory_percent: memory,
        disk_io_percent: disk_io,
        network_percent: network,
        bottleneck,
    }
}

fn load_balancer_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (2.0 + r * 8.0).min(15.0),
        memory_percent: (10.0 + r * 20.0).min(40.0),
        disk_io_percent: 0.0,
        network_percent: (r * 98.0).min(100.0),
        bottleneck: ResourceDimension::Network,
    }
}

fn worker_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (r * 95.0).min(100.0),
        memory_percent: (25.0 + r * 60.0).min(85.0),
        disk_io_percent: 5.0,
        network_percent: (r * 40.0).min(100.0),
        bottleneck: ResourceDimension::Cpu,
    }
}

fn storage_usage(r: f64) -> ResourceUsage {
    let network = (r * 85.0).min(100.0);
    let bottleneck = if network > 90.0 {
        ResourceDimension::Network
    } else {
        ResourceDimension::Disk
    };

    ResourceUsage {
        cpu_percent: (5.0 + r * 10.0).min(20.0),
        memory_percent: (15.0 + r * 25.0).min(50.0),
        disk_io_percent: (20.0 + r * 70.0).min(100.0),
        network_percent: network,
        bottleneck,
    }
}

fn cdn_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (1.0 + r * 5.0).min(10.0),
        memory_percent: (10.0 + r * 15.0).min(30.0),
        disk_io_percent: 5.0,
        network_percent: (r * 99.0).min(100.0),
        bottleneck: ResourceDimension::Network,
    }
}

fn search_usage(r: f64) -> ResourceUsage {
    let memory = (50.0 + r * 40.0).min(95.0);
    let bottleneck = if memory > 90.0 {
        ResourceDimension::Memory
    } else {
        ResourceDimension::Cpu
    };

    ResourceUsage {
        cpu_percent: (25.0 + r * 65.0).min(100.0),
        memory_percent: memory,
        disk_io_percent: (15.0 + r * 55.0).min(100.0),
        network_percent: (r * 60.0).min(100.0),
        bottleneck,
    }
}

/// Monitoring and logging pipelines: heavy ingestion and disk writes,
/// efficient batch CPU.
fn telemetry_usage(r: f64) -> ResourceUsage {
    let disk_io = (10.0 + r * 80.0).min(100.0);
    let network = (r * 90.0).min(100.0);

    let bottleneck = if disk_io > 90.0 {
        ResourceDimension::Disk
    } else if network > 90.0 {
        ResourceDimension::Network
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: (5.0 + r * 25.0).min(30.0),
        memory_percent: (20.0 + r * 40.0).min(60.0),
        disk_io_percent: disk_io,
        network_percent: network,
        bottleneck,
    }
}

fn apm_usage(r: f64) -> ResourceUsage {
    let cpu = (15.0 + r * 55.0).min(80.0);
    let network = (r * 95.0).min(100.0);

    let bottleneck = if network > 90.0 {
        ResourceDimension::Network
    } else if cpu > 85.0 {
        ResourceDimension::Cpu
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: (30.0 + r * 50.0).min(85.0),
        disk_io_percent: (10.0 + r * 40.0).min(60.0),
        network_percent: network,
        bottleneck,
    }
}

fn sidecar_proxy_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (3.0 + r * 12.0).min(20.0),
        memory_percent: (10.0 + r * 20.0).min(35.0),
        disk_io_percent: (5.0 + r * 10.0).min(20.0),
        network_percent: (r * 98.0).min(100.0),
        bottleneck: ResourceDimension::Network,
    }
}

fn rum_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (2.0 + r * 8.0).min(15.0),
        memory_percent: (15.0 + r * 25.0).min(50.0),
        disk_io_percent: (5.0 + r * 20.0).min(30.0),
        network_percent: (r * 92.0).min(100.0),
        bottleneck: ResourceDimension::Network,
    }
}

fn synthetic_monitoring_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (10.0 + r * 40.0).min(60.0),
        memory_percent: (10.0 + r * 20.0).min(40.0),
        disk_io_percent: (3.0 + r * 10.0).min(20.0),
        network_percent: (r * 85.0).min(100.0),
        bottleneck: ResourceDimension::Cpu,
    }
}

/// GraphQL gateways pay for query parsing, planning and stitching.
fn graphql_gateway_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (20.0 + r * 65.0).min(95.0),
        memory_percent: (25.0 + r * 50.0).min(85.0),
        disk_io_percent: (5.0 + r * 15.0).min(25.0),
        network_percent: (r * 88.0).min(100.0),
        bottleneck: ResourceDimension::Cpu,
    }
}

/// gRPC: binary protocol over HTTP/2, cheaper than REST per request.
fn grpc_server_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (12.0 + r * 45.0).min(70.0),
        memory_percent: (20.0 + r * 35.0).min(65.0),
        disk_io_percent: (5.0 + r * 10.0).min(20.0),
        network_percent: (r * 80.0).min(100.0),
        bottleneck: ResourceDimension::Cpu,
    }
}

fn wasm_runtime_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (5.0 + r * 25.0).min(40.0),
        memory_percent: (10.0 + r * 20.0).min(35.0),
        disk_io_percent: (2.0 + r * 5.0).min(10.0),
        network_percent: (r * 95.0).min(100.0),
        bottleneck: ResourceDimension::Network,
    }
}

/// Blockchain nodes grind CPU on validation and hammer disk during sync.
fn blockchain_node_usage(r: f64) -> ResourceUsage {
    let cpu = (40.0 + r * 55.0).min(98.0);
    let bottleneck = if cpu > 90.0 {
        ResourceDimension::Cpu
    } else {
        ResourceDimension::Disk
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: (50.0 + r * 45.0).min(95.0),
        disk_io_percent: (50.0 + r * 48.0).min(100.0),
        network_percent: (r * 85.0).min(100.0),
        bottleneck,
    }
}

fn serverless_usage(r: f64) -> ResourceUsage {
    let cpu = (10.0 + r * 50.0).min(75.0);
    let network = (r * 90.0).min(100.0);

    let bottleneck = if network > 85.0 {
        ResourceDimension::Network
    } else if cpu > 65.0 {
        ResourceDimension::Cpu
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: (15.0 + r * 35.0).min(60.0),
        disk_io_percent: (2.0 + r * 5.0).min(10.0),
        network_percent: network,
        bottleneck,
    }
}

/// Model serving keeps the model resident in RAM and burns CPU on inference.
fn ml_endpoint_usage(r: f64) -> ResourceUsage {
    let memory = (60.0 + r * 35.0).min(95.0);
    let bottleneck = if memory > 90.0 {
        ResourceDimension::Memory
    } else {
        ResourceDimension::Cpu
    };

    ResourceUsage {
        cpu_percent: (30.0 + r * 65.0).min(98.0),
        memory_percent: memory,
        disk_io_percent: (5.0 + r * 10.0).min(20.0),
        network_percent: (r * 80.0).min(100.0),
        bottleneck,
    }
}

fn k8s_pod_usage(r: f64) -> ResourceUsage {
    let cpu = (20.0 + r * 60.0).min(85.0);
    let memory = (25.0 + r * 50.0).min(80.0);

    let bottleneck = if cpu > 75.0 {
        ResourceDimension::Cpu
    } else if memory > 70.0 {
        ResourceDimension::Memory
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: memory,
        disk_io_percent: (5.0 + r * 15.0).min(25.0),
        network_percent: (r * 70.0).min(100.0),
        bottleneck,
    }
}

fn k8s_service_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (2.0 + r * 8.0).min(12.0),
        memory_percent: (3.0 + r * 7.0).min(12.0),
        disk_io_percent: 1.0,
        network_percent: (r * 95.0).min(100.0),
        bottleneck: ResourceDimension::Network,
    }
}

fn k8s_ingress_usage(r: f64) -> ResourceUsage {
    let cpu = (10.0 + r * 30.0).min(45.0);
    let bottleneck = if cpu > 40.0 {
        ResourceDimension::Cpu
    } else {
        ResourceDimension::Network
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: (15.0 + r * 25.0).min(45.0),
        disk_io_percent: (2.0 + r * 5.0).min(10.0),
        network_percent: (r * 90.0).min(100.0),
        bottleneck,
    }
}

fn paas_web_app_usage(r: f64) -> ResourceUsage {
    let cpu = (15.0 + r * 60.0).min(80.0);
    let network = (r * 75.0).min(100.0);

    let bottleneck = if cpu > 70.0 {
        ResourceDimension::Cpu
    } else if network > 80.0 {
        ResourceDimension::Network
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: (20.0 + r * 50.0).min(75.0),
        disk_io_percent: (5.0 + r * 10.0).min(20.0),
        network_percent: network,
        bottleneck,
    }
}

fn cosmos_db_usage(r: f64) -> ResourceUsage {
    let network = (r * 80.0).min(100.0);
    let bottleneck = if network > 85.0 {
        ResourceDimension::Network
    } else {
        ResourceDimension::Disk
    };

    ResourceUsage {
        cpu_percent: (25.0 + r * 50.0).min(80.0),
        memory_percent: (30.0 + r * 50.0).min(85.0),
        disk_io_percent: (20.0 + r * 50.0).min(75.0),
        network_percent: network,
        bottleneck,
    }
}

fn firestore_usage(r: f64) -> ResourceUsage {
    let disk_io = (15.0 + r * 40.0).min(60.0);
    let bottleneck = if disk_io > 55.0 {
        ResourceDimension::Disk
    } else {
        ResourceDimension::Network
    };

    ResourceUsage {
        cpu_percent: (20.0 + r * 45.0).min(70.0),
        memory_percent: (25.0 + r * 45.0).min(75.0),
        disk_io_percent: disk_io,
        network_percent: (r * 85.0).min(100.0),
        bottleneck,
    }
}

fn managed_messaging_usage(r: f64) -> ResourceUsage {
    ResourceUsage {
        cpu_percent: (8.0 + r * 20.0).min(35.0),
        memory_percent: (10.0 + r * 25.0).min(40.0),
        disk_io_percent: (5.0 + r * 15.0).min(25.0),
        network_percent: (r * 90.0).min(100.0),
        bottleneck: ResourceDimension::Network,
    }
}

fn default_usage(r: f64) -> ResourceUsage {
    let cpu = (r * 100.0).min(100.0);
    let bottleneck = if cpu > 85.0 {
        ResourceDimension::Cpu
    } else {
        ResourceDimension::None
    };

    ResourceUsage {
        cpu_percent: cpu,
        memory_percent: (20.0 + r * 60.0).min(80.0),
        disk_io_percent: 10.0,
        network_percent: (r * 70.0).min(100.0),
        bottleneck,
    }
}
