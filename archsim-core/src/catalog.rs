//! Static catalogs: instance and storage specifications, pricing, and the
//! per-type hardware performance derivation
//!
//! Every lookup is total: unknown keys return documented defaults rather
//! than errors, so a half-filled node configuration still simulates.

use crate::config::{self, ConfigMap};

/// Performance characteristics of a compute/database/cache instance type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstancePerformance {
    pub vcpu: u32,
    pub memory_gb: f64,
    pub network_gbps: f64,
    /// Burstable families (t3) trade sustained throughput for price.
    pub burstable: bool,
}

/// Performance characteristics of an EBS storage type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoragePerformance {
    pub iops: u32,
    pub throughput_mbps: u32,
    pub latency_ms: f64,
}

/// Instance specs for the recognized families. Unknown types get a
/// t3.medium-class default.
pub fn instance_performance(instance_type: &str) -> InstancePerformance {
    let (vcpu, memory_gb, network_gbps, burstable) = match instance_type {
        "t3.micro" => (2, 1.0, 5.0, true),
        "t3.small" => (2, 2.0, 5.0, true),
        "t3.medium" => (2, 4.0, 5.0, true),
        "t3.large" => (2, 8.0, 5.0, true),
        "t3.xlarge" => (4, 16.0, 5.0, true),
        "m5.large" => (2, 8.0, 10.0, false),
        "m5.xlarge" => (4, 16.0, 10.0, false),
        "m5.2xlarge" => (8, 32.0, 10.0, false),
        "m5.4xlarge" => (16, 64.0, 10.0, false),
        "c5.large" => (2, 4.0, 10.0, false),
        "c5.xlarge" => (4, 8.0, 10.0, false),
        "c5.2xlarge" => (8, 16.0, 10.0, false),
        "c5.4xlarge" => (16, 32.0, 10.0, false),
        "r5.large" => (2, 16.0, 10.0, false),
        "r5.xlarge" => (4, 32.0, 10.0, false),
        "r5.2xlarge" => (8, 64.0, 10.0, false),
        "db.t3.micro" => (2, 1.0, 5.0, true),
        "db.t3.small" => (2, 2.0, 5.0, true),
        "db.t3.medium" => (2, 4.0, 5.0, true),
        "db.t3.large" => (2, 8.0, 5.0, true),
        "db.m5.large" => (2, 8.0, 10.0, false),
        "db.m5.xlarge" => (4, 16.0, 10.0, false),
        "db.r5.large" => (2, 16.0, 10.0, false),
        "db.r5.xlarge" => (4, 32.0, 10.0, false),
        "cache.t3.micro" => (2, 0.5, 5.0, true),
        "cache.t3.small" => (2, 1.37, 5.0, true),
        "cache.t3.medium" => (2, 3.09, 5.0, true),
        "cache.m5.large" => (2, 6.38, 10.0, false),
        "cache.r5.large" => (2, 13.07, 10.0, false),
        _ => (2, 4.0, 5.0, true),
    };
    InstancePerformance {
        vcpu,
        memory_gb,
        network_gbps,
        burstable,
    }
}

/// Hourly cost in USD for an instance type; unknown types cost $0.05/hr.
pub fn instance_cost(instance_type: &str) -> f64 {
    match instance_type {
        // Compute (EC2)
        "t3.micro" => 0.0104,
        "t3.small" => 0.0208,
        "t3.medium" => 0.0416,
        "t3.large" => 0.0832,
        "t3.xlarge" => 0.1664,
        "t3.2xlarge" => 0.3328,
        "m5.large" => 0.096,
        "m5.xlarge" => 0.192,
        "m5.2xlarge" => 0.384,
        "m5.4xlarge" => 0.768,
        "m5.8xlarge" => 1.536,
        "c5.large" => 0.085,
        "c5.xlarge" => 0.17,
        "c5.2xlarge" => 0.34,
        "c5.4xlarge" => 0.68,
        "c5.9xlarge" => 1.53,
        "r5.large" => 0.126,
        "r5.xlarge" => 0.252,
        "r5.2xlarge" => 0.504,
        "r5.4xlarge" => 1.008,
        // Database (RDS)
        "db.t3.micro" => 0.017,
        "db.t3.small" => 0.034,
        "db.t3.medium" => 0.068,
        "db.t3.large" => 0.136,
        "db.t3.xlarge" => 0.272,
        "db.t3.2xlarge" => 0.544,
        "db.m5.large" => 0.188,
        "db.m5.xlarge" => 0.376,
        "db.m5.2xlarge" => 0.752,
        "db.m5.4xlarge" => 1.504,
        "db.m5.8xlarge" => 3.008,
        "db.r5.large" => 0.29,
        "db.r5.xlarge" => 0.58,
        "db.r5.2xlarge" => 1.16,
        "db.r5.4xlarge" => 2.32,
        "db.r5.8xlarge" => 4.64,
        // Cache (ElastiCache)
        "cache.t3.micro" => 0.017,
        "cache.t3.small" => 0.034,
        "cache.t3.medium" => 0.068,
        "cache.t3.large" => 0.136,
        "cache.m5.large" => 0.136,
        "cache.m5.xlarge" => 0.272,
        "cache.m5.2xlarge" => 0.544,
        "cache.m5.4xlarge" => 1.088,
        "cache.r5.large" => 0.252,
        "cache.r5.xlarge" => 0.504,
        "cache.r5.2xlarge" => 1.008,
        "cache.r5.4xlarge" => 2.016,
        _ => 0.05,
    }
}

/// Storage specs; unknown types behave as gp3.
pub fn storage_performance(storage_type: &str) -> StoragePerformance {
    let (iops, throughput_mbps, latency_ms) = match storage_type {
        "gp2" => (3000, 128, 1.2),
        "io2" => (64000, 1000, 0.5),
        "io1" => (50000, 1000, 0.6),
        "st1" => (500, 500, 5.0),
        "sc1" => (250, 250, 10.0),
        // gp3 and everything else
        _ => (3000, 125, 1.0),
    };
    StoragePerformance {
        iops,
        throughput_mbps,
        latency_ms,
    }
}

/// Storage price in USD per GB-month; unknown types cost $0.10.
pub fn storage_cost_per_gb_month(storage_type: &str) -> f64 {
    match storage_type {
        "gp2" => 0.10,
        "gp3" => 0.08,
        "io1" | "io2" => 0.125,
        "st1" => 0.045,
        "sc1" => 0.015,
        _ => 0.10,
    }
}

/// Hourly cost for a load balancer type.
pub fn lb_cost(lb_type: &str) -> f64 {
    match lb_type {
        "classic" => 0.025,
        // alb, nlb and anything unrecognized
        _ => 0.0225,
    }
}

fn compute_capacity(instance_type: &str) -> (f64, f64) {
    match instance_type {
        "t3.micro" => (500.0, 50.0),
        "t3.small" => (1000.0, 30.0),
        "t3.medium" => (2000.0, 20.0),
        "t3.large" => (4000.0, 15.0),
        "m5.large" => (5000.0, 10.0),
        "m5.xlarge" => (10000.0, 8.0),
        "m5.2xlarge" => (20000.0, 5.0),
        "c5.large" => (6000.0, 8.0),
        "c5.xlarge" => (12000.0, 6.0),
        "c5.2xlarge" => (25000.0, 4.0),
        _ => (2000.0, 20.0),
    }
}

fn database_capacity(instance_type: &str) -> (f64, f64) {
    match instance_type {
        "db.t3.micro" => (100.0, 50.0),
        "db.t3.small" => (300.0, 30.0),
        "db.t3.medium" => (800.0, 20.0),
        "db.m5.large" => (2000.0, 10.0),
        "db.m5.xlarge" => (5000.0, 8.0),
        "db.r5.large" => (3000.0, 12.0),
        "db.r5.xlarge" => (7000.0, 8.0),
        _ => (800.0, 20.0),
    }
}

fn cache_capacity(instance_type: &str) -> (f64, f64) {
    match instance_type {
        "cache.t3.micro" => (5000.0, 5.0),
        "cache.t3.small" => (10000.0, 3.0),
        "cache.m5.large" => (25000.0, 2.0),
        "cache.m5.xlarge" => (50000.0, 1.0),
        "cache.r5.large" => (40000.0, 2.0),
        "cache.r5.xlarge" => (80000.0, 1.0),
        _ => (10000.0, 3.0),
    }
}

/// Derive `(capacityRPS, baseLatencyMS)` for a node from its type tag and
/// configuration. The explicit config keys `capacityRPS` and `latencyMS`
/// override the derived values, letting callers pin hardware exactly.
pub fn hardware_performance(node_type: &str, cfg: &ConfigMap) -> (f64, f64) {
    let (capacity, latency) = match node_type {
        // Clients generate traffic; they never saturate
        "client" => (1_000_000.0, 0.0),

        "load_balancer" => {
            let lb_type = config::get_str(cfg, "lbType", "alb");
            let (capacity, mut latency) = match lb_type.as_str() {
                "nlb" => (500_000.0, 1.0),
                "classic" => (25_000.0, 10.0),
                // alb and anything else
                _ => (50_000.0, 5.0),
            };
            // Internal LBs skip the public-internet path
            if config::get_str(cfg, "accessType", "external") == "internal" {
                latency *= 0.6;
            }
            (capacity, latency)
        }

        // Logical containers pass traffic through untouched
        "subnet" => (1_000_000_000.0, 0.0),

        "api_server" | "compute" => {
            let instance = config::get_str(cfg, "instanceType", "t3.medium");
            compute_capacity(&instance)
        }

        "database_postgres" | "database_mysql" | "database_mongodb" => {
            let instance = config::get_str(cfg, "instanceType", "db.t3.medium");
            database_capacity(&instance)
        }

        "cache_redis" | "cache_memcached" => {
            let instance = config::get_str(cfg, "instanceType", "cache.t3.micro");
            cache_capacity(&instance)
        }

        "queue_sqs" | "queue_kafka" | "queue_rabbitmq" => {
            let queue_type = config::get_str(cfg, "queueType", "sqs-standard");
            match queue_type.as_str() {
                "sqs-standard" | "sqs-fifo" => (3000.0, 20.0),
                "kafka-standard" | "kafka-premium" => (100_000.0, 5.0),
                "rabbitmq-basic" | "rabbitmq-ha" => (50_000.0, 10.0),
                _ => (10_000.0, 15.0),
            }
        }

        "cdn_cloudfront" | "cdn" => (1_000_000.0, 50.0),

        // Per-prefix request ceiling
        "storage_s3" | "object_storage" => (5500.0, 100.0),

        "search_elasticsearch" | "search" => {
            if config::get_str(cfg, "searchType", "").is_empty() {
                (1000.0, 50.0)
            } else {
                (5000.0, 30.0)
            }
        }

        _ => (1000.0, 10.0),
    };

    (
        config::get_f64(cfg, "capacityRPS", capacity),
        config::get_f64(cfg, "latencyMS", latency),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_instance_gets_defaults() {
        let perf = instance_performance("x9.mega");
        assert_eq!(perf.vcpu, 2);
        assert_eq!(perf.memory_gb, 4.0);
        assert!(perf.burstable);
        assert_eq!(instance_cost("x9.mega"), 0.05);
    }

    #[test]
    fn storage_defaults_to_gp3() {
        assert_eq!(storage_performance("unknown"), storage_performance("gp3"));
        assert_eq!(storage_cost_per_gb_month("gp3"), 0.08);
        assert_eq!(storage_cost_per_gb_month("io2"), 0.125);
    }

    #[test]
    fn hardware_from_instance_tables() {
        let mut cfg = ConfigMap::new();
        assert_eq!(hardware_performance("api_server", &cfg), (2000.0, 20.0));

        cfg.insert("instanceType".into(), json!("m5.xlarge"));
        assert_eq!(hardware_performance("api_server", &cfg), (10000.0, 8.0));
        assert_eq!(
            hardware_performance("database_postgres", &ConfigMap::new()),
            (800.0, 20.0)
        );
    }

    #[test]
    fn internal_lb_is_faster() {
        let mut cfg = ConfigMap::new();
        let (_, external) = hardware_performance("load_balancer", &cfg);
        cfg.insert("accessType".into(), json!("internal"));
        let (_, internal) = hardware_performance("load_balancer", &cfg);
        assert!(internal < external);
        assert_eq!(internal, external * 0.6);
    }

    #[test]
    fn config_overrides_pin_hardware() {
        let mut cfg = ConfigMap::new();
        cfg.insert("capacityRPS".into(), json!(4242));
        cfg.insert("latencyMS".into(), json!(7.5));
        assert_eq!(hardware_performance("api_server", &cfg), (4242.0, 7.5));
    }
}
