//! Inter-region latency and data-transfer cost matrices
//!
//! Values reflect measured round-trip latencies between major cloud regions
//! and published cross-region transfer pricing. Unknown regions fall back to
//! a pessimistic cross-region default.

/// Region tags with entries in the matrices, in matrix order.
pub const KNOWN_REGIONS: [&str; 7] = [
    "us-east",
    "us-west",
    "eu-central",
    "eu-west",
    "ap-south",
    "ap-southeast",
    "ap-northeast",
];

/// Latency in milliseconds between region pairs, indexed by [`KNOWN_REGIONS`].
const LATENCY_MS: [[f64; 7]; 7] = [
    [1.0, 60.0, 85.0, 75.0, 200.0, 180.0, 150.0],
    [60.0, 1.0, 140.0, 130.0, 220.0, 120.0, 100.0],
    [85.0, 140.0, 1.0, 15.0, 120.0, 160.0, 220.0],
    [75.0, 130.0, 15.0, 1.0, 110.0, 170.0, 230.0],
    [200.0, 220.0, 120.0, 110.0, 1.0, 50.0, 80.0],
    [180.0, 120.0, 160.0, 170.0, 50.0, 1.0, 60.0],
    [150.0, 100.0, 220.0, 230.0, 80.0, 60.0, 1.0],
];

/// Data transfer cost in USD per GB between region pairs.
const TRANSFER_COST: [[f64; 7]; 7] = [
    [0.00, 0.02, 0.02, 0.02, 0.09, 0.09, 0.09],
    [0.02, 0.00, 0.02, 0.02, 0.09, 0.09, 0.09],
    [0.02, 0.02, 0.00, 0.02, 0.09, 0.11, 0.11],
    [0.02, 0.02, 0.02, 0.00, 0.09, 0.11, 0.11],
    [0.09, 0.09, 0.09, 0.09, 0.00, 0.08, 0.08],
    [0.09, 0.09, 0.11, 0.11, 0.08, 0.00, 0.08],
    [0.09, 0.09, 0.11, 0.11, 0.08, 0.08, 0.00],
];

const FALLBACK_CROSS_REGION_LATENCY_MS: f64 = 100.0;
const FALLBACK_CROSS_REGION_COST: f64 = 0.05;

fn normalize(region: &str) -> &str {
    if region.is_empty() {
        "us-east"
    } else {
        region
    }
}

fn index_of(region: &str) -> Option<usize> {
    KNOWN_REGIONS.iter().position(|r| *r == region)
}

/// Network latency in milliseconds between two regions. Same region is ~1 ms;
/// unknown cross-region pairs cost a flat 100 ms.
pub fn region_latency(source: &str, target: &str) -> f64 {
    let source = normalize(source);
    let target = normalize(target);

    if let (Some(s), Some(t)) = (index_of(source), index_of(target)) {
        return LATENCY_MS[s][t];
    }
    if source == target {
        1.0
    } else {
        FALLBACK_CROSS_REGION_LATENCY_MS
    }
}

/// Data transfer cost in USD per GB between two regions. Free within a
/// region; unknown cross-region pairs cost $0.05/GB.
pub fn data_transfer_cost(source: &str, target: &str) -> f64 {
    let source = normalize(source);
    let target = normalize(target);

    if let (Some(s), Some(t)) = (index_of(source), index_of(target)) {
        return TRANSFER_COST[s][t];
    }
    if source == target {
        0.0
    } else {
        FALLBACK_CROSS_REGION_COST
    }
}

/// Whether two nodes live in different regions (empty tags default to us-east).
pub fn is_cross_region(source: &str, target: &str) -> bool {
    normalize(source) != normalize(target)
}
