//! Static workload presets for the simulation UI

use serde_json::{json, Value};

/// The preset catalog: canned workload templates from light development
/// traffic to spike and scaling drills.
pub fn all() -> Value {
    json!({
        "presets": [
            {
                "id": "low-traffic",
                "name": "Low Traffic",
                "description": "Low steady traffic for development testing",
                "workload": {
                    "rps": 1000,
                    "mode": "constant",
                    "durationSeconds": 30,
                    "readWriteRatio": {"read": 80, "write": 20},
                    "regions": ["us-east"]
                }
            },
            {
                "id": "normal-traffic",
                "name": "Normal Traffic",
                "description": "Normal production-like traffic",
                "workload": {
                    "rps": 10000,
                    "mode": "constant",
                    "durationSeconds": 60,
                    "readWriteRatio": {"read": 80, "write": 20},
                    "regions": ["us-east"]
                }
            },
            {
                "id": "high-traffic",
                "name": "High Traffic",
                "description": "High load for stress testing",
                "workload": {
                    "rps": 50000,
                    "mode": "constant",
                    "durationSeconds": 60,
                    "readWriteRatio": {"read": 90, "write": 10},
                    "regions": ["us-east", "eu-central"]
                }
            },
            {
                "id": "burst-traffic",
                "name": "Burst Traffic",
                "description": "Random bursts to test elasticity",
                "workload": {
                    "rps": 20000,
                    "mode": "burst",
                    "durationSeconds": 60,
                    "readWriteRatio": {"read": 70, "write": 30},
                    "regions": ["us-east"]
                }
            },
            {
                "id": "spike-traffic",
                "name": "Spike Traffic",
                "description": "Sudden traffic spike (flash sale scenario)",
                "workload": {
                    "rps": 15000,
                    "mode": "spike",
                    "durationSeconds": 60,
                    "readWriteRatio": {"read": 95, "write": 5},
                    "regions": ["us-east"]
                }
            },
            {
                "id": "auto-scaling-test",
                "name": "Auto-Scaling Test",
                "description": "Test auto-scaling behavior under load",
                "workload": {
                    "rps": 30000,
                    "mode": "spike",
                    "durationSeconds": 90,
                    "readWriteRatio": {"read": 80, "write": 20},
                    "regions": ["us-east"],
                    "autoScaling": {
                        "enabled": true,
                        "upThreshold": 0.75,
                        "downThreshold": 0.20,
                        "cooldownSeconds": 10,
                        "minReplicas": 1,
                        "maxReplicas": 10
                    }
                }
            }
        ]
    })
}
