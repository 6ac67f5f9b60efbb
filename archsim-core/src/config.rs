//! Typed accessors over the dynamic per-node `config` map
//!
//! Node configuration arrives as free-form JSON. These helpers pull values
//! out with explicit defaults, coercing between integer and float
//! representations since clients are not consistent about which they send.

use serde_json::Value;
use std::collections::HashMap;

/// The free-form configuration map carried by every node.
pub type ConfigMap = HashMap<String, Value>;

/// Read an integer, accepting both integer and float JSON numbers.
pub fn get_i64(config: &ConfigMap, key: &str, default: i64) -> i64 {
    match config.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        _ => default,
    }
}

/// Read a float, accepting both integer and float JSON numbers.
pub fn get_f64(config: &ConfigMap, key: &str, default: f64) -> f64 {
    match config.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        _ => default,
    }
}

/// Read a string value.
pub fn get_str(config: &ConfigMap, key: &str, default: &str) -> String {
    match config.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ConfigMap {
        let mut m = ConfigMap::new();
        m.insert("replicas".into(), json!(3));
        m.insert("hitRate".into(), json!(0.9));
        m.insert("capacity".into(), json!(2000.0));
        m.insert("instanceType".into(), json!("m5.large"));
        m
    }

    #[test]
    fn int_and_float_coerce() {
        let cfg = config();
        assert_eq!(get_i64(&cfg, "replicas", 1), 3);
        // Float-encoded integers coerce down
        assert_eq!(get_i64(&cfg, "capacity", 0), 2000);
        // Integer-encoded floats coerce up
        assert_eq!(get_f64(&cfg, "replicas", 0.0), 3.0);
        assert_eq!(get_f64(&cfg, "hitRate", 0.0), 0.9);
    }

    #[test]
    fn missing_and_mistyped_keys_fall_back() {
        let cfg = config();
        assert_eq!(get_i64(&cfg, "absent", 7), 7);
        assert_eq!(get_f64(&cfg, "instanceType", 1.5), 1.5);
        assert_eq!(get_str(&cfg, "replicas", "x"), "x");
        assert_eq!(get_str(&cfg, "instanceType", ""), "m5.large");
    }
}
