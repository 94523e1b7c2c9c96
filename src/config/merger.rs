//! Deep merge of YAML values for partial config writes.
//!
//! The config file is shared with the rest of milaidy, so a write of the
//! `update` section must leave every other key as it was.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Anything else in the overlay replaces the base value

use serde_yaml::Value;

/// Deep merge two YAML values, with `overlay` taking precedence.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                let merged = match base_map.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                result.insert(key.clone(), merged);
            }

            Value::Mapping(result)
        }

        (_, overlay) => overlay.clone(),
    }
}
