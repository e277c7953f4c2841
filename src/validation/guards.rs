//! Structural guards for command arguments
//!
//! Pre-checks applied to inbound argument objects before schema evaluation,
//! to reject oversized or pathologically nested payloads early.

use crate::error::{PluginError, Result};
use serde_json::Value;

/// Maximum allowed size for a serialized args payload (1MB)
const MAX_ARGS_SIZE_BYTES: usize = 1024 * 1024;

/// Maximum nesting depth for args objects/arrays
const MAX_ARGS_DEPTH: usize = 10;

/// Maximum number of keys in an args object (or items in an array)
const MAX_ARGS_KEYS: usize = 1000;

/// Maximum string length for args string values
const MAX_ARGS_STRING_LENGTH: usize = 10000;

/// Validates an args payload for size and structure constraints
pub fn check_args_value(value: &Value) -> Result<()> {
    let serialized = serde_json::to_string(value)
        .map_err(|e| PluginError::InvalidInput(format!("Invalid JSON structure: {e}")))?;

    if serialized.len() > MAX_ARGS_SIZE_BYTES {
        return Err(PluginError::InvalidInput(format!(
            "Args payload too large: {} bytes (max: {})",
            serialized.len(),
            MAX_ARGS_SIZE_BYTES
        )));
    }

    check_args_depth(value, 0)
}

/// Validates args depth recursively
fn check_args_depth(value: &Value, current_depth: usize) -> Result<()> {
    if current_depth > MAX_ARGS_DEPTH {
        return Err(PluginError::InvalidInput(format!(
            "Args nesting too deep: {current_depth} (max: {MAX_ARGS_DEPTH})"
        )));
    }

    match value {
        Value::Object(map) => {
            if map.len() > MAX_ARGS_KEYS {
                return Err(PluginError::InvalidInput(format!(
                    "Too many args keys: {} (max: {})",
                    map.len(),
                    MAX_ARGS_KEYS
                )));
            }

            for (key, val) in map {
                if key.len() > MAX_ARGS_STRING_LENGTH {
                    return Err(PluginError::InvalidInput(format!(
                        "Args key too long: {} chars (max: {})",
                        key.len(),
                        MAX_ARGS_STRING_LENGTH
                    )));
                }

                check_args_depth(val, current_depth + 1)?;
            }
        }
        Value::Array(arr) => {
            if arr.len() > MAX_ARGS_KEYS {
                return Err(PluginError::InvalidInput(format!(
                    "Args array too large: {} items (max: {})",
                    arr.len(),
                    MAX_ARGS_KEYS
                )));
            }

            for item in arr {
                check_args_depth(item, current_depth + 1)?;
            }
        }
        Value::String(s) => {
            if s.len() > MAX_ARGS_STRING_LENGTH {
                return Err(PluginError::InvalidInput(format!(
                    "Args string too long: {} chars (max: {})",
                    s.len(),
                    MAX_ARGS_STRING_LENGTH
                )));
            }
        }
        _ => {} // Numbers, booleans, null are always safe
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_args() {
        let valid = json!({
            "field": "value",
            "number": 42,
            "array": [1, 2, 3],
            "nested": {
                "inner": "value"
            }
        });

        assert!(check_args_value(&valid).is_ok());
    }

    #[test]
    fn test_args_too_deep() {
        let mut deep = json!({});
        let mut current = &mut deep;

        // Create nesting deeper than allowed
        for i in 0..15 {
            let key = format!("level_{i}");
            *current = json!({ key.clone(): {} });
            current = current.get_mut(&key).unwrap();
        }

        assert!(check_args_value(&deep).is_err());
    }

    #[test]
    fn test_string_too_long() {
        let long_string = "x".repeat(MAX_ARGS_STRING_LENGTH + 1);
        let args = json!({
            "long_key": long_string
        });

        assert!(check_args_value(&args).is_err());
    }

    #[test]
    fn test_array_too_large() {
        let args = json!({ "items": vec![0; MAX_ARGS_KEYS + 1] });
        assert!(check_args_value(&args).is_err());
    }
}
