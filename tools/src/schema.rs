//! JSON Schema validation for tool inputs

use crate::error::ToolError;

/// Validate a JSON input against a schema. A `null` schema accepts anything.
pub fn validate_input(
    input: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), ToolError> {
    if schema.is_null() {
        return Ok(());
    }

    let validator = jsonschema::validator_for(schema)
        .map_err(|e| ToolError::InvalidInput(format!("Invalid JSON schema: {e}")))?;

    validator
        .validate(input)
        .map_err(|e| ToolError::InvalidInput(format!("Input validation failed: {e}")))
}

/// Empty input is treated as an empty object
pub fn normalize_input(input: serde_json::Value) -> serde_json::Value {
    if input.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::network_tool_schema;
    use serde_json::json;

    #[test]
    fn test_null_schema_accepts_anything() {
        assert!(validate_input(&json!({"anything": 1}), &serde_json::Value::Null).is_ok());
    }

    #[test]
    fn test_network_tool_schema_accepts_valid_input() {
        let schema = network_tool_schema();
        assert!(validate_input(&json!({"action": "ping", "target": "10.0.0.1"}), &schema).is_ok());
        assert!(
            validate_input(&json!({"action": "dns", "target": "a.b", "count": 4}), &schema).is_ok()
        );
    }

    #[test]
    fn test_unknown_action_passes_schema() {
        let schema = network_tool_schema();
        assert!(validate_input(&json!({"action": "whois", "target": "a.b"}), &schema).is_ok());
    }

    #[test]
    fn test_network_tool_schema_leaves_values_to_dispatcher() {
        let schema = network_tool_schema();
        for input in [
            json!({"action": "traceroute", "target": "a.b", "count": 0}),
            json!({"action": "traceroute", "target": ""}),
            json!({"action": "dns", "target": "localhost", "count": 0}),
            json!({"action": "dns", "target": ""}),
        ] {
            assert!(validate_input(&input, &schema).is_ok(), "{input}");
        }
    }

    #[test]
    fn test_network_tool_schema_rejects_wrong_types() {
        let schema = network_tool_schema();
        for bad in [
            json!({"target": "a.b"}),
            json!({"action": "ping"}),
            json!({"action": 7, "target": "a.b"}),
            json!({"action": "ping", "target": "a.b", "count": "three"}),
        ] {
            let err = validate_input(&bad, &schema).unwrap_err();
            assert!(matches!(err, ToolError::InvalidInput(_)), "{bad}");
        }
    }

    #[test]
    fn test_normalize_input() {
        assert_eq!(normalize_input(serde_json::Value::Null), json!({}));
        assert_eq!(normalize_input(json!({"a": 1})), json!({"a": 1}));
    }
}
