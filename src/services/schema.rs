//! JSON Schema checks over canonical service documents.
//!
//! Syntax rules (paths, domains, durations, sizes) live in per-service schemas;
//! conditional business rules are checked on the typed specification afterwards.

use crate::codec::Document;
use crate::error::ServiceError;
use serde_json::{Value, json};

/// Ingress path, empty when ingress is disabled
pub const PATH_PATTERN: &str = "^$|^/";

/// DNS name, empty meaning "use the cluster IP"
pub const DOMAIN_PATTERN: &str =
    r"^$|^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$";

/// Prometheus style duration, e.g. `10d` or `12h`
pub const RETENTION_PATTERN: &str = "^[0-9]+(ms|s|m|h|d|w|y)$";

/// Validate `document` against `schema`, reporting the first violation
pub fn check_schema(schema: &Value, document: &Document) -> Result<(), ServiceError> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| ServiceError::validation(format!("invalid schema: {}", e)))?;

    let instance = Value::Object(document.clone());
    validator
        .validate(&instance)
        .map_err(|e| ServiceError::validation(e.to_string()))
}

/// Schema for an [`IngressSpec`](super::ingress::IngressSpec)
pub fn ingress_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "enabled": {"type": "boolean"},
            "domain": {"type": "string", "pattern": DOMAIN_PATTERN},
            "path": {"type": "string", "pattern": PATH_PATTERN},
            "secretId": {"type": "string"}
        }
    })
}

/// Apply `then` to a component object only while its `enabled` flag is true
pub fn when_enabled(then: Value) -> Value {
    json!({
        "if": {
            "properties": {"enabled": {"const": true}},
            "required": ["enabled"]
        },
        "then": then
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    fn component_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "web": {
                    "type": "object",
                    "properties": {"ingress": ingress_schema()},
                    "allOf": [when_enabled(json!({"required": ["ingress"]}))]
                }
            }
        })
    }

    #[test]
    fn test_valid_ingress_passes() {
        let d = doc(json!({"web": {"enabled": true, "ingress": {"enabled": true, "path": "/web", "domain": "example.com"}}}));
        assert!(check_schema(&component_schema(), &d).is_ok());
    }

    #[test]
    fn test_path_must_start_with_slash() {
        let d = doc(json!({"web": {"enabled": true, "ingress": {"enabled": true, "path": "web"}}}));
        let err = check_schema(&component_schema(), &d).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_invalid_domain_is_rejected() {
        let d = doc(json!({"web": {"enabled": true, "ingress": {"enabled": true, "path": "/", "domain": "bad domain"}}}));
        assert!(check_schema(&component_schema(), &d).is_err());
    }

    #[test]
    fn test_conditional_rules_only_apply_when_enabled() {
        let disabled = doc(json!({"web": {"enabled": false}}));
        assert!(check_schema(&component_schema(), &disabled).is_ok());

        let enabled = doc(json!({"web": {"enabled": true}}));
        assert!(check_schema(&component_schema(), &enabled).is_err());
    }
}
