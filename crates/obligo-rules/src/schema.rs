//! JSON Schema validation for JSON rule packs.
//!
//! JSON packs arrive from outside the process (uploads, API payloads), so
//! they are checked against `rule_pack_schema()` before deserialization.
//! Every violation is collected so the author sees the full list at once.

use serde_json::{json, Value};
use tracing::warn;

use obligo_contracts::error::{ObligoError, ObligoResult};

/// The schema a JSON rule pack (object form) must satisfy.
pub fn rule_pack_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["rules"],
        "properties": {
            "rules": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "keyword": { "type": "string" },
                        "severity": { "type": "string" },
                        "match_type": { "type": "string" },
                        "enabled": { "type": "boolean" },
                        "must_also_contain": { "type": "array", "items": { "type": "string" } },
                        "must_not_contain": { "type": "array", "items": { "type": "string" } }
                    }
                }
            }
        }
    })
}

/// Accept both `[ ...rules ]` and `{ "rules": [...] }`.
pub fn normalize_pack(value: Value) -> Value {
    match value {
        Value::Array(rules) => json!({ "rules": rules }),
        other => other,
    }
}

/// Validate an (already normalized) JSON rule pack.
///
/// Returns `ObligoError::RulePackInvalid` listing every violation, one per
/// line, as `<instance path>: <message>`.
pub fn validate_pack(pack: &Value) -> ObligoResult<()> {
    let schema = rule_pack_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| ObligoError::ConfigError {
        reason: format!("rule pack schema failed to compile: {e}"),
    })?;

    let violations: Vec<String> = validator
        .iter_errors(pack)
        .map(|error| {
            let path = error.instance_path.to_string();
            let path = if path.is_empty() { "/".to_string() } else { path };
            format!("{path}: {error}")
        })
        .collect();

    if violations.is_empty() {
        return Ok(());
    }

    warn!(violation_count = violations.len(), "rule pack failed schema validation");
    Err(ObligoError::RulePackInvalid {
        reason: violations.join("\n"),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use obligo_contracts::error::ObligoError;

    use super::{normalize_pack, validate_pack};

    #[test]
    fn bare_array_is_wrapped() {
        let pack = normalize_pack(json!([{ "id": "shall", "keyword": "shall" }]));
        assert!(pack.get("rules").is_some());
        assert!(validate_pack(&pack).is_ok());
    }

    #[test]
    fn minimal_rule_passes() {
        let pack = json!({ "rules": [{ "id": "notify" }] });
        assert!(validate_pack(&pack).is_ok());
    }

    /// All violations are reported together, each with its location.
    #[test]
    fn every_violation_is_listed() {
        let pack = json!({
            "rules": [
                { "id": "ok", "keyword": "shall" },
                { "keyword": "must" },
                { "id": "bad-flag", "enabled": "yes" },
                { "id": "bad-terms", "must_not_contain": "draft" }
            ]
        });

        match validate_pack(&pack) {
            Err(ObligoError::RulePackInvalid { reason }) => {
                assert_eq!(reason.lines().count(), 3, "unexpected report: {reason}");
                assert!(reason.contains("/rules/1"), "missing id location: {reason}");
                assert!(reason.contains("/rules/2/enabled"), "bad enabled location: {reason}");
                assert!(reason.contains("/rules/3/must_not_contain"), "bad terms location: {reason}");
            }
            other => panic!("expected RulePackInvalid, got {:?}", other),
        }
    }

    #[test]
    fn missing_rules_key_is_rejected() {
        let result = validate_pack(&json!({ "detection_rules": [] }));
        assert!(matches!(result, Err(ObligoError::RulePackInvalid { .. })));
    }
}
