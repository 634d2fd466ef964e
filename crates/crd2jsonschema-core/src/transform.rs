//! Schema tree rewrites
//!
//! Two rewrites turn an embedded OpenAPI v3 schema into a standalone
//! JSON Schema suitable for strict offline validation:
//!
//! 1. **Strictness injection** closes every nested `properties` block
//!    with `additionalProperties: false`. The schema root is exempt:
//!    Kubernetes injects `apiVersion`, `kind` and `metadata` at the top
//!    level of every resource, which a strict root would reject.
//! 2. **`int-or-string` normalization** replaces Kubernetes' non-standard
//!    format with a portable `oneOf` over string and integer.
//!
//! Both walks are structural, not schema-aware: they descend into every
//! mapping value and every mapping element of a sequence, regardless of
//! what the surrounding keyword means. Genuine JSON-Schema keywords that
//! happen to be mappings are touched too; that matches the extraction
//! contract and is harmless for real-world CRDs.

use serde_json::{Value as JsonValue, json};

/// Apply both rewrites, injection first, and return the result tree.
pub fn transform_schema(mut schema: JsonValue) -> JsonValue {
    inject_additional_properties(&mut schema, true);
    replace_int_or_string(&schema)
}

/// Default `additionalProperties: false` at every level that declares
/// `properties`, except the root.
///
/// An explicit `additionalProperties` of any value is never overwritten,
/// which also makes the injection idempotent.
pub fn inject_additional_properties(node: &mut JsonValue, root: bool) {
    match node {
        JsonValue::Object(map) => {
            if !root && map.contains_key("properties") && !map.contains_key("additionalProperties")
            {
                map.insert("additionalProperties".to_string(), JsonValue::Bool(false));
            }
            for value in map.values_mut() {
                inject_additional_properties(value, false);
            }
        }
        JsonValue::Array(items) => {
            for item in items.iter_mut() {
                if item.is_object() {
                    inject_additional_properties(item, false);
                }
            }
        }
        _ => {}
    }
}

/// Rebuild the tree, replacing every mapping held under a key whose own
/// `format` is `"int-or-string"` with
/// `{"oneOf": [{"type": "string"}, {"type": "integer"}]}`.
///
/// The replacement discards all other fields of the original mapping,
/// including `type`, `format` and `description`.
pub fn replace_int_or_string(node: &JsonValue) -> JsonValue {
    match node {
        JsonValue::Object(map) => {
            let mut result = serde_json::Map::new();
            for (key, value) in map {
                let rebuilt = match value {
                    JsonValue::Object(inner)
                        if inner.get("format").and_then(JsonValue::as_str)
                            == Some("int-or-string") =>
                    {
                        json!({"oneOf": [{"type": "string"}, {"type": "integer"}]})
                    }
                    JsonValue::Object(_) => replace_int_or_string(value),
                    JsonValue::Array(items) => {
                        JsonValue::Array(items.iter().map(replace_int_or_string).collect())
                    }
                    other => other.clone(),
                };
                result.insert(key.clone(), rebuilt);
            }
            JsonValue::Object(result)
        }
        other => other.clone(),
    }
}
