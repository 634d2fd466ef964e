//! CRD schema resolution and output units
//!
//! Walks a CRD candidate for every (version, `openAPIV3Schema`) pair it
//! declares, runs the tree rewrites, and packages the result as a named
//! [`SchemaUnit`] ready for serialization. All structural lookups are
//! lenient: a missing or oddly-typed field means "nothing to extract",
//! never an error.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::document::extract_candidates;
use crate::error::Result;
use crate::transform::transform_schema;

/// One extracted schema, keyed by (group, version, kind).
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaUnit {
    pub group: String,
    pub version: String,
    pub kind: String,
    /// The transformed schema tree.
    pub schema: JsonValue,
}

impl SchemaUnit {
    /// Deterministic output filename: `{group}_{version}_{kind}.json`,
    /// all lowercase.
    pub fn filename(&self) -> String {
        format!(
            "{}_{}_{}.json",
            self.group.to_lowercase(),
            self.version.to_lowercase(),
            self.kind.to_lowercase()
        )
    }

    /// Serialize the schema with 2-space indentation and a single
    /// trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.schema)?;
        out.push('\n');
        Ok(out)
    }
}

/// Run the full pipeline over raw manifest text.
pub fn extract_schemas(text: &str) -> Result<Vec<SchemaUnit>> {
    let candidates = extract_candidates(text)?;
    Ok(candidates.iter().flat_map(schema_units).collect())
}

/// Resolve every schema a single CRD candidate declares.
///
/// Modern CRDs list `spec.versions`, each optionally carrying its own
/// `schema.openAPIV3Schema`; a version without one falls back to the
/// top-level `spec.validation.openAPIV3Schema`. Legacy CRDs carry only
/// the `spec.validation` block plus `spec.version`. A candidate with no
/// resolvable schema yields zero units.
pub fn schema_units(candidate: &JsonValue) -> Vec<SchemaUnit> {
    let Some(spec) = candidate.get("spec").filter(|s| s.is_object()) else {
        debug!("candidate has no spec mapping");
        return Vec::new();
    };
    let Some(names) = spec.get("names").filter(|n| n.is_object()) else {
        debug!("candidate has no spec.names mapping");
        return Vec::new();
    };

    let group = str_field(spec, "group");
    let kind = str_field(names, "kind");
    let validation_schema = spec
        .get("validation")
        .and_then(|v| v.get("openAPIV3Schema"))
        .filter(|s| s.is_object());

    let mut units = Vec::new();

    let versions = spec
        .get("versions")
        .and_then(JsonValue::as_array)
        .filter(|v| !v.is_empty());

    if let Some(versions) = versions {
        for entry in versions {
            if !entry.is_object() {
                continue;
            }
            let schema = entry
                .get("schema")
                .and_then(|s| s.get("openAPIV3Schema"))
                .filter(|s| s.is_object())
                .or(validation_schema);
            let Some(schema) = schema else {
                continue;
            };
            units.push(SchemaUnit {
                group: group.clone(),
                version: str_field(entry, "name"),
                kind: kind.clone(),
                schema: transform_schema(schema.clone()),
            });
        }
    } else if let Some(schema) = validation_schema {
        units.push(SchemaUnit {
            group,
            version: str_field(spec, "version"),
            kind,
            schema: transform_schema(schema.clone()),
        });
    }

    units
}

fn str_field(node: &JsonValue, key: &str) -> String {
    node.get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multi_version_fan_out() {
        let candidate = json!({
            "kind": "CustomResourceDefinition",
            "spec": {
                "group": "example.io",
                "names": {"kind": "Widget"},
                "versions": [
                    {"name": "v1", "schema": {"openAPIV3Schema": {"type": "object"}}},
                    {"name": "v2", "schema": {"openAPIV3Schema": {"type": "object"}}}
                ]
            }
        });
        let units = schema_units(&candidate);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].filename(), "example.io_v1_widget.json");
        assert_eq!(units[1].filename(), "example.io_v2_widget.json");
    }

    #[test]
    fn test_version_falls_back_to_validation_block() {
        let candidate = json!({
            "spec": {
                "group": "example.io",
                "names": {"kind": "Widget"},
                "validation": {"openAPIV3Schema": {"type": "object"}},
                "versions": [
                    {"name": "v1"},
                    {"name": "v2", "schema": {"openAPIV3Schema": {"type": "string"}}}
                ]
            }
        });
        let units = schema_units(&candidate);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].version, "v1");
        assert_eq!(units[0].schema, json!({"type": "object"}));
        assert_eq!(units[1].schema, json!({"type": "string"}));
    }

    #[test]
    fn test_version_without_any_schema_skipped() {
        let candidate = json!({
            "spec": {
                "group": "example.io",
                "names": {"kind": "Widget"},
                "versions": [
                    {"name": "v1"},
                    {"name": "v2", "schema": {"openAPIV3Schema": {"type": "object"}}}
                ]
            }
        });
        let units = schema_units(&candidate);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].version, "v2");
    }

    #[test]
    fn test_legacy_single_version() {
        let candidate = json!({
            "spec": {
                "group": "example.io",
                "version": "v1",
                "names": {"kind": "Widget"},
                "validation": {"openAPIV3Schema": {"type": "object"}}
            }
        });
        let units = schema_units(&candidate);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].filename(), "example.io_v1_widget.json");
    }

    #[test]
    fn test_empty_versions_uses_legacy_path() {
        let candidate = json!({
            "spec": {
                "group": "example.io",
                "version": "v1beta1",
                "names": {"kind": "Widget"},
                "validation": {"openAPIV3Schema": {"type": "object"}},
                "versions": []
            }
        });
        let units = schema_units(&candidate);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].version, "v1beta1");
    }

    #[test]
    fn test_missing_spec_or_names_yields_nothing() {
        assert!(schema_units(&json!({"kind": "CustomResourceDefinition"})).is_empty());
        assert!(schema_units(&json!({"spec": {"group": "example.io"}})).is_empty());
        assert!(schema_units(&json!({"spec": "not-a-mapping"})).is_empty());
    }

    #[test]
    fn test_no_schema_at_all_yields_nothing() {
        let candidate = json!({
            "spec": {
                "group": "example.io",
                "names": {"kind": "Widget"}
            }
        });
        assert!(schema_units(&candidate).is_empty());
    }

    #[test]
    fn test_non_mapping_version_entries_skipped() {
        let candidate = json!({
            "spec": {
                "group": "example.io",
                "names": {"kind": "Widget"},
                "versions": [
                    "v1-as-a-scalar",
                    {"name": "v2", "schema": {"openAPIV3Schema": {"type": "object"}}}
                ]
            }
        });
        let units = schema_units(&candidate);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].version, "v2");
    }

    #[test]
    fn test_filename_is_lowercased() {
        let unit = SchemaUnit {
            group: "Networking.Example.IO".to_string(),
            version: "V1Beta1".to_string(),
            kind: "Gateway".to_string(),
            schema: json!({}),
        };
        assert_eq!(unit.filename(), "networking.example.io_v1beta1_gateway.json");
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let manifest = r#"
kind: CustomResourceDefinition
spec:
  group: example.io
  names:
    kind: Widget
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                port:
                  type: string
                  format: int-or-string
"#;
        let units = extract_schemas(manifest).unwrap();
        assert_eq!(units.len(), 1);
        let unit = &units[0];
        assert_eq!(unit.filename(), "example.io_v1_widget.json");

        let pretty = unit.to_json_pretty().unwrap();
        assert!(pretty.ends_with("}\n"));
        insta::assert_snapshot!(pretty, @r#"
        {
          "properties": {
            "spec": {
              "additionalProperties": false,
              "properties": {
                "port": {
                  "oneOf": [
                    {
                      "type": "string"
                    },
                    {
                      "type": "integer"
                    }
                  ]
                }
              },
              "type": "object"
            }
          },
          "type": "object"
        }
        "#);
    }
}
