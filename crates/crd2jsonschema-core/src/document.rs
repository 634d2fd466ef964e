//! CRD candidate extraction from multi-document YAML streams
//!
//! Manifest files in the wild bundle several resources per file
//! (`---`-separated documents, or a `List` object wrapping its `items`),
//! and only some of them are CustomResourceDefinitions. This module turns
//! raw manifest text into a flat, ordered list of CRD candidate mappings,
//! skipping everything else silently.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};

/// The only `kind` accepted as a CRD candidate.
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// Replace every tab with four spaces.
///
/// Some emitters produce tab-indented CRDs that indentation-sensitive
/// YAML parsers reject. Applied before any structural parsing.
pub fn normalize_tabs(text: &str) -> String {
    text.replace('\t', "    ")
}

/// Decode a `---`-separated YAML stream into generic document trees.
///
/// Decoding stops at the first malformed document; documents already
/// decoded are kept. The error is only surfaced when nothing at all
/// could be decoded, so a partially-readable file still yields output.
pub fn decode_documents(text: &str) -> Result<Vec<JsonValue>> {
    let mut docs = Vec::new();

    for de in serde_yaml::Deserializer::from_str(text) {
        match JsonValue::deserialize(de) {
            Ok(doc) => docs.push(doc),
            Err(err) => {
                if docs.is_empty() {
                    return Err(CoreError::YamlParse(err));
                }
                warn!(
                    error = %err,
                    decoded = docs.len(),
                    "stopping multi-document decode on parse error"
                );
                break;
            }
        }
    }

    Ok(docs)
}

/// Extract CRD candidate mappings from raw manifest text.
///
/// Per decoded document, two independent sources contribute candidates:
/// every mapping element of an `items` sequence (Kubernetes `List`
/// wrapping), and the document itself when its `kind` is
/// [`CRD_KIND`]. A document can contribute through both. Anything else
/// is skipped, not an error.
pub fn extract_candidates(text: &str) -> Result<Vec<JsonValue>> {
    let normalized = normalize_tabs(text);
    let mut candidates = Vec::new();

    for doc in decode_documents(&normalized)? {
        if doc.is_null() {
            continue;
        }

        let mut contributed = false;

        if let Some(items) = doc.get("items").and_then(JsonValue::as_array) {
            for item in items {
                if item.is_object() {
                    candidates.push(item.clone());
                    contributed = true;
                }
            }
        }

        let is_crd = doc.get("kind").and_then(JsonValue::as_str) == Some(CRD_KIND);
        if is_crd {
            candidates.push(doc);
        } else if !contributed {
            debug!("skipping non-CRD document");
        }
    }

    Ok(candidates)
}
