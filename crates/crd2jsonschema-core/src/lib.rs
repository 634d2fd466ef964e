//! CRD to JSON Schema extraction pipeline
//!
//! This crate extracts the OpenAPI v3 validation schemas embedded in
//! Kubernetes CustomResourceDefinition manifests and turns them into
//! standalone JSON Schemas, one per (group, version, kind), for offline
//! manifest validation:
//!
//! - `document`: multi-document YAML decoding and CRD candidate collection
//! - `schema`: per-candidate version/schema resolution and output units
//! - `transform`: the strictness and `int-or-string` tree rewrites
//!
//! # Example
//!
//! ```
//! use crd2jsonschema_core::extract_schemas;
//!
//! let manifest = r#"
//! kind: CustomResourceDefinition
//! spec:
//!   group: example.io
//!   version: v1
//!   names:
//!     kind: Widget
//!   validation:
//!     openAPIV3Schema:
//!       type: object
//! "#;
//!
//! let units = extract_schemas(manifest).unwrap();
//! assert_eq!(units[0].filename(), "example.io_v1_widget.json");
//! ```

pub mod document;
pub mod error;
pub mod schema;
pub mod transform;

pub use document::{CRD_KIND, extract_candidates};
pub use error::{CoreError, Result};
pub use schema::{SchemaUnit, extract_schemas, schema_units};
pub use transform::{inject_additional_properties, replace_int_or_string, transform_schema};
