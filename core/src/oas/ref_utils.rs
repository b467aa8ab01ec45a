#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for resolving schema `$ref` targets and deriving type names from them.
//!
//! Every reference is resolved against `components.schemas` of the root document; a
//! dangling reference is reported as `None`, never as an error.

use crate::oas::document::{OpenApiDocument, SchemaNode};
use crate::oas::naming::capitalize_type_name;

/// True iff the node carries a string-valued `$ref` or `$$ref`.
pub fn has_ref(node: &SchemaNode) -> bool {
    node.reference_str().is_some() || node.resolved_reference_str().is_some()
}

/// The reference string of a node, preferring `$ref` over `$$ref`.
pub fn ref_of(node: &SchemaNode) -> Option<&str> {
    node.reference_str().or_else(|| node.resolved_reference_str())
}

/// Extracts the schema name from a reference.
///
/// Accepts the full pointer (`#/components/schemas/Pet`), a document-qualified pointer
/// (`openapi.json#/components/schemas/Pet`), a hash-prefixed name (`#Pet`) or a bare
/// name (`Pet`). Returns an empty string for an empty or malformed reference.
pub fn get_ref_name(reference: &str) -> String {
    reference
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim_start_matches('#')
        .to_string()
}

/// Resolves a reference against `components.schemas`.
///
/// # Arguments
///
/// * `reference` - The `$ref` (or `$$ref`) string.
/// * `spec` - The root document.
pub fn resolve_ref<'a>(reference: &str, spec: &'a OpenApiDocument) -> Option<&'a SchemaNode> {
    let name = get_ref_name(reference);
    if name.is_empty() {
        return None;
    }
    spec.schema(&name)
}

/// The name a schema would like its GraphQL type to have.
///
/// Preference: `xml.name` (capitalized), then the `$ref` name, then the `$$ref` name.
pub fn get_preferred_name(schema: &SchemaNode) -> Option<String> {
    if let Some(xml_name) = schema
        .xml
        .as_ref()
        .and_then(|xml| xml.name.as_deref())
        .filter(|name| !name.is_empty())
    {
        return Some(capitalize_type_name(xml_name));
    }

    [schema.reference_str(), schema.resolved_reference_str()]
        .into_iter()
        .flatten()
        .map(get_ref_name)
        .find(|name| !name.is_empty())
}
