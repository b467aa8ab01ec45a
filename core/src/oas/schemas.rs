#![deny(missing_docs)]

//! # Schema Flattening
//!
//! Merges `allOf` compositions into a single ordered property map so that callers can
//! treat them as one object schema.

use crate::oas::document::{OpenApiDocument, SchemaNode};
use crate::oas::ref_utils::{get_ref_name, ref_of, resolve_ref};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Returns the properties of an object schema, with `allOf` members merged in.
///
/// Members are merged in order and the schema's own `properties` last; a later
/// definition of the same property replaces the earlier one but keeps its position.
/// `$ref` members are resolved against `components.schemas`.
///
/// # Arguments
///
/// * `schema` - The schema definition to process (Object or AllOf).
/// * `spec` - The root document used for `$ref` lookup.
pub fn effective_properties<'a>(
    schema: &'a SchemaNode,
    spec: &'a OpenApiDocument,
) -> IndexMap<&'a str, &'a SchemaNode> {
    let mut properties = IndexMap::new();
    let mut visited_refs = HashSet::new();

    collect_properties(schema, spec, &mut properties, &mut visited_refs);

    properties
}

fn collect_properties<'a>(
    schema: &'a SchemaNode,
    spec: &'a OpenApiDocument,
    properties: &mut IndexMap<&'a str, &'a SchemaNode>,
    visited: &mut HashSet<String>,
) {
    for member in &schema.all_of {
        match ref_of(member) {
            Some(reference) => {
                let ref_name = get_ref_name(reference);

                // Cycle detection
                if !visited.insert(ref_name.clone()) {
                    continue;
                }
                if let Some(resolved) = resolve_ref(reference, spec) {
                    collect_properties(resolved, spec, properties, visited);
                }
                visited.remove(&ref_name);
            }
            None => collect_properties(member, spec, properties, visited),
        }
    }

    for (name, property) in &schema.properties {
        properties.insert(name.as_str(), property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> OpenApiDocument {
        OpenApiDocument::from_value(&json!({
            "components": { "schemas": {
                "Base": {
                    "type": "object",
                    "properties": { "id": { "type": "integer" }, "kind": { "type": "string" } }
                },
                "Dog": {
                    "allOf": [
                        { "$ref": "#/components/schemas/Base" },
                        { "type": "object", "properties": { "bark": { "type": "boolean" } } }
                    ],
                    "properties": { "kind": { "type": "integer" } }
                },
                "Loop": {
                    "allOf": [ { "$ref": "#/components/schemas/Loop" } ],
                    "properties": { "name": { "type": "string" } }
                }
            } }
        }))
        .unwrap()
    }

    #[test]
    fn test_all_of_merge_order_and_override() {
        let spec = spec();
        let dog = spec.schema("Dog").unwrap();
        assert!(dog.is_object());

        let props = effective_properties(dog, &spec);
        let names: Vec<&str> = props.keys().copied().collect();
        assert_eq!(names, vec!["id", "kind", "bark"]);
        assert_eq!(props["kind"].type_name(), Some("integer"));
    }

    #[test]
    fn test_all_of_self_reference_terminates() {
        let spec = spec();
        let looped = spec.schema("Loop").unwrap();
        let props = effective_properties(looped, &spec);
        assert_eq!(props.keys().copied().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_plain_object() {
        let spec = spec();
        let props = effective_properties(spec.schema("Base").unwrap(), &spec);
        assert_eq!(props.len(), 2);
    }
}
