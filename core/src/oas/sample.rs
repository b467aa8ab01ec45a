#![deny(missing_docs)]

//! # Sample Values
//!
//! Builds a representative JSON value for a schema. Feeding the sample to
//! [`collect_paths`](crate::selection::collect_paths) yields every selectable attribute
//! path of an endpoint, which is how "select all" works without a live response.

use crate::oas::document::{OpenApiDocument, SchemaNode};
use crate::oas::ref_utils::{get_ref_name, ref_of, resolve_ref};
use crate::oas::schemas::effective_properties;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Builds a sample value for `schema`.
///
/// Objects carry every (merged) property, arrays exactly one element and primitives a
/// typed zero value. A `$ref` that is already being expanded further up yields `null`,
/// so recursive schemas produce a finite sample.
pub fn sample_value(schema: &SchemaNode, spec: &OpenApiDocument) -> Value {
    let mut expanding = HashSet::new();
    sample_recursive(schema, spec, &mut expanding)
}

fn sample_recursive(
    schema: &SchemaNode,
    spec: &OpenApiDocument,
    expanding: &mut HashSet<String>,
) -> Value {
    if let Some(reference) = ref_of(schema) {
        let ref_name = get_ref_name(reference);
        let Some(resolved) = resolve_ref(reference, spec) else {
            return Value::Null;
        };
        if !expanding.insert(ref_name.clone()) {
            return Value::Null;
        }
        let value = sample_recursive(resolved, spec, expanding);
        expanding.remove(&ref_name);
        return value;
    }

    if schema.is_array() {
        let item = schema
            .items
            .as_deref()
            .map(|items| sample_recursive(items, spec, expanding))
            .unwrap_or(Value::Null);
        return Value::Array(vec![item]);
    }

    if schema.is_object() {
        let mut object = Map::new();
        for (name, property) in effective_properties(schema, spec) {
            object.insert(name.to_string(), sample_recursive(property, spec, expanding));
        }
        return Value::Object(object);
    }

    match schema.type_name() {
        Some("string") => json!(""),
        Some("integer") => json!(0),
        Some("number") => json!(0.0),
        Some("boolean") => json!(false),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_nested_refs_and_arrays() {
        let spec = OpenApiDocument::from_value(&json!({
            "components": { "schemas": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "tags": { "type": "array", "items": { "$ref": "#/components/schemas/Tag" } }
                    }
                },
                "Tag": { "type": "object", "properties": { "name": { "type": "string" } } }
            } }
        }))
        .unwrap();

        let root: SchemaNode =
            serde_json::from_value(json!({ "$ref": "#/components/schemas/Pet" })).unwrap();
        assert_eq!(
            sample_value(&root, &spec),
            json!({ "id": 0, "tags": [ { "name": "" } ] })
        );
    }

    #[test]
    fn test_sample_recursive_schema_is_finite() {
        let spec = OpenApiDocument::from_value(&json!({
            "components": { "schemas": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "number" },
                        "next": { "$ref": "#/components/schemas/Node" }
                    }
                }
            } }
        }))
        .unwrap();

        let root = spec.schema("Node").unwrap();
        assert_eq!(
            sample_value(root, &spec),
            json!({ "value": 0.0, "next": { "value": 0.0, "next": null } })
        );
    }
}
