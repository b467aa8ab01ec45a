//! # Input Type Builder
//!
//! Mirror of the output builder for argument shapes (parameters and request bodies).
//! Selections play no part: every declared property becomes an input field. Input
//! types live in their own cache map under `Input`-suffixed names.

use crate::graphql::builder::{BuildContext, DefinitionKey};
use crate::graphql::types::{scalar_for, InputValueDef, TypeRef};
use crate::oas::document::SchemaNode;
use crate::oas::naming::{capitalize_type_name, sanitize_graphql_name, singularize_and_capitalize};
use crate::oas::ref_utils::{get_preferred_name, get_ref_name, ref_of, resolve_ref};
use crate::oas::schemas::effective_properties;

/// The input type name for a base name: sanitized, with `Input` appended once.
pub fn input_type_name(name: &str) -> String {
    let sanitized = sanitize_graphql_name(name);
    if sanitized.ends_with("Input") {
        sanitized
    } else {
        format!("{}Input", sanitized)
    }
}

impl<'a> BuildContext<'a> {
    /// Builds the GraphQL input type for `schema`.
    ///
    /// # Arguments
    ///
    /// * `name` - Base name used when the schema does not name itself.
    /// * `schema` - The schema; `None` yields the `<name>Input_Empty` placeholder.
    pub fn build_input_type(&mut self, name: &str, schema: Option<&'a SchemaNode>) -> TypeRef {
        let Some(schema) = schema else {
            return self.placeholder_input(&format!("{}_Empty", input_type_name(name)));
        };

        if let Some(reference) = ref_of(schema) {
            let ref_name = get_ref_name(reference);
            if ref_name.is_empty() {
                return self.placeholder_input(&format!("{}_Unresolved", input_type_name(name)));
            }
            let type_name = input_type_name(&ref_name);
            let Some(target) = resolve_ref(reference, self.spec) else {
                tracing::warn!(reference = %reference, "unresolved $ref in input, emitting placeholder type");
                return self.placeholder_input(&format!("{}_Unresolved", type_name));
            };
            let key: DefinitionKey = (type_name.clone(), target);
            if let Some(existing) = self.input_definitions.get(&key) {
                return TypeRef::named(existing.clone());
            }
            if !self.begin_input_ref(&ref_name) {
                return self.placeholder_input(&format!("{}_Unresolved", type_name));
            }
            let built = self.build_input_type(&ref_name, Some(target));
            self.end_input_ref(&ref_name);
            return built;
        }

        if schema.is_array() {
            let Some(items) = schema.items.as_deref() else {
                return TypeRef::named("String").list();
            };
            let item_name =
                get_preferred_name(items).unwrap_or_else(|| singularize_and_capitalize(name));
            return self.build_input_type(&item_name, Some(items)).list();
        }

        if schema.is_object() {
            let key: DefinitionKey = (input_type_name(name), schema);
            if let Some(existing) = self.input_definitions.get(&key) {
                return TypeRef::named(existing.clone());
            }
            let base = key.0.trim_end_matches("Input").to_string();
            let type_name = self.unclaimed_type_name(&key.0);
            self.input_definitions.insert(key, type_name.clone());
            self.cache
                .register_input(&type_name, schema.description.clone());

            let spec = self.spec;
            let mut fields = Vec::new();
            for (key, property) in effective_properties(schema, spec) {
                let field_type_name = get_preferred_name(property)
                    .unwrap_or_else(|| format!("{}{}", base, capitalize_type_name(key)));
                let ty = self.build_input_type(&field_type_name, Some(property));
                fields.push(InputValueDef::new(sanitize_graphql_name(key), ty));
            }
            self.cache.complete_input(&type_name, fields);
            return TypeRef::named(type_name);
        }

        match schema.type_name() {
            Some(openapi_type) => TypeRef::named(scalar_for(openapi_type)),
            None => {
                let scalar_name = format!("{}_Scalar", sanitize_graphql_name(name));
                self.cache
                    .register_scalar(&scalar_name, schema.description.clone());
                TypeRef::named(scalar_name)
            }
        }
    }

    fn placeholder_input(&mut self, name: &str) -> TypeRef {
        self.cache.register_input(name, None);
        TypeRef::named(name)
    }
}
