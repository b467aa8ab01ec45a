#![deny(missing_docs)]

//! # Type Cache
//!
//! Per-generation registry of every type definition, one entry per type name. Output
//! and input types live in separate maps so a schema used both as a response shape and
//! as a request body never collides.
//!
//! A type is registered (as an empty shell) *before* its fields are built. A recursive
//! reference to a type that is still being built therefore finds the registered name
//! and stops, instead of descending again.

use crate::graphql::types::{FieldDef, InputObjectType, InputValueDef, ObjectType, ScalarType};
use indexmap::IndexMap;

/// Output, input and custom scalar definitions of one generation pass.
#[derive(Debug, Clone, Default)]
pub struct TypeCache {
    output: IndexMap<String, ObjectType>,
    input: IndexMap<String, InputObjectType>,
    scalars: IndexMap<String, ScalarType>,
}

impl TypeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if an output type of that name is registered (complete or in progress).
    pub fn contains_output(&self, name: &str) -> bool {
        self.output.contains_key(name)
    }

    /// Registers an output type shell. Returns false if the name was already taken.
    pub fn register_output(&mut self, name: &str, description: Option<String>) -> bool {
        if self.output.contains_key(name) {
            return false;
        }
        self.output
            .insert(name.to_string(), ObjectType::new(name, description));
        true
    }

    /// True if any definition (output, input or scalar) uses the name.
    pub fn is_defined(&self, name: &str) -> bool {
        self.output.contains_key(name)
            || self.input.contains_key(name)
            || self.scalars.contains_key(name)
    }

    /// Fills in the fields of a registered output type.
    pub fn complete_output(&mut self, name: &str, fields: Vec<FieldDef>) {
        if let Some(object) = self.output.get_mut(name) {
            object.fields = fields;
        }
    }

    /// Looks up an output type.
    pub fn output(&self, name: &str) -> Option<&ObjectType> {
        self.output.get(name)
    }

    /// True if an input type of that name is registered.
    pub fn contains_input(&self, name: &str) -> bool {
        self.input.contains_key(name)
    }

    /// Registers an input type shell. Returns false if the name was already taken.
    pub fn register_input(&mut self, name: &str, description: Option<String>) -> bool {
        if self.input.contains_key(name) {
            return false;
        }
        self.input
            .insert(name.to_string(), InputObjectType::new(name, description));
        true
    }

    /// Fills in the fields of a registered input type.
    pub fn complete_input(&mut self, name: &str, fields: Vec<InputValueDef>) {
        if let Some(input) = self.input.get_mut(name) {
            input.fields = fields;
        }
    }

    /// Looks up an input type.
    pub fn input(&self, name: &str) -> Option<&InputObjectType> {
        self.input.get(name)
    }

    /// Registers a custom scalar (idempotent).
    pub fn register_scalar(&mut self, name: &str, description: Option<String>) {
        self.scalars
            .entry(name.to_string())
            .or_insert_with(|| ScalarType {
                name: name.to_string(),
                description,
            });
    }

    /// Looks up a custom scalar.
    pub fn scalar(&self, name: &str) -> Option<&ScalarType> {
        self.scalars.get(name)
    }

    /// Output types in registration order.
    pub fn output_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.output.values()
    }

    /// Input types in registration order.
    pub fn input_types(&self) -> impl Iterator<Item = &InputObjectType> {
        self.input.values()
    }

    /// Custom scalars in registration order.
    pub fn scalar_types(&self) -> impl Iterator<Item = &ScalarType> {
        self.scalars.values()
    }

    /// Consumes the cache into its three definition lists.
    pub fn into_definitions(self) -> (Vec<ObjectType>, Vec<InputObjectType>, Vec<ScalarType>) {
        (
            self.output.into_values().collect(),
            self.input.into_values().collect(),
            self.scalars.into_values().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::types::TypeRef;

    #[test]
    fn test_register_then_complete() {
        let mut cache = TypeCache::new();
        assert!(cache.register_output("Pet", Some("A pet".into())));
        assert!(!cache.register_output("Pet", None));
        assert!(cache.contains_output("Pet"));
        assert!(cache.output("Pet").unwrap().fields.is_empty());

        cache.complete_output("Pet", vec![FieldDef::new("id", TypeRef::named("Int"))]);
        let pet = cache.output("Pet").unwrap();
        assert_eq!(pet.fields.len(), 1);
        assert_eq!(pet.description.as_deref(), Some("A pet"));
    }

    #[test]
    fn test_output_and_input_are_separate() {
        let mut cache = TypeCache::new();
        cache.register_output("Pet", None);
        assert!(!cache.contains_input("Pet"));
        assert!(cache.register_input("Pet", None));
        assert_eq!(cache.output_types().count(), 1);
        assert_eq!(cache.input_types().count(), 1);
    }

    #[test]
    fn test_is_defined_spans_all_kinds() {
        let mut cache = TypeCache::new();
        cache.register_output("Pet", None);
        cache.register_input("PetInput", None);
        cache.register_scalar("Blob_Scalar", None);
        assert!(cache.is_defined("Pet"));
        assert!(cache.is_defined("PetInput"));
        assert!(cache.is_defined("Blob_Scalar"));
        assert!(!cache.is_defined("Owner"));
    }

    #[test]
    fn test_scalars_are_idempotent() {
        let mut cache = TypeCache::new();
        cache.register_scalar("Blob_Scalar", Some("first".into()));
        cache.register_scalar("Blob_Scalar", Some("second".into()));
        assert_eq!(cache.scalar_types().count(), 1);
        assert_eq!(
            cache.scalar("Blob_Scalar").unwrap().description.as_deref(),
            Some("first")
        );
    }
}
