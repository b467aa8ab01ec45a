//! # Output Type Builder
//!
//! Converts OpenAPI schemas into GraphQL object types, materializing only the fields
//! the selection map marks as selected.
//!
//! Selections are addressed by a *type scope* (the selection map key) and a dotted
//! *path* inside that scope. Inline nested objects stay in their parent's scope with an
//! extended path; crossing a `$ref` or an array-item boundary opens a new scope keyed
//! by the target type's own name.
//!
//! A definition is identified by its requested name together with the schema node it
//! is built from. When a different schema already holds the name (or the name is the
//! root `Query`), the new definition gets the first free `<name>_<n>` instead.

use crate::graphql::cache::TypeCache;
use crate::graphql::sdl::QUERY_TYPE_NAME;
use crate::graphql::types::{scalar_for, FieldDef, TypeRef};
use crate::oas::document::{OpenApiDocument, SchemaNode};
use crate::oas::naming::{capitalize_type_name, sanitize_graphql_name, singularize_and_capitalize};
use crate::oas::ref_utils::{get_preferred_name, get_ref_name, ref_of, resolve_ref};
use crate::oas::schemas::effective_properties;
use crate::selection::{join_path, rescope, SelectionMap, ARRAY_ITEM_SEGMENT};
use std::collections::{HashMap, HashSet};

/// Requested type name and the schema node a definition is built from.
pub(crate) type DefinitionKey = (String, *const SchemaNode);

/// State of one schema generation pass.
///
/// Holds the document, a working copy of the (enriched) selection map that the
/// builder may extend with re-scoped entries, and the type cache.
#[derive(Debug)]
pub struct BuildContext<'a> {
    pub(crate) spec: &'a OpenApiDocument,
    pub(crate) selections: SelectionMap,
    pub(crate) cache: TypeCache,
    resolving_refs: HashSet<String>,
    resolving_input_refs: HashSet<String>,
    output_definitions: HashMap<DefinitionKey, String>,
    pub(crate) input_definitions: HashMap<DefinitionKey, String>,
}

impl<'a> BuildContext<'a> {
    /// Starts a pass with a fresh type cache.
    pub fn new(spec: &'a OpenApiDocument, selections: SelectionMap) -> Self {
        Self {
            spec,
            selections,
            cache: TypeCache::new(),
            resolving_refs: HashSet::new(),
            resolving_input_refs: HashSet::new(),
            output_definitions: HashMap::new(),
            input_definitions: HashMap::new(),
        }
    }

    /// The working selection map.
    pub fn selections(&self) -> &SelectionMap {
        &self.selections
    }

    /// The types built so far.
    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    /// Ends the pass, handing over the built types.
    pub fn into_cache(self) -> TypeCache {
        self.cache
    }

    /// Builds the GraphQL output type for `schema`.
    ///
    /// # Arguments
    ///
    /// * `name` - Type name to use when the schema does not name itself.
    /// * `schema` - The schema; `None` yields the `<name>_Empty` placeholder.
    /// * `type_scope` - Selection map key holding the selections for this node.
    /// * `path` - Dotted path of this node inside `type_scope` (empty at the root).
    ///
    /// # Returns
    ///
    /// A reference to a named object type, a list of one, a built-in scalar, or one of
    /// the placeholders (`_Empty`, `_Unresolved`, `_Scalar`).
    pub fn build_object_type(
        &mut self,
        name: &str,
        schema: Option<&'a SchemaNode>,
        type_scope: &str,
        path: &str,
    ) -> TypeRef {
        let Some(schema) = schema else {
            return self.placeholder_object(&format!("{}_Empty", name));
        };

        if let Some(reference) = ref_of(schema) {
            return self.build_ref_type(name, reference, type_scope, path);
        }
        if schema.is_array() {
            return self.build_list_type(name, schema, type_scope, path);
        }
        if schema.is_object() {
            return self.build_fields_type(name, schema, type_scope, path);
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

    fn build_ref_type(
        &mut self,
        name: &str,
        reference: &str,
        type_scope: &str,
        path: &str,
    ) -> TypeRef {
        let ref_name = get_ref_name(reference);
        if ref_name.is_empty() {
            return self.placeholder_object(&format!("{}_Unresolved", name));
        }

        let Some(target) = resolve_ref(reference, self.spec) else {
            tracing::warn!(reference = %reference, "unresolved $ref, emitting placeholder type");
            return self.placeholder_object(&format!("{}_Unresolved", ref_name));
        };

        let key: DefinitionKey = (sanitize_graphql_name(&ref_name), target);
        if let Some(existing) = self.output_definitions.get(&key) {
            return TypeRef::named(existing.clone());
        }

        if !self.resolving_refs.insert(ref_name.clone()) {
            tracing::warn!(reference = %reference, "$ref alias cycle, emitting placeholder type");
            return self.placeholder_object(&format!("{}_Unresolved", ref_name));
        }

        // Derive the referenced type's scope from the parent's path-prefixed entries
        // when enrichment did not produce one.
        if !path.is_empty() && !self.selections.contains_type(&ref_name) {
            let derived = self
                .selections
                .get(type_scope)
                .map(|attrs| rescope(attrs, &format!("{}.", path)))
                .unwrap_or_default();
            if !derived.is_empty() {
                self.selections.merge_scope(&ref_name, derived);
            }
        }

        let built = self.build_object_type(&ref_name, Some(target), &ref_name, "");
        self.resolving_refs.remove(&ref_name);
        built
    }

    fn build_list_type(
        &mut self,
        name: &str,
        schema: &'a SchemaNode,
        type_scope: &str,
        path: &str,
    ) -> TypeRef {
        let Some(items) = schema.items.as_deref() else {
            return TypeRef::named("String").list();
        };

        let item_name = get_preferred_name(items).unwrap_or_else(|| singularize_and_capitalize(name));
        let item_scope = match ref_of(items) {
            Some(reference) => get_ref_name(reference),
            None => item_name.clone(),
        };

        let prefix = format!("{}.", join_path(path, ARRAY_ITEM_SEGMENT));
        let item_selection = self
            .selections
            .get(type_scope)
            .map(|attrs| rescope(attrs, &prefix))
            .unwrap_or_default();
        if !item_selection.is_empty() {
            self.selections.merge_scope(&item_scope, item_selection);
        }

        self.build_object_type(&item_name, Some(items), &item_scope, "")
            .list()
    }

    fn build_fields_type(
        &mut self,
        name: &str,
        schema: &'a SchemaNode,
        type_scope: &str,
        path: &str,
    ) -> TypeRef {
        let key: DefinitionKey = (sanitize_graphql_name(name), schema);
        if let Some(existing) = self.output_definitions.get(&key) {
            return TypeRef::named(existing.clone());
        }
        let type_name = self.unclaimed_type_name(&key.0);
        self.output_definitions.insert(key, type_name.clone());
        self.cache
            .register_output(&type_name, schema.description.clone());

        let spec = self.spec;
        let mut fields = Vec::new();
        for (key, property) in effective_properties(schema, spec) {
            let field_path = join_path(path, key);
            if !self.selections.is_selected(type_scope, &field_path) {
                continue;
            }

            let field_type_name = get_preferred_name(property)
                .unwrap_or_else(|| format!("{}{}", type_name, capitalize_type_name(key)));
            let ty = self.build_object_type(&field_type_name, Some(property), type_scope, &field_path);
            fields.push(FieldDef::new(sanitize_graphql_name(key), ty));
        }

        tracing::trace!(type_name = %type_name, fields = fields.len(), "built output type");
        self.cache.complete_output(&type_name, fields);
        TypeRef::named(type_name)
    }

    fn placeholder_object(&mut self, name: &str) -> TypeRef {
        let type_name = sanitize_graphql_name(name);
        self.cache.register_output(&type_name, None);
        TypeRef::named(type_name)
    }

    /// `name` if no definition uses it, else the first free `<name>_<n>` from 2 on.
    pub(crate) fn unclaimed_type_name(&self, name: &str) -> String {
        let taken = |candidate: &str| candidate == QUERY_TYPE_NAME || self.cache.is_defined(candidate);
        if !taken(name) {
            return name.to_string();
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}_{}", name, suffix);
            if !taken(&candidate) {
                tracing::warn!(type_name = %name, renamed = %candidate, "type name already defined by another schema");
                return candidate;
            }
            suffix += 1;
        }
    }

    pub(crate) fn begin_input_ref(&mut self, ref_name: &str) -> bool {
        self.resolving_input_refs.insert(ref_name.to_string())
    }

    pub(crate) fn end_input_ref(&mut self, ref_name: &str) {
        self.resolving_input_refs.remove(ref_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::AttributeSelection;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec() -> OpenApiDocument {
        OpenApiDocument::from_value(&json!({
            "components": { "schemas": {
                "Pet": {
                    "type": "object",
                    "description": "A pet",
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string" },
                        "weight": { "type": "number" },
                        "vaccinated": { "type": "boolean" },
                        "owner": { "$ref": "#/components/schemas/User" },
                        "tags": { "type": "array", "items": { "$ref": "#/components/schemas/Tag" } },
                        "nicknames": { "type": "array", "items": { "type": "string" } },
                        "meta": {
                            "type": "object",
                            "properties": { "created": { "type": "string" }, "source": { "type": "string" } }
                        },
                        "blob": {},
                        "ghost": { "$ref": "#/components/schemas/Ghost" }
                    }
                },
                "User": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "email": { "type": "string" },
                        "best_friend": { "$ref": "#/components/schemas/User" }
                    }
                },
                "Tag": {
                    "type": "object",
                    "xml": { "name": "label" },
                    "properties": { "label": { "type": "string" } }
                },
                "AliasA": { "$ref": "#/components/schemas/AliasB" },
                "AliasB": { "$ref": "#/components/schemas/AliasA" }
            } }
        }))
        .unwrap()
    }

    fn scope(paths: &[(&str, bool)]) -> AttributeSelection {
        paths.iter().map(|(p, s)| (p.to_string(), *s)).collect()
    }

    fn field_names(ctx: &BuildContext<'_>, type_name: &str) -> Vec<String> {
        ctx.cache()
            .output(type_name)
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    #[test]
    fn test_only_selected_fields_are_built() {
        let spec = spec();
        let selections = [("Pet".to_string(), scope(&[("id", true), ("name", false)]))]
            .into_iter()
            .collect();
        let mut ctx = BuildContext::new(&spec, selections);

        let ty = ctx.build_object_type("Pet", spec.schema("Pet"), "Pet", "");
        assert_eq!(ty, TypeRef::named("Pet"));
        assert_eq!(field_names(&ctx, "Pet"), vec!["id"]);
        assert_eq!(
            ctx.cache().output("Pet").unwrap().description.as_deref(),
            Some("A pet")
        );
    }

    #[test]
    fn test_scalar_mapping_and_placeholders() {
        let spec = spec();
        let selections = [(
            "Pet".to_string(),
            scope(&[
                ("id", true),
                ("name", true),
                ("weight", true),
                ("vaccinated", true),
                ("blob", true),
                ("ghost", true),
            ]),
        )]
        .into_iter()
        .collect();
        let mut ctx = BuildContext::new(&spec, selections);
        ctx.build_object_type("Pet", spec.schema("Pet"), "Pet", "");

        let pet = ctx.cache().output("Pet").unwrap();
        let types: Vec<String> = pet.fields.iter().map(|f| f.ty.to_string()).collect();
        assert_eq!(
            types,
            vec!["Int", "String", "Float", "Boolean", "PetBlob_Scalar", "Ghost_Unresolved"]
        );
        assert!(ctx.cache().scalar("PetBlob_Scalar").is_some());
        assert!(ctx.cache().output("Ghost_Unresolved").unwrap().fields.is_empty());
    }

    #[test]
    fn test_missing_schema_is_empty_placeholder() {
        let spec = spec();
        let mut ctx = BuildContext::new(&spec, SelectionMap::new());
        let ty = ctx.build_object_type("Thing", None, "Thing", "");
        assert_eq!(ty, TypeRef::named("Thing_Empty"));
        assert!(ctx.cache().output("Thing_Empty").is_some());
    }

    #[test]
    fn test_ref_scope_derived_from_parent_path() {
        let spec = spec();
        let selections = [(
            "Pet".to_string(),
            scope(&[("owner", true), ("owner.email", true)]),
        )]
        .into_iter()
        .collect();
        let mut ctx = BuildContext::new(&spec, selections);
        ctx.build_object_type("Pet", spec.schema("Pet"), "Pet", "");

        assert_eq!(ctx.cache().output("Pet").unwrap().fields[0].ty, TypeRef::named("User"));
        assert_eq!(field_names(&ctx, "User"), vec!["email"]);
        assert!(ctx.selections().is_selected("User", "email"));
    }

    #[test]
    fn test_direct_scope_wins_over_parent_path() {
        let spec = spec();
        let selections = [
            ("Pet".to_string(), scope(&[("owner", true), ("owner.email", true)])),
            ("User".to_string(), scope(&[("name", true)])),
        ]
        .into_iter()
        .collect();
        let mut ctx = BuildContext::new(&spec, selections);
        ctx.build_object_type("Pet", spec.schema("Pet"), "Pet", "");
        assert_eq!(field_names(&ctx, "User"), vec!["name"]);
    }

    #[test]
    fn test_array_of_refs_rescopes_item_selection() {
        let spec = spec();
        let selections = [(
            "Pet".to_string(),
            scope(&[("tags", true), ("tags.0", true), ("tags.0.label", true), ("nicknames", true)]),
        )]
        .into_iter()
        .collect();
        let mut ctx = BuildContext::new(&spec, selections);
        ctx.build_object_type("Pet", spec.schema("Pet"), "Pet", "");

        let pet = ctx.cache().output("Pet").unwrap();
        assert_eq!(pet.field("tags").unwrap().ty.to_string(), "[Tag]");
        assert_eq!(pet.field("nicknames").unwrap().ty.to_string(), "[String]");
        assert_eq!(field_names(&ctx, "Tag"), vec!["label"]);
        assert!(ctx.selections().is_selected("Tag", "label"));
    }

    #[test]
    fn test_inline_array_items_use_xml_name() {
        let spec = spec();
        let list: SchemaNode = serde_json::from_value(json!({
            "type": "array",
            "items": {
                "type": "object",
                "xml": { "name": "entry" },
                "properties": { "key": { "type": "string" } }
            }
        }))
        .unwrap();
        let selections = [("entries".to_string(), scope(&[("0.key", true)]))]
            .into_iter()
            .collect();
        let mut ctx = BuildContext::new(&spec, selections);

        let ty = ctx.build_object_type("entries", Some(&list), "entries", "");
        assert_eq!(ty.to_string(), "[Entry]");
        assert_eq!(field_names(&ctx, "Entry"), vec!["key"]);
    }

    #[test]
    fn test_inline_object_stays_in_parent_scope() {
        let spec = spec();
        let selections = [(
            "Pet".to_string(),
            scope(&[("meta", true), ("meta.source", true)]),
        )]
        .into_iter()
        .collect();
        let mut ctx = BuildContext::new(&spec, selections);
        ctx.build_object_type("Pet", spec.schema("Pet"), "Pet", "");

        assert_eq!(
            ctx.cache().output("Pet").unwrap().field("meta").unwrap().ty,
            TypeRef::named("PetMeta")
        );
        assert_eq!(field_names(&ctx, "PetMeta"), vec!["source"]);
    }

    #[test]
    fn test_top_level_array_response() {
        let spec = spec();
        let list: SchemaNode = serde_json::from_value(json!({
            "type": "array",
            "items": { "$ref": "#/components/schemas/Pet" }
        }))
        .unwrap();
        let selections = [(
            "listPets_200".to_string(),
            scope(&[("0", true), ("0.id", true), ("0.name", true)]),
        )]
        .into_iter()
        .collect();
        let mut ctx = BuildContext::new(&spec, selections);

        let ty = ctx.build_object_type("listPets_200", Some(&list), "listPets_200", "");
        assert_eq!(ty.to_string(), "[Pet]");
        assert_eq!(field_names(&ctx, "Pet"), vec!["id", "name"]);
    }

    #[test]
    fn test_self_reference_terminates() {
        let spec = spec();
        let selections = [(
            "User".to_string(),
            scope(&[("name", true), ("best_friend", true)]),
        )]
        .into_iter()
        .collect();
        let mut ctx = BuildContext::new(&spec, selections);

        ctx.build_object_type("User", spec.schema("User"), "User", "");
        let user = ctx.cache().output("User").unwrap();
        assert_eq!(user.field("best_friend").unwrap().ty, TypeRef::named("User"));
        assert_eq!(ctx.cache().output_types().count(), 1);
    }

    #[test]
    fn test_ref_alias_cycle_terminates() {
        let spec = spec();
        let node: SchemaNode =
            serde_json::from_value(json!({ "$ref": "#/components/schemas/AliasA" })).unwrap();
        let mut ctx = BuildContext::new(&spec, SelectionMap::new());
        let ty = ctx.build_object_type("Root", Some(&node), "Root", "");
        assert_eq!(ty, TypeRef::named("AliasA_Unresolved"));
    }

    #[test]
    fn test_shared_type_is_built_once() {
        let spec = spec();
        let selections = [("Pet".to_string(), scope(&[("id", true)]))]
            .into_iter()
            .collect();
        let mut ctx = BuildContext::new(&spec, selections);
        let node: SchemaNode =
            serde_json::from_value(json!({ "$ref": "#/components/schemas/Pet" })).unwrap();

        let first = ctx.build_object_type("Pet", Some(&node), "Pet", "");
        let second = ctx.build_object_type("Pet", Some(&node), "Pet", "");
        assert_eq!(first, second);
        assert_eq!(ctx.cache().output_types().count(), 1);
    }

    #[test]
    fn test_inline_type_and_component_with_same_name_stay_distinct() {
        let spec = OpenApiDocument::from_value(&json!({
            "components": { "schemas": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "meta": { "type": "object", "properties": { "created": { "type": "string" } } }
                    }
                },
                "PetMeta": {
                    "type": "object",
                    "properties": { "code": { "type": "integer" } }
                }
            } }
        }))
        .unwrap();
        let selections = [
            ("Pet".to_string(), scope(&[("meta", true), ("meta.created", true)])),
            ("PetMeta".to_string(), scope(&[("code", true)])),
        ]
        .into_iter()
        .collect();
        let mut ctx = BuildContext::new(&spec, selections);

        ctx.build_object_type("Pet", spec.schema("Pet"), "Pet", "");
        let node: SchemaNode =
            serde_json::from_value(json!({ "$ref": "#/components/schemas/PetMeta" })).unwrap();
        let ty = ctx.build_object_type("PetMeta", Some(&node), "PetMeta", "");

        assert_eq!(ty, TypeRef::named("PetMeta_2"));
        assert_eq!(field_names(&ctx, "PetMeta"), vec!["created"]);
        assert_eq!(field_names(&ctx, "PetMeta_2"), vec!["code"]);

        // A second reference finds the renamed definition.
        assert_eq!(
            ctx.build_object_type("PetMeta", Some(&node), "PetMeta", ""),
            TypeRef::named("PetMeta_2")
        );
        assert_eq!(ctx.cache().output_types().count(), 3);
    }

    #[test]
    fn test_component_named_query_is_renamed() {
        let spec = OpenApiDocument::from_value(&json!({
            "components": { "schemas": {
                "Query": { "type": "object", "properties": { "term": { "type": "string" } } }
            } }
        }))
        .unwrap();
        let selections = [("Query".to_string(), scope(&[("term", true)]))]
            .into_iter()
            .collect();
        let mut ctx = BuildContext::new(&spec, selections);
        let node: SchemaNode =
            serde_json::from_value(json!({ "$ref": "#/components/schemas/Query" })).unwrap();

        let ty = ctx.build_object_type("Query", Some(&node), "Query", "");
        assert_eq!(ty, TypeRef::named("Query_2"));
        assert!(ctx.cache().output("Query").is_none());
        assert_eq!(field_names(&ctx, "Query_2"), vec!["term"]);
    }
}
