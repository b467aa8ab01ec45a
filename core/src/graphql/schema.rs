//! # Schema Assembler
//!
//! Runs the operation processor over every selected operation and assembles the
//! results into one SDL document.

use crate::error::AppResult;
use crate::graphql::builder::BuildContext;
use crate::graphql::sdl::{
    add_description_comments, ensure_directive_definitions, print_schema, SchemaDocument,
    QUERY_TYPE_NAME,
};
use crate::graphql::types::{DirectiveUse, DirectiveValue, ObjectType};
use crate::oas::document::OpenApiDocument;
use crate::selection::{enrich_selected_attributes, SelectedEndpoints, SelectionMap};
use crate::settings::RequiredScopes;

/// Returned when no operation contributes to the schema.
pub const SCHEMA_PLACEHOLDER: &str = "# GraphQL schema will appear here\n";

/// Returned by the caller boundary when generation fails.
pub const SCHEMA_ERROR: &str = "# Error generating GraphQL schema\n";

/// The `@requiredScopes(scopes: [[...]])` directive for the given scope groups.
pub fn required_scopes_directive(scopes: &RequiredScopes) -> DirectiveUse {
    DirectiveUse::new("requiredScopes").argument(
        "scopes",
        DirectiveValue::List(
            scopes
                .groups()
                .iter()
                .map(|group| DirectiveValue::string_list(group.iter().cloned()))
                .collect(),
        ),
    )
}

/// Generates the GraphQL SDL for the selected endpoints.
///
/// # Arguments
///
/// * `spec` - The OpenAPI document.
/// * `endpoints` - Endpoints the user picked, with their response type selections.
/// * `scopes` - OR-of-AND scope groups attached to every object type that has fields;
///   no directive is attached when there are no groups.
///
/// # Returns
///
/// The SDL text, or [`SCHEMA_PLACEHOLDER`] when nothing is selected or no selected
/// operation is eligible.
pub fn generate_schema(
    spec: &OpenApiDocument,
    endpoints: &SelectedEndpoints,
    scopes: &RequiredScopes,
) -> AppResult<String> {
    if endpoints.is_empty() {
        return Ok(SCHEMA_PLACEHOLDER.to_string());
    }

    let selections = enrich_selected_attributes(&SelectionMap::from_endpoints(endpoints), spec);
    let mut ctx = BuildContext::new(spec, selections);
    let mut query = ObjectType::new(QUERY_TYPE_NAME, None);

    for (path, item) in spec.paths.iter() {
        for (method, operation) in item.operations() {
            if !endpoints.contains(method, path) {
                continue;
            }
            let Some(result) = ctx.process_operation(path, method, operation) else {
                tracing::debug!(path = %path, method = %method, "operation contributed nothing");
                continue;
            };
            if query.field(&result.operation_id).is_some() {
                tracing::warn!(
                    operation_id = %result.operation_id,
                    path = %path,
                    method = %method,
                    "duplicate Query field name, skipping operation"
                );
                continue;
            }
            query.fields.push(result.into_field());
        }
    }

    if query.fields.is_empty() {
        return Ok(SCHEMA_PLACEHOLDER.to_string());
    }

    let (mut objects, inputs, scalars) = ctx.into_cache().into_definitions();
    if !scopes.is_empty() {
        let directive = required_scopes_directive(scopes);
        for object in objects.iter_mut().filter(|object| !object.fields.is_empty()) {
            object.directives.push(directive.clone());
        }
    }

    let document = SchemaDocument {
        query,
        objects,
        inputs,
        scalars,
    };
    let sdl = print_schema(&document)?;
    let sdl = add_description_comments(&sdl, &document.descriptions());
    tracing::debug!(
        types = document.objects.len(),
        fields = document.query.fields.len(),
        "generated GraphQL schema"
    );
    Ok(ensure_directive_definitions(&sdl))
}
