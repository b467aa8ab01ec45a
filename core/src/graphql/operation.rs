//! # Operation Processor
//!
//! Turns one REST operation into one `Query` field: response type, arguments,
//! description and the routing metadata that becomes its `@dataSource` directive.

use crate::graphql::builder::BuildContext;
use crate::graphql::types::{DirectiveUse, DirectiveValue, FieldDef, InputValueDef, TypeRef};
use crate::oas::document::{MediaType, OpenApiDocument, Operation, SchemaNode};
use crate::oas::naming::{
    capitalize_type_name, generate_operation_id, is_success_response, sanitize_graphql_name,
};
use crate::oas::ref_utils::{get_preferred_name, get_ref_name, ref_of};
use indexmap::IndexMap;

/// Name of the `Query` field argument carrying a JSON request body.
pub const BODY_ARGUMENT: &str = "input";

/// REST routing metadata of a `Query` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDirective {
    /// Original path template.
    pub path: String,
    /// Upper-cased HTTP method.
    pub method: String,
    /// Selected attribute paths of the response type, sorted.
    pub selection: Vec<String>,
}

impl RoutingDirective {
    /// The `@dataSource(...)` directive for this route.
    pub fn to_directive(&self) -> DirectiveUse {
        DirectiveUse::new("dataSource")
            .argument("path", DirectiveValue::String(self.path.clone()))
            .argument("method", DirectiveValue::String(self.method.clone()))
            .argument(
                "selection",
                DirectiveValue::string_list(self.selection.iter().cloned()),
            )
    }
}

/// What one eligible operation contributes to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// GraphQL-safe operation id, used as the `Query` field name.
    pub operation_id: String,
    /// Response type.
    pub gql_type: TypeRef,
    /// Arguments from parameters and the request body.
    pub args: Vec<InputValueDef>,
    /// Human readable description.
    pub description: String,
    /// Routing metadata.
    pub directive: RoutingDirective,
}

impl OperationResult {
    /// The `Query` field for this operation.
    pub fn into_field(self) -> FieldDef {
        let directive = self.directive.to_directive();
        FieldDef {
            name: self.operation_id,
            ty: self.gql_type,
            arguments: self.args,
            description: Some(self.description),
            directives: vec![directive],
        }
    }
}

/// The first JSON media type carrying a schema.
fn json_media<'m>(content: &'m IndexMap<String, MediaType>) -> Option<&'m MediaType> {
    content
        .iter()
        .find(|(media, body)| media.contains("json") && body.schema.is_some())
        .map(|(_, body)| body)
}

/// The operation id of an operation: `operationId`, else one derived from path and method.
pub fn operation_id(path: &str, method: &str, operation: &Operation) -> String {
    operation
        .operation_id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| generate_operation_id(path, method))
}

/// The JSON schemas of the first 2xx response that has content, each paired with the
/// selection type name it is keyed by (the `$ref` name, else `<operationId>_<code>`).
///
/// Empty when the operation has no such response.
pub fn response_schemas<'s>(
    spec: &'s OpenApiDocument,
    operation: &'s Operation,
    operation_id: &str,
) -> Vec<(String, &'s SchemaNode)> {
    let Some((code, response)) = operation
        .responses
        .iter()
        .find(|(code, _)| is_success_response(code))
    else {
        return Vec::new();
    };
    let Some(content) = spec
        .resolve_response(response)
        .and_then(|response| response.content.as_ref())
    else {
        tracing::debug!(operation_id = %operation_id, code = %code, "success response has no content");
        return Vec::new();
    };

    content
        .iter()
        .filter(|(media, _)| media.contains("json"))
        .filter_map(|(_, body)| body.schema.as_ref())
        .map(|schema| {
            let type_name = match ref_of(schema).map(get_ref_name) {
                Some(ref_name) if !ref_name.is_empty() => ref_name,
                _ => format!("{}_{}", operation_id, code),
            };
            (type_name, schema)
        })
        .collect()
}

impl<'a> BuildContext<'a> {
    /// Processes one operation.
    ///
    /// Returns `None` when the operation is not eligible: no 2xx response, no JSON
    /// content, or nothing selected for its response type.
    ///
    /// # Arguments
    ///
    /// * `path` - Path template the operation is declared under.
    /// * `method` - HTTP method (any case).
    /// * `operation` - The operation.
    pub fn process_operation(
        &mut self,
        path: &str,
        method: &str,
        operation: &'a Operation,
    ) -> Option<OperationResult> {
        let raw_id = operation_id(path, method, operation);
        let operation_id = sanitize_graphql_name(&raw_id);

        for (type_name, schema) in response_schemas(self.spec, operation, &raw_id) {
            if !self.selections.has_selection(&type_name) {
                tracing::debug!(type_name = %type_name, "no selection for response type");
                continue;
            }

            let gql_type = self.build_object_type(&type_name, Some(schema), &type_name, "");
            let args = self.build_arguments(path, &raw_id, operation);
            let description = describe(path, method, operation);
            let directive = RoutingDirective {
                path: path.to_string(),
                method: method.to_uppercase(),
                selection: self.selections.selected_paths(&type_name),
            };

            tracing::debug!(operation_id = %operation_id, gql_type = %gql_type, "processed operation");
            return Some(OperationResult {
                operation_id,
                gql_type,
                args,
                description,
                directive,
            });
        }
        None
    }

    fn build_arguments(
        &mut self,
        path: &str,
        operation_id: &str,
        operation: &'a Operation,
    ) -> Vec<InputValueDef> {
        let spec = self.spec;
        let mut args: Vec<InputValueDef> = Vec::new();
        let mut push = |arg: InputValueDef| {
            if args.iter().any(|existing| existing.name == arg.name) {
                tracing::warn!(argument = %arg.name, operation_id = %operation_id, "duplicate argument name, skipping");
            } else {
                args.push(arg);
            }
        };

        let parameters = match spec.paths.get(path) {
            Some(item) => spec.operation_parameters(item, operation),
            None => operation
                .parameters
                .iter()
                .filter_map(|p| spec.resolve_parameter(p))
                .collect(),
        };
        for param in parameters {
            let ty = match param.schema.as_ref() {
                Some(schema) => {
                    let base = get_preferred_name(schema).unwrap_or_else(|| {
                        format!(
                            "{}{}",
                            capitalize_type_name(operation_id),
                            capitalize_type_name(&param.name)
                        )
                    });
                    self.build_input_type(&base, Some(schema))
                }
                None => TypeRef::named("String"),
            };
            let ty = if param.required { ty.non_null() } else { ty };
            push(InputValueDef::new(sanitize_graphql_name(&param.name), ty));
        }

        let body = operation
            .request_body
            .as_ref()
            .and_then(|body| spec.resolve_request_body(body));
        if let Some(body) = body {
            if let Some(schema) = json_media(&body.content).and_then(|m| m.schema.as_ref()) {
                let base = get_preferred_name(schema)
                    .unwrap_or_else(|| capitalize_type_name(operation_id));
                let ty = self.build_input_type(&base, Some(schema));
                let ty = if body.required { ty.non_null() } else { ty };
                push(InputValueDef::new(BODY_ARGUMENT, ty));
            }
        }

        args
    }
}

fn describe(path: &str, method: &str, operation: &Operation) -> String {
    let mut description = format!("OpenAPI: {} {}", method.to_uppercase(), path);
    let detail = operation
        .summary
        .as_deref()
        .or(operation.description.as_deref())
        .filter(|text| !text.trim().is_empty());
    if let Some(detail) = detail {
        description.push_str("\n\n");
        description.push_str(detail);
    }
    description
}
