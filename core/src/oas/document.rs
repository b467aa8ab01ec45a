#![deny(missing_docs)]

//! # OpenAPI Document Model
//!
//! Intermediate Deserialization Layer for the parts of an OpenAPI document that the
//! GraphQL derivation reads. The host hands over an already parsed JSON value; these
//! structs map directly onto its objects and keep declaration order via `IndexMap`.

use crate::error::{AppError, AppResult};
use crate::oas::ref_utils::get_ref_name;
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The root of an OpenAPI document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpenApiDocument {
    /// Path templates and their operations.
    #[serde(default)]
    pub paths: Paths,
    /// Reusable components (`components.schemas` is the `$ref` target namespace).
    #[serde(default)]
    pub components: Option<Components>,
}

impl OpenApiDocument {
    /// Deserializes a parsed JSON/YAML value into the document model.
    ///
    /// A value whose shape does not match (e.g. `paths` being a list) is reported as
    /// `AppError::InvalidDocument`.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        Self::deserialize(value).map_err(|e| AppError::InvalidDocument(e.to_string()))
    }

    /// Returns the `components.schemas` map, if the document declares one.
    pub fn schemas(&self) -> Option<&IndexMap<String, SchemaNode>> {
        self.components.as_ref().map(|c| &c.schemas)
    }

    /// Looks up a named schema in `components.schemas`.
    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas().and_then(|schemas| schemas.get(name))
    }

    /// Finds the operation declared for `path` and `method` (method is case-insensitive).
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path)?.operation(method)
    }

    /// Resolves a `$ref` parameter against `components.parameters`.
    ///
    /// Inline parameters are returned as-is; a dangling reference yields `None`.
    pub fn resolve_parameter<'a>(&'a self, param: &'a Parameter) -> Option<&'a Parameter> {
        match param.reference.as_deref() {
            Some(reference) => self
                .components
                .as_ref()?
                .parameters
                .get(&get_ref_name(reference)),
            None => Some(param),
        }
    }

    /// Resolves a `$ref` request body against `components.requestBodies`.
    pub fn resolve_request_body<'a>(&'a self, body: &'a RequestBody) -> Option<&'a RequestBody> {
        match body.reference.as_deref() {
            Some(reference) => self
                .components
                .as_ref()?
                .request_bodies
                .get(&get_ref_name(reference)),
            None => Some(body),
        }
    }

    /// Resolves a `$ref` response against `components.responses`.
    pub fn resolve_response<'a>(&'a self, response: &'a Response) -> Option<&'a Response> {
        match response.reference.as_deref() {
            Some(reference) => self
                .components
                .as_ref()?
                .responses
                .get(&get_ref_name(reference)),
            None => Some(response),
        }
    }

    /// Merges path-level parameters with the operation's own parameters.
    ///
    /// Operation parameters take priority; a path-level parameter is only added when no
    /// operation parameter shares its `(name, in)` pair. Unresolvable `$ref`s are skipped.
    pub fn operation_parameters<'a>(
        &'a self,
        item: &'a PathItem,
        operation: &'a Operation,
    ) -> Vec<&'a Parameter> {
        let mut params: Vec<&Parameter> = operation
            .parameters
            .iter()
            .filter_map(|p| self.resolve_parameter(p))
            .collect();

        for common in item.parameters.iter().filter_map(|p| self.resolve_parameter(p)) {
            let overridden = params
                .iter()
                .any(|p| p.name == common.name && p.location == common.location);
            if !overridden {
                params.push(common);
            }
        }
        params
    }
}

/// The Paths Object. Specification extensions (`x-...`) are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths(IndexMap<String, PathItem>);

impl Paths {
    /// Iterates path items in declaration order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, PathItem> {
        self.0.iter()
    }

    /// Returns the path item for an exact path template.
    pub fn get(&self, path: &str) -> Option<&PathItem> {
        self.0.get(path)
    }

    /// Returns true when no path items are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                continue;
            }
            let path_item = serde_json::from_value::<PathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self(items))
    }
}

/// A single path template and the operations declared on it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PathItem {
    /// Parameters shared by every operation of this path.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// GET operation.
    pub get: Option<Operation>,
    /// PUT operation.
    pub put: Option<Operation>,
    /// POST operation.
    pub post: Option<Operation>,
    /// DELETE operation.
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    pub options: Option<Operation>,
    /// HEAD operation.
    pub head: Option<Operation>,
    /// PATCH operation.
    pub patch: Option<Operation>,
    /// TRACE operation.
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Iterates the declared operations as `(lower-case method, operation)` in a fixed
    /// method order.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> + '_ {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
            ("trace", &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }

    /// Returns the operation for `method`, compared case-insensitively.
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        self.operations()
            .find(|(m, _)| m.eq_ignore_ascii_case(method))
            .map(|(_, op)| op)
    }
}

/// An Operation Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Explicit operation identifier.
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Grouping tags; the first one names the API in the app config.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Operation-level parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Request body, if any.
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code (or `default`), in declaration order.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// A Parameter Object (or a `$ref` to one).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Parameter {
    /// Parameter name as sent over HTTP.
    #[serde(default)]
    pub name: String,
    /// Location: `path`, `query`, `header` or `cookie`.
    #[serde(rename = "in")]
    pub location: Option<String>,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Human readable description.
    pub description: Option<String>,
    /// Value schema.
    pub schema: Option<SchemaNode>,
    /// Reference into `components.parameters`.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

impl Parameter {
    /// True for `in: path` parameters.
    pub fn is_path(&self) -> bool {
        self.location.as_deref() == Some("path")
    }
}

/// A Request Body Object (or a `$ref` to one).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
    /// Body schemas keyed by media type.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    /// Whether a body must be sent.
    #[serde(default)]
    pub required: bool,
    /// Human readable description.
    pub description: Option<String>,
    /// Reference into `components.requestBodies`.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

/// A Response Object (or a `$ref` to one).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
    /// Human readable description.
    pub description: Option<String>,
    /// Response schemas keyed by media type.
    pub content: Option<IndexMap<String, MediaType>>,
    /// Reference into `components.responses`.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

/// A Media Type Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaType {
    /// Payload schema.
    pub schema: Option<SchemaNode>,
}

/// The Components Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Named schemas, the namespace every schema `$ref` resolves against.
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
    /// Named parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    /// Named request bodies.
    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBody>,
    /// Named responses.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// The `type` keyword: a single name, or an OAS 3.1 list such as `["string", "null"]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Multiple(Vec<String>),
}

impl SchemaType {
    /// The effective type name: the first entry that is not `"null"`.
    pub fn primary(&self) -> Option<&str> {
        match self {
            SchemaType::Single(name) => Some(name.as_str()),
            SchemaType::Multiple(names) => names
                .iter()
                .map(String::as_str)
                .find(|name| *name != "null"),
        }
    }
}

/// The `xml` keyword; only `name` matters here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct XmlObject {
    /// Alternate element name, preferred as the GraphQL type name.
    pub name: Option<String>,
}

/// A (recursive) Schema Object.
///
/// `$ref` and `$$ref` are kept as raw JSON values: only string values count as
/// references, anything else passes through as an ordinary schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Declared `type`.
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Object properties in declaration order.
    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,
    /// Array item schema.
    pub items: Option<Box<SchemaNode>>,
    /// `$ref` pointer into `components.schemas`.
    #[serde(rename = "$ref")]
    pub reference: Option<Value>,
    /// `$$ref`, the pointer left behind by dereferencing parsers.
    #[serde(rename = "$$ref")]
    pub resolved_reference: Option<Value>,
    /// Schemas merged into this one, in order.
    #[serde(default)]
    pub all_of: Vec<SchemaNode>,
    /// Human readable description.
    pub description: Option<String>,
    /// XML hints.
    pub xml: Option<XmlObject>,
}

impl SchemaNode {
    /// The string value of `$ref`, if present.
    pub fn reference_str(&self) -> Option<&str> {
        self.reference.as_ref().and_then(Value::as_str)
    }

    /// The string value of `$$ref`, if present.
    pub fn resolved_reference_str(&self) -> Option<&str> {
        self.resolved_reference.as_ref().and_then(Value::as_str)
    }

    /// The effective `type`, if declared.
    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(SchemaType::primary)
    }

    /// An object schema: `type: object`, or untyped with properties or `allOf`.
    pub fn is_object(&self) -> bool {
        match self.type_name() {
            Some(ty) => ty == "object",
            None => !self.properties.is_empty() || !self.all_of.is_empty(),
        }
    }

    /// An array schema: `type: array`, or untyped with `items`.
    pub fn is_array(&self) -> bool {
        match self.type_name() {
            Some(ty) => ty == "array",
            None => self.items.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn petstore() -> OpenApiDocument {
        OpenApiDocument::from_value(&json!({
            "openapi": "3.0.0",
            "paths": {
                "x-internal": true,
                "/pets/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
                        { "name": "verbose", "in": "query", "schema": { "type": "boolean" } }
                    ],
                    "get": {
                        "operationId": "getPet",
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } },
                            { "$ref": "#/components/parameters/Limit" }
                        ],
                        "responses": { "200": { "description": "OK" } }
                    }
                }
            },
            "components": {
                "schemas": { "Pet": { "type": "object" } },
                "parameters": {
                    "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_extensions_are_skipped() {
        let doc = petstore();
        assert_eq!(doc.paths.iter().count(), 1);
        assert!(doc.schema("Pet").is_some());
    }

    #[test]
    fn test_operation_lookup_is_case_insensitive() {
        let doc = petstore();
        let op = doc.operation("/pets/{id}", "GET").unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("getPet"));
        assert!(doc.operation("/pets/{id}", "post").is_none());
        assert!(doc.operation("/missing", "get").is_none());
    }

    #[test]
    fn test_operation_parameters_merge() {
        let doc = petstore();
        let item = doc.paths.get("/pets/{id}").unwrap();
        let op = item.get.as_ref().unwrap();
        let params = doc.operation_parameters(item, op);

        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "limit", "verbose"]);
        // The operation-level `id` overrides the path-level one.
        let id_type = params[0].schema.as_ref().and_then(|s| s.type_name());
        assert_eq!(id_type, Some("integer"));
    }

    #[test]
    fn test_schema_type_array_form() {
        let node: SchemaNode =
            serde_json::from_value(json!({ "type": ["null", "integer"] })).unwrap();
        assert_eq!(node.type_name(), Some("integer"));
    }

    #[test]
    fn test_non_string_ref_is_not_a_reference() {
        let node: SchemaNode = serde_json::from_value(json!({ "$ref": 42 })).unwrap();
        assert!(node.reference.is_some());
        assert_eq!(node.reference_str(), None);
    }

    #[test]
    fn test_property_required_flag_is_ignored() {
        let node: SchemaNode = serde_json::from_value(json!({
            "type": "object",
            "required": ["id"],
            "properties": { "id": { "type": "integer", "required": true, "format": 64 } }
        }))
        .unwrap();
        assert_eq!(node.properties["id"].type_name(), Some("integer"));
    }

    #[test]
    fn test_malformed_document() {
        let err = OpenApiDocument::from_value(&json!({ "paths": [1, 2] })).unwrap_err();
        assert!(matches!(err, AppError::InvalidDocument(_)));
    }
}
