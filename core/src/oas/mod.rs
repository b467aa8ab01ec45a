#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **document**: Deserialization layer for the parsed OpenAPI document.
//! - **ref_utils**: `$ref` resolution and preferred type names.
//! - **naming**: Operation ids, GraphQL-safe names and type name helpers.
//! - **schemas**: `allOf` flattening.
//! - **sample**: Representative sample values for bulk selection.

pub mod document;
pub mod naming;
pub mod ref_utils;
pub mod sample;
pub mod schemas;

pub use document::{
    Components, MediaType, OpenApiDocument, Operation, Parameter, PathItem, Paths, RequestBody,
    Response, SchemaNode, SchemaType, XmlObject,
};
pub use naming::{
    capitalize_type_name, endpoint_key, generate_operation_id, is_success_response,
    sanitize_graphql_name, singularize_and_capitalize,
};
pub use ref_utils::{get_preferred_name, get_ref_name, has_ref, resolve_ref};
pub use sample::sample_value;
pub use schemas::effective_properties;
