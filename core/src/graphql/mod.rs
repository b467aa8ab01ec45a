#![deny(missing_docs)]

//! # GraphQL Module
//!
//! Derivation of a GraphQL schema from an OpenAPI document and a selection map.
//!
//! - **types**: The GraphQL type model and directive values.
//! - **cache**: Per-generation registry of type definitions.
//! - **builder**: Selection-driven output types.
//! - **input**: Input types for arguments.
//! - **operation**: One `Query` field per operation.
//! - **sdl**: SDL printing and post-processing passes.
//! - **schema**: Assembly of the final document.

pub mod builder;
pub mod cache;
pub mod input;
pub mod operation;
pub mod schema;
pub mod sdl;
pub mod types;

pub use builder::BuildContext;
pub use cache::TypeCache;
pub use input::input_type_name;
pub use operation::{operation_id, response_schemas, OperationResult, RoutingDirective};
pub use schema::{generate_schema, required_scopes_directive, SCHEMA_ERROR, SCHEMA_PLACEHOLDER};
pub use sdl::{
    SchemaDocument, DATA_SOURCE_DEFINITION, QUERY_TYPE_NAME, REQUIRED_SCOPES_DEFINITION,
};
pub use types::{
    DirectiveUse, DirectiveValue, FieldDef, InputObjectType, InputValueDef, ObjectType,
    ScalarType, TypeRef,
};
