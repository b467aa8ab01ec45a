#![deny(missing_docs)]

//! # OASGQL Core
//!
//! Derives a GraphQL schema from an OpenAPI document and the user's field
//! selections. The schema exposes exactly the selected attributes, carries REST
//! routing metadata in `@dataSource` directives and authorization requirements in
//! `@requiredScopes` directives. A companion YAML config maps each selected endpoint
//! onto its HTTP call.
//!
//! The two `generate_*` functions at the crate root are the caller boundary: they
//! never fail, returning placeholder text instead.

/// Shared error types.
pub mod error;

/// OpenAPI document model and helpers.
pub mod oas;

/// Selection state and enrichment.
pub mod selection;

/// GraphQL schema derivation.
pub mod graphql;

/// YAML routing config.
pub mod app_config;

/// Generation settings.
pub mod settings;

pub use app_config::{AppConfig, APP_CONFIG_ERROR, APP_CONFIG_PLACEHOLDER};
pub use error::{AppError, AppResult};
pub use graphql::{generate_schema, SCHEMA_ERROR, SCHEMA_PLACEHOLDER};
pub use oas::{sample_value, OpenApiDocument};
pub use selection::{
    collect_paths, collect_paths_with_prefix, enrich_selected_attributes, AttributeSelection,
    EndpointSelection, SelectedEndpoints, SelectionMap,
};
pub use settings::{GeneratorSettings, RequiredScopes};

use serde_json::Value;

/// Generates the GraphQL SDL for a parsed OpenAPI document.
///
/// # Arguments
///
/// * `spec` - The parsed OpenAPI document (from JSON or YAML).
/// * `endpoints` - The selected endpoints and their response selections.
/// * `scopes` - Scope groups for `@requiredScopes`.
///
/// # Returns
///
/// The SDL, [`SCHEMA_PLACEHOLDER`] when nothing contributes, or [`SCHEMA_ERROR`] when
/// the document cannot be processed.
pub fn generate_graphql_sdl(
    spec: &Value,
    endpoints: &SelectedEndpoints,
    scopes: &RequiredScopes,
) -> String {
    if endpoints.is_empty() {
        return SCHEMA_PLACEHOLDER.to_string();
    }
    let result = OpenApiDocument::from_value(spec)
        .and_then(|document| generate_schema(&document, endpoints, scopes));
    match result {
        Ok(sdl) => sdl,
        Err(e) => {
            tracing::error!(error = %e, "failed to generate GraphQL schema");
            SCHEMA_ERROR.to_string()
        }
    }
}

/// Generates the application config YAML.
///
/// # Returns
///
/// The YAML, [`APP_CONFIG_PLACEHOLDER`] when there is no document or no selection, or
/// [`APP_CONFIG_ERROR`] when the document cannot be processed.
pub fn generate_app_config(spec: Option<&Value>, endpoints: &SelectedEndpoints) -> String {
    let Some(spec) = spec else {
        return APP_CONFIG_PLACEHOLDER.to_string();
    };
    if endpoints.is_empty() {
        return APP_CONFIG_PLACEHOLDER.to_string();
    }
    let result = OpenApiDocument::from_value(spec)
        .and_then(|document| app_config::generate_app_config(Some(&document), endpoints));
    match result {
        Ok(yaml) => yaml,
        Err(e) => {
            tracing::error!(error = %e, "failed to generate application config");
            APP_CONFIG_ERROR.to_string()
        }
    }
}
