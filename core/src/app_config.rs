#![deny(missing_docs)]

//! # Application Config
//!
//! Emits the YAML routing config that maps each selected endpoint onto its REST call:
//!
//! ```yaml
//! ---
//! version: 1
//! endpoints:
//!   Pets/getPet:
//!     http:
//!       method: GET
//!       url:
//!         template: /pets/{id}
//!         path_params:
//!         - id
//! ```

use crate::error::AppResult;
use crate::oas::document::{OpenApiDocument, Operation};
use crate::oas::naming::{endpoint_key, sanitize_graphql_name};
use crate::selection::SelectedEndpoints;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Returned when there is no document or nothing is selected.
pub const APP_CONFIG_PLACEHOLDER: &str = "# Application config YAML will appear here\n";

/// Returned by the caller boundary when generation fails.
pub const APP_CONFIG_ERROR: &str = "# Error generating application config\n";

/// API group used for operations without tags.
pub const DEFAULT_API_NAME: &str = "Api";

const CONFIG_VERSION: u32 = 1;

/// The config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Format version.
    pub version: u32,
    /// Endpoints keyed by `<Api>/<Endpoint>`.
    pub endpoints: IndexMap<String, EndpointConfig>,
}

/// One endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// HTTP binding.
    pub http: HttpConfig,
}

/// HTTP binding of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Upper-cased method.
    pub method: String,
    /// Target URL.
    pub url: UrlConfig,
}

/// URL template and the parameters it interpolates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Path template, e.g. `/pets/{id}`.
    pub template: String,
    /// Names of the path parameters.
    pub path_params: Vec<String>,
}

/// Names of the `{placeholders}` of a path template, in order.
pub fn template_params(template: &str) -> Vec<String> {
    static PARAM_RE: OnceLock<Regex> = OnceLock::new();
    let param_re = PARAM_RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("Invalid regex"));
    param_re
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn path_params(spec: &OpenApiDocument, path: &str, operation: Option<&Operation>) -> Vec<String> {
    let declared: Vec<String> = match (spec.paths.get(path), operation) {
        (Some(item), Some(operation)) => spec
            .operation_parameters(item, operation)
            .into_iter()
            .filter(|param| param.is_path())
            .map(|param| param.name.clone())
            .collect(),
        _ => Vec::new(),
    };
    if declared.is_empty() {
        template_params(path)
    } else {
        declared
    }
}

/// Builds the config document for the selected endpoints.
pub fn build_app_config(spec: &OpenApiDocument, endpoints: &SelectedEndpoints) -> AppConfig {
    let mut config = AppConfig {
        version: CONFIG_VERSION,
        endpoints: IndexMap::new(),
    };

    for selection in endpoints.values() {
        let operation = spec.operation(&selection.path, &selection.method);
        if operation.is_none() {
            tracing::warn!(
                path = %selection.path,
                method = %selection.method,
                "selected endpoint not found in document"
            );
        }

        let api_name = operation
            .and_then(|op| op.tags.first())
            .map(String::as_str)
            .unwrap_or(DEFAULT_API_NAME);
        let endpoint_name = operation
            .and_then(|op| op.operation_id.clone())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| {
                sanitize_graphql_name(&endpoint_key(&selection.method, &selection.path))
            });
        let key = format!("{}/{}", api_name, endpoint_name);

        let endpoint = EndpointConfig {
            http: HttpConfig {
                method: selection.method.to_uppercase(),
                url: UrlConfig {
                    template: selection.path.clone(),
                    path_params: path_params(spec, &selection.path, operation),
                },
            },
        };
        if config.endpoints.contains_key(&key) {
            tracing::warn!(key = %key, "duplicate endpoint name, keeping the first");
            continue;
        }
        config.endpoints.insert(key, endpoint);
    }
    config
}

/// Generates the config YAML, prefixed with a `---` document marker.
///
/// # Arguments
///
/// * `spec` - The OpenAPI document, if one is loaded.
/// * `endpoints` - The selected endpoints.
pub fn generate_app_config(
    spec: Option<&OpenApiDocument>,
    endpoints: &SelectedEndpoints,
) -> AppResult<String> {
    let Some(spec) = spec else {
        return Ok(APP_CONFIG_PLACEHOLDER.to_string());
    };
    if endpoints.is_empty() {
        return Ok(APP_CONFIG_PLACEHOLDER.to_string());
    }

    let config = build_app_config(spec, endpoints);
    let yaml = serde_yaml::to_string(&config)?;
    Ok(format!("---\n{}", yaml))
}
