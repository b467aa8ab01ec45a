#![deny(missing_docs)]

//! # Select Command
//!
//! Bulk-selects every attribute of one endpoint's response and records it in a
//! selection file, creating the file if needed. The attribute paths come from a sample
//! value built from the response schema.

use crate::error::{CliError, CliResult};
use crate::inputs::{load_endpoints, load_spec, write_output};
use oasgql_core::graphql::{operation_id, response_schemas};
use oasgql_core::{sample_value, EndpointSelection, OpenApiDocument, SelectedEndpoints, SelectionMap};
use std::path::{Path, PathBuf};

/// Arguments for the select command.
#[derive(clap::Args, Debug, Clone)]
pub struct SelectArgs {
    /// Path to the OpenAPI document (JSON or YAML).
    #[clap(long, env = "OASGQL_SPEC")]
    pub spec: PathBuf,

    /// Selection file to update. Written as YAML for `.yaml`/`.yml`, JSON otherwise.
    #[clap(long, env = "OASGQL_SELECTION")]
    pub selection: PathBuf,

    /// Path template of the endpoint, e.g. `/pets/{id}`.
    #[clap(long)]
    pub path: String,

    /// HTTP method of the endpoint.
    #[clap(long, default_value = "GET")]
    pub method: String,
}

/// Adds the full selection of one endpoint to `endpoints`.
///
/// Existing entries of the endpoint are kept; every sampled path is set to selected.
/// The entry is keyed by the response type name the schema generator looks up: the
/// `$ref` name, else `<operationId>_<code>`.
///
/// # Returns
///
/// The number of selected attribute paths of the endpoint.
pub fn select_endpoint(
    spec: &OpenApiDocument,
    endpoints: &mut SelectedEndpoints,
    path: &str,
    method: &str,
) -> CliResult<usize> {
    let operation = spec.operation(path, method).ok_or_else(|| {
        CliError::General(format!("Operation not found: {} {}", method.to_uppercase(), path))
    })?;
    let id = operation_id(path, method, operation);
    let (type_name, schema) = response_schemas(spec, operation, &id)
        .into_iter()
        .next()
        .ok_or_else(|| {
            CliError::General(format!("Operation {} has no JSON success response", id))
        })?;

    let mut selections = SelectionMap::new();
    if let Some(existing) = endpoints.get(method, path) {
        selections.merge_scope(&type_name, existing.selected_attrs.clone());
    }
    selections.select_all(&type_name, &sample_value(schema, spec));

    let selected = EndpointSelection {
        selected_attrs: selections.get(&type_name).cloned().unwrap_or_default(),
        ..EndpointSelection::new(path, method.to_uppercase(), type_name.as_str())
    };
    let count = selected.selected_attrs.values().filter(|s| **s).count();
    tracing::debug!(key = %selected.key(), count, "selected all attributes");
    endpoints.insert(selected);
    Ok(count)
}

fn serialize(path: &Path, endpoints: &SelectedEndpoints) -> CliResult<String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    match ext {
        "yaml" | "yml" => serde_yaml::to_string(endpoints)
            .map_err(|e| CliError::General(format!("YAML serialization failed: {}", e))),
        _ => serde_json::to_string_pretty(endpoints)
            .map(|json| json + "\n")
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e))),
    }
}

/// Executes the selection.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &SelectArgs) -> CliResult<()> {
    let spec = load_spec(&args.spec)?;
    let mut endpoints = if args.selection.exists() {
        load_endpoints(&args.selection)?
    } else {
        SelectedEndpoints::new()
    };

    let count = select_endpoint(&spec, &mut endpoints, &args.path, &args.method)?;
    write_output(Some(&args.selection), &serialize(&args.selection, &endpoints)?)?;
    println!(
        "Selected {} attributes of {} {} in {:?}",
        count,
        args.method.to_uppercase(),
        args.path,
        args.selection
    );
    Ok(())
}
