#![deny(missing_docs)]

//! # Endpoints Command
//!
//! Lists the operations of an OpenAPI document with the keys and response type names
//! a selection file uses for them.

use crate::error::CliResult;
use crate::inputs::{load_spec, write_output};
use oasgql_core::graphql::{operation_id, response_schemas};
use oasgql_core::oas::endpoint_key;
use oasgql_core::OpenApiDocument;
use std::path::PathBuf;

/// Arguments for the endpoints command.
#[derive(clap::Args, Debug, Clone)]
pub struct EndpointsArgs {
    /// Path to the OpenAPI document (JSON or YAML).
    #[clap(long, env = "OASGQL_SPEC")]
    pub spec: PathBuf,

    /// Output path. Prints to stdout if omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// One listed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointEntry {
    /// `METHOD_path` selection key.
    pub key: String,
    /// Explicit or derived operation id.
    pub operation_id: String,
    /// Selection type name of the response, if the operation has a JSON success response.
    pub type_name: Option<String>,
}

/// Lists every operation in document order.
pub fn list_endpoints(spec: &OpenApiDocument) -> Vec<EndpointEntry> {
    let mut entries = Vec::new();
    for (path, item) in spec.paths.iter() {
        for (method, operation) in item.operations() {
            let id = operation_id(path, method, operation);
            let type_name = response_schemas(spec, operation, &id)
                .into_iter()
                .next()
                .map(|(name, _)| name);
            entries.push(EndpointEntry {
                key: endpoint_key(method, path),
                operation_id: id,
                type_name,
            });
        }
    }
    entries
}

/// Executes the listing, one tab separated line per operation.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &EndpointsArgs) -> CliResult<()> {
    let spec = load_spec(&args.spec)?;
    let mut out = String::new();
    for entry in list_endpoints(&spec) {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            entry.key,
            entry.operation_id,
            entry.type_name.as_deref().unwrap_or("-")
        ));
    }
    write_output(args.output.as_deref(), &out)
}
