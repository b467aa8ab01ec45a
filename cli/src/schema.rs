#![deny(missing_docs)]

//! # Schema Command
//!
//! Generates the GraphQL SDL for the selected endpoints of an OpenAPI document.

use crate::error::CliResult;
use crate::inputs::{load_endpoints, load_spec, write_output, GenerateArgs};
use oasgql_core::generate_schema;

/// Executes the schema generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let spec = load_spec(&args.spec)?;
    let endpoints = load_endpoints(&args.selection)?;
    let scopes = args.required_scopes()?;

    tracing::debug!(endpoints = endpoints.len(), "generating GraphQL schema");
    let sdl = generate_schema(&spec, &endpoints, &scopes)?;
    write_output(args.output.as_deref(), &sdl)
}
