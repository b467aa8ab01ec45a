#![deny(missing_docs)]

//! # Config Command
//!
//! Generates the application routing config for the selected endpoints.

use crate::error::CliResult;
use crate::inputs::{load_endpoints, load_spec, write_output, GenerateArgs};
use oasgql_core::app_config::generate_app_config;

/// Executes the config generation. Scope arguments are accepted but unused.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let spec = load_spec(&args.spec)?;
    let endpoints = load_endpoints(&args.selection)?;

    let yaml = generate_app_config(Some(&spec), &endpoints)?;
    write_output(args.output.as_deref(), &yaml)
}
