#![deny(missing_docs)]

//! # OASGQL CLI
//!
//! Command Line Interface for deriving a GraphQL layer from an OpenAPI document.
//!
//! Supported Commands:
//! - `schema`: Selected endpoints -> GraphQL SDL with routing and scope directives.
//! - `config`: Selected endpoints -> YAML routing config.
//! - `endpoints`: Lists operations with their selection keys and response type names.
//! - `select`: Selects every attribute of one endpoint into a selection file.

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod config;
mod endpoints;
mod error;
mod inputs;
mod schema;
mod select;

/// Environment variable holding the log filter directives.
const LOG_ENV_VAR: &str = "OASGQL_LOG";

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI to GraphQL CLI")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates the GraphQL SDL for the selected endpoints.
    Schema(inputs::GenerateArgs),
    /// Generates the YAML routing config for the selected endpoints.
    Config(inputs::GenerateArgs),
    /// Lists the operations of an OpenAPI document.
    Endpoints(endpoints::EndpointsArgs),
    /// Selects every response attribute of one endpoint.
    Select(select::SelectArgs),
}

fn setup_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> CliResult<()> {
    setup_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Schema(args) => schema::execute(args)?,
        Commands::Config(args) => config::execute(args)?,
        Commands::Endpoints(args) => endpoints::execute(args)?,
        Commands::Select(args) => select::execute(args)?,
    }

    Ok(())
}
