#![deny(missing_docs)]

//! # Command Inputs
//!
//! Arguments shared by the generating commands, and the file loading/writing they
//! need. Specs, selection files and settings may each be JSON or YAML.

use crate::error::{CliError, CliResult};
use oasgql_core::{GeneratorSettings, OpenApiDocument, RequiredScopes, SelectedEndpoints};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs of the `schema` and `config` commands.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI document (JSON or YAML).
    #[clap(long, env = "OASGQL_SPEC")]
    pub spec: PathBuf,

    /// Path to the selected endpoints file (JSON or YAML).
    #[clap(long, env = "OASGQL_SELECTION")]
    pub selection: PathBuf,

    /// Optional settings file providing `requiredScopes`.
    #[clap(long, env = "OASGQL_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Scope group as a comma separated list; repeat for alternative groups.
    /// Overrides the settings file.
    #[clap(long = "scopes")]
    pub scopes: Vec<String>,

    /// Output path. Prints to stdout if omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// The scope groups to apply: `--scopes` if given, else the settings file, else the
    /// default.
    pub fn required_scopes(&self) -> CliResult<RequiredScopes> {
        if !self.scopes.is_empty() {
            return Ok(RequiredScopes::from_group_strings(&self.scopes));
        }
        Ok(load_settings(self.settings.as_deref())?.required_scopes)
    }
}

fn read(path: &Path, what: &str) -> CliResult<String> {
    if !path.exists() {
        return Err(CliError::General(format!("{} not found: {:?}", what, path)));
    }
    Ok(fs::read_to_string(path)?)
}

/// Reads an OpenAPI document as a JSON value.
///
/// The text goes through `serde_yaml` first, so both JSON and YAML are accepted and
/// non-string YAML keys (`200:`) become strings.
pub fn load_spec_value(path: &Path) -> CliResult<Value> {
    let text = read(path, "OpenAPI document")?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&text)
        .map_err(|e| CliError::General(format!("Failed to parse {:?}: {}", path, e)))?;
    serde_json::to_value(yaml)
        .map_err(|e| CliError::General(format!("Failed to convert {:?}: {}", path, e)))
}

/// Reads and deserializes an OpenAPI document.
pub fn load_spec(path: &Path) -> CliResult<OpenApiDocument> {
    Ok(OpenApiDocument::from_value(&load_spec_value(path)?)?)
}

/// Reads a selected endpoints file.
pub fn load_endpoints(path: &Path) -> CliResult<SelectedEndpoints> {
    let text = read(path, "Selection file")?;
    if text.trim().is_empty() {
        return Ok(SelectedEndpoints::new());
    }
    serde_yaml::from_str(&text)
        .map_err(|e| CliError::General(format!("Failed to parse {:?}: {}", path, e)))
}

/// Reads the settings file, or the defaults when there is none.
pub fn load_settings(path: Option<&Path>) -> CliResult<GeneratorSettings> {
    match path {
        Some(path) => Ok(GeneratorSettings::from_yaml_str(&read(path, "Settings file")?)?),
        None => Ok(GeneratorSettings::default()),
    }
}

/// Writes `text` to `output`, creating parent directories, or prints it to stdout.
pub fn write_output(output: Option<&Path>, text: &str) -> CliResult<()> {
    let Some(path) = output else {
        print!("{}", text);
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    tracing::info!(path = ?path, "wrote output");
    Ok(())
}
