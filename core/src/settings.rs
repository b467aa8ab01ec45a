#![deny(missing_docs)]

//! # Generator Settings
//!
//! User-tunable inputs of schema generation that are not part of the OpenAPI document
//! or the selection state. Loaded from a YAML (or JSON) settings file.

use crate::error::AppResult;
use serde::{Deserialize, Serialize};

/// The scope that protects every type when nothing else is configured.
pub const DEFAULT_SCOPE: &str = "test";

/// Authorization scopes as OR-of-AND groups: a caller needs every scope of at least one
/// group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredScopes(Vec<Vec<String>>);

impl Default for RequiredScopes {
    fn default() -> Self {
        Self(vec![vec![DEFAULT_SCOPE.to_string()]])
    }
}

impl RequiredScopes {
    /// Wraps explicit groups. An empty list means no scope directive at all.
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        Self(groups)
    }

    /// Parses groups written as comma separated scope lists, e.g. `["read,write", "admin"]`.
    ///
    /// Blank entries are dropped, as are groups left empty.
    pub fn from_group_strings<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            groups
                .into_iter()
                .map(|group| {
                    group
                        .as_ref()
                        .split(',')
                        .map(str::trim)
                        .filter(|scope| !scope.is_empty())
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .filter(|group| !group.is_empty())
                .collect(),
        )
    }

    /// The groups in order.
    pub fn groups(&self) -> &[Vec<String>] {
        &self.0
    }

    /// True if no group is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Settings of one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    /// Scopes attached to every object type via `@requiredScopes`.
    pub required_scopes: RequiredScopes,
}

impl GeneratorSettings {
    /// Parses settings from YAML text. JSON, being YAML, is accepted too.
    pub fn from_yaml_str(text: &str) -> AppResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
