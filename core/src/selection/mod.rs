#![deny(missing_docs)]

//! # Selection State
//!
//! The user's field choices, modelled as a two-level map: type name -> dotted
//! attribute path -> selected. A path segment `"0"` stands for "any element" of an
//! array; every other segment is an object property name.
//!
//! - **collect**: enumerating the attribute paths of a sample value.
//! - **enrich**: propagating selections across `$ref` and array boundaries.

pub mod collect;
pub mod enrich;

pub use collect::{collect_paths, collect_paths_with_prefix};
pub use enrich::enrich_selected_attributes;

use crate::oas::naming::endpoint_key;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// The path segment standing for "any element" of an array.
pub const ARRAY_ITEM_SEGMENT: &str = "0";

/// Dotted attribute path -> selected, for one type.
pub type AttributeSelection = BTreeMap<String, bool>;

/// Joins a parent path and a segment with `.`; an empty parent yields the segment.
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

/// Re-keys the entries below `prefix` into a fresh selection with the prefix stripped.
///
/// `prefix` includes its trailing dot, e.g. `"0."` re-keys `{"0.id": true}` as
/// `{"id": true}`. Entries outside the prefix, and the prefix itself, are dropped.
pub fn rescope(attrs: &AttributeSelection, prefix: &str) -> AttributeSelection {
    attrs
        .iter()
        .filter_map(|(path, selected)| {
            path.strip_prefix(prefix)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (rest.to_string(), *selected))
        })
        .collect()
}

/// Type name -> attribute selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionMap(BTreeMap<String, AttributeSelection>);

impl SelectionMap {
    /// Creates an empty selection map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the per-type selection of a set of endpoints.
    ///
    /// Endpoints sharing a response type are unioned: a path is selected if any of them
    /// selects it.
    pub fn from_endpoints(endpoints: &SelectedEndpoints) -> Self {
        let mut map = Self::new();
        for endpoint in endpoints.values() {
            let scope = map.0.entry(endpoint.type_name.clone()).or_default();
            for (path, selected) in &endpoint.selected_attrs {
                let entry = scope.entry(path.clone()).or_insert(*selected);
                *entry |= *selected;
            }
        }
        map
    }

    /// The selection of one type.
    pub fn get(&self, type_name: &str) -> Option<&AttributeSelection> {
        self.0.get(type_name)
    }

    /// True if the type has an entry (even one holding only `false` values).
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.0.contains_key(type_name)
    }

    /// True if at least one path of the type is selected.
    pub fn has_selection(&self, type_name: &str) -> bool {
        self.get(type_name)
            .is_some_and(|attrs| attrs.values().any(|selected| *selected))
    }

    /// True iff `path` is explicitly selected for the type.
    pub fn is_selected(&self, type_name: &str, path: &str) -> bool {
        self.get(type_name)
            .and_then(|attrs| attrs.get(path))
            .copied()
            .unwrap_or(false)
    }

    /// The selected paths of a type, sorted.
    pub fn selected_paths(&self, type_name: &str) -> Vec<String> {
        self.get(type_name)
            .map(|attrs| {
                attrs
                    .iter()
                    .filter(|(_, selected)| **selected)
                    .map(|(path, _)| path.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sets one path.
    pub fn set(&mut self, type_name: &str, path: &str, selected: bool) {
        self.0
            .entry(type_name.to_string())
            .or_default()
            .insert(path.to_string(), selected);
    }

    /// Flips one path and returns its new state.
    pub fn toggle(&mut self, type_name: &str, path: &str) -> bool {
        let selected = !self.is_selected(type_name, path);
        self.set(type_name, path, selected);
        selected
    }

    /// Selects every attribute path of a sample value.
    pub fn select_all(&mut self, type_name: &str, sample: &Value) {
        for path in collect_paths(sample) {
            self.set(type_name, &path, true);
        }
    }

    /// Records `path` as selected unless the type already has a value for it.
    ///
    /// Returns true if a new entry was added.
    pub fn insert_if_absent(&mut self, type_name: &str, path: &str) -> bool {
        match self
            .0
            .entry(type_name.to_string())
            .or_default()
            .entry(path.to_string())
        {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(true);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Adds the entries of `attrs` the type does not have yet.
    pub fn merge_scope(&mut self, type_name: &str, attrs: AttributeSelection) {
        let scope = self.0.entry(type_name.to_string()).or_default();
        for (path, selected) in attrs {
            scope.entry(path).or_insert(selected);
        }
    }

    /// Iterates `(type name, selection)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeSelection> {
        self.0.iter()
    }

    /// Number of types with an entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no type has an entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AttributeSelection)> for SelectionMap {
    fn from_iter<I: IntoIterator<Item = (String, AttributeSelection)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One endpoint the user picked, with the selection scoped to its response type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSelection {
    /// Path template, e.g. `/pets/{id}`.
    pub path: String,
    /// HTTP method.
    pub method: String,
    /// Name of the response type the selection is keyed by.
    pub type_name: String,
    /// Flattened selection for the response type.
    #[serde(default)]
    pub selected_attrs: AttributeSelection,
}

impl EndpointSelection {
    /// Creates a selection with no attributes picked yet.
    pub fn new(
        path: impl Into<String>,
        method: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            type_name: type_name.into(),
            selected_attrs: AttributeSelection::new(),
        }
    }

    /// Adds the given paths as selected.
    pub fn with_attrs<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_attrs
            .extend(paths.into_iter().map(|path| (path.into(), true)));
        self
    }

    /// The external key, `METHOD_path`.
    pub fn key(&self) -> String {
        endpoint_key(&self.method, &self.path)
    }
}

/// The selected endpoints, keyed by `METHOD_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedEndpoints(BTreeMap<String, EndpointSelection>);

impl SelectedEndpoints {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the selection of an endpoint, returning the previous one.
    pub fn insert(&mut self, selection: EndpointSelection) -> Option<EndpointSelection> {
        self.0.insert(selection.key(), selection)
    }

    /// Removes an endpoint.
    pub fn remove(&mut self, method: &str, path: &str) -> Option<EndpointSelection> {
        self.0.remove(&endpoint_key(method, path))
    }

    /// Looks up an endpoint.
    pub fn get(&self, method: &str, path: &str) -> Option<&EndpointSelection> {
        self.0.get(&endpoint_key(method, path))
    }

    /// True if the endpoint is selected.
    pub fn contains(&self, method: &str, path: &str) -> bool {
        self.0.contains_key(&endpoint_key(method, path))
    }

    /// Iterates `(key, selection)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, EndpointSelection> {
        self.0.iter()
    }

    /// Iterates the selections in key order.
    pub fn values(&self) -> btree_map::Values<'_, String, EndpointSelection> {
        self.0.values()
    }

    /// Number of selected endpoints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<EndpointSelection> for SelectedEndpoints {
    fn from_iter<I: IntoIterator<Item = EndpointSelection>>(iter: I) -> Self {
        let mut endpoints = Self::new();
        for selection in iter {
            endpoints.insert(selection);
        }
        endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rescope_strips_prefix() {
        let attrs: AttributeSelection = [
            ("0".to_string(), true),
            ("0.id".to_string(), true),
            ("0.tags.0.name".to_string(), false),
            ("count".to_string(), true),
        ]
        .into_iter()
        .collect();

        let scoped = rescope(&attrs, "0.");
        assert_eq!(scoped.len(), 2);
        assert_eq!(scoped.get("id"), Some(&true));
        assert_eq!(scoped.get("tags.0.name"), Some(&false));
    }

    #[test]
    fn test_toggle_and_select_all() {
        let mut map = SelectionMap::new();
        assert!(map.toggle("Pet", "id"));
        assert!(map.is_selected("Pet", "id"));
        assert!(!map.toggle("Pet", "id"));
        assert!(!map.is_selected("Pet", "id"));
        assert!(!map.has_selection("Pet"));
        assert!(map.contains_type("Pet"));

        map.select_all("Pet", &json!({ "id": 1, "tags": [ { "name": "a" } ] }));
        assert_eq!(
            map.selected_paths("Pet"),
            vec!["id", "tags", "tags.0", "tags.0.name"]
        );
    }

    #[test]
    fn test_insert_if_absent_keeps_explicit_false() {
        let mut map = SelectionMap::new();
        map.set("User", "name", false);
        assert!(!map.insert_if_absent("User", "name"));
        assert!(!map.is_selected("User", "name"));
        assert!(map.insert_if_absent("User", "email"));
        assert!(map.is_selected("User", "email"));
    }

    #[test]
    fn test_from_endpoints_unions_shared_types() {
        let endpoints: SelectedEndpoints = [
            EndpointSelection::new("/pets", "get", "Pet").with_attrs(["id"]),
            EndpointSelection::new("/pets/{id}", "get", "Pet").with_attrs(["name"]),
        ]
        .into_iter()
        .collect();

        let map = SelectionMap::from_endpoints(&endpoints);
        assert_eq!(map.len(), 1);
        assert_eq!(map.selected_paths("Pet"), vec!["id", "name"]);
    }

    #[test]
    fn test_endpoint_selection_serde_shape() {
        let endpoints: SelectedEndpoints =
            [EndpointSelection::new("/pets/{id}", "GET", "Pet").with_attrs(["id"])]
                .into_iter()
                .collect();

        let value = serde_json::to_value(&endpoints).unwrap();
        assert_eq!(
            value,
            json!({
                "GET_/pets/{id}": {
                    "path": "/pets/{id}",
                    "method": "GET",
                    "typeName": "Pet",
                    "selectedAttrs": { "id": true }
                }
            })
        );

        let back: SelectedEndpoints = serde_json::from_value(value).unwrap();
        assert!(back.contains("get", "/pets/{id}"));
    }
}
