//! # Path Collection
//!
//! Enumerates the selectable attribute paths of a plain JSON value.

use crate::selection::ARRAY_ITEM_SEGMENT;
use serde_json::Value;

/// Lists every reachable key path of `value` as dotted strings, in document order.
///
/// An object contributes one path per key followed by that key's descendants. An array
/// contributes only its first element, under the segment `"0"`. Primitives and `null`
/// contribute nothing of their own.
///
/// ```
/// use oasgql_core::selection::collect_paths;
/// use serde_json::json;
///
/// let paths = collect_paths(&json!({ "a": { "b": 1 }, "c": [{ "d": 2 }] }));
/// assert_eq!(paths, vec!["a", "a.b", "c", "c.0", "c.0.d"]);
/// ```
pub fn collect_paths(value: &Value) -> Vec<String> {
    collect_paths_with_prefix(value, &[])
}

/// Like [`collect_paths`], with every path rooted under the `prefix` segments.
///
/// The prefix itself is not listed.
pub fn collect_paths_with_prefix(value: &Value, prefix: &[&str]) -> Vec<String> {
    let mut paths = Vec::new();
    let mut segments = prefix.to_vec();
    collect_into(value, &mut segments, &mut paths);
    paths
}

fn collect_into<'v>(value: &'v Value, prefix: &mut Vec<&'v str>, paths: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                prefix.push(key);
                paths.push(prefix.join("."));
                collect_into(child, prefix, paths);
                prefix.pop();
            }
        }
        Value::Array(items) => {
            if let Some(first) = items.first() {
                prefix.push(ARRAY_ITEM_SEGMENT);
                paths.push(prefix.join("."));
                collect_into(first, prefix, paths);
                prefix.pop();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_paths_mixed() {
        let paths = collect_paths(&json!({ "a": { "b": 1 }, "c": [{ "d": 2 }] }));
        assert_eq!(paths, vec!["a", "a.b", "c", "c.0", "c.0.d"]);
    }

    #[test]
    fn test_collect_paths_only_first_element() {
        let paths = collect_paths(&json!([{ "x": 1 }, { "y": 2 }]));
        assert_eq!(paths, vec!["0", "0.x"]);
    }

    #[test]
    fn test_collect_paths_with_prefix() {
        let paths = collect_paths_with_prefix(&json!([{ "sku": "a" }]), &["order", "lines"]);
        assert_eq!(paths, vec!["order.lines.0", "order.lines.0.sku"]);
        assert!(collect_paths_with_prefix(&json!(1), &["order"]).is_empty());
    }

    #[test]
    fn test_collect_paths_primitives() {
        assert!(collect_paths(&json!(null)).is_empty());
        assert!(collect_paths(&json!(42)).is_empty());
        assert!(collect_paths(&json!([])).is_empty());
        assert_eq!(collect_paths(&json!({ "n": null })), vec!["n"]);
        assert_eq!(collect_paths(&json!({ "ids": [1, 2] })), vec!["ids", "ids.0"]);
    }
}
