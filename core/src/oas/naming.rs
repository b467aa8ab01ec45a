#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving GraphQL-safe names from OpenAPI paths, status codes
//! and schema names.

use regex::Regex;
use std::sync::OnceLock;

/// True iff the response code is a concrete 2xx status (`200`, `201`, ...).
pub fn is_success_response(code: &str) -> bool {
    static SUCCESS_RE: OnceLock<Regex> = OnceLock::new();
    let success_re = SUCCESS_RE.get_or_init(|| Regex::new(r"^2\d\d$").expect("Invalid regex"));
    success_re.is_match(code)
}

/// Derives an operation id when `operationId` is missing.
///
/// The method is lower-cased and every run of non-alphanumeric characters in the path
/// becomes `_`, joined as `method_path`. The leading slash therefore produces a double
/// underscore: `GET /users` -> `get__users`.
pub fn generate_operation_id(path: &str, method: &str) -> String {
    static NON_ALNUM_RE: OnceLock<Regex> = OnceLock::new();
    let non_alnum_re =
        NON_ALNUM_RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]+").expect("Invalid regex"));
    format!(
        "{}_{}",
        method.to_lowercase(),
        non_alnum_re.replace_all(path, "_")
    )
}

/// Makes a string a valid GraphQL name (`/^[_a-zA-Z][_a-zA-Z0-9]*$/`).
///
/// Invalid characters become `_`; a leading digit is prefixed with `_`.
pub fn sanitize_graphql_name(name: &str) -> String {
    static INVALID_CHAR_RE: OnceLock<Regex> = OnceLock::new();
    let invalid_char_re =
        INVALID_CHAR_RE.get_or_init(|| Regex::new(r"[^_a-zA-Z0-9]").expect("Invalid regex"));
    let sanitized = invalid_char_re.replace_all(name, "_");
    match sanitized.chars().next() {
        None => "_".to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{}", sanitized),
        Some(_) => sanitized.into_owned(),
    }
}

/// Upper-cases the first character.
pub fn capitalize_type_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips one trailing `s` and capitalizes, e.g. `pets` -> `Pet`.
///
/// A bare `s` is kept as is so the result is never empty.
pub fn singularize_and_capitalize(name: &str) -> String {
    let singular = match name.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    };
    capitalize_type_name(singular)
}

/// The external key of an endpoint selection: `METHOD_path`.
pub fn endpoint_key(method: &str, path: &str) -> String {
    format!("{}_{}", method.to_uppercase(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_operation_id() {
        assert_eq!(generate_operation_id("/users", "get"), "get__users");
        assert_eq!(generate_operation_id("/users/{id}", "post"), "post__users_id_");
        assert_eq!(
            generate_operation_id("/v1/pet-store/{petId}/photos", "GET"),
            "get__v1_pet_store_petId_photos"
        );
    }

    #[test]
    fn test_is_success_response() {
        assert!(is_success_response("200"));
        assert!(is_success_response("204"));
        assert!(!is_success_response("2XX"));
        assert!(!is_success_response("default"));
        assert!(!is_success_response("404"));
        assert!(!is_success_response("2000"));
    }

    #[test]
    fn test_sanitize_graphql_name() {
        assert_eq!(sanitize_graphql_name("petId"), "petId");
        assert_eq!(sanitize_graphql_name("x-request-id"), "x_request_id");
        assert_eq!(sanitize_graphql_name("2fa"), "_2fa");
        assert_eq!(sanitize_graphql_name("filter[name]"), "filter_name_");
        assert_eq!(sanitize_graphql_name(""), "_");
    }

    #[test]
    fn test_capitalize_and_singularize() {
        assert_eq!(capitalize_type_name("pet"), "Pet");
        assert_eq!(capitalize_type_name(""), "");
        assert_eq!(singularize_and_capitalize("pets"), "Pet");
        assert_eq!(singularize_and_capitalize("Order"), "Order");
        assert_eq!(singularize_and_capitalize("s"), "S");
    }

    #[test]
    fn test_endpoint_key() {
        assert_eq!(endpoint_key("get", "/pets/{id}"), "GET_/pets/{id}");
    }
}
