#![deny(missing_docs)]

//! # SDL Printer
//!
//! Deterministic rendering of the schema document to GraphQL SDL text, plus the two
//! textual passes over the printed document: description comments above type
//! definitions, and the directive definitions appended at the end.

use crate::graphql::types::{FieldDef, InputObjectType, ObjectType, ScalarType};
use regex::Regex;
use std::collections::HashMap;
use std::fmt::{self, Write};
use std::sync::OnceLock;

/// Definition of the routing directive carried by every `Query` field.
pub const DATA_SOURCE_DEFINITION: &str =
    "directive @dataSource(path: String!, method: String!, selection: [String!]!) on FIELD_DEFINITION";

/// Definition of the authorization directive carried by every non-`Query` object type.
pub const REQUIRED_SCOPES_DEFINITION: &str =
    "directive @requiredScopes(scopes: [[String!]!]!) on OBJECT";

/// Name of the root operation type. No schema-derived type may take it.
pub const QUERY_TYPE_NAME: &str = "Query";

const INDENT: &str = "  ";

/// A complete schema: the `Query` root and every type it reaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    /// The root `Query` type.
    pub query: ObjectType,
    /// Object types in registration order.
    pub objects: Vec<ObjectType>,
    /// Input object types in registration order.
    pub inputs: Vec<InputObjectType>,
    /// Custom scalars in registration order.
    pub scalars: Vec<ScalarType>,
}

impl SchemaDocument {
    /// Type name -> description, for every described non-`Query` definition.
    pub fn descriptions(&self) -> HashMap<&str, &str> {
        let objects = self
            .objects
            .iter()
            .map(|t| (t.name.as_str(), t.description.as_deref()));
        let inputs = self
            .inputs
            .iter()
            .map(|t| (t.name.as_str(), t.description.as_deref()));
        let scalars = self
            .scalars
            .iter()
            .map(|t| (t.name.as_str(), t.description.as_deref()));
        objects
            .chain(inputs)
            .chain(scalars)
            .filter_map(|(name, description)| {
                description
                    .filter(|d| !d.trim().is_empty())
                    .map(|d| (name, d))
            })
            .collect()
    }
}

/// Prints the document as SDL: `Query` first, then objects, inputs and scalars,
/// separated by blank lines.
pub fn print_schema(document: &SchemaDocument) -> Result<String, fmt::Error> {
    let mut blocks = Vec::with_capacity(
        1 + document.objects.len() + document.inputs.len() + document.scalars.len(),
    );
    blocks.push(print_object(&document.query)?);
    for object in &document.objects {
        blocks.push(print_object(object)?);
    }
    for input in &document.inputs {
        blocks.push(print_input(input)?);
    }
    for scalar in &document.scalars {
        blocks.push(format!("scalar {}", scalar.name));
    }

    let mut sdl = blocks.join("\n\n");
    sdl.push('\n');
    Ok(sdl)
}

fn print_object(object: &ObjectType) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "type {}", object.name)?;
    for directive in &object.directives {
        write!(out, " {}", directive)?;
    }
    if object.fields.is_empty() {
        return Ok(out);
    }

    out.push_str(" {\n");
    for (i, field) in object.fields.iter().enumerate() {
        if let Some(description) = field.description.as_deref() {
            if i > 0 {
                out.push('\n');
            }
            write_block_string(&mut out, description)?;
        }
        write_field(&mut out, field)?;
    }
    out.push('}');
    Ok(out)
}

fn write_field(out: &mut String, field: &FieldDef) -> fmt::Result {
    write!(out, "{}{}", INDENT, field.name)?;
    if !field.arguments.is_empty() {
        out.push('(');
        for (i, argument) in field.arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write!(out, "{}: {}", argument.name, argument.ty)?;
        }
        out.push(')');
    }
    write!(out, ": {}", field.ty)?;
    for directive in &field.directives {
        write!(out, " {}", directive)?;
    }
    out.push('\n');
    Ok(())
}

fn write_block_string(out: &mut String, text: &str) -> fmt::Result {
    let escaped = text.replace("\"\"\"", "\\\"\"\"");
    if !escaped.contains('\n') && !escaped.ends_with('"') {
        return writeln!(out, "{}\"\"\"{}\"\"\"", INDENT, escaped);
    }

    writeln!(out, "{}\"\"\"", INDENT)?;
    for line in escaped.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            writeln!(out, "{}{}", INDENT, line)?;
        }
    }
    writeln!(out, "{}\"\"\"", INDENT)
}

fn print_input(input: &InputObjectType) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "input {}", input.name)?;
    if input.fields.is_empty() {
        return Ok(out);
    }
    out.push_str(" {\n");
    for field in &input.fields {
        writeln!(out, "{}{}: {}", INDENT, field.name, field.ty)?;
    }
    out.push('}');
    Ok(out)
}

/// Prepends `# TypeName: description` above each described type definition.
///
/// Newlines inside a description are flattened to spaces so the comment stays on one
/// line.
pub fn add_description_comments(sdl: &str, descriptions: &HashMap<&str, &str>) -> String {
    static DEFINITION_RE: OnceLock<Regex> = OnceLock::new();
    let definition_re = DEFINITION_RE
        .get_or_init(|| Regex::new(r"^(type|input|scalar) (\w+)").expect("Invalid regex"));

    let mut out = String::with_capacity(sdl.len());
    for line in sdl.split_inclusive('\n') {
        let described = definition_re
            .captures(line)
            .and_then(|caps| caps.get(2))
            .and_then(|name| descriptions.get(name.as_str()).map(|d| (name.as_str(), *d)));
        if let Some((name, description)) = described {
            let flat = description.split_whitespace().collect::<Vec<_>>().join(" ");
            out.push_str(&format!("# {}: {}\n", name, flat));
        }
        out.push_str(line);
    }
    out
}

/// Appends the `@dataSource` and `@requiredScopes` definitions, each only if the
/// document does not define it yet.
pub fn ensure_directive_definitions(sdl: &str) -> String {
    let mut out = sdl.trim_end().to_string();
    for (name, definition) in [
        ("dataSource", DATA_SOURCE_DEFINITION),
        ("requiredScopes", REQUIRED_SCOPES_DEFINITION),
    ] {
        if !out.contains(&format!("directive @{}", name)) {
            out.push_str("\n\n");
            out.push_str(definition);
        }
    }
    out.push('\n');
    out
}
