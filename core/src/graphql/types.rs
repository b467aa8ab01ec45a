#![deny(missing_docs)]

//! # GraphQL Type Model
//!
//! The subset of the GraphQL type system the derived schema needs. Types refer to each
//! other by name; the [`TypeCache`](crate::graphql::TypeCache) owns the definitions.

use std::fmt;

/// A reference to a type in a field, argument or input field position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// `Name`
    Named(String),
    /// `[Inner]`
    List(Box<TypeRef>),
    /// `Inner!`
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// A named type reference.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wraps the reference in a list.
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Wraps the reference in non-null; already non-null references are unchanged.
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// The innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Maps an OpenAPI primitive `type` onto a built-in scalar. Unknown names map to `String`.
pub fn scalar_for(openapi_type: &str) -> &'static str {
    match openapi_type {
        "integer" => "Int",
        "number" => "Float",
        "boolean" => "Boolean",
        _ => "String",
    }
}

/// A constant value in a directive argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    /// A string literal.
    String(String),
    /// A list literal.
    List(Vec<DirectiveValue>),
}

impl DirectiveValue {
    /// A list of string literals.
    pub fn string_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DirectiveValue::List(
            values
                .into_iter()
                .map(|value| DirectiveValue::String(value.into()))
                .collect(),
        )
    }
}

impl fmt::Display for DirectiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveValue::String(value) => write_string_literal(f, value),
            DirectiveValue::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn write_string_literal(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// A directive applied to a type or field, e.g. `@dataSource(path: "/pets")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveUse {
    /// Directive name without `@`.
    pub name: String,
    /// Arguments in print order.
    pub arguments: Vec<(String, DirectiveValue)>,
}

impl DirectiveUse {
    /// A directive without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn argument(mut self, name: impl Into<String>, value: DirectiveValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }
}

impl fmt::Display for DirectiveUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.arguments.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, (name, value)) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        f.write_str(")")
    }
}

/// An argument or input field: `name: Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValueDef {
    /// GraphQL-safe name.
    pub name: String,
    /// Input type.
    pub ty: TypeRef,
}

impl InputValueDef {
    /// Creates an input value.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A field of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// GraphQL-safe name.
    pub name: String,
    /// Output type.
    pub ty: TypeRef,
    /// Field arguments.
    pub arguments: Vec<InputValueDef>,
    /// Printed as a block string above the field.
    pub description: Option<String>,
    /// Directives appended to the field line.
    pub directives: Vec<DirectiveUse>,
}

impl FieldDef {
    /// A plain field without arguments, description or directives.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            description: None,
            directives: Vec::new(),
        }
    }
}

/// An object (output) type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    /// Type name.
    pub name: String,
    /// Description of the originating OpenAPI schema.
    pub description: Option<String>,
    /// Fields in schema order.
    pub fields: Vec<FieldDef>,
    /// Directives on the type.
    pub directives: Vec<DirectiveUse>,
}

impl ObjectType {
    /// An object type with no fields yet.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            fields: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// An input object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectType {
    /// Type name (conventionally `...Input`).
    pub name: String,
    /// Description of the originating OpenAPI schema.
    pub description: Option<String>,
    /// Input fields in schema order.
    pub fields: Vec<InputValueDef>,
}

impl InputObjectType {
    /// An input type with no fields yet.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            fields: Vec::new(),
        }
    }
}

/// A custom scalar, used for schemas of no recognizable shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    /// Scalar name.
    pub name: String,
    /// Description of the originating OpenAPI schema.
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::named("Pet").non_null().list().non_null();
        assert_eq!(ty.to_string(), "[Pet!]!");
        assert_eq!(ty.named_type(), "Pet");
        assert_eq!(TypeRef::named("Int").non_null().non_null().to_string(), "Int!");
    }

    #[test]
    fn test_directive_display() {
        let directive = DirectiveUse::new("dataSource")
            .argument("path", DirectiveValue::String("/pets/{id}".into()))
            .argument("selection", DirectiveValue::string_list(["id", "name"]));
        assert_eq!(
            directive.to_string(),
            r#"@dataSource(path: "/pets/{id}", selection: ["id", "name"])"#
        );
        assert_eq!(DirectiveUse::new("deprecated").to_string(), "@deprecated");
    }

    #[test]
    fn test_string_literal_escaping() {
        let value = DirectiveValue::String("say \"hi\"\n\\".into());
        assert_eq!(value.to_string(), r#""say \"hi\"\n\\""#);
    }

    #[test]
    fn test_scalar_mapping() {
        assert_eq!(scalar_for("integer"), "Int");
        assert_eq!(scalar_for("number"), "Float");
        assert_eq!(scalar_for("boolean"), "Boolean");
        assert_eq!(scalar_for("string"), "String");
        assert_eq!(scalar_for("file"), "String");
    }
}
