//! Type signatures and named type definitions.
//!
//! A [`TypeSignature`] is what appears in source positions (variable types,
//! parameters, fields). A [`TypeDefinition`] is a named struct, union or alias
//! stored in the registry and referenced from signatures through
//! [`CustomType`].

use std::fmt;

use crate::debug_info::DebugInfo;

/// Separator between a package and a type name in fully qualified names.
pub const NAMESPACE_SEPARATOR: &str = "::";

// ---------------------------------------------------------------------------
// PrimitiveType
// ---------------------------------------------------------------------------

/// Built-in scalar and string types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Float,
    Bool,
    Char,
    String,
    RawString,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 6] = [
        Self::Int,
        Self::Float,
        Self::Bool,
        Self::Char,
        Self::String,
        Self::RawString,
    ];

    /// Name as written in source, also used as the fully qualified name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Bool => "Bool",
            Self::Char => "Char",
            Self::String => "String",
            Self::RawString => "RawString",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

// ---------------------------------------------------------------------------
// TypeSignature
// ---------------------------------------------------------------------------

/// A reference to a user-defined type, already resolved to its package.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CustomType {
    pub package: String,
    pub name: String,
    pub type_args: Vec<TypeSignature>,
}

impl CustomType {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type_args(mut self, type_args: Vec<TypeSignature>) -> Self {
        self.type_args = type_args;
        self
    }

    /// `package::Name` or `package::Name<A,B>` for instantiated generics.
    pub fn fully_qualified_name(&self) -> String {
        let mut name = format!("{}{NAMESPACE_SEPARATOR}{}", self.package, self.name);
        if !self.type_args.is_empty() {
            let args: Vec<String> = self
                .type_args
                .iter()
                .map(TypeSignature::fully_qualified_name)
                .collect();
            name.push('<');
            name.push_str(&args.join(","));
            name.push('>');
        }
        name
    }
}

/// The type of a value as written in source.
///
/// Compared structurally. Aliases are not expanded here; callers that need
/// alias-insensitive comparison go through
/// [`ProgramRepresentation::unalias_type`](crate::ProgramRepresentation::unalias_type).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    Primitive(PrimitiveType),
    Pointer(Box<TypeSignature>),
    Array {
        stored: Box<TypeSignature>,
        length: usize,
    },
    Slice(Box<TypeSignature>),
    Custom(CustomType),
    /// An unresolved generic parameter. Never valid past specialization.
    TemplateParam(String),
    InlineUnion(Vec<TypeSignature>),
}

impl TypeSignature {
    pub fn int() -> Self {
        Self::Primitive(PrimitiveType::Int)
    }

    pub fn float() -> Self {
        Self::Primitive(PrimitiveType::Float)
    }

    pub fn bool() -> Self {
        Self::Primitive(PrimitiveType::Bool)
    }

    pub fn char() -> Self {
        Self::Primitive(PrimitiveType::Char)
    }

    pub fn string() -> Self {
        Self::Primitive(PrimitiveType::String)
    }

    pub fn raw_string() -> Self {
        Self::Primitive(PrimitiveType::RawString)
    }

    pub fn pointer(to: TypeSignature) -> Self {
        Self::Pointer(Box::new(to))
    }

    pub fn array(stored: TypeSignature, length: usize) -> Self {
        Self::Array {
            stored: Box::new(stored),
            length,
        }
    }

    pub fn slice(of: TypeSignature) -> Self {
        Self::Slice(Box::new(of))
    }

    pub fn custom(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Custom(CustomType::new(package, name))
    }

    pub fn inline_union(alternatives: Vec<TypeSignature>) -> Self {
        Self::InlineUnion(alternatives)
    }

    pub fn template(name: impl Into<String>) -> Self {
        Self::TemplateParam(name.into())
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Self::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_primitive(&self, primitive: PrimitiveType) -> bool {
        self.as_primitive() == Some(primitive)
    }

    /// Whether a template parameter occurs anywhere inside this signature.
    pub fn contains_template(&self) -> bool {
        match self {
            Self::TemplateParam(_) => true,
            Self::Primitive(_) => false,
            Self::Pointer(inner) | Self::Slice(inner) => inner.contains_template(),
            Self::Array { stored, .. } => stored.contains_template(),
            Self::Custom(custom) => custom.type_args.iter().any(Self::contains_template),
            Self::InlineUnion(alternatives) => alternatives.iter().any(Self::contains_template),
        }
    }

    /// Canonical name of the signature.
    ///
    /// - slice: `$T`
    /// - pointer: `#T`
    /// - array: `[N]T`
    /// - primitive and template: the bare name
    /// - custom: `package::Name<args>`
    /// - inline union: `(A | B)`, bracketed even with one alternative so
    ///   `#(A | B)` and `(#A | B)` stay distinct
    pub fn fully_qualified_name(&self) -> String {
        match self {
            Self::Slice(inner) => format!("${}", inner.fully_qualified_name()),
            Self::Pointer(inner) => format!("#{}", inner.fully_qualified_name()),
            Self::Array { stored, length } => {
                format!("[{length}]{}", stored.fully_qualified_name())
            }
            Self::Primitive(p) => p.name().to_owned(),
            Self::TemplateParam(name) => name.clone(),
            Self::Custom(custom) => custom.fully_qualified_name(),
            Self::InlineUnion(alternatives) => {
                let joined = alternatives
                    .iter()
                    .map(Self::fully_qualified_name)
                    .collect::<Vec<_>>()
                    .join(" | ");
                format!("({joined})")
            }
        }
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified_name())
    }
}

// ---------------------------------------------------------------------------
// TypeDefinition
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub ty: TypeSignature,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: TypeSignature) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDefinition {
    pub package: String,
    pub name: String,
    pub fields: Vec<StructField>,
    pub debug: DebugInfo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionDefinition {
    pub package: String,
    pub name: String,
    pub alternatives: Vec<TypeSignature>,
    pub debug: DebugInfo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAlias {
    pub package: String,
    pub name: String,
    pub aliased: TypeSignature,
    pub debug: DebugInfo,
}

/// A named type stored in the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDefinition {
    Struct(StructDefinition),
    Union(UnionDefinition),
    Alias(TypeAlias),
}

impl TypeDefinition {
    pub fn package(&self) -> &str {
        match self {
            Self::Struct(def) => &def.package,
            Self::Union(def) => &def.package,
            Self::Alias(def) => &def.package,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Struct(def) => &def.name,
            Self::Union(def) => &def.name,
            Self::Alias(def) => &def.name,
        }
    }

    pub fn debug(&self) -> &DebugInfo {
        match self {
            Self::Struct(def) => &def.debug,
            Self::Union(def) => &def.debug,
            Self::Alias(def) => &def.debug,
        }
    }

    /// `package::Name`. Instantiated generics carry their arguments in `name`.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}{NAMESPACE_SEPARATOR}{}", self.package(), self.name())
    }
}

#[cfg(test)]
mod tests;
