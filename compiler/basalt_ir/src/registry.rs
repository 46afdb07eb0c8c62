//! In-memory program registry.
//!
//! [`ProgramRegistry`] stores type and function definitions and answers the
//! [`ProgramRepresentation`] queries the backend needs. It is the reference
//! implementation of that trait: embedders with their own type checker can
//! implement the trait directly instead.
//!
//! # Architecture
//!
//! - `registry.rs`: storage, alias resolution, union utilities, assignment
//!   compatibility.
//! - `deduce.rs`: expression type deduction and member-access normalization.
//! - `overloads.rs`: overload resolution and common-feature-adoption plan
//!   generation.

mod deduce;
mod overloads;

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::{DotMemberAccess, Expression, FunctionCall, FunctionDefinition, FunctionRef};
use crate::callable::CallableCodeBlock;
use crate::program::ProgramRepresentation;
use crate::scope::RawScope;
use crate::types::{CustomType, PrimitiveType, TypeDefinition, TypeSignature};

/// Alias chains longer than this are treated as cyclic and left unresolved.
const MAX_ALIAS_DEPTH: usize = 64;

/// Error type for registry population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A type with the same fully qualified name is already registered.
    DuplicateTypeDefinition { name: String },
    /// A function with the same unique id is already registered.
    DuplicateFunction { unique_id: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTypeDefinition { name } => {
                write!(f, "type '{name}' is defined more than once")
            }
            Self::DuplicateFunction { unique_id } => {
                write!(f, "function '{unique_id}' is defined more than once")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Default)]
pub struct ProgramRegistry {
    type_definitions: FxHashMap<String, TypeDefinition>,
    functions: Vec<FunctionRef>,
    overloads: FxHashMap<String, Vec<FunctionRef>>,
}

impl ProgramRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_type_definition(&mut self, definition: TypeDefinition) -> Result<(), RegistryError> {
        let name = definition.fully_qualified_name();
        if self.type_definitions.contains_key(&name) {
            return Err(RegistryError::DuplicateTypeDefinition { name });
        }
        self.type_definitions.insert(name, definition);
        Ok(())
    }

    pub fn store_function_definition(
        &mut self,
        definition: FunctionDefinition,
    ) -> Result<FunctionRef, RegistryError> {
        let unique_id = definition.unique_string_id();
        if self
            .functions
            .iter()
            .any(|f| f.unique_string_id() == unique_id)
        {
            return Err(RegistryError::DuplicateFunction { unique_id });
        }
        let function = Rc::new(definition);
        self.functions.push(Rc::clone(&function));
        self.overloads
            .entry(function.name.clone())
            .or_default()
            .push(Rc::clone(&function));
        Ok(function)
    }

    /// Alternatives of a named or inline union, empty for anything else.
    pub fn fetch_union_alternatives(&self, ty: &TypeSignature) -> Vec<TypeSignature> {
        match self.unalias_type(ty) {
            TypeSignature::InlineUnion(alternatives) => alternatives,
            TypeSignature::Custom(custom) => match self.retrieve_type_definition(&custom) {
                Some(TypeDefinition::Union(union)) => union.alternatives,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn flatten_alternatives(&self, alternatives: &[TypeSignature]) -> Vec<TypeSignature> {
        let mut compatible = Vec::new();
        for alternative in alternatives {
            let nested = self.fetch_union_alternatives(alternative);
            if nested.is_empty() {
                compatible.push(alternative.clone());
            } else {
                compatible.extend(self.flatten_alternatives(&nested));
            }
        }
        compatible
    }

    fn same_type(&self, a: &TypeSignature, b: &TypeSignature) -> bool {
        self.unalias_type(a).fully_qualified_name() == self.unalias_type(b).fully_qualified_name()
    }

    /// Implicit conversions between string-like and sequence-like types.
    fn validate_sequence_assignment(&self, expected: &TypeSignature, actual: &TypeSignature) -> bool {
        let actual_is_char_array_pointer = matches!(
            actual,
            TypeSignature::Pointer(inner)
                if matches!(&**inner, TypeSignature::Array { stored, .. } if self.same_type(stored, &TypeSignature::char()))
        );
        let actual_is_char_slice = matches!(
            actual,
            TypeSignature::Slice(inner) if self.same_type(inner, &TypeSignature::char())
        );
        match expected {
            TypeSignature::Slice(element) => matches!(
                actual,
                TypeSignature::Pointer(inner)
                    if matches!(&**inner, TypeSignature::Array { stored, .. } if self.same_type(stored, element))
            ),
            TypeSignature::Primitive(PrimitiveType::String) => {
                actual_is_char_array_pointer || actual_is_char_slice
            }
            TypeSignature::Primitive(PrimitiveType::RawString) => {
                actual.is_primitive(PrimitiveType::String)
                    || actual_is_char_array_pointer
                    || actual_is_char_slice
            }
            TypeSignature::Array { stored, length } => matches!(
                actual,
                TypeSignature::Array { stored: actual_stored, length: actual_length }
                    if actual_length == length && self.validate_assignment(stored, actual_stored)
            ),
            _ => false,
        }
    }
}

impl ProgramRepresentation for ProgramRegistry {
    fn resolve_expression_type(
        &self,
        expr: &Expression,
        scope: &RawScope,
    ) -> Option<TypeSignature> {
        self.deduce_expression_type(expr, scope)
    }

    fn resolve_function_call(
        &self,
        call: &FunctionCall,
        scope: &RawScope,
    ) -> Option<CallableCodeBlock> {
        self.resolve_call(call, scope)
    }

    fn retrieve_type_definition(&self, custom: &CustomType) -> Option<TypeDefinition> {
        self.type_definitions
            .get(&custom.fully_qualified_name())
            .cloned()
    }

    fn unalias_type(&self, ty: &TypeSignature) -> TypeSignature {
        let mut current = ty.clone();
        for _ in 0..MAX_ALIAS_DEPTH {
            let TypeSignature::Custom(custom) = &current else {
                return current;
            };
            match self.type_definitions.get(&custom.fully_qualified_name()) {
                Some(TypeDefinition::Alias(alias)) => current = alias.aliased.clone(),
                _ => return current,
            }
        }
        tracing::warn!(ty = %ty, "alias chain too deep, leaving it unresolved");
        current
    }

    fn is_union(&self, ty: &TypeSignature) -> bool {
        !self.fetch_union_alternatives(ty).is_empty()
    }

    fn validate_assignment(&self, expected: &TypeSignature, actual: &TypeSignature) -> bool {
        let expected = self.unalias_type(expected);
        let actual = self.unalias_type(actual);
        if expected.fully_qualified_name() == actual.fully_qualified_name() {
            return true;
        }
        let expected_alternatives = self.fetch_union_alternatives(&expected);
        if !expected_alternatives.is_empty() {
            let actual_alternatives = self.fetch_union_alternatives(&actual);
            if actual_alternatives.is_empty() {
                return expected_alternatives
                    .iter()
                    .any(|alternative| self.validate_assignment(alternative, &actual));
            }
            return actual_alternatives
                .iter()
                .all(|alternative| self.validate_assignment(&expected, alternative));
        }
        self.validate_sequence_assignment(&expected, &actual)
    }

    fn resolve_field_index(&self, access: &DotMemberAccess, scope: &RawScope) -> Option<usize> {
        self.field_index(access, scope)
    }

    fn normalize_dot_member_access(
        &self,
        access: &DotMemberAccess,
        scope: &RawScope,
    ) -> DotMemberAccess {
        self.normalize_member_access(access, scope)
    }

    fn fully_qualified_typesignature_name(&self, ty: &TypeSignature) -> String {
        ty.fully_qualified_name()
    }

    fn fully_qualified_typedefinition_name(&self, def: &TypeDefinition) -> String {
        def.fully_qualified_name()
    }

    fn fetch_non_union_compatible_types_for_union_assignment(
        &self,
        ty: &TypeSignature,
    ) -> Vec<TypeSignature> {
        let alternatives = self.fetch_union_alternatives(ty);
        self.flatten_alternatives(&alternatives)
    }

    fn function_definitions(&self) -> Vec<FunctionRef> {
        self.functions.clone()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
