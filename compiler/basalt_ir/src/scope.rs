//! Raw name-resolution scope.
//!
//! `RawScope` is the type checker's view of a lexical environment: which
//! identifiers are visible, their declared types, and a unique id per
//! declaration that stays distinct across shadowing and sibling blocks.
//!
//! Frames use `im::HashMap`, so `nested()` is an O(1) structural-sharing
//! clone and declarations in a child never leak into the parent.

use im::HashMap;

use crate::ast::FunctionDefinition;
use crate::debug_info::DebugInfo;
use crate::types::TypeSignature;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Function,
    Loop,
    Conditional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Variable,
    Constant,
    Argument,
}

/// One declared identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectDescriptor {
    /// Identity of the declaration, independent of the frame that holds it.
    pub unique_id: String,
    pub identifier: String,
    pub ty: TypeSignature,
    pub kind: ObjectKind,
}

#[derive(Clone, Debug)]
pub struct RawScope {
    objects: HashMap<String, ObjectDescriptor>,
    kind: ScopeKind,
}

impl RawScope {
    /// An empty function-level scope.
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            kind: ScopeKind::Function,
        }
    }

    /// A scope holding the arguments of `function`.
    ///
    /// Argument ids are `<function unique id>/ARG:<name>`.
    pub fn for_function(function: &FunctionDefinition) -> Self {
        let mut scope = Self::new();
        let function_id = function.unique_string_id();
        for argument in &function.arguments {
            scope.objects.insert(
                argument.name.clone(),
                ObjectDescriptor {
                    unique_id: format!("{function_id}/ARG:{}", argument.name),
                    identifier: argument.name.clone(),
                    ty: argument.ty.clone(),
                    kind: ObjectKind::Argument,
                },
            );
        }
        scope
    }

    /// A child frame inheriting every visible binding.
    #[must_use]
    pub fn nested(&self, kind: ScopeKind) -> Self {
        Self {
            objects: self.objects.clone(),
            kind,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Declare a mutable local, returning its unique id.
    pub fn store_local_variable(
        &mut self,
        identifier: &str,
        ty: TypeSignature,
        debug: &DebugInfo,
    ) -> String {
        self.store(identifier, ty, debug, ObjectKind::Variable)
    }

    /// Declare an immutable local, returning its unique id.
    pub fn store_local_constant(
        &mut self,
        identifier: &str,
        ty: TypeSignature,
        debug: &DebugInfo,
    ) -> String {
        self.store(identifier, ty, debug, ObjectKind::Constant)
    }

    /// Declare an argument-like binding with a caller-chosen id.
    ///
    /// Used for synthesized functions whose parameters have no source
    /// declaration.
    pub fn store_argument(&mut self, identifier: &str, ty: TypeSignature, unique_id: String) {
        self.objects.insert(
            identifier.to_owned(),
            ObjectDescriptor {
                unique_id,
                identifier: identifier.to_owned(),
                ty,
                kind: ObjectKind::Argument,
            },
        );
    }

    fn store(
        &mut self,
        identifier: &str,
        ty: TypeSignature,
        debug: &DebugInfo,
        kind: ObjectKind,
    ) -> String {
        let unique_id = format!("{}/{identifier}", debug.unique_string_id());
        self.objects.insert(
            identifier.to_owned(),
            ObjectDescriptor {
                unique_id: unique_id.clone(),
                identifier: identifier.to_owned(),
                ty,
                kind,
            },
        );
        unique_id
    }

    pub fn lookup(&self, identifier: &str) -> Option<&ObjectDescriptor> {
        self.objects.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.objects.contains_key(identifier)
    }

    pub fn resolve_object_unique_id(&self, identifier: &str) -> Option<&str> {
        self.lookup(identifier).map(|object| object.unique_id.as_str())
    }

    pub fn object_type(&self, identifier: &str) -> Option<&TypeSignature> {
        self.lookup(identifier).map(|object| &object.ty)
    }

    /// Unknown identifiers count as immutable.
    pub fn is_immutable(&self, identifier: &str) -> bool {
        self.lookup(identifier)
            .map_or(true, |object| object.kind == ObjectKind::Constant)
    }
}

impl Default for RawScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
