//! The interface between the backend and the type-checking layer.
//!
//! The backend never mutates the program. Every query here is answered by
//! the registry and type checker built upstream; a `None` answer for a
//! well-typed program indicates an upstream bug and the backend reports it
//! as an internal error.

use crate::ast::{DotMemberAccess, Expression, FunctionCall, FunctionRef};
use crate::callable::CallableCodeBlock;
use crate::scope::RawScope;
use crate::types::{CustomType, TypeDefinition, TypeSignature};

pub trait ProgramRepresentation {
    /// Static type of `expr` as seen from `scope`.
    fn resolve_expression_type(&self, expr: &Expression, scope: &RawScope)
        -> Option<TypeSignature>;

    /// The callable a call site binds to: a concrete function or a
    /// dispatching CFA descriptor.
    fn resolve_function_call(&self, call: &FunctionCall, scope: &RawScope)
        -> Option<CallableCodeBlock>;

    fn retrieve_type_definition(&self, custom: &CustomType) -> Option<TypeDefinition>;

    /// Follow aliases until a non-alias signature is reached.
    fn unalias_type(&self, ty: &TypeSignature) -> TypeSignature;

    /// Whether `ty` is a named or inline union after alias resolution.
    fn is_union(&self, ty: &TypeSignature) -> bool;

    /// Whether a value of type `actual` may be stored where `expected` is
    /// declared.
    fn validate_assignment(&self, expected: &TypeSignature, actual: &TypeSignature) -> bool;

    /// Declaration index of the accessed field in its struct.
    fn resolve_field_index(&self, access: &DotMemberAccess, scope: &RawScope) -> Option<usize>;

    /// Rewrite member access sugar, such as implicit dereference of pointers,
    /// into its explicit form.
    fn normalize_dot_member_access(
        &self,
        access: &DotMemberAccess,
        scope: &RawScope,
    ) -> DotMemberAccess;

    fn fully_qualified_typesignature_name(&self, ty: &TypeSignature) -> String;

    fn fully_qualified_typedefinition_name(&self, def: &TypeDefinition) -> String;

    /// The non-union types a value must carry to be assignable to `ty`.
    ///
    /// Empty for non-union types. Nested unions are flattened.
    fn fetch_non_union_compatible_types_for_union_assignment(
        &self,
        ty: &TypeSignature,
    ) -> Vec<TypeSignature>;

    /// Every function definition in the program, in registration order.
    fn function_definitions(&self) -> Vec<FunctionRef>;
}
