//! Expression type deduction.

use crate::ast::{DotMemberAccess, ExprKind, Expression, TypeOp, UnaryOp};
use crate::program::ProgramRepresentation;
use crate::scope::RawScope;
use crate::types::{PrimitiveType, TypeDefinition, TypeSignature};

use super::ProgramRegistry;

impl ProgramRegistry {
    pub(super) fn deduce_expression_type(
        &self,
        expr: &Expression,
        scope: &RawScope,
    ) -> Option<TypeSignature> {
        match &expr.kind {
            ExprKind::IntLiteral(_) => Some(TypeSignature::int()),
            ExprKind::FloatLiteral(_) => Some(TypeSignature::float()),
            ExprKind::BoolLiteral(_) => Some(TypeSignature::bool()),
            ExprKind::CharLiteral(_) => Some(TypeSignature::char()),
            ExprKind::StringLiteral(_) => Some(TypeSignature::string()),
            ExprKind::ArrayLiteral(array) => Some(TypeSignature::array(
                array.stored_type.clone(),
                array.length,
            )),
            ExprKind::Identifier(name) => scope.object_type(name).cloned(),
            ExprKind::BinaryOperator(binary) => {
                if binary.op.is_comparison() || binary.op.is_logical() {
                    Some(TypeSignature::bool())
                } else {
                    self.deduce_expression_type(&binary.left, scope)
                }
            }
            ExprKind::UnaryOperator(unary) => {
                let operand = self.deduce_expression_type(&unary.operand, scope)?;
                match unary.op {
                    UnaryOp::Not => Some(TypeSignature::bool()),
                    UnaryOp::Minus | UnaryOp::Plus | UnaryOp::Increment | UnaryOp::Decrement => {
                        Some(operand)
                    }
                    UnaryOp::Deref => match self.unalias_type(&operand) {
                        TypeSignature::Pointer(pointee) => Some(*pointee),
                        _ => None,
                    },
                    UnaryOp::AddressOf => Some(TypeSignature::pointer(operand)),
                }
            }
            ExprKind::TypeOperator(type_operator) => match type_operator.op {
                TypeOp::Is => Some(TypeSignature::bool()),
                TypeOp::As => Some(type_operator.ty.clone()),
            },
            ExprKind::DotMemberAccess(access) => self.deduce_member_type(access, scope),
            ExprKind::SquareBracketsAccess(access) => {
                let storage = self.deduce_expression_type(&access.storage, scope)?;
                match self.unalias_type(&storage) {
                    TypeSignature::Array { stored, .. } | TypeSignature::Slice(stored) => {
                        Some(*stored)
                    }
                    TypeSignature::Primitive(PrimitiveType::String | PrimitiveType::RawString) => {
                        Some(TypeSignature::char())
                    }
                    _ => None,
                }
            }
            ExprKind::FunctionCall(call) => self.resolve_call(call, scope)?.return_type(),
        }
    }

    fn deduce_member_type(&self, access: &DotMemberAccess, scope: &RawScope) -> Option<TypeSignature> {
        let normalized = self.normalize_member_access(access, scope);
        let accessed = self.deduce_expression_type(&normalized.struct_value, scope)?;
        match self.unalias_type(&accessed) {
            TypeSignature::Custom(custom) => match self.retrieve_type_definition(&custom)? {
                TypeDefinition::Struct(definition) => definition
                    .fields
                    .iter()
                    .find(|field| field.name == normalized.member_name)
                    .map(|field| field.ty.clone()),
                TypeDefinition::Union(_) | TypeDefinition::Alias(_) => None,
            },
            TypeSignature::Primitive(PrimitiveType::String) | TypeSignature::Slice(_)
                if normalized.member_name == "len" =>
            {
                Some(TypeSignature::int())
            }
            _ => None,
        }
    }

    /// Insert explicit dereferences until the accessed value is not a pointer.
    pub(super) fn normalize_member_access(
        &self,
        access: &DotMemberAccess,
        scope: &RawScope,
    ) -> DotMemberAccess {
        let mut struct_value = (*access.struct_value).clone();
        while let Some(TypeSignature::Pointer(_)) = self
            .deduce_expression_type(&struct_value, scope)
            .map(|ty| self.unalias_type(&ty))
        {
            let debug = struct_value.debug.clone();
            struct_value = Expression::unary(UnaryOp::Deref, struct_value, debug);
        }
        DotMemberAccess {
            struct_value: Box::new(struct_value),
            member_name: access.member_name.clone(),
        }
    }

    pub(super) fn field_index(&self, access: &DotMemberAccess, scope: &RawScope) -> Option<usize> {
        let normalized = self.normalize_member_access(access, scope);
        let accessed = self.deduce_expression_type(&normalized.struct_value, scope)?;
        let TypeSignature::Custom(custom) = self.unalias_type(&accessed) else {
            return None;
        };
        match self.retrieve_type_definition(&custom)? {
            TypeDefinition::Struct(definition) => definition
                .fields
                .iter()
                .position(|field| field.name == normalized.member_name),
            TypeDefinition::Union(_) | TypeDefinition::Alias(_) => None,
        }
    }
}
