//! Field and element access.
//!
//! Both produce places: the loaded value together with the address it was
//! loaded from, so they can be assigned to and have their address taken.

use basalt_ir::{DotMemberAccess, Expression, PrimitiveType, SquareBracketsAccess, TypeSignature};

use crate::error::{InternalError, LowerResult};
use crate::expr_lowerer::ExprLowerer;
use crate::translated::TranslatedExpression;

/// Member name of the length of strings and slices.
const LENGTH_MEMBER: &str = "len";

impl ExprLowerer<'_, '_, '_> {
    pub(crate) fn lower_dot_member_access(
        &mut self,
        access: &DotMemberAccess,
        expr: &Expression,
    ) -> LowerResult<TranslatedExpression> {
        let normalized = self
            .cx
            .program
            .normalize_dot_member_access(access, self.raw_scope());
        let base_ty = self.cx.unalias(&self.expr_type(&normalized.struct_value)?);
        let base = self.lower_expression(&normalized.struct_value)?;
        let base_layout = self.cx.layout_of(&base_ty)?;

        let has_length = matches!(
            base_ty,
            TypeSignature::Slice(_) | TypeSignature::Primitive(PrimitiveType::String)
        );
        if has_length && normalized.member_name == LENGTH_MEMBER {
            let address = base.address_or_materialize(&mut self.cx.builder, "seq");
            let len_ptr = self.cx.builder.struct_gep(base_layout, address, 0, "len.ptr");
            let i64 = self.cx.builder.i64_type();
            let len = self.cx.builder.load(i64, len_ptr, "len");
            return Ok(TranslatedExpression::place(len, len_ptr));
        }

        let index = self
            .cx
            .program
            .resolve_field_index(&normalized, self.raw_scope())
            .ok_or_else(|| InternalError::FieldResolution {
                member: access.member_name.clone(),
                location: expr.debug.to_string(),
            })?;
        let field_index = u32::try_from(index).map_err(|_| {
            InternalError::unreachable(format!("field index {index} out of range"))
        })?;
        let address = base.address_or_materialize(&mut self.cx.builder, "base");
        let name = &normalized.member_name;
        let field_layout = self
            .cx
            .builder
            .struct_field_type(base_layout, field_index)
            .ok_or_else(|| InternalError::FieldResolution {
                member: name.clone(),
                location: expr.debug.to_string(),
            })?;
        let field_ptr = self
            .cx
            .builder
            .struct_gep(base_layout, address, field_index, &format!("{name}.ptr"));
        let value = self.cx.builder.load(field_layout, field_ptr, name);
        Ok(TranslatedExpression::place(value, field_ptr))
    }

    pub(crate) fn lower_square_brackets_access(
        &mut self,
        access: &SquareBracketsAccess,
        expr: &Expression,
    ) -> LowerResult<TranslatedExpression> {
        let storage_ty = self.cx.unalias(&self.expr_type(&access.storage)?);
        let storage = self.lower_expression(&access.storage)?;
        let index = self.lower_converted(&access.index, &TypeSignature::int())?;

        let element_ty = match &storage_ty {
            TypeSignature::Array { stored, .. } | TypeSignature::Slice(stored) => (**stored).clone(),
            TypeSignature::Primitive(PrimitiveType::RawString | PrimitiveType::String) => {
                TypeSignature::char()
            }
            other => {
                return Err(InternalError::UnknownOperator {
                    operator: "[]".to_owned(),
                    operand: format!("{other} at {}", expr.debug),
                })
            }
        };
        let element_layout = self.cx.layout_of(&element_ty)?;

        let element_ptr = match storage_ty {
            TypeSignature::Array { .. } => {
                let array_layout = self.cx.layout_of(&storage_ty)?;
                let address = storage.address_or_materialize(&mut self.cx.builder, "arr");
                let zero = self.cx.builder.const_i64(0);
                self.cx
                    .builder
                    .gep(array_layout, address, &[zero, index.value], "elem.ptr")
            }
            TypeSignature::Primitive(PrimitiveType::RawString) => {
                self.cx
                    .builder
                    .gep(element_layout, storage.value, &[index.value], "elem.ptr")
            }
            _ => {
                let sequence_layout = self.cx.layout_of(&storage_ty)?;
                let address = storage.address_or_materialize(&mut self.cx.builder, "seq");
                let data_ptr = self
                    .cx
                    .builder
                    .struct_gep(sequence_layout, address, 1, "data.ptr");
                let ptr_ty = self.cx.builder.ptr_type();
                let data = self.cx.builder.load(ptr_ty, data_ptr, "data");
                self.cx
                    .builder
                    .gep(element_layout, data, &[index.value], "elem.ptr")
            }
        };
        let value = self.cx.builder.load(element_layout, element_ptr, "elem");
        Ok(TranslatedExpression::place(value, element_ptr))
    }
}
