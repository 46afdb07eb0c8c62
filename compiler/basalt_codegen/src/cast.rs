//! Implicit conversions between representations.
//!
//! [`CodegenCx::cast_strategy`] classifies a `(source, dest)` pair; the
//! first matching rule wins:
//!
//! 1. identical IR layout: nothing to do
//! 2. union to union: copy header and payload into fresh storage
//! 3. union to alternative: reinterpret the payload
//! 4. alternative to union: write tag and payload into fresh storage
//! 5. pointer to fixed array into slice or `String`
//! 6. slice into `String` or `RawString`
//! 7. `String` into `RawString`
//! 8. `[N]T` into `[N]U`, element by element
//! 9. anything else: nothing to do
//!
//! [`CodegenCx::apply_cast`] emits the instructions for a strategy.
//!
//! Pointers are opaque, so a pointer to a char array already is a
//! `RawString` and falls under rule 1. Reinterpreting storage is a load of
//! another type through the same address.

use basalt_ir::{PrimitiveType, TypeSignature};

use crate::context::CodegenCx;
use crate::error::{InternalError, LowerResult};
use crate::translated::TranslatedExpression;
use crate::value_id::{LLVMTypeId, ValueId};

/// What a string-like conversion produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceTarget {
    Slice,
    String,
    RawString,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CastStrategy {
    Noop,
    UnionToUnion,
    UnionToAlternative,
    AlternativeToUnion,
    ArrayPointerTo(SequenceTarget),
    SliceTo(SequenceTarget),
    StringToRawString,
    ElementWise { length: usize },
}

impl CodegenCx<'_, '_> {
    /// Choose how to convert a `source` value into `dest`.
    pub fn cast_strategy(
        &mut self,
        source: &TypeSignature,
        dest: &TypeSignature,
    ) -> LowerResult<CastStrategy> {
        let source_layout = self.layout_of(source)?;
        let dest_layout = self.layout_of(dest)?;
        if self.builder.same_type(source_layout, dest_layout) {
            return Ok(CastStrategy::Noop);
        }
        let source_is_union = self.is_union(source);
        let dest_is_union = self.is_union(dest);
        match (source_is_union, dest_is_union) {
            (true, true) => return Ok(CastStrategy::UnionToUnion),
            (true, false) => return Ok(CastStrategy::UnionToAlternative),
            (false, true) => return Ok(CastStrategy::AlternativeToUnion),
            (false, false) => {}
        }

        let source = self.unalias(source);
        let dest = self.unalias(dest);
        let sequence_target = match &dest {
            TypeSignature::Slice(_) => Some(SequenceTarget::Slice),
            TypeSignature::Primitive(PrimitiveType::String) => Some(SequenceTarget::String),
            TypeSignature::Primitive(PrimitiveType::RawString) => Some(SequenceTarget::RawString),
            _ => None,
        };
        let strategy = match (&source, &dest, sequence_target) {
            (TypeSignature::Pointer(pointee), _, Some(target @ (SequenceTarget::Slice | SequenceTarget::String)))
                if matches!(self.unalias(pointee), TypeSignature::Array { .. }) =>
            {
                CastStrategy::ArrayPointerTo(target)
            }
            (TypeSignature::Slice(_), _, Some(target @ (SequenceTarget::String | SequenceTarget::RawString))) => {
                CastStrategy::SliceTo(target)
            }
            (
                TypeSignature::Primitive(PrimitiveType::String),
                _,
                Some(SequenceTarget::RawString),
            ) => CastStrategy::StringToRawString,
            (
                TypeSignature::Array { length, .. },
                TypeSignature::Array {
                    length: dest_length,
                    ..
                },
                _,
            ) => {
                if length != dest_length {
                    return Err(InternalError::ArrayLengthMismatch {
                        expected: *dest_length,
                        actual: *length,
                    });
                }
                CastStrategy::ElementWise { length: *length }
            }
            _ => CastStrategy::Noop,
        };
        Ok(strategy)
    }

    /// Convert `expr` of type `source` into `dest`.
    pub fn apply_cast(
        &mut self,
        expr: TranslatedExpression,
        source: &TypeSignature,
        dest: &TypeSignature,
    ) -> LowerResult<TranslatedExpression> {
        let strategy = self.cast_strategy(source, dest)?;
        tracing::trace!(%source, %dest, ?strategy, "cast");
        match strategy {
            CastStrategy::Noop => Ok(expr),
            CastStrategy::UnionToUnion => self.cast_union_to_union(expr, source, dest),
            CastStrategy::UnionToAlternative => self.cast_union_to_alternative(expr, source, dest),
            CastStrategy::AlternativeToUnion => self.cast_alternative_to_union(expr, source, dest),
            CastStrategy::ArrayPointerTo(target) => self.cast_array_pointer(expr, source, dest, target),
            CastStrategy::SliceTo(target) => self.cast_slice(expr, source, target),
            CastStrategy::StringToRawString => {
                let string = self.layout_of(source)?;
                Ok(self.load_data_pointer(expr, string, "str"))
            }
            CastStrategy::ElementWise { length } => {
                self.cast_element_wise(expr, source, dest, length)
            }
        }
    }

    /// The data pointer (field 1) of a `String` or slice of layout `layout`.
    fn load_data_pointer(
        &mut self,
        expr: TranslatedExpression,
        layout: LLVMTypeId,
        name: &str,
    ) -> TranslatedExpression {
        let address = expr.address_or_materialize(&mut self.builder, name);
        let data_ptr = self
            .builder
            .struct_gep(layout, address, 1, &format!("{name}.data.ptr"));
        let ptr_ty = self.builder.ptr_type();
        let data = self.builder.load(ptr_ty, data_ptr, &format!("{name}.data"));
        TranslatedExpression::value(data)
    }

    fn cast_union_to_union(
        &mut self,
        expr: TranslatedExpression,
        source: &TypeSignature,
        dest: &TypeSignature,
    ) -> LowerResult<TranslatedExpression> {
        let source_layout = self.layout_of(source)?;
        let dest_layout = self.layout_of(dest)?;
        let source_address = expr.address_or_materialize(&mut self.builder, "union.src");
        let slot = self.builder.alloca(dest_layout, "union.cast");

        let ptr_ty = self.builder.ptr_type();
        let source_header =
            self.builder
                .struct_gep(source_layout, source_address, 0, "union.src.header");
        let header = self.builder.load(ptr_ty, source_header, "union.tag");
        let dest_header = self.builder.struct_gep(dest_layout, slot, 0, "union.cast.header");
        self.builder.store(header, dest_header);

        // The active alternative fits both payloads, so copying the shorter
        // payload's bytes is enough.
        let source_len = self.union_payload_len(source_layout).unwrap_or(0);
        let dest_len = self.union_payload_len(dest_layout).unwrap_or(0);
        let i8 = self.builder.i8_type();
        let window = self.builder.array_type(i8, u64::from(source_len.min(dest_len)));
        let source_payload =
            self.builder
                .struct_gep(source_layout, source_address, 1, "union.src.payload");
        let payload = self.builder.load(window, source_payload, "union.payload");
        let dest_payload = self.builder.struct_gep(dest_layout, slot, 1, "union.cast.payload");
        self.builder.store(payload, dest_payload);

        let value = self.builder.load(dest_layout, slot, "union.cast.value");
        Ok(TranslatedExpression::place(value, slot))
    }

    fn cast_union_to_alternative(
        &mut self,
        expr: TranslatedExpression,
        source: &TypeSignature,
        dest: &TypeSignature,
    ) -> LowerResult<TranslatedExpression> {
        let source_layout = self.layout_of(source)?;
        let dest_layout = self.layout_of(dest)?;
        let had_address = expr.is_place();
        let address = expr.address_or_materialize(&mut self.builder, "union.src");
        let payload = self
            .builder
            .struct_gep(source_layout, address, 1, "union.payload.ptr");
        let value = self.builder.load(dest_layout, payload, "union.alt");
        Ok(if had_address {
            TranslatedExpression::place(value, payload)
        } else {
            TranslatedExpression::value(value)
        })
    }

    fn cast_alternative_to_union(
        &mut self,
        expr: TranslatedExpression,
        source: &TypeSignature,
        dest: &TypeSignature,
    ) -> LowerResult<TranslatedExpression> {
        let (stored, stored_ty) = self.convert_to_union_member(expr, source, dest)?;
        let dest_layout = self.layout_of(dest)?;

        let slot = self.builder.alloca(dest_layout, "union.wrap");
        let header = self.builder.struct_gep(dest_layout, slot, 0, "union.wrap.header");
        let tag = self.type_tag(&stored_ty);
        self.builder.store(tag, header);

        let payload = self.builder.struct_gep(dest_layout, slot, 1, "union.wrap.payload");
        self.builder.store(stored.value, payload);

        let value = self.builder.load(dest_layout, slot, "union.wrap.value");
        Ok(TranslatedExpression::place(value, slot))
    }

    /// Pick the union member a non-union value is stored as.
    ///
    /// An exact match by name wins; otherwise the value is converted into
    /// the first member it is assignable to, such as a char array pointer
    /// stored as `String`.
    fn convert_to_union_member(
        &mut self,
        expr: TranslatedExpression,
        source: &TypeSignature,
        dest: &TypeSignature,
    ) -> LowerResult<(TranslatedExpression, TypeSignature)> {
        let members = self
            .program
            .fetch_non_union_compatible_types_for_union_assignment(dest);
        let source_name = self.fully_qualified_name(&self.unalias(source));
        let exact = members
            .iter()
            .any(|member| self.fully_qualified_name(&self.unalias(member)) == source_name);
        if exact {
            return Ok((expr, source.clone()));
        }
        let assignable = members
            .into_iter()
            .find(|member| self.program.validate_assignment(member, source));
        match assignable {
            Some(member) => {
                let converted = self.apply_cast(expr, source, &member)?;
                Ok((converted, member))
            }
            None => Ok((expr, source.clone())),
        }
    }

    /// `#[N]T` into `$T` or `String`: the array's address becomes the data
    /// pointer of a `{ N, data }` pair.
    fn cast_array_pointer(
        &mut self,
        expr: TranslatedExpression,
        source: &TypeSignature,
        dest: &TypeSignature,
        target: SequenceTarget,
    ) -> LowerResult<TranslatedExpression> {
        let TypeSignature::Pointer(pointee) = self.unalias(source) else {
            return Err(InternalError::unreachable("array pointer cast from a non-pointer"));
        };
        let TypeSignature::Array { stored, length } = self.unalias(&pointee) else {
            return Err(InternalError::unreachable("array pointer cast to a non-array"));
        };
        let slice_layout = self.layout_of(&TypeSignature::slice(*stored))?;
        let slot = self.builder.alloca(slice_layout, "arr.slice");
        let len_ptr = self.builder.struct_gep(slice_layout, slot, 0, "arr.slice.len");
        #[allow(clippy::cast_possible_wrap, reason = "array lengths fit in i64")]
        let len = self.builder.const_i64(length as i64);
        self.builder.store(len, len_ptr);
        let data_ptr = self.builder.struct_gep(slice_layout, slot, 1, "arr.slice.data");
        self.builder.store(expr.value, data_ptr);

        let layout = match target {
            SequenceTarget::Slice => slice_layout,
            SequenceTarget::String | SequenceTarget::RawString => self.layout_of(dest)?,
        };
        Ok(self.reinterpret_slot(slot, layout, "arr.seq"))
    }

    fn cast_slice(
        &mut self,
        expr: TranslatedExpression,
        source: &TypeSignature,
        target: SequenceTarget,
    ) -> LowerResult<TranslatedExpression> {
        match target {
            SequenceTarget::String => {
                let address = expr.address_or_materialize(&mut self.builder, "slice");
                let string = self.layout_of(&TypeSignature::string())?;
                Ok(self.reinterpret_slot(address, string, "slice.str"))
            }
            SequenceTarget::RawString => {
                let slice = self.layout_of(source)?;
                Ok(self.load_data_pointer(expr, slice, "slice"))
            }
            SequenceTarget::Slice => Ok(expr),
        }
    }

    /// Read the storage at `slot` as a value of type `layout`.
    fn reinterpret_slot(&mut self, slot: ValueId, layout: LLVMTypeId, name: &str) -> TranslatedExpression {
        let value = self.builder.load(layout, slot, name);
        TranslatedExpression::place(value, slot)
    }

    fn cast_element_wise(
        &mut self,
        expr: TranslatedExpression,
        source: &TypeSignature,
        dest: &TypeSignature,
        length: usize,
    ) -> LowerResult<TranslatedExpression> {
        let (TypeSignature::Array { stored: source_elem, .. }, TypeSignature::Array { stored: dest_elem, .. }) =
            (self.unalias(source), self.unalias(dest))
        else {
            return Err(InternalError::unreachable("element-wise cast between non-arrays"));
        };
        let source_layout = self.layout_of(source)?;
        let source_elem_layout = self.layout_of(&source_elem)?;
        let dest_layout = self.layout_of(dest)?;
        let source_address = expr.address_or_materialize(&mut self.builder, "arr.src");
        let slot = self.builder.alloca(dest_layout, "arr.cast");
        let zero = self.builder.const_i64(0);
        for index in 0..length {
            #[allow(clippy::cast_possible_wrap, reason = "array lengths fit in i64")]
            let index = self.builder.const_i64(index as i64);
            let element_ptr =
                self.builder
                    .gep(source_layout, source_address, &[zero, index], "arr.src.elem.ptr");
            let element = self
                .builder
                .load(source_elem_layout, element_ptr, "arr.src.elem");
            let converted = self.apply_cast(
                TranslatedExpression::place(element, element_ptr),
                &source_elem,
                &dest_elem,
            )?;
            let dest_ptr = self
                .builder
                .gep(dest_layout, slot, &[zero, index], "arr.cast.elem.ptr");
            self.builder.store(converted.value, dest_ptr);
        }
        let value = self.builder.load(dest_layout, slot, "arr.cast.value");
        Ok(TranslatedExpression::place(value, slot))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
