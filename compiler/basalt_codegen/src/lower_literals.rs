//! Literal and identifier lowering.

use basalt_ir::{ArrayLiteral, TypeSignature};

use crate::error::LowerResult;
use crate::expr_lowerer::ExprLowerer;
use crate::translated::TranslatedExpression;

impl ExprLowerer<'_, '_, '_> {
    pub(crate) fn lower_int(&mut self, value: i64) -> TranslatedExpression {
        TranslatedExpression::value(self.cx.builder.const_i64(value))
    }

    pub(crate) fn lower_float(&mut self, value: f64) -> TranslatedExpression {
        TranslatedExpression::value(self.cx.builder.const_f64(value))
    }

    pub(crate) fn lower_bool(&mut self, value: bool) -> TranslatedExpression {
        TranslatedExpression::value(self.cx.builder.const_bool(value))
    }

    pub(crate) fn lower_char(&mut self, value: u8) -> TranslatedExpression {
        #[allow(clippy::cast_possible_wrap, reason = "chars are stored as raw i8 bytes")]
        let byte = value as i8;
        TranslatedExpression::value(self.cx.builder.const_i8(byte))
    }

    /// A private global holding the bytes, wrapped in a `String` slot.
    pub(crate) fn lower_string(&mut self, value: &str) -> LowerResult<TranslatedExpression> {
        let string_layout = self.cx.layout_of(&TypeSignature::string())?;
        let data = self.cx.builder.build_global_string_ptr(value, ".str");

        let slot = self.cx.builder.alloca(string_layout, "str");
        let len_ptr = self.cx.builder.struct_gep(string_layout, slot, 0, "str.len.ptr");
        #[allow(clippy::cast_possible_wrap, reason = "literal lengths fit in i64")]
        let len = self.cx.builder.const_i64(value.len() as i64);
        self.cx.builder.store(len, len_ptr);
        let data_ptr = self.cx.builder.struct_gep(string_layout, slot, 1, "str.data.ptr");
        self.cx.builder.store(data, data_ptr);

        let loaded = self.cx.builder.load(string_layout, slot, "str.value");
        Ok(TranslatedExpression::place(loaded, slot))
    }

    pub(crate) fn lower_array(&mut self, array: &ArrayLiteral) -> LowerResult<TranslatedExpression> {
        let array_ty = TypeSignature::array(array.stored_type.clone(), array.length);
        let layout = self.cx.layout_of(&array_ty)?;
        let slot = self.cx.builder.alloca(layout, "arr");
        let zero = self.cx.builder.const_i64(0);
        for (index, element) in array.elements.iter().enumerate() {
            let converted = self.lower_converted(element, &array.stored_type)?;
            #[allow(clippy::cast_possible_wrap, reason = "array lengths fit in i64")]
            let index = self.cx.builder.const_i64(index as i64);
            let element_ptr = self
                .cx
                .builder
                .gep(layout, slot, &[zero, index], "arr.elem.ptr");
            self.cx.builder.store(converted.value, element_ptr);
        }
        let loaded = self.cx.builder.load(layout, slot, "arr.value");
        Ok(TranslatedExpression::place(loaded, slot))
    }

    pub(crate) fn lower_identifier(&mut self, name: &str) -> LowerResult<TranslatedExpression> {
        let storage = self.scope.resolve_storage(name)?;
        let value = self.cx.builder.load(storage.layout, storage.address, name);
        Ok(TranslatedExpression::place(value, storage.address))
    }
}
