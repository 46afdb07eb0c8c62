//! Conversions for `IrBuilder`.

use inkwell::types::BasicTypeEnum;

use super::IrBuilder;
use crate::value_id::{LLVMTypeId, ValueId};

impl IrBuilder<'_, '_> {
    /// Float to signed integer, truncating toward zero.
    pub fn fp_to_si(&mut self, val: ValueId, ty: LLVMTypeId, name: &str) -> ValueId {
        let v = self.arena.get_value(val);
        let BasicTypeEnum::IntType(target) = self.arena.get_type(ty) else {
            tracing::error!(ty = ?self.arena.get_type(ty), "fp_to_si into non-int type");
            self.record_codegen_error();
            return self.const_i64(0);
        };
        if !v.is_float_value() {
            tracing::error!(val_type = ?v.get_type(), "fp_to_si on non-float operand");
            self.record_codegen_error();
            return self.const_i64(0);
        }
        let result = self
            .builder
            .build_float_to_signed_int(v.into_float_value(), target, name)
            .expect("fp_to_si");
        self.arena.push_value(result.into())
    }

    /// Pointer to `i64`.
    pub fn ptr_to_int(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val);
        if !v.is_pointer_value() {
            tracing::error!(val_type = ?v.get_type(), "ptr_to_int on non-pointer operand");
            self.record_codegen_error();
            return self.const_i64(0);
        }
        let result = self
            .builder
            .build_ptr_to_int(v.into_pointer_value(), self.scx.type_i64(), name)
            .expect("ptr_to_int");
        self.arena.push_value(result.into())
    }
}
