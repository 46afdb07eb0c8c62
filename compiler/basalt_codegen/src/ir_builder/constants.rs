//! Constants for `IrBuilder`.

use inkwell::types::BasicTypeEnum;

use super::IrBuilder;
use crate::value_id::{LLVMTypeId, ValueId};

impl IrBuilder<'_, '_> {
    #[inline]
    pub fn const_i8(&mut self, val: i8) -> ValueId {
        #[allow(clippy::cast_sign_loss, reason = "const_int takes the raw bits")]
        let v = self.scx.type_i8().const_int(val as u64, val < 0);
        self.arena.push_value(v.into())
    }

    #[inline]
    pub fn const_i64(&mut self, val: i64) -> ValueId {
        #[allow(clippy::cast_sign_loss, reason = "const_int takes the raw bits")]
        let v = self.scx.type_i64().const_int(val as u64, val < 0);
        self.arena.push_value(v.into())
    }

    #[inline]
    pub fn const_f64(&mut self, val: f64) -> ValueId {
        let v = self.scx.type_f64().const_float(val);
        self.arena.push_value(v.into())
    }

    /// An `i1` constant.
    #[inline]
    pub fn const_bool(&mut self, val: bool) -> ValueId {
        let v = self.scx.type_i1().const_int(u64::from(val), false);
        self.arena.push_value(v.into())
    }

    #[inline]
    pub fn const_null_ptr(&mut self) -> ValueId {
        let v = self.scx.type_ptr().const_null();
        self.arena.push_value(v.into())
    }

    /// An integer constant of the integer type `ty`.
    ///
    /// Defensive: a non-integer `ty` records a codegen error and yields
    /// `i64 0`.
    pub fn const_int(&mut self, ty: LLVMTypeId, val: u64) -> ValueId {
        let BasicTypeEnum::IntType(int_ty) = self.arena.get_type(ty) else {
            tracing::error!(ty = ?self.arena.get_type(ty), "const_int of non-int type");
            self.record_codegen_error();
            return self.const_i64(0);
        };
        self.arena.push_value(int_ty.const_int(val, false).into())
    }

    /// A union tag: the pointer constant `inttoptr (i64 id to ptr)`.
    pub fn const_tag(&mut self, id: u32) -> ValueId {
        let v = self
            .scx
            .type_i64()
            .const_int(u64::from(id), false)
            .const_to_pointer(self.scx.type_ptr());
        self.arena.push_value(v.into())
    }

    /// A private null-terminated global string, as a pointer to its first
    /// byte.
    pub fn build_global_string_ptr(&mut self, value: &str, name: &str) -> ValueId {
        let v = self
            .builder
            .build_global_string_ptr(value, name)
            .expect("build_global_string_ptr")
            .as_pointer_value();
        self.arena.push_value(v.into())
    }
}
