//! Memory operations (alloca, load, store, GEP) for `IrBuilder`.

use inkwell::types::BasicTypeEnum;
use inkwell::values::IntValue;

use super::IrBuilder;
use crate::value_id::{LLVMTypeId, ValueId};

impl<'ctx> IrBuilder<'_, 'ctx> {
    /// A stack slot of type `ty` in the current block.
    pub fn alloca(&mut self, ty: LLVMTypeId, name: &str) -> ValueId {
        let llvm_ty = self.arena.get_type(ty);
        let ptr = self.builder.build_alloca(llvm_ty, name).expect("alloca");
        self.arena.push_value(ptr.into())
    }

    /// Load a value of type `ty` from `ptr`.
    ///
    /// Defensive: a non-pointer `ptr` records a codegen error and yields
    /// `i64 0`.
    pub fn load(&mut self, ty: LLVMTypeId, ptr: ValueId, name: &str) -> ValueId {
        let llvm_ty = self.arena.get_type(ty);
        let raw = self.arena.get_value(ptr);
        if !raw.is_pointer_value() {
            tracing::error!(val_type = ?raw.get_type(), "load from non-pointer, returning zero");
            self.record_codegen_error();
            return self.const_i64(0);
        }
        let v = self
            .builder
            .build_load(llvm_ty, raw.into_pointer_value(), name)
            .expect("load");
        self.arena.push_value(v)
    }

    /// Store `val` through `ptr`.
    ///
    /// Defensive: a non-pointer `ptr` records a codegen error and skips the
    /// store.
    pub fn store(&mut self, val: ValueId, ptr: ValueId) {
        let v = self.arena.get_value(val);
        let p = self.arena.get_value(ptr);
        if !p.is_pointer_value() {
            tracing::error!(val_type = ?p.get_type(), "store to non-pointer, skipping");
            self.record_codegen_error();
            return;
        }
        self.builder
            .build_store(p.into_pointer_value(), v)
            .expect("store");
    }

    /// `getelementptr inbounds` over `pointee_ty` with integer `indices`.
    ///
    /// Defensive: a non-pointer base or a non-integer index records a
    /// codegen error and yields a null pointer.
    #[allow(
        unsafe_code,
        reason = "LLVM C API requires unsafe for build_in_bounds_gep"
    )]
    pub fn gep(
        &mut self,
        pointee_ty: LLVMTypeId,
        ptr: ValueId,
        indices: &[ValueId],
        name: &str,
    ) -> ValueId {
        let llvm_ty = self.arena.get_type(pointee_ty);
        let raw_ptr = self.arena.get_value(ptr);
        if !raw_ptr.is_pointer_value() {
            tracing::error!(val_type = ?raw_ptr.get_type(), "gep on non-pointer, returning null");
            self.record_codegen_error();
            return self.const_null_ptr();
        }
        let mut idx_vals: Vec<IntValue<'ctx>> = Vec::with_capacity(indices.len());
        for &id in indices {
            let raw = self.arena.get_value(id);
            if !raw.is_int_value() {
                tracing::error!(val_type = ?raw.get_type(), "gep index is not int, returning null");
                self.record_codegen_error();
                return self.const_null_ptr();
            }
            idx_vals.push(raw.into_int_value());
        }
        // SAFETY: lowering only indexes arrays and element pointers it laid
        // out itself, with the pointee type those layouts recorded.
        let v = unsafe {
            self.builder
                .build_in_bounds_gep(llvm_ty, raw_ptr.into_pointer_value(), &idx_vals, name)
                .expect("gep")
        };
        self.arena.push_value(v.into())
    }

    /// Address of field `index` of the struct of type `struct_ty` at `ptr`.
    ///
    /// Defensive: a non-struct type, a non-pointer base or an out of range
    /// index records a codegen error and yields a null pointer.
    pub fn struct_gep(
        &mut self,
        struct_ty: LLVMTypeId,
        ptr: ValueId,
        index: u32,
        name: &str,
    ) -> ValueId {
        let raw_ty = self.arena.get_type(struct_ty);
        let BasicTypeEnum::StructType(struct_t) = raw_ty else {
            tracing::error!(?raw_ty, "struct_gep on non-struct type");
            self.record_codegen_error();
            return self.const_null_ptr();
        };
        let raw_val = self.arena.get_value(ptr);
        if !raw_val.is_pointer_value() {
            tracing::error!(?raw_val, "struct_gep on non-pointer value");
            self.record_codegen_error();
            return self.const_null_ptr();
        }
        let Ok(v) = self
            .builder
            .build_struct_gep(struct_t, raw_val.into_pointer_value(), index, name)
        else {
            tracing::error!(?raw_ty, index, "struct_gep index out of range");
            self.record_codegen_error();
            return self.const_null_ptr();
        };
        self.arena.push_value(v.into())
    }
}
