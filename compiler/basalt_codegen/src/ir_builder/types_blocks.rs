//! Type registration, block and function management for `IrBuilder`.

use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum};

use super::IrBuilder;
use crate::value_id::{BlockId, FunctionId, LLVMTypeId, ValueId};

impl<'ctx> IrBuilder<'_, 'ctx> {
    // -- Types --

    #[inline]
    pub fn bool_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.scx.type_i1().into())
    }

    #[inline]
    pub fn i8_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.scx.type_i8().into())
    }

    #[inline]
    pub fn i64_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.scx.type_i64().into())
    }

    #[inline]
    pub fn f64_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.scx.type_f64().into())
    }

    /// The opaque `ptr` type.
    #[inline]
    pub fn ptr_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.scx.type_ptr().into())
    }

    /// `[len x elem]`.
    ///
    /// Defensive: a length beyond `u32::MAX` records a codegen error and
    /// yields an empty array.
    pub fn array_type(&mut self, elem: LLVMTypeId, len: u64) -> LLVMTypeId {
        let elem_ty = self.arena.get_type(elem);
        let len = u32::try_from(len).unwrap_or_else(|_| {
            tracing::error!(len, "array length does not fit an LLVM array type");
            self.record_codegen_error();
            0
        });
        self.arena.push_type(elem_ty.array_type(len).into())
    }

    /// A literal (unnamed, uniqued by shape) struct.
    pub fn struct_type(&mut self, fields: &[LLVMTypeId]) -> LLVMTypeId {
        let field_tys = self.field_types(fields);
        let ty = self.scx.type_struct(&field_tys, false);
        self.arena.push_type(ty.into())
    }

    /// A named struct with no body yet. Fill it with
    /// [`set_struct_body`](Self::set_struct_body).
    pub fn named_struct(&mut self, name: &str) -> LLVMTypeId {
        let ty = self.scx.type_named_struct(name);
        self.arena.push_type(ty.into())
    }

    /// An existing named struct of the module's context.
    pub fn lookup_named_struct(&mut self, name: &str) -> Option<LLVMTypeId> {
        let ty = self.scx.llcx.get_struct_type(name)?;
        Some(self.arena.push_type(ty.into()))
    }

    /// Defensive: a non-struct `ty` records a codegen error and is left
    /// untouched.
    pub fn set_struct_body(&mut self, ty: LLVMTypeId, fields: &[LLVMTypeId]) {
        let BasicTypeEnum::StructType(struct_ty) = self.arena.get_type(ty) else {
            tracing::error!(ty = ?self.arena.get_type(ty), "set_struct_body on non-struct type");
            self.record_codegen_error();
            return;
        };
        let field_tys = self.field_types(fields);
        self.scx.set_struct_body(struct_ty, &field_tys, false);
    }

    /// Type of field `index` of a struct type.
    pub fn struct_field_type(&mut self, ty: LLVMTypeId, index: u32) -> Option<LLVMTypeId> {
        let BasicTypeEnum::StructType(struct_ty) = self.arena.get_type(ty) else {
            return None;
        };
        let field = struct_ty.get_field_type_at_index(index)?;
        Some(self.arena.push_type(field))
    }

    fn field_types(&self, fields: &[LLVMTypeId]) -> Vec<BasicTypeEnum<'ctx>> {
        fields.iter().map(|&id| self.arena.get_type(id)).collect()
    }

    // -- Blocks --

    pub fn append_block(&mut self, function: FunctionId, name: &str) -> BlockId {
        let func = self.arena.get_function(function);
        let bb = self.scx.llcx.append_basic_block(func, name);
        self.arena.push_block(bb)
    }

    pub fn position_at_end(&mut self, block: BlockId) {
        let bb = self.arena.get_block(block);
        self.builder.position_at_end(bb);
        self.current_block = Some(block);
    }

    #[inline]
    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    pub fn current_block_terminated(&self) -> bool {
        self.current_block
            .is_some_and(|id| self.arena.get_block(id).get_terminator().is_some())
    }

    /// The current insertion block, for a later
    /// [`restore_position`](Self::restore_position).
    #[inline]
    pub fn save_position(&self) -> Option<BlockId> {
        self.current_block
    }

    pub fn restore_position(&mut self, saved: Option<BlockId>) {
        if let Some(block_id) = saved {
            let bb = self.arena.get_block(block_id);
            self.builder.position_at_end(bb);
            self.current_block = Some(block_id);
        }
    }

    // -- Functions --

    pub fn declare_function(
        &mut self,
        name: &str,
        param_types: &[LLVMTypeId],
        return_type: LLVMTypeId,
    ) -> FunctionId {
        let ret_ty = self.arena.get_type(return_type);
        let param_tys = self.param_types(param_types);
        let fn_type = ret_ty.fn_type(&param_tys, false);
        let func = self.scx.llmod.add_function(name, fn_type, None);
        self.arena.push_function(func)
    }

    pub fn declare_void_function(&mut self, name: &str, param_types: &[LLVMTypeId]) -> FunctionId {
        let param_tys = self.param_types(param_types);
        let fn_type = self.scx.type_void_func(&param_tys);
        let func = self.scx.llmod.add_function(name, fn_type, None);
        self.arena.push_function(func)
    }

    fn param_types(&self, param_types: &[LLVMTypeId]) -> Vec<BasicMetadataTypeEnum<'ctx>> {
        param_types
            .iter()
            .map(|&id| self.arena.get_type(id).into())
            .collect()
    }

    /// Parameter `index` of `func`.
    ///
    /// Defensive: an out of range index records a codegen error and yields
    /// `i64 0`.
    pub fn get_param(&mut self, func: FunctionId, index: u32) -> ValueId {
        let func_val = self.arena.get_function(func);
        let Some(param) = func_val.get_nth_param(index) else {
            tracing::error!(
                func = %func_val.get_name().to_string_lossy(),
                index,
                param_count = func_val.count_params(),
                "parameter index out of bounds, returning zero"
            );
            self.record_codegen_error();
            return self.const_i64(0);
        };
        self.arena.push_value(param)
    }

    pub fn function_name(&self, func: FunctionId) -> String {
        self.arena
            .get_function(func)
            .get_name()
            .to_string_lossy()
            .into_owned()
    }
}
