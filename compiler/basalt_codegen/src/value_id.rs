//! Opaque handles into the values the [`IrBuilder`](crate::IrBuilder) owns.
//!
//! Lowering code never touches inkwell's `'ctx`-bound values directly: the
//! builder stores every value, type, block and function it creates in a
//! [`ValueArena`] and hands out `Copy` ids instead. Each id is a `u32` index
//! into the matching arena vector.

use inkwell::basic_block::BasicBlock;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValueEnum, FunctionValue};

/// Handle to an LLVM value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(u32);

/// Handle to an LLVM type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LLVMTypeId(u32);

/// Handle to a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

/// Handle to a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

fn next_index(len: usize) -> u32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "a module never holds u32::MAX values"
    )]
    let index = len as u32;
    index
}

/// Storage behind the ids. Internal to the builder.
pub(crate) struct ValueArena<'ctx> {
    values: Vec<BasicValueEnum<'ctx>>,
    types: Vec<BasicTypeEnum<'ctx>>,
    blocks: Vec<BasicBlock<'ctx>>,
    functions: Vec<FunctionValue<'ctx>>,
}

impl<'ctx> ValueArena<'ctx> {
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            types: Vec::new(),
            blocks: Vec::new(),
            functions: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn push_value(&mut self, val: BasicValueEnum<'ctx>) -> ValueId {
        let id = ValueId(next_index(self.values.len()));
        self.values.push(val);
        id
    }

    #[inline]
    pub(crate) fn get_value(&self, id: ValueId) -> BasicValueEnum<'ctx> {
        debug_assert!(
            (id.0 as usize) < self.values.len(),
            "ValueId {} out of bounds (arena has {} values)",
            id.0,
            self.values.len()
        );
        self.values[id.0 as usize]
    }

    #[inline]
    pub(crate) fn push_type(&mut self, ty: BasicTypeEnum<'ctx>) -> LLVMTypeId {
        let id = LLVMTypeId(next_index(self.types.len()));
        self.types.push(ty);
        id
    }

    #[inline]
    pub(crate) fn get_type(&self, id: LLVMTypeId) -> BasicTypeEnum<'ctx> {
        debug_assert!(
            (id.0 as usize) < self.types.len(),
            "LLVMTypeId {} out of bounds (arena has {} types)",
            id.0,
            self.types.len()
        );
        self.types[id.0 as usize]
    }

    #[inline]
    pub(crate) fn push_block(&mut self, bb: BasicBlock<'ctx>) -> BlockId {
        let id = BlockId(next_index(self.blocks.len()));
        self.blocks.push(bb);
        id
    }

    #[inline]
    pub(crate) fn get_block(&self, id: BlockId) -> BasicBlock<'ctx> {
        debug_assert!(
            (id.0 as usize) < self.blocks.len(),
            "BlockId {} out of bounds (arena has {} blocks)",
            id.0,
            self.blocks.len()
        );
        self.blocks[id.0 as usize]
    }

    #[inline]
    pub(crate) fn push_function(&mut self, func: FunctionValue<'ctx>) -> FunctionId {
        let id = FunctionId(next_index(self.functions.len()));
        self.functions.push(func);
        id
    }

    #[inline]
    pub(crate) fn get_function(&self, id: FunctionId) -> FunctionValue<'ctx> {
        debug_assert!(
            (id.0 as usize) < self.functions.len(),
            "FunctionId {} out of bounds (arena has {} functions)",
            id.0,
            self.functions.len()
        );
        self.functions[id.0 as usize]
    }
}
