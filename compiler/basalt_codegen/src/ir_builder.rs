//! ID-based LLVM instruction builder.
//!
//! `IrBuilder` wraps inkwell's `Builder`, stores every LLVM value in a
//! [`ValueArena`](crate::value_id) and exposes only opaque ids to callers,
//! so the `'ctx` lifetime stays inside the builder.
//!
//! | Category | Methods | File |
//! |----------|---------|------|
//! | Constants | `const_i8`, `const_i64`, `const_f64`, `const_bool`, `const_int`, `const_tag`, ... | `constants.rs` |
//! | Memory | `alloca`, `load`, `store`, `gep`, `struct_gep` | `memory.rs` |
//! | Arithmetic | `add`, `sub`, `mul`, `sdiv`, `srem`, `neg`, `fadd`, ..., `and`, `or`, `xor`, `not` | `arithmetic.rs` |
//! | Comparisons | `icmp_eq`, `icmp_slt`, `fcmp_ueq`, ... | `comparisons.rs` |
//! | Conversions | `fp_to_si`, `ptr_to_int` | `conversions.rs` |
//! | Control flow | `br`, `cond_br`, `select`, `ret`, `ret_void`, `unreachable` | `control_flow.rs` |
//! | Calls | `call` | `calls.rs` |
//! | Types and blocks | `i64_type`, `struct_type`, `append_block`, `declare_function`, ... | `types_blocks.rs` |
//!
//! Every builder method checks the kinds of its operands. A mismatch is
//! logged, counted in [`IrBuilder::codegen_error_count`] and answered with a
//! harmless fallback value, so lowering never panics inside LLVM. A module
//! with a non-zero count is malformed and must not be verified or emitted.

mod arithmetic;
mod calls;
mod comparisons;
mod constants;
mod control_flow;
mod conversions;
mod memory;
mod types_blocks;

use std::cell::Cell;

use inkwell::builder::Builder as InkwellBuilder;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValue, BasicValueEnum};

use crate::context::SimpleCx;
use crate::value_id::{BlockId, LLVMTypeId, ValueArena, ValueId};

/// ID-based LLVM IR builder.
///
/// `'ctx` is the LLVM context lifetime, `'scx` the borrow of the
/// [`SimpleCx`] holding the module. They are separate so a builder and its
/// `SimpleCx` can be locals of the same scope.
pub struct IrBuilder<'scx, 'ctx> {
    builder: InkwellBuilder<'ctx>,
    scx: &'scx SimpleCx<'ctx>,
    arena: ValueArena<'ctx>,
    current_block: Option<BlockId>,
    /// Operand kind mismatches seen so far.
    codegen_errors: Cell<u32>,
}

impl<'scx, 'ctx> IrBuilder<'scx, 'ctx> {
    pub fn new(scx: &'scx SimpleCx<'ctx>) -> Self {
        Self {
            builder: scx.llcx.create_builder(),
            scx,
            arena: ValueArena::new(),
            current_block: None,
            codegen_errors: Cell::new(0),
        }
    }

    #[inline]
    pub fn scx(&self) -> &'scx SimpleCx<'ctx> {
        self.scx
    }

    pub(crate) fn record_codegen_error(&self) {
        self.codegen_errors.set(self.codegen_errors.get() + 1);
    }

    /// Operand kind mismatches recorded while building.
    pub fn codegen_error_count(&self) -> u32 {
        self.codegen_errors.get()
    }

    /// The inkwell value behind `id`.
    pub fn raw_value(&self, id: ValueId) -> BasicValueEnum<'ctx> {
        self.arena.get_value(id)
    }

    /// The inkwell type behind `id`.
    pub fn raw_type(&self, id: LLVMTypeId) -> BasicTypeEnum<'ctx> {
        self.arena.get_type(id)
    }

    /// The type of an already built value.
    pub fn value_type(&mut self, val: ValueId) -> LLVMTypeId {
        let ty = self.arena.get_value(val).get_type();
        self.arena.push_type(ty)
    }

    /// Whether two type ids name the same LLVM type.
    ///
    /// LLVM uniques literal structs and arrays by shape, so this is
    /// structural for everything but named structs.
    pub fn same_type(&self, a: LLVMTypeId, b: LLVMTypeId) -> bool {
        self.arena.get_type(a) == self.arena.get_type(b)
    }

    /// Give a value a readable name in the printed IR.
    pub fn set_value_name(&self, val: ValueId, name: &str) {
        self.arena.get_value(val).set_name(name);
    }

    /// Size in bytes of `ty` under the fixed 64-bit layout used for union
    /// payloads.
    pub fn alloc_size(&self, ty: LLVMTypeId) -> u64 {
        self.scx.target_data.get_abi_size(&self.arena.get_type(ty))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
