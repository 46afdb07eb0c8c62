//! LLVM context wrappers.
//!
//! [`SimpleCx`] holds the LLVM module and the handful of types every
//! lowering step needs. [`CodegenCx`] is the lowering session on top of it:
//! it owns the IR builder and everything that outlives a single function
//! body (the layout cache, the union tag table and the callable cache).
//! Every cache is write-once per key; a hit is authoritative.
//!
//! The expression lowerer and the callable lowerer are both driven from
//! `CodegenCx`. An [`ExprLowerer`](crate::ExprLowerer) borrows the session
//! mutably and calls back into [`CodegenCx::lower_callable`] when it meets a
//! call.

use basalt_ir::{Expression, ProgramRepresentation, RawScope, TypeSignature};
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::targets::TargetData;
use inkwell::types::{BasicTypeEnum, FunctionType, IntType, PointerType, StructType};
use inkwell::AddressSpace;
use rustc_hash::FxHashMap;

use crate::error::{InternalError, LowerResult};
use crate::ir_builder::IrBuilder;
use crate::tags::TagRegistry;
use crate::value_id::{FunctionId, LLVMTypeId, ValueId};

/// Data layout used to size union payloads. Every supported target is
/// 64-bit with 8-byte pointers, so one layout serves them all.
pub const PAYLOAD_DATA_LAYOUT: &str = "e-m:e-p:64:64-i64:64-f80:128-n8:16:32:64-S128";

/// An LLVM module and the common types of its context.
pub struct SimpleCx<'ll> {
    pub llcx: &'ll Context,
    pub llmod: Module<'ll>,
    pub ptr_type: PointerType<'ll>,
    pub target_data: TargetData,
}

impl<'ll> SimpleCx<'ll> {
    #[must_use]
    pub fn new(context: &'ll Context, module_name: &str) -> Self {
        Self {
            llcx: context,
            llmod: context.create_module(module_name),
            ptr_type: context.ptr_type(AddressSpace::default()),
            target_data: TargetData::create(PAYLOAD_DATA_LAYOUT),
        }
    }

    /// Give up the context wrapper, keeping the module.
    pub fn into_module(self) -> Module<'ll> {
        self.llmod
    }

    #[inline]
    pub fn type_i1(&self) -> IntType<'ll> {
        self.llcx.bool_type()
    }

    #[inline]
    pub fn type_i8(&self) -> IntType<'ll> {
        self.llcx.i8_type()
    }

    #[inline]
    pub fn type_i64(&self) -> IntType<'ll> {
        self.llcx.i64_type()
    }

    #[inline]
    pub fn type_f64(&self) -> inkwell::types::FloatType<'ll> {
        self.llcx.f64_type()
    }

    #[inline]
    pub fn type_ptr(&self) -> PointerType<'ll> {
        self.ptr_type
    }

    pub fn type_struct(&self, fields: &[BasicTypeEnum<'ll>], packed: bool) -> StructType<'ll> {
        self.llcx.struct_type(fields, packed)
    }

    /// A named struct without a body, for self-referential layouts.
    pub fn type_named_struct(&self, name: &str) -> StructType<'ll> {
        self.llcx.opaque_struct_type(name)
    }

    pub fn set_struct_body(
        &self,
        ty: StructType<'ll>,
        fields: &[BasicTypeEnum<'ll>],
        packed: bool,
    ) {
        ty.set_body(fields, packed);
    }

    pub fn type_void_func(
        &self,
        args: &[inkwell::types::BasicMetadataTypeEnum<'ll>],
    ) -> FunctionType<'ll> {
        self.llcx.void_type().fn_type(args, false)
    }
}

/// The lowering session over one [`SimpleCx`].
pub struct CodegenCx<'a, 'ctx> {
    pub(crate) program: &'a dyn ProgramRepresentation,
    pub(crate) builder: IrBuilder<'a, 'ctx>,
    /// Fully qualified type name → laid out IR type.
    pub(crate) layouts: FxHashMap<String, LLVMTypeId>,
    pub(crate) tags: TagRegistry,
    /// Callable unique name → emitted function.
    pub(crate) callables: FxHashMap<String, FunctionId>,
    label_counter: u32,
}

impl<'a, 'ctx> CodegenCx<'a, 'ctx> {
    pub fn new(program: &'a dyn ProgramRepresentation, scx: &'a SimpleCx<'ctx>) -> Self {
        Self {
            program,
            builder: IrBuilder::new(scx),
            layouts: FxHashMap::default(),
            tags: TagRegistry::new(),
            callables: FxHashMap::default(),
            label_counter: 0,
        }
    }

    pub fn program(&self) -> &'a dyn ProgramRepresentation {
        self.program
    }

    pub fn builder(&self) -> &IrBuilder<'a, 'ctx> {
        &self.builder
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// Emitted function for an already lowered callable.
    pub fn lowered_callable(&self, unique_name: &str) -> Option<FunctionId> {
        self.callables.get(unique_name).copied()
    }

    pub fn lowered_callable_count(&self) -> usize {
        self.callables.len()
    }

    /// Operand kind mismatches the builder recorded so far.
    pub fn codegen_error_count(&self) -> u32 {
        self.builder.codegen_error_count()
    }

    /// A block label unique within the module: `<prefix>@<n>`.
    pub(crate) fn fresh_label(&mut self, prefix: &str) -> String {
        let label = format!("{prefix}@{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    /// Static type of `expr`, failing loudly when the program cannot tell.
    pub(crate) fn expression_type(
        &self,
        expr: &Expression,
        scope: &RawScope,
    ) -> LowerResult<TypeSignature> {
        self.program
            .resolve_expression_type(expr, scope)
            .ok_or_else(|| InternalError::TypeDeduction {
                location: expr.debug.to_string(),
            })
    }

    pub(crate) fn unalias(&self, ty: &TypeSignature) -> TypeSignature {
        self.program.unalias_type(ty)
    }

    pub(crate) fn is_union(&self, ty: &TypeSignature) -> bool {
        self.program.is_union(ty)
    }

    /// The tag id identifying `ty` inside union headers.
    pub(crate) fn type_tag_id(&mut self, ty: &TypeSignature) -> u32 {
        let unaliased = self.unalias(ty);
        let name = self.program.fully_qualified_typesignature_name(&unaliased);
        self.tags.intern(&name)
    }

    /// The tag constant identifying `ty`, as stored in a union header.
    pub(crate) fn type_tag(&mut self, ty: &TypeSignature) -> ValueId {
        let id = self.type_tag_id(ty);
        self.builder.const_tag(id)
    }

    /// Non-union types whose tag identifies a value of type `ty`.
    ///
    /// A union stands for all of its (flattened) alternatives; any other
    /// type stands for itself.
    pub(crate) fn tag_candidates(&self, ty: &TypeSignature) -> Vec<TypeSignature> {
        let compatible = self
            .program
            .fetch_non_union_compatible_types_for_union_assignment(ty);
        if compatible.is_empty() {
            vec![ty.clone()]
        } else {
            compatible
        }
    }

    /// `i1` that is true when the union of layout `union_layout` stored at
    /// `union_address` holds a value identified by `checked`.
    ///
    /// The header is compared as an integer against each candidate tag id.
    pub(crate) fn emit_tag_test(
        &mut self,
        union_address: ValueId,
        union_layout: LLVMTypeId,
        checked: &TypeSignature,
        name: &str,
    ) -> ValueId {
        let header_ptr =
            self.builder
                .struct_gep(union_layout, union_address, 0, &format!("{name}.header"));
        let ptr_ty = self.builder.ptr_type();
        let header = self.builder.load(ptr_ty, header_ptr, &format!("{name}.tag"));
        let header_bits = self.builder.ptr_to_int(header, &format!("{name}.bits"));
        let mut matched: Option<ValueId> = None;
        for candidate in self.tag_candidates(checked) {
            let id = self.type_tag_id(&candidate);
            let tag = self.builder.const_i64(i64::from(id));
            let equal = self.builder.icmp_eq(header_bits, tag, name);
            matched = Some(match matched {
                Some(previous) => self.builder.or(previous, equal, name),
                None => equal,
            });
        }
        matched.unwrap_or_else(|| self.builder.const_bool(false))
    }
}
