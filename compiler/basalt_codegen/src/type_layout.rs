//! Type layout: source type signatures to IR types.
//!
//! | Source | IR |
//! |--------|----|
//! | `Int` / `Float` / `Bool` / `Char` | `i64` / `double` / `i1` / `i8` |
//! | `RawString` | `ptr` |
//! | `String` | `%String = type { i64, ptr }` |
//! | `#T` / `[N]T` | `ptr` / `[N x T]` |
//! | `$T` | `{ i64, ptr }` |
//! | struct | `%"pkg::Name" = type { fields... }`, `{ i1 }` when empty |
//! | union | `{ ptr, [N x i8] }`, N = largest alternative footprint |
//!
//! Pointers are opaque, so the pointee of `#T` is never laid out for the
//! pointer itself. Named layouts are still registered as empty shells before
//! their fields are laid out, so a type can refer to itself through a
//! pointer. Every layout is
//! cached under the fully qualified name of the signature it was requested
//! for.

use basalt_ir::{PrimitiveType, TypeDefinition, TypeSignature};
use inkwell::types::BasicTypeEnum;

use crate::context::CodegenCx;
use crate::error::{InternalError, LowerResult};
use crate::value_id::LLVMTypeId;

/// Name of the named struct backing `String`.
pub const STRING_LAYOUT_NAME: &str = "String";

/// Bytes a pointer occupies in a union payload.
pub const POINTER_FOOTPRINT: u64 = 8;

impl CodegenCx<'_, '_> {
    /// IR type of `ty`. Idempotent: the same signature always yields the
    /// same `LLVMTypeId`.
    pub fn layout_of(&mut self, ty: &TypeSignature) -> LowerResult<LLVMTypeId> {
        let name = self.program.fully_qualified_typesignature_name(ty);
        if let Some(&cached) = self.layouts.get(&name) {
            return Ok(cached);
        }
        let unaliased = self.unalias(ty);
        let layout = match &unaliased {
            TypeSignature::Primitive(primitive) => self.primitive_layout(*primitive),
            TypeSignature::Pointer(_) => self.builder.ptr_type(),
            TypeSignature::Array { stored, length } => {
                let elem = self.layout_of(stored)?;
                self.builder.array_type(elem, *length as u64)
            }
            TypeSignature::Slice(_) => {
                let i64 = self.builder.i64_type();
                let data = self.builder.ptr_type();
                self.builder.struct_type(&[i64, data])
            }
            TypeSignature::TemplateParam(param) => {
                return Err(InternalError::TemplateParamInLayout {
                    name: param.clone(),
                })
            }
            TypeSignature::InlineUnion(alternatives) => {
                let payload = self.union_payload_size(alternatives)?;
                let fields = self.union_fields(payload);
                self.builder.struct_type(&fields)
            }
            TypeSignature::Custom(custom) => {
                let definition = self.program.retrieve_type_definition(custom).ok_or_else(|| {
                    InternalError::UnknownType {
                        name: custom.fully_qualified_name(),
                    }
                })?;
                self.custom_layout(&definition)?
            }
        };
        tracing::trace!(ty = %name, layout = ?self.builder.raw_type(layout), "laid out type");
        self.layouts.insert(name, layout);
        Ok(layout)
    }

    /// Bytes a value of `ty` occupies when stored in a union payload.
    ///
    /// For unions this is the payload size alone, which is what a nested
    /// union copies into its parent. Pointers never need their pointee laid
    /// out, which keeps self-referential unions finite.
    pub fn footprint_of(&mut self, ty: &TypeSignature) -> LowerResult<u64> {
        let unaliased = self.unalias(ty);
        match &unaliased {
            TypeSignature::Pointer(_) => Ok(POINTER_FOOTPRINT),
            TypeSignature::TemplateParam(param) => Err(InternalError::TemplateParamInLayout {
                name: param.clone(),
            }),
            TypeSignature::InlineUnion(alternatives) => self.union_payload_size(alternatives),
            TypeSignature::Custom(custom) => {
                let definition = self.program.retrieve_type_definition(custom);
                if let Some(TypeDefinition::Union(union)) = definition {
                    return self.union_payload_size(&union.alternatives);
                }
                self.alloc_size_of(ty)
            }
            _ => self.alloc_size_of(ty),
        }
    }

    /// IR return type of a callable; `None` is `void`.
    pub fn return_layout(&mut self, ty: Option<&TypeSignature>) -> LowerResult<Option<LLVMTypeId>> {
        ty.map(|ty| self.layout_of(ty)).transpose()
    }

    pub fn fully_qualified_name(&self, ty: &TypeSignature) -> String {
        self.program.fully_qualified_typesignature_name(ty)
    }

    pub fn fully_qualified_definition_name(&self, definition: &TypeDefinition) -> String {
        self.program.fully_qualified_typedefinition_name(definition)
    }

    fn alloc_size_of(&mut self, ty: &TypeSignature) -> LowerResult<u64> {
        let layout = self.layout_of(ty)?;
        Ok(self.builder.alloc_size(layout))
    }

    fn primitive_layout(&mut self, primitive: PrimitiveType) -> LLVMTypeId {
        match primitive {
            PrimitiveType::Int => self.builder.i64_type(),
            PrimitiveType::Float => self.builder.f64_type(),
            PrimitiveType::Bool => self.builder.bool_type(),
            PrimitiveType::Char => self.builder.i8_type(),
            PrimitiveType::RawString => self.builder.ptr_type(),
            PrimitiveType::String => {
                if let Some(existing) = self.builder.lookup_named_struct(STRING_LAYOUT_NAME) {
                    return existing;
                }
                let i64 = self.builder.i64_type();
                let data = self.builder.ptr_type();
                let string = self.builder.named_struct(STRING_LAYOUT_NAME);
                self.builder.set_struct_body(string, &[i64, data]);
                string
            }
        }
    }

    fn custom_layout(&mut self, definition: &TypeDefinition) -> LowerResult<LLVMTypeId> {
        let name = self.fully_qualified_definition_name(definition);
        if let Some(&cached) = self.layouts.get(&name) {
            return Ok(cached);
        }
        match definition {
            TypeDefinition::Struct(def) => {
                let shell = self.builder.named_struct(&name);
                self.layouts.insert(name, shell);
                let mut fields = Vec::with_capacity(def.fields.len().max(1));
                for field in &def.fields {
                    fields.push(self.layout_of(&field.ty)?);
                }
                if fields.is_empty() {
                    fields.push(self.builder.bool_type());
                }
                self.builder.set_struct_body(shell, &fields);
                Ok(shell)
            }
            TypeDefinition::Union(def) => {
                let shell = self.builder.named_struct(&name);
                self.layouts.insert(name, shell);
                let payload = self.union_payload_size(&def.alternatives)?;
                let fields = self.union_fields(payload);
                self.builder.set_struct_body(shell, &fields);
                Ok(shell)
            }
            TypeDefinition::Alias(alias) => self.layout_of(&alias.aliased),
        }
    }

    /// Largest footprint among `alternatives`. Order does not matter.
    pub(crate) fn union_payload_size(&mut self, alternatives: &[TypeSignature]) -> LowerResult<u64> {
        let mut payload = 0;
        for alternative in alternatives {
            payload = payload.max(self.footprint_of(alternative)?);
        }
        Ok(payload)
    }

    /// `[ptr tag, [payload x i8]]`.
    fn union_fields(&mut self, payload: u64) -> [LLVMTypeId; 2] {
        let tag = self.builder.ptr_type();
        let i8 = self.builder.i8_type();
        [tag, self.builder.array_type(i8, payload)]
    }

    /// Payload byte count of a laid out union.
    pub(crate) fn union_payload_len(&self, union_layout: LLVMTypeId) -> Option<u32> {
        let BasicTypeEnum::StructType(union_ty) = self.builder.raw_type(union_layout) else {
            return None;
        };
        match union_ty.get_field_type_at_index(1)? {
            BasicTypeEnum::ArrayType(payload) => Some(payload.len()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
