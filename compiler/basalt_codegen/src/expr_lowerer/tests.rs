use basalt_ir::{
    BinaryOp, CallableCodeBlock, CustomType, DotMemberAccess, Expression as E, FunctionCall,
    FunctionRef, ObjectKind, ProgramRegistry, ProgramRepresentation, RawScope, Statement as S,
    TypeDefinition, TypeSignature as T, UnaryOp,
};
use inkwell::context::Context;
use pretty_assertions::assert_eq;

use super::*;
use crate::scope::StorageHandle;
use crate::tests::helper::{at, config, with_codegen_cx, Executable, TestProgram};
use crate::Finalizer;

/// Answers field indices only for struct-typed bases, the way a type checker
/// that never sees the implicit dereference would.
struct StructBasesOnly<'a> {
    inner: &'a ProgramRegistry,
}

impl ProgramRepresentation for StructBasesOnly<'_> {
    fn resolve_expression_type(&self, expr: &E, scope: &RawScope) -> Option<T> {
        self.inner.resolve_expression_type(expr, scope)
    }

    fn resolve_function_call(
        &self,
        call: &FunctionCall,
        scope: &RawScope,
    ) -> Option<CallableCodeBlock> {
        self.inner.resolve_function_call(call, scope)
    }

    fn retrieve_type_definition(&self, custom: &CustomType) -> Option<TypeDefinition> {
        self.inner.retrieve_type_definition(custom)
    }

    fn unalias_type(&self, ty: &T) -> T {
        self.inner.unalias_type(ty)
    }

    fn is_union(&self, ty: &T) -> bool {
        self.inner.is_union(ty)
    }

    fn validate_assignment(&self, expected: &T, actual: &T) -> bool {
        self.inner.validate_assignment(expected, actual)
    }

    fn resolve_field_index(&self, access: &DotMemberAccess, scope: &RawScope) -> Option<usize> {
        let base = self.resolve_expression_type(&access.struct_value, scope)?;
        if matches!(self.unalias_type(&base), T::Pointer(_)) {
            return None;
        }
        self.inner.resolve_field_index(access, scope)
    }

    fn normalize_dot_member_access(
        &self,
        access: &DotMemberAccess,
        scope: &RawScope,
    ) -> DotMemberAccess {
        self.inner.normalize_dot_member_access(access, scope)
    }

    fn fully_qualified_typesignature_name(&self, ty: &T) -> String {
        self.inner.fully_qualified_typesignature_name(ty)
    }

    fn fully_qualified_typedefinition_name(&self, def: &TypeDefinition) -> String {
        self.inner.fully_qualified_typedefinition_name(def)
    }

    fn fetch_non_union_compatible_types_for_union_assignment(&self, ty: &T) -> Vec<T> {
        self.inner
            .fetch_non_union_compatible_types_for_union_assignment(ty)
    }

    fn function_definitions(&self) -> Vec<FunctionRef> {
        self.inner.function_definitions()
    }
}

fn var(name: &str, line: u32) -> E {
    E::identifier(name, at(line))
}

#[test]
fn field_index_is_resolved_on_the_dereferenced_base() {
    let mut program = TestProgram::new();
    let point = program.define_struct("Point", &[("x", T::int()), ("y", T::int())]);
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::var("p", point.clone(), None, at(2)),
            S::var(
                "q",
                T::pointer(point),
                Some(E::unary(UnaryOp::AddressOf, var("p", 3), at(3))),
                at(3),
            ),
            S::assign(E::dot(var("q", 4), "y", at(4)), E::int(5, at(4)), at(4)),
            S::ret(Some(E::dot(var("q", 5), "y", at(5))), at(5)),
        ],
    );

    let strict = StructBasesOnly {
        inner: &program.registry,
    };
    let context = Context::create();
    let module = match Finalizer::new(&strict, config()).lower_module(&context) {
        Ok(module) => module,
        Err(err) => panic!("member access through a pointer must lower: {err}"),
    };
    assert_eq!(Executable::new(&module).int("main("), 5);
}

#[test]
fn places_carry_an_address_and_values_do_not() {
    let mut program = TestProgram::new();
    let point = program.define_struct("Point", &[("x", T::int()), ("y", T::int())]);
    program.function("one", &[], Some(T::int()), vec![S::ret(Some(E::int(1, at(2))), at(2))]);

    with_codegen_cx(&program.registry, |cx| {
        let i64_ty = cx.builder.i64_type();
        let function = cx.builder.declare_function("holder", &[], i64_ty);
        let entry = cx.builder.append_block(function, "entry");
        cx.builder.position_at_end(entry);

        let mut scope = TranslationScope::new(RawScope::new());
        let locals = [
            ("n", T::int()),
            ("p", point),
            ("a", T::array(T::int(), 2)),
            ("q", T::pointer(T::int())),
            ("s", T::string()),
        ];
        for (line, (name, ty)) in (10..).zip(locals) {
            let layout = cx.layout_of(&ty).unwrap();
            let address = cx.builder.alloca(layout, name);
            scope.declare(
                name,
                ty,
                ObjectKind::Variable,
                &at(line),
                StorageHandle { address, layout },
            );
        }
        let mut lowerer = ExprLowerer::new(cx, function, scope, Some(T::int()));

        let values = [
            E::int(7, at(20)),
            E::binary(BinaryOp::Add, var("n", 21), E::int(1, at(21)), at(21)),
            E::call("one", vec![], at(22)),
        ];
        for expr in &values {
            let lowered = lowerer.lower_expression(expr).unwrap();
            assert_eq!(lowered.address, None, "{:?}", expr.kind);
        }

        let places = [
            var("n", 30),
            E::dot(var("p", 31), "x", at(31)),
            E::index(var("a", 32), E::int(1, at(32)), at(32)),
            E::unary(UnaryOp::Deref, var("q", 33), at(33)),
            E::dot(var("s", 34), "len", at(34)),
        ];
        for expr in &places {
            let lowered = lowerer.lower_expression(expr).unwrap();
            assert!(lowered.is_place(), "{:?}", expr.kind);
        }
    });
}
