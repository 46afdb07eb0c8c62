use basalt_ir::{Argument, FunctionDefinition};
use inkwell::context::Context;
use pretty_assertions::assert_eq;

use super::*;
use crate::context::SimpleCx;
use crate::ir_builder::IrBuilder;

/// Run `f` over `count` distinct storage handles.
fn with_handles(count: i64, f: impl FnOnce(&[StorageHandle])) {
    let context = Context::create();
    let scx = SimpleCx::new(&context, "scope");
    let mut irb = IrBuilder::new(&scx);
    let layout = irb.i64_type();
    let handles: Vec<_> = (0..count)
        .map(|n| StorageHandle {
            address: irb.const_i64(n),
            layout,
        })
        .collect();
    f(&handles);
}

fn at(line: u32) -> DebugInfo {
    DebugInfo::new("main.bt", line, 5)
}

#[test]
fn declared_objects_resolve_to_their_storage() {
    with_handles(1, |h| {
        let mut scope = TranslationScope::new(RawScope::new());
        let id = scope.declare("x", TypeSignature::int(), ObjectKind::Variable, &at(1), h[0]);
        assert_eq!(id, "main.bt@1:5/x");
        assert_eq!(scope.resolve_storage("x"), Ok(h[0]));
        assert_eq!(scope.object_type("x"), Some(&TypeSignature::int()));
    });
}

#[test]
fn shadowing_stays_inside_the_nested_frame() {
    with_handles(2, |h| {
        let mut outer = TranslationScope::new(RawScope::new());
        outer.declare("x", TypeSignature::int(), ObjectKind::Variable, &at(1), h[0]);

        let mut inner = outer.nested(ScopeKind::Conditional);
        inner.declare("x", TypeSignature::float(), ObjectKind::Constant, &at(2), h[1]);

        assert_eq!(inner.resolve_storage("x"), Ok(h[1]));
        assert_eq!(outer.resolve_storage("x"), Ok(h[0]));
        assert!(inner.raw().is_immutable("x"));
        assert!(!outer.raw().is_immutable("x"));
    });
}

#[test]
fn names_declared_in_a_child_are_invisible_to_the_parent() {
    with_handles(1, |h| {
        let outer = TranslationScope::new(RawScope::new());
        let mut inner = outer.nested(ScopeKind::Loop);
        inner.declare("tmp", TypeSignature::int(), ObjectKind::Variable, &at(3), h[0]);

        assert_eq!(
            outer.resolve_storage("tmp"),
            Err(InternalError::UnresolvedIdentifier { name: "tmp".into() })
        );
    });
}

#[test]
fn arguments_bind_to_ids_from_the_function_scope() {
    with_handles(1, |h| {
        let function = FunctionDefinition {
            name: "f".into(),
            package: "main".into(),
            template_generics: Vec::new(),
            arguments: vec![Argument::new("n", TypeSignature::int())],
            return_type: None,
            code: Vec::new(),
            debug: at(7),
        };
        let mut scope = TranslationScope::new(RawScope::for_function(&function));
        let id = scope.bind_argument("n", h[0]);
        assert_eq!(id, Ok("f(main.bt@7:5)/ARG:n".to_owned()));
        assert_eq!(scope.resolve_storage("n"), Ok(h[0]));
        assert!(scope.bind_argument("missing", h[0]).is_err());
    });
}

#[test]
fn synthesized_arguments_get_ids_from_their_position() {
    with_handles(1, |h| {
        let mut scope = TranslationScope::new(RawScope::new());
        let id = scope.declare("value", TypeSignature::int(), ObjectKind::Argument, &at(9), h[0]);
        assert_eq!(id, "main.bt@9:5/ARG:value");
        assert_eq!(scope.resolve_storage("value"), Ok(h[0]));
    });
}
