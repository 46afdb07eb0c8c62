use pretty_assertions::assert_eq;

use super::*;
use crate::ast::Argument;

fn at(line: u32, tok: u32) -> DebugInfo {
    DebugInfo::new("main.bt", line, tok)
}

#[test]
fn empty_scope_lookup_returns_none() {
    let scope = RawScope::new();
    assert!(scope.lookup("x").is_none());
    assert!(!scope.contains("x"));
    assert!(scope.is_immutable("x"));
}

#[test]
fn function_scope_declares_arguments() {
    let function = FunctionDefinition {
        name: "add".into(),
        package: "main".into(),
        template_generics: Vec::new(),
        arguments: vec![
            Argument::new("a", TypeSignature::int()),
            Argument::new("b", TypeSignature::float()),
        ],
        return_type: None,
        code: Vec::new(),
        debug: at(1, 1),
    };
    let scope = RawScope::for_function(&function);
    assert_eq!(
        scope.resolve_object_unique_id("a"),
        Some("add(main.bt@1:1)/ARG:a")
    );
    assert_eq!(scope.object_type("b"), Some(&TypeSignature::float()));
    assert_eq!(scope.lookup("a").map(|o| o.kind), Some(ObjectKind::Argument));
    assert!(!scope.is_immutable("a"));
}

#[test]
fn sibling_declarations_get_distinct_ids() {
    let parent = RawScope::new();

    let mut then_frame = parent.nested(ScopeKind::Conditional);
    let then_id = then_frame.store_local_variable("x", TypeSignature::int(), &at(2, 5));

    let mut else_frame = parent.nested(ScopeKind::Conditional);
    let else_id = else_frame.store_local_variable("x", TypeSignature::int(), &at(4, 5));

    assert_ne!(then_id, else_id);
    assert!(!parent.contains("x"));
}

#[test]
fn shadowing_in_child_does_not_affect_parent() {
    let mut parent = RawScope::new();
    let outer = parent.store_local_variable("x", TypeSignature::int(), &at(1, 1));

    let mut child = parent.nested(ScopeKind::Loop);
    let inner = child.store_local_constant("x", TypeSignature::float(), &at(3, 1));

    assert_eq!(child.resolve_object_unique_id("x"), Some(inner.as_str()));
    assert_eq!(child.object_type("x"), Some(&TypeSignature::float()));
    assert!(child.is_immutable("x"));
    assert_eq!(parent.resolve_object_unique_id("x"), Some(outer.as_str()));
    assert_eq!(child.kind(), ScopeKind::Loop);
}
