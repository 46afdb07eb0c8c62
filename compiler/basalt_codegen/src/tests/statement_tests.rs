use basalt_ir::{BinaryOp, Expression as E, Statement as S, TypeSignature as T};
use inkwell::context::Context;
use inkwell::values::InstructionOpcode;
use pretty_assertions::assert_eq;

use super::helper::{at, count, function_ir, function_named, Executable, TestProgram};

#[test]
fn declaration_with_constant_sum_stores_the_folded_value() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::var(
                "x",
                T::int(),
                Some(E::binary(BinaryOp::Add, E::int(3, at(2)), E::int(4, at(2)), at(2))),
                at(2),
            ),
            S::ret(Some(E::identifier("x", at(3))), at(3)),
        ],
    );
    let context = Context::create();
    let module = program.lower(&context);

    assert_eq!(count(&module, "main(", InstructionOpcode::Alloca), 1);
    assert_eq!(count(&module, "main(", InstructionOpcode::Add), 0);
    assert_eq!(count(&module, "main(", InstructionOpcode::Store), 1);
    let ir = function_ir(&module, "main(");
    assert!(ir.contains("store i64 7, ptr %"), "{ir}");

    assert_eq!(Executable::new(&module).int("main("), 7);
}

#[test]
fn declaration_with_variable_sum_uses_one_add_one_store() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::var("a", T::int(), Some(E::int(3, at(2))), at(2)),
            S::var(
                "x",
                T::int(),
                Some(E::binary(BinaryOp::Add, E::identifier("a", at(3)), E::int(4, at(3)), at(3))),
                at(3),
            ),
            S::ret(Some(E::identifier("x", at(4))), at(4)),
        ],
    );
    let context = Context::create();
    let module = program.lower(&context);

    assert_eq!(count(&module, "main(", InstructionOpcode::Alloca), 2);
    assert_eq!(count(&module, "main(", InstructionOpcode::Add), 1);
    assert_eq!(count(&module, "main(", InstructionOpcode::Store), 2);

    assert_eq!(Executable::new(&module).int("main("), 7);
}

#[test]
fn assignment_overwrites_the_slot() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::var("x", T::int(), Some(E::int(1, at(2))), at(2)),
            S::assign(
                E::identifier("x", at(3)),
                E::binary(BinaryOp::Mul, E::identifier("x", at(3)), E::int(10, at(3)), at(3)),
                at(3),
            ),
            S::ret(Some(E::identifier("x", at(4))), at(4)),
        ],
    );
    assert_eq!(program.run_int("main("), 10);
}

#[test]
fn constants_and_uninitialized_variables() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::constant("k", T::int(), E::int(6, at(2)), at(2)),
            S::var("y", T::int(), None, at(3)),
            S::assign(E::identifier("y", at(4)), E::identifier("k", at(4)), at(4)),
            S::ret(
                Some(E::binary(
                    BinaryOp::Add,
                    E::identifier("y", at(5)),
                    E::identifier("k", at(5)),
                    at(5),
                )),
                at(5),
            ),
        ],
    );
    assert_eq!(program.run_int("main("), 12);
}

#[test]
fn shadowing_in_a_branch_leaves_the_outer_object_alone() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::var("x", T::int(), Some(E::int(1, at(2))), at(2)),
            S::conditional(
                E::bool(true, at(3)),
                vec![
                    S::var("x", T::int(), Some(E::int(50, at(4))), at(4)),
                    S::assign(E::identifier("x", at(5)), E::int(60, at(5)), at(5)),
                ],
                vec![],
                at(3),
            ),
            S::ret(Some(E::identifier("x", at(6))), at(6)),
        ],
    );
    assert_eq!(program.run_int("main("), 1);
}

#[test]
fn initializer_sees_the_outer_object_it_shadows() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::var("x", T::int(), Some(E::int(4, at(2))), at(2)),
            S::conditional(
                E::bool(true, at(3)),
                vec![
                    S::var(
                        "x",
                        T::int(),
                        Some(E::binary(BinaryOp::Add, E::identifier("x", at(4)), E::int(1, at(4)), at(4))),
                        at(4),
                    ),
                    S::ret(Some(E::identifier("x", at(5))), at(5)),
                ],
                vec![],
                at(3),
            ),
            S::ret(Some(E::int(0, at(6))), at(6)),
        ],
    );
    assert_eq!(program.run_int("main("), 5);
}

#[test]
fn void_functions_get_an_implicit_return() {
    let mut program = TestProgram::new();
    program.function(
        "noop",
        &[],
        None,
        vec![S::var("x", T::int(), Some(E::int(1, at(2))), at(2))],
    );
    let context = Context::create();
    let module = program.lower(&context);
    let noop = function_named(&module, "noop(");
    assert!(noop.get_type().get_return_type().is_none());
    Executable::new(&module).void("noop(");
}
