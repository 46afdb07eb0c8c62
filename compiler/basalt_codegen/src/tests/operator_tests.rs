use basalt_ir::{BinaryOp, Expression as E, Statement as S, TypeOp, TypeSignature as T, UnaryOp};
use inkwell::context::Context;
use inkwell::values::InstructionOpcode;
use pretty_assertions::assert_eq;

use super::helper::{at, count, function_ir, functions_starting_with, Executable, TestProgram};

/// A program whose `main` returns `value`.
fn returning(ty: T, value: E) -> TestProgram {
    let mut program = TestProgram::new();
    program.function("main", &[], Some(ty), vec![S::ret(Some(value), at(2))]);
    program
}

fn bin(op: BinaryOp, left: E, right: E) -> E {
    E::binary(op, left, right, at(2))
}

fn int(value: i64) -> E {
    E::int(value, at(2))
}

fn float(value: f64) -> E {
    E::float(value, at(2))
}

fn boolean(value: bool) -> E {
    E::bool(value, at(2))
}

#[test]
fn integer_arithmetic() {
    let cases = [
        (bin(BinaryOp::Add, int(2), int(3)), 5),
        (bin(BinaryOp::Sub, int(2), int(3)), -1),
        (bin(BinaryOp::Mul, int(6), int(7)), 42),
        (bin(BinaryOp::Div, int(17), int(5)), 3),
        (bin(BinaryOp::Mod, int(17), int(5)), 2),
        (bin(BinaryOp::Div, int(-7), int(2)), -3),
    ];
    for (expr, expected) in cases {
        assert_eq!(returning(T::int(), expr).run_int("main("), expected);
    }
}

#[test]
fn float_arithmetic() {
    let expr = bin(
        BinaryOp::Div,
        bin(BinaryOp::Mul, bin(BinaryOp::Sub, float(7.5), float(1.5)), float(2.0)),
        float(4.0),
    );
    assert_eq!(returning(T::float(), expr).run_float("main("), 3.0);
}

/// A `main` comparing two variables, so the comparison survives folding.
fn comparing(ty: T, op: BinaryOp, left: E, right: E) -> TestProgram {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::bool()),
        vec![
            S::var("l", ty.clone(), Some(left), at(2)),
            S::var("r", ty, Some(right), at(3)),
            S::ret(
                Some(E::binary(
                    op,
                    E::identifier("l", at(4)),
                    E::identifier("r", at(4)),
                    at(4),
                )),
                at(4),
            ),
        ],
    );
    program
}

#[test]
fn comparisons_pick_predicates_by_operand_type() {
    let program = comparing(T::int(), BinaryOp::LessEq, int(3), int(5));
    let context = Context::create();
    let module = program.lower(&context);
    assert_eq!(count(&module, "main(", InstructionOpcode::ICmp), 1);
    assert!(function_ir(&module, "main(").contains("icmp sle i64"));
    assert!(Executable::new(&module).bool("main("));

    let program = comparing(T::float(), BinaryOp::Greater, float(0.5), float(1.5));
    let context = Context::create();
    let module = program.lower(&context);
    assert_eq!(count(&module, "main(", InstructionOpcode::FCmp), 1);
    assert!(function_ir(&module, "main(").contains("fcmp ugt double"));
    assert!(!Executable::new(&module).bool("main("));

    let chars = bin(BinaryOp::Less, E::char(b'a', at(2)), E::char(b'b', at(2)));
    assert!(returning(T::bool(), chars).run_bool("main("));
}

#[test]
fn logical_operators_on_booleans() {
    let cases = [
        (bin(BinaryOp::And, boolean(true), boolean(false)), false),
        (bin(BinaryOp::Or, boolean(true), boolean(false)), true),
        (bin(BinaryOp::Xor, boolean(true), boolean(true)), false),
        (bin(BinaryOp::Equal, boolean(false), boolean(false)), true),
    ];
    for (expr, expected) in cases {
        assert_eq!(returning(T::bool(), expr).run_bool("main("), expected);
    }
}

#[test]
fn logical_operators_reject_integers() {
    let program = returning(T::int(), bin(BinaryOp::And, int(1), int(2)));
    let context = Context::create();
    assert!(program.try_lower(&context).is_err());
}

#[test]
fn pow_on_integers() {
    let program = returning(T::int(), bin(BinaryOp::Pow, int(2), int(10)));
    let context = Context::create();
    let module = program.lower(&context);
    assert_eq!(count(&module, "main(", InstructionOpcode::Call), 1);
    assert_eq!(Executable::new(&module).int("main("), 1024);

    assert_eq!(returning(T::int(), bin(BinaryOp::Pow, int(2), int(-1))).run_int("main("), 0);
    assert_eq!(returning(T::int(), bin(BinaryOp::Pow, int(7), int(0))).run_int("main("), 1);
}

#[test]
fn pow_on_floats() {
    let program = returning(T::float(), bin(BinaryOp::Pow, float(2.0), float(-2.0)));
    assert_eq!(program.run_float("main("), 0.25);

    let program = returning(T::float(), bin(BinaryOp::Pow, float(1.5), float(2.0)));
    assert_eq!(program.run_float("main("), 2.25);
}

#[test]
fn pow_float_clamps_the_most_negative_exponent() {
    let program = returning(T::float(), bin(BinaryOp::Pow, float(2.0), float(-3.0)));
    let context = Context::create();
    let module = program.lower(&context);

    // One select picks i64::MAX when negating the truncated exponent would wrap.
    assert_eq!(count(&module, "__basalt_pow_float", InstructionOpcode::Select), 1);
    let ir = function_ir(&module, "__basalt_pow_float");
    assert!(ir.contains("icmp eq i64 %truncated, -9223372036854775808"), "{ir}");
    assert!(ir.contains("i64 9223372036854775807"), "{ir}");

    assert_eq!(Executable::new(&module).float("main("), 0.125);
}

#[test]
fn pow_helper_is_shared_between_call_sites() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![S::ret(
            Some(bin(
                BinaryOp::Add,
                bin(BinaryOp::Pow, int(2), int(3)),
                bin(BinaryOp::Pow, int(3), int(2)),
            )),
            at(2),
        )],
    );
    let context = Context::create();
    let module = program.lower(&context);
    assert_eq!(functions_starting_with(&module, "__basalt_pow_int"), 1);
    assert_eq!(Executable::new(&module).int("main("), 17);
}

#[test]
fn unary_operators() {
    let program = returning(T::int(), E::unary(UnaryOp::Minus, int(5), at(2)));
    assert_eq!(program.run_int("main("), -5);

    let program = returning(T::int(), E::unary(UnaryOp::Plus, int(5), at(2)));
    assert_eq!(program.run_int("main("), 5);

    let program = returning(T::float(), E::unary(UnaryOp::Minus, float(2.5), at(2)));
    assert_eq!(program.run_float("main("), -2.5);

    let program = returning(T::bool(), E::unary(UnaryOp::Not, boolean(true), at(2)));
    assert!(!program.run_bool("main("));
}

#[test]
fn increment_yields_a_value_without_storing() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::var("x", T::int(), Some(int(4)), at(2)),
            S::var(
                "y",
                T::int(),
                Some(E::unary(UnaryOp::Increment, E::identifier("x", at(3)), at(3))),
                at(3),
            ),
            S::ret(
                Some(bin(
                    BinaryOp::Mul,
                    E::identifier("x", at(4)),
                    E::unary(UnaryOp::Decrement, E::identifier("y", at(4)), at(4)),
                )),
                at(4),
            ),
        ],
    );
    // x stays 4, y is 5, --y is 4.
    assert_eq!(program.run_int("main("), 16);
}

#[test]
fn is_on_a_plain_type_folds_to_a_constant() {
    let program = returning(
        T::bool(),
        E::type_operator(TypeOp::Is, int(3), T::int(), at(2)),
    );
    let context = Context::create();
    let module = program.lower(&context);
    assert_eq!(count(&module, "main(", InstructionOpcode::Call), 0);
    assert!(Executable::new(&module).bool("main("));

    let program = returning(
        T::bool(),
        E::type_operator(TypeOp::Is, int(3), T::float(), at(2)),
    );
    assert!(!program.run_bool("main("));
}

#[test]
fn address_of_and_deref() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::int()),
        vec![
            S::var("x", T::int(), Some(int(3)), at(2)),
            S::var(
                "p",
                T::pointer(T::int()),
                Some(E::unary(UnaryOp::AddressOf, E::identifier("x", at(3)), at(3))),
                at(3),
            ),
            S::assign(
                E::unary(UnaryOp::Deref, E::identifier("p", at(4)), at(4)),
                int(11),
                at(4),
            ),
            S::ret(Some(E::identifier("x", at(5))), at(5)),
        ],
    );
    assert_eq!(program.run_int("main("), 11);
}

#[test]
fn pointer_equality() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        Some(T::bool()),
        vec![
            S::var("x", T::int(), Some(int(3)), at(2)),
            S::var("y", T::int(), Some(int(3)), at(3)),
            S::ret(
                Some(bin(
                    BinaryOp::NotEqual,
                    E::unary(UnaryOp::AddressOf, E::identifier("x", at(4)), at(4)),
                    E::unary(UnaryOp::AddressOf, E::identifier("y", at(4)), at(4)),
                )),
                at(4),
            ),
        ],
    );
    assert!(program.run_bool("main("));
}
