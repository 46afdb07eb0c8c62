use basalt_ir::{Expression as E, Statement as S, TypeSignature as T};
use pretty_assertions::assert_eq;

use super::*;
use crate::tests::helper::{at, TestProgram, TRIPLE};

fn answer_program() -> TestProgram {
    let mut program = TestProgram::new();
    program.function("main", &[], Some(T::int()), vec![S::ret(Some(E::int(42, at(2))), at(2))]);
    program
}

fn target(triple: &str) -> TargetConfig {
    TargetConfig::from_triple(triple).unwrap()
}

#[test]
fn config_defaults_to_verifying() {
    let config = CodegenConfig::new("demo", target(TRIPLE));
    assert!(config.verify);
    assert_eq!(config.module_name, "demo");
    assert!(!config.with_verify(false).verify);
}

#[test]
fn lowered_module_carries_the_target_triple() {
    let program = answer_program();
    let config = CodegenConfig::new("demo", target("aarch64-apple-darwin"));
    let context = Context::create();
    let module = Finalizer::new(&program.registry, config)
        .lower_module(&context)
        .unwrap();

    assert_eq!(module.get_name().to_string_lossy(), "demo");
    assert_eq!(module.get_triple().as_str().to_string_lossy(), "aarch64-apple-darwin");
    let ir = module.print_to_string().to_string();
    assert!(ir.contains("target triple = \"aarch64-apple-darwin\""), "{ir}");
    assert!(ir.contains("target datalayout = "), "{ir}");
}

#[test]
fn with_target_replaces_the_triple() {
    let program = answer_program();
    let config = CodegenConfig::new("demo", target(TRIPLE)).with_target(target("riscv64-unknown-linux-gnu"));
    let finalizer = Finalizer::new(&program.registry, config);
    assert_eq!(finalizer.config().target.triple(), "riscv64-unknown-linux-gnu");
    let context = Context::create();
    let module = finalizer.lower_module(&context).unwrap();
    assert_eq!(module.get_triple().as_str().to_string_lossy(), "riscv64-unknown-linux-gnu");
}

#[test]
fn empty_program_lowers_to_an_empty_module() {
    let program = TestProgram::new();
    let context = Context::create();
    let module = program.lower(&context);
    assert_eq!(module.get_functions().count(), 0);
}

#[test]
fn verify_reports_unterminated_blocks() {
    let program = TestProgram::new();
    let finalizer = Finalizer::new(&program.registry, CodegenConfig::new("demo", target(TRIPLE)));

    let context = Context::create();
    let module = context.create_module("broken");
    let function = module.add_function("dangling", context.void_type().fn_type(&[], false), None);
    context.append_basic_block(function, "entry");

    let Err(FinalizeError::Verification(message)) = finalizer.verify(&module) else {
        panic!("a block without terminator must fail verification");
    };
    assert!(message.contains("does not have terminator"), "{message}");
    assert!(message.contains("dangling"), "{message}");
}

#[test]
fn lowering_errors_surface_through_the_finalizer() {
    let mut program = TestProgram::new();
    program.function(
        "main",
        &[],
        None,
        vec![S::call("nowhere", vec![], at(3))],
    );
    let context = Context::create();
    let Err(err) = program.try_lower(&context) else {
        panic!("calling an unknown function must fail");
    };
    assert!(matches!(
        err,
        FinalizeError::Lowering(InternalError::CallResolution { .. })
    ));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn target_errors_convert_and_keep_their_source() {
    let err: FinalizeError = TargetError::TargetMachineCreationFailed("nope".to_owned()).into();
    assert_eq!(
        err.to_string(),
        "failed to configure target: failed to create target machine: nope"
    );
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn emit_writes_ir_even_for_a_different_emitter_triple() {
    let program = answer_program();
    let finalizer = Finalizer::new(&program.registry, CodegenConfig::new("demo", target(TRIPLE)));
    let context = Context::create();
    let module = finalizer.lower_module(&context).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.ll");
    let emitter = ObjectEmitter::new(&target("aarch64-apple-darwin")).unwrap();
    finalizer.emit(&module, &[path.clone()], &emitter).unwrap();

    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.contains(&format!("target triple = \"{TRIPLE}\"")));
    assert!(written.contains("define i64 @\"main(main.bt@1000:1)\"()"), "{written}");
}

#[test]
fn emit_produces_an_object_file() {
    let program = answer_program();
    let finalizer = Finalizer::new(&program.registry, CodegenConfig::new("demo", target(TRIPLE)));
    let context = Context::create();
    let module = finalizer.lower_module(&context).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.o");
    let emitter = ObjectEmitter::new(&target(TRIPLE)).unwrap();
    finalizer.emit(&module, &[path.clone()], &emitter).unwrap();

    assert!(!std::fs::read(path).unwrap().is_empty());
}
