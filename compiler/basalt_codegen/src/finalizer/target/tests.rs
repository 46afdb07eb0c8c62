use inkwell::context::Context;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parses_three_and_four_component_triples() {
    let linux = TargetTripleComponents::parse("x86_64-unknown-linux-gnu").unwrap();
    assert_eq!(linux.arch, "x86_64");
    assert_eq!(linux.vendor, "unknown");
    assert_eq!(linux.os, "linux");
    assert_eq!(linux.env.as_deref(), Some("gnu"));

    let mac = TargetTripleComponents::parse("aarch64-apple-darwin").unwrap();
    assert_eq!(mac.os, "darwin");
    assert_eq!(mac.env, None);
}

#[test]
fn display_restores_the_triple() {
    for triple in ["x86_64-unknown-linux-gnu", "aarch64-apple-darwin"] {
        assert_eq!(TargetTripleComponents::parse(triple).unwrap().to_string(), triple);
    }
}

#[test]
fn malformed_triples_are_rejected() {
    for triple in ["x86_64", "x86_64-linux", "a-b-c-d-e", "x86_64--linux", ""] {
        assert!(
            matches!(
                TargetTripleComponents::parse(triple),
                Err(TargetError::InvalidTripleFormat { .. })
            ),
            "{triple}"
        );
    }
}

#[test]
fn only_64_bit_architectures_are_supported() {
    let Err(err) = TargetConfig::from_triple("i686-unknown-linux-gnu") else {
        panic!("i686 must be rejected");
    };
    assert_eq!(
        err,
        TargetError::UnsupportedTarget {
            triple: "i686-unknown-linux-gnu".to_owned(),
            supported: SUPPORTED_ARCHITECTURES.to_vec(),
        }
    );
    let config = TargetConfig::from_triple("wasm64-unknown-unknown").unwrap();
    assert_eq!(config.triple(), "wasm64-unknown-unknown");
    assert_eq!(config.components().arch, "wasm64");
}

#[test]
fn errors_name_the_offending_triple() {
    let err = TargetConfig::from_triple("armv7-unknown-linux-gnueabihf").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported target 'armv7-unknown-linux-gnueabihf'. Supported architectures: \
         x86_64, aarch64, riscv64, wasm64"
    );
    let err = TargetTripleComponents::parse("x86_64").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid target triple 'x86_64': expected at least 3 components: <arch>-<vendor>-<os>"
    );
}

#[test]
fn native_target_matches_the_host_when_supported() {
    match TargetConfig::native() {
        Ok(config) => assert_eq!(config.components().arch, std::env::consts::ARCH),
        Err(err) => assert!(matches!(err, TargetError::UnsupportedTarget { .. })),
    }
}

#[test]
fn configured_modules_carry_the_triple_and_a_data_layout() {
    let context = Context::create();
    let module = context.create_module("configured");
    let config = TargetConfig::from_triple("aarch64-apple-darwin").unwrap();
    config.configure_module(&module).unwrap();

    assert_eq!(module.get_triple().as_str().to_string_lossy(), "aarch64-apple-darwin");
    assert!(!module.get_data_layout().as_str().to_string_lossy().is_empty());
}

#[test]
fn every_supported_architecture_gets_a_target_machine() {
    for triple in [
        "x86_64-unknown-linux-gnu",
        "aarch64-unknown-linux-gnu",
        "riscv64-unknown-linux-gnu",
        "wasm64-unknown-unknown",
    ] {
        let config = TargetConfig::from_triple(triple).unwrap();
        assert!(config.create_target_machine().is_ok(), "{triple}");
    }
}

#[test]
fn machine_creation_failures_display_the_llvm_message() {
    let err = TargetError::TargetMachineCreationFailed("no such target".to_owned());
    assert_eq!(err.to_string(), "failed to create target machine: no such target");
}
