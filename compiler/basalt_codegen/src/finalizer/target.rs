//! Target selection for emitted modules.
//!
//! Target triples follow the format `<arch>-<vendor>-<os>[-<env>]`:
//!
//! - `x86_64-unknown-linux-gnu`: 64-bit Linux with glibc
//! - `aarch64-apple-darwin`: ARM64 macOS
//! - `wasm32-unknown-unknown`: standalone WebAssembly
//!
//! A configured module carries the triple and the data layout of an LLVM
//! target machine built for it. The x86, AArch64, RISC-V and WebAssembly
//! backends are initialized once per process, on first use.

use std::fmt;
use std::sync::Once;

use inkwell::module::Module;
use inkwell::targets::{
    CodeModel, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple,
};
use inkwell::OptimizationLevel;

/// Error type for target configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// The architecture is not one the backend lays out values for.
    UnsupportedTarget {
        triple: String,
        supported: Vec<&'static str>,
    },
    /// The string is not a target triple.
    InvalidTripleFormat { triple: String, reason: String },
    /// LLVM could not build a target machine for the triple.
    TargetMachineCreationFailed(String),
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedTarget { triple, supported } => {
                write!(
                    f,
                    "unsupported target '{triple}'. Supported architectures: {}",
                    supported.join(", ")
                )
            }
            Self::InvalidTripleFormat { triple, reason } => {
                write!(f, "invalid target triple '{triple}': {reason}")
            }
            Self::TargetMachineCreationFailed(msg) => {
                write!(f, "failed to create target machine: {msg}")
            }
        }
    }
}

impl std::error::Error for TargetError {}

/// Architectures with 64-bit pointers, matching the layout rules.
pub const SUPPORTED_ARCHITECTURES: &[&str] = &["x86_64", "aarch64", "riscv64", "wasm64"];

/// Parsed components of a target triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTripleComponents {
    /// CPU architecture (e.g., `x86_64`, `aarch64`)
    pub arch: String,
    /// Hardware vendor (e.g., `unknown`, `apple`, `pc`)
    pub vendor: String,
    /// Operating system (e.g., `linux`, `darwin`, `windows`)
    pub os: String,
    /// Environment/ABI (e.g., `gnu`, `musl`, `msvc`)
    pub env: Option<String>,
}

impl TargetTripleComponents {
    /// Parse `<arch>-<vendor>-<os>[-<env>]`.
    pub fn parse(triple: &str) -> Result<Self, TargetError> {
        let invalid = |reason: &str| TargetError::InvalidTripleFormat {
            triple: triple.to_owned(),
            reason: reason.to_owned(),
        };
        let parts: Vec<&str> = triple.split('-').collect();
        if parts.len() < 3 {
            return Err(invalid(
                "expected at least 3 components: <arch>-<vendor>-<os>",
            ));
        }
        if parts.len() > 4 {
            return Err(invalid("expected at most 4 components"));
        }
        if parts.iter().any(|part| part.is_empty()) {
            return Err(invalid("empty component"));
        }
        Ok(Self {
            arch: parts[0].to_owned(),
            vendor: parts[1].to_owned(),
            os: parts[2].to_owned(),
            env: parts.get(3).map(|env| (*env).to_owned()),
        })
    }
}

impl fmt::Display for TargetTripleComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)?;
        if let Some(env) = &self.env {
            write!(f, "-{env}")?;
        }
        Ok(())
    }
}

/// The target an emitted module is meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    triple: String,
    components: TargetTripleComponents,
}

impl TargetConfig {
    /// The host target, derived from the compiler's own build target.
    pub fn native() -> Result<Self, TargetError> {
        let arch = std::env::consts::ARCH;
        let triple = match std::env::consts::OS {
            "linux" => format!("{arch}-unknown-linux-gnu"),
            "macos" => format!("{arch}-apple-darwin"),
            "windows" => format!("{arch}-pc-windows-msvc"),
            other => format!("{arch}-unknown-{other}"),
        };
        Self::from_triple(&triple)
    }

    /// Validate and parse an explicit triple.
    pub fn from_triple(triple: &str) -> Result<Self, TargetError> {
        let components = TargetTripleComponents::parse(triple)?;
        if !SUPPORTED_ARCHITECTURES.contains(&components.arch.as_str()) {
            return Err(TargetError::UnsupportedTarget {
                triple: triple.to_owned(),
                supported: SUPPORTED_ARCHITECTURES.to_vec(),
            });
        }
        Ok(Self {
            triple: triple.to_owned(),
            components,
        })
    }

    #[must_use]
    pub fn triple(&self) -> &str {
        &self.triple
    }

    #[must_use]
    pub fn components(&self) -> &TargetTripleComponents {
        &self.components
    }

    /// An LLVM target machine for this triple, generic CPU, no optimization.
    pub fn create_target_machine(&self) -> Result<TargetMachine, TargetError> {
        initialize_backends();
        let triple = TargetTriple::create(&self.triple);
        let target = Target::from_triple(&triple)
            .map_err(|err| TargetError::TargetMachineCreationFailed(err.to_string()))?;
        target
            .create_target_machine(
                &triple,
                "generic",
                "",
                OptimizationLevel::None,
                RelocMode::Default,
                CodeModel::Default,
            )
            .ok_or_else(|| {
                TargetError::TargetMachineCreationFailed(format!(
                    "LLVM returned no target machine for '{}'",
                    self.triple
                ))
            })
    }

    /// Stamp the triple and the target data layout on `module`.
    pub fn configure_module(&self, module: &Module<'_>) -> Result<(), TargetError> {
        let machine = self.create_target_machine()?;
        module.set_triple(&machine.get_triple());
        module.set_data_layout(&machine.get_target_data().get_data_layout());
        tracing::debug!(triple = %self.triple, "configured module for target");
        Ok(())
    }
}

fn initialize_backends() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let config = InitializationConfig::default();
        Target::initialize_x86(&config);
        Target::initialize_aarch64(&config);
        Target::initialize_riscv(&config);
        Target::initialize_webassembly(&config);
    });
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
