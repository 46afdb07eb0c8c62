//! Whole-program lowering and emission.
//!
//! The finalizer is the entry point embedders use:
//!
//! 1. [`Finalizer::lower_module`] lowers every concrete function of the
//!    program into an LLVM module (generic definitions are only reachable
//!    through their specializations) and configures it for the target.
//! 2. [`Finalizer::verify`] runs the LLVM verifier.
//! 3. [`Finalizer::emit`] writes the requested outputs.

mod emit;
mod target;

use std::fmt;
use std::path::PathBuf;

use basalt_ir::{CallableCodeBlock, ProgramRepresentation};
use inkwell::context::Context;
use inkwell::module::Module;
use tracing::instrument;

use crate::context::{CodegenCx, SimpleCx};
use crate::error::InternalError;

pub use emit::{emit_outputs, plan_outputs, EmitError, ObjectEmitter, OutputKind};
pub use target::{TargetConfig, TargetError, TargetTripleComponents, SUPPORTED_ARCHITECTURES};

/// Settings for one lowering run.
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    pub module_name: String,
    pub target: TargetConfig,
    /// Run the LLVM verifier as part of [`Finalizer::lower_module`].
    pub verify: bool,
}

impl CodegenConfig {
    pub fn new(module_name: impl Into<String>, target: TargetConfig) -> Self {
        Self {
            module_name: module_name.into(),
            target,
            verify: true,
        }
    }

    /// Configuration for the host target.
    pub fn native(module_name: impl Into<String>) -> Result<Self, TargetError> {
        Ok(Self::new(module_name, TargetConfig::native()?))
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetConfig) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

/// Error type for [`Finalizer`] operations.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalizeError {
    /// Lowering stopped on an internal error.
    Lowering(InternalError),
    /// The builder recorded type mismatches while lowering.
    MalformedModule { codegen_errors: u32 },
    /// The module could not be configured for its target.
    Target(TargetError),
    /// The LLVM verifier rejected the module.
    Verification(String),
}

impl fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lowering(err) => write!(f, "internal error while lowering: {err}"),
            Self::MalformedModule { codegen_errors } => {
                write!(f, "lowering recorded {codegen_errors} malformed instruction(s)")
            }
            Self::Target(err) => write!(f, "failed to configure target: {err}"),
            Self::Verification(message) => write!(f, "module failed verification: {message}"),
        }
    }
}

impl std::error::Error for FinalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lowering(err) => Some(err),
            Self::Target(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InternalError> for FinalizeError {
    fn from(err: InternalError) -> Self {
        Self::Lowering(err)
    }
}

impl From<TargetError> for FinalizeError {
    fn from(err: TargetError) -> Self {
        Self::Target(err)
    }
}

pub struct Finalizer<'p> {
    program: &'p dyn ProgramRepresentation,
    config: CodegenConfig,
}

impl<'p> Finalizer<'p> {
    pub fn new(program: &'p dyn ProgramRepresentation, config: CodegenConfig) -> Self {
        Self { program, config }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Lower every non-generic function, in registration order, into a
    /// module of `context`.
    #[instrument(skip(self, context), fields(module = %self.config.module_name), level = "debug")]
    pub fn lower_module<'ctx>(&self, context: &'ctx Context) -> Result<Module<'ctx>, FinalizeError> {
        let scx = SimpleCx::new(context, &self.config.module_name);
        {
            let mut cx = CodegenCx::new(self.program, &scx);
            for function in self.program.function_definitions() {
                if function.is_generic() {
                    tracing::debug!(function = %function.unique_string_id(), "skipping generic definition");
                    continue;
                }
                cx.lower_callable(&CallableCodeBlock::Function(function))?;
            }

            let codegen_errors = cx.codegen_error_count();
            if codegen_errors > 0 {
                return Err(FinalizeError::MalformedModule { codegen_errors });
            }
            tracing::debug!(
                callables = cx.lowered_callable_count(),
                tags = cx.tags().len(),
                "module lowered"
            );
        }

        let module = scx.into_module();
        self.config.target.configure_module(&module)?;
        if self.config.verify {
            self.verify(&module)?;
        }
        Ok(module)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn verify(&self, module: &Module<'_>) -> Result<(), FinalizeError> {
        module.verify().map_err(|message| {
            let message = message.to_string();
            tracing::error!(%message, "module failed verification");
            FinalizeError::Verification(message)
        })
    }

    /// Write `module` to `outputs`, rendering assembly and object code
    /// through `emitter`.
    #[instrument(skip(self, module, emitter), level = "debug")]
    pub fn emit(
        &self,
        module: &Module<'_>,
        outputs: &[PathBuf],
        emitter: &ObjectEmitter,
    ) -> Result<(), EmitError> {
        let requested = self.config.target.triple();
        let available = emitter.config().triple();
        if requested != available {
            tracing::warn!(requested, available, "emitter triple differs from configuration");
        }
        emit_outputs(module, outputs, emitter)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
