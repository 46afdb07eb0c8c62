//! Writing a finished module to disk.
//!
//! ```text
//! ┌─────────────┐    ┌──────────────────────┐    ┌──────────────┐
//! │   Module    │───▶│ .ll: module printer  │───▶│ textual IR   │
//! │             │───▶│ .s / .o: LLVM target │───▶│ asm / object │
//! └─────────────┘    └──────────────────────┘    └──────────────┘
//! ```
//!
//! The output kind of each path comes from its extension. Every path is
//! classified and checked, and every output rendered in memory, before
//! anything is written. A write that fails part way removes the files
//! already written, so a failed request leaves no partial output behind.

use std::fmt;
use std::path::{Path, PathBuf};

use inkwell::module::Module;
use inkwell::targets::{FileType, TargetMachine};

use super::target::{TargetConfig, TargetError};

/// Error type for module emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// The target could not be configured.
    TargetMachine(TargetError),
    /// Output path is not valid.
    InvalidPath { path: String, reason: String },
    /// Failed to write textual IR.
    IrEmission { path: String, message: String },
    /// Failed to emit assembly.
    AssemblyEmission { path: String, message: String },
    /// Failed to emit an object file.
    ObjectEmission { path: String, message: String },
    /// Two requested outputs have the same kind.
    DuplicateOutputKind {
        kind: OutputKind,
        first: String,
        second: String,
    },
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetMachine(err) => write!(f, "failed to configure target: {err}"),
            Self::InvalidPath { path, reason } => {
                write!(f, "invalid output path '{path}': {reason}")
            }
            Self::IrEmission { path, message } => {
                write!(f, "failed to emit IR file '{path}': {message}")
            }
            Self::AssemblyEmission { path, message } => {
                write!(f, "failed to emit assembly file '{path}': {message}")
            }
            Self::ObjectEmission { path, message } => {
                write!(f, "failed to emit object file '{path}': {message}")
            }
            Self::DuplicateOutputKind {
                kind,
                first,
                second,
            } => write!(
                f,
                "'{first}' and '{second}' both request {} output",
                kind.description()
            ),
        }
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TargetMachine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TargetError> for EmitError {
    fn from(err: TargetError) -> Self {
        Self::TargetMachine(err)
    }
}

/// What an output path asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Textual IR (`.ll`).
    Ir,
    /// Assembly text (`.s`, `.asm`).
    Assembly,
    /// Native object file (`.o`, `.obj`).
    Object,
}

impl OutputKind {
    /// Classify `path` by its extension.
    pub fn from_path(path: &Path) -> Result<Self, EmitError> {
        let extension = path.extension().and_then(|ext| ext.to_str());
        match extension {
            Some("ll") => Ok(Self::Ir),
            Some("s" | "asm") => Ok(Self::Assembly),
            Some("o" | "obj") => Ok(Self::Object),
            _ => Err(EmitError::InvalidPath {
                path: path.to_string_lossy().into_owned(),
                reason: "expected a .ll, .s, .asm, .o or .obj extension".to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Ir => "textual IR",
            Self::Assembly => "assembly",
            Self::Object => "object",
        }
    }
}

/// Renders modules for one target through an LLVM target machine.
pub struct ObjectEmitter {
    machine: TargetMachine,
    config: TargetConfig,
}

impl ObjectEmitter {
    pub fn new(config: &TargetConfig) -> Result<Self, EmitError> {
        Ok(Self {
            machine: config.create_target_machine()?,
            config: config.clone(),
        })
    }

    pub fn native() -> Result<Self, EmitError> {
        Self::new(&TargetConfig::native()?)
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// The bytes of one output of `kind` for `module`. `path` only names
    /// the output in errors.
    pub fn render(
        &self,
        module: &Module<'_>,
        kind: OutputKind,
        path: &Path,
    ) -> Result<Vec<u8>, EmitError> {
        let path_str = || path.to_string_lossy().into_owned();
        match kind {
            OutputKind::Ir => Ok(module.print_to_string().to_bytes().to_vec()),
            OutputKind::Assembly => self
                .machine
                .write_to_memory_buffer(module, FileType::Assembly)
                .map(|buffer| buffer.as_slice().to_vec())
                .map_err(|err| EmitError::AssemblyEmission {
                    path: path_str(),
                    message: err.to_string(),
                }),
            OutputKind::Object => self
                .machine
                .write_to_memory_buffer(module, FileType::Object)
                .map(|buffer| buffer.as_slice().to_vec())
                .map_err(|err| EmitError::ObjectEmission {
                    path: path_str(),
                    message: err.to_string(),
                }),
        }
    }
}

impl fmt::Debug for ObjectEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectEmitter")
            .field("triple", &self.config.triple())
            .finish_non_exhaustive()
    }
}

/// Validate that the parent directory exists for an output path.
fn validate_parent_exists(path: &Path) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(EmitError::InvalidPath {
                path: path.to_string_lossy().into_owned(),
                reason: "parent directory does not exist".to_owned(),
            });
        }
    }
    Ok(())
}

/// Classify every output and reject duplicate kinds.
pub fn plan_outputs(outputs: &[PathBuf]) -> Result<Vec<(OutputKind, &Path)>, EmitError> {
    let mut planned: Vec<(OutputKind, &Path)> = Vec::with_capacity(outputs.len());
    for path in outputs {
        let kind = OutputKind::from_path(path)?;
        if let Some((_, first)) = planned.iter().find(|(seen, _)| *seen == kind) {
            return Err(EmitError::DuplicateOutputKind {
                kind,
                first: first.to_string_lossy().into_owned(),
                second: path.to_string_lossy().into_owned(),
            });
        }
        validate_parent_exists(path)?;
        planned.push((kind, path.as_path()));
    }
    Ok(planned)
}

/// Write `module` to every path in `outputs`.
pub fn emit_outputs(
    module: &Module<'_>,
    outputs: &[PathBuf],
    emitter: &ObjectEmitter,
) -> Result<(), EmitError> {
    let planned = plan_outputs(outputs)?;
    let mut rendered = Vec::with_capacity(planned.len());
    for (kind, path) in planned {
        rendered.push((kind, path, emitter.render(module, kind, path)?));
    }

    let mut written: Vec<&Path> = Vec::with_capacity(rendered.len());
    for (kind, path, bytes) in rendered {
        tracing::debug!(kind = kind.description(), path = %path.display(), "emitting");
        if let Err(err) = std::fs::write(path, bytes) {
            remove_written(&written);
            return Err(write_error(kind, path, &err));
        }
        written.push(path);
    }
    Ok(())
}

fn remove_written(written: &[&Path]) {
    for path in written {
        if let Err(err) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), %err, "could not remove partial output");
        }
    }
}

fn write_error(kind: OutputKind, path: &Path, err: &std::io::Error) -> EmitError {
    let path = path.to_string_lossy().into_owned();
    let message = err.to_string();
    match kind {
        OutputKind::Ir => EmitError::IrEmission { path, message },
        OutputKind::Assembly => EmitError::AssemblyEmission { path, message },
        OutputKind::Object => EmitError::ObjectEmission { path, message },
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
