//! Code generation for type-checked Basalt programs.
//!
//! Lowers the source-level program model of `basalt_ir` into an LLVM module
//! through `inkwell`. One [`CodegenCx`] session owns the ID-based
//! [`IrBuilder`] and every cache (layouts, union tags, lowered callables);
//! the expression lowerer and the callable lowerer share it by `&mut`.
//!
//! # Architecture
//!
//! ```text
//! Finalizer
//!   └── CodegenCx::lower_callable       (callables.rs)
//!         ├── concrete functions        (callables/function.rs)
//!         ├── CFA dispatch              (callables/dispatch.rs)
//!         ├── pow / is / as helpers     (callables/builtins.rs)
//!         └── ExprLowerer               (expr_lowerer.rs)
//!               ├── lower_statements.rs     declarations, assignment, return
//!               ├── lower_control_flow.rs   if, while, until, break, continue
//!               ├── lower_literals.rs       literals and identifiers
//!               ├── lower_operators.rs      binary, unary, is / as
//!               ├── lower_accesses.rs       field and index access
//!               └── lower_calls.rs          function calls
//! ```
//!
//! Supporting modules: [`ir_builder`] wraps inkwell's builder behind
//! `Copy` ids from [`value_id`], [`type_layout`] maps type signatures to IR types,
//! [`tags`] interns union tags, [`cast`] implements implicit conversions and
//! [`scope`] tracks storage for named objects.

mod callables;
pub mod cast;
mod context;
pub mod error;
mod expr_lowerer;
pub mod finalizer;
#[allow(
    clippy::expect_used,
    reason = "inkwell builder API returns Result for every LLVM instruction"
)]
pub mod ir_builder;
mod lower_accesses;
mod lower_calls;
mod lower_control_flow;
mod lower_literals;
mod lower_operators;
mod lower_statements;
pub mod scope;
pub mod tags;
pub mod translated;
pub mod type_layout;
pub mod value_id;

pub use cast::CastStrategy;
pub use context::{CodegenCx, SimpleCx};
pub use error::{InternalError, LowerResult};
pub use expr_lowerer::{ExprLowerer, LoopTargets};
pub use finalizer::{
    CodegenConfig, EmitError, FinalizeError, Finalizer, ObjectEmitter, OutputKind, TargetConfig,
    TargetError, TargetTripleComponents,
};
pub use ir_builder::IrBuilder;
pub use scope::{StorageHandle, TranslationScope};
pub use tags::TagRegistry;
pub use translated::TranslatedExpression;
pub use value_id::{BlockId, FunctionId, LLVMTypeId, ValueId};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and nothing after the first call.
///
/// ```text
/// RUST_LOG=basalt_codegen=debug       # callables, dispatch, finalizer passes
/// RUST_LOG=basalt_codegen=trace       # every cast and statement
/// RUST_LOG=basalt_codegen::ir_builder=error   # operand kind mismatches
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
