//! Callable lowering: one emitted function per callable unique name.
//!
//! A callable is declared and entered into the cache before its body is
//! lowered. A recursive call then finds the declaration, so every callable
//! is lowered at most once. The builder's insertion point is saved around
//! each body so callers resume exactly where they were.

mod builtins;
mod dispatch;
mod function;

use basalt_ir::CallableCodeBlock;
use tracing::instrument;

use crate::context::CodegenCx;
use crate::error::LowerResult;
use crate::value_id::FunctionId;

impl CodegenCx<'_, '_> {
    /// The emitted function for `callable`, lowering it on first use.
    #[instrument(skip(self, callable), fields(callable = %callable.unique_name()), level = "debug")]
    pub fn lower_callable(&mut self, callable: &CallableCodeBlock) -> LowerResult<FunctionId> {
        let unique_name = callable.unique_name();
        if let Some(&function) = self.callables.get(&unique_name) {
            return Ok(function);
        }
        let function = self.declare_callable(callable, &unique_name)?;

        let saved = self.builder.save_position();
        let defined = match callable {
            CallableCodeBlock::Function(definition) => self.define_function(function, definition),
            CallableCodeBlock::Adoption(descriptor) => self.define_dispatch(function, descriptor),
            CallableCodeBlock::Builtin(builtin) => self.define_builtin(function, builtin),
        };
        self.builder.restore_position(saved);
        defined?;

        tracing::debug!(
            function = %unique_name,
            ir = %self.builder.function_name(function),
            "lowered callable"
        );
        Ok(function)
    }

    /// Declare the IR signature of `callable` and cache it.
    fn declare_callable(
        &mut self,
        callable: &CallableCodeBlock,
        unique_name: &str,
    ) -> LowerResult<FunctionId> {
        let mut params = Vec::new();
        for ty in callable.arg_types() {
            params.push(self.layout_of(&ty)?);
        }
        let ret = self.return_layout(callable.return_type().as_ref())?;
        let function = match ret {
            Some(ret) => self.builder.declare_function(unique_name, &params, ret),
            None => self.builder.declare_void_function(unique_name, &params),
        };
        self.callables.insert(unique_name.to_owned(), function);
        Ok(function)
    }
}
