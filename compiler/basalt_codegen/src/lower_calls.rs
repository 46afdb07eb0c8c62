//! Function call lowering.

use basalt_ir::FunctionCall;

use crate::error::{InternalError, LowerResult};
use crate::expr_lowerer::ExprLowerer;
use crate::translated::TranslatedExpression;

impl ExprLowerer<'_, '_, '_> {
    /// Resolve, lower (once) and call the target of `call`.
    ///
    /// Arguments are lowered left to right and converted to the parameter
    /// types of the resolved callable. Returns `None` for void callees.
    pub(crate) fn lower_call(
        &mut self,
        call: &FunctionCall,
    ) -> LowerResult<Option<TranslatedExpression>> {
        let callable = self
            .cx
            .program
            .resolve_function_call(call, self.raw_scope())
            .ok_or_else(|| InternalError::CallResolution {
                function: call.function_name.clone(),
                location: call.debug.to_string(),
            })?;
        let param_types = callable.arg_types();
        if param_types.len() != call.arguments.len() {
            return Err(InternalError::CallResolution {
                function: format!(
                    "{} (expects {} arguments, got {})",
                    call.function_name,
                    param_types.len(),
                    call.arguments.len()
                ),
                location: call.debug.to_string(),
            });
        }

        let function = self.cx.lower_callable(&callable)?;
        let mut args = Vec::with_capacity(call.arguments.len());
        for (argument, param_ty) in call.arguments.iter().zip(&param_types) {
            args.push(self.lower_converted(argument, param_ty)?.value);
        }
        tracing::trace!(callee = %callable.unique_name(), at = %call.debug, "call");
        Ok(self
            .cx
            .builder
            .call(function, &args, &call.function_name)
            .map(TranslatedExpression::value))
    }
}
