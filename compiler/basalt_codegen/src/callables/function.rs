//! Concrete function bodies.

use basalt_ir::{FunctionDefinition, RawScope};

use crate::context::CodegenCx;
use crate::error::{InternalError, LowerResult};
use crate::expr_lowerer::ExprLowerer;
use crate::scope::{StorageHandle, TranslationScope};
use crate::value_id::FunctionId;

impl CodegenCx<'_, '_> {
    /// Spill every parameter into a named slot, then lower the body.
    pub(super) fn define_function(
        &mut self,
        function: FunctionId,
        definition: &FunctionDefinition,
    ) -> LowerResult<()> {
        let entry = self.builder.append_block(function, "entry");
        self.builder.position_at_end(entry);

        let mut scope = TranslationScope::new(RawScope::for_function(definition));
        for (index, argument) in definition.arguments.iter().enumerate() {
            let index = u32::try_from(index).map_err(|_| {
                InternalError::unreachable(format!(
                    "'{}' has too many parameters",
                    definition.unique_string_id()
                ))
            })?;
            let param = self.builder.get_param(function, index);
            self.builder.set_value_name(param, &argument.name);
            let layout = self.layout_of(&argument.ty)?;
            let address = self.builder.alloca(layout, &format!("{}.addr", argument.name));
            self.builder.store(param, address);
            scope.bind_argument(&argument.name, StorageHandle { address, layout })?;
        }

        let mut lowerer = ExprLowerer::new(self, function, scope, definition.return_type.clone());
        lowerer.lower_block(&definition.code)?;
        lowerer.finish_function();
        Ok(())
    }
}
