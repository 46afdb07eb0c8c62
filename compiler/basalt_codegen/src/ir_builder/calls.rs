//! Direct calls for `IrBuilder`.

use inkwell::values::BasicMetadataValueEnum;

use super::IrBuilder;
use crate::value_id::{FunctionId, ValueId};

impl<'ctx> IrBuilder<'_, 'ctx> {
    /// A direct call. `None` for void callees.
    pub fn call(&mut self, callee: FunctionId, args: &[ValueId], name: &str) -> Option<ValueId> {
        let func = self.arena.get_function(callee);
        let arg_vals: Vec<BasicMetadataValueEnum<'ctx>> = args
            .iter()
            .map(|&id| self.arena.get_value(id).into())
            .collect();
        let call_val = self
            .builder
            .build_call(func, &arg_vals, name)
            .expect("call");
        call_val
            .try_as_basic_value()
            .basic()
            .map(|v| self.arena.push_value(v))
    }
}
