//! Branches, select and returns for `IrBuilder`.

use super::IrBuilder;
use crate::value_id::{BlockId, ValueId};

impl IrBuilder<'_, '_> {
    pub fn br(&mut self, dest: BlockId) {
        let bb = self.arena.get_block(dest);
        self.builder
            .build_unconditional_branch(bb)
            .expect("build_br");
    }

    /// Defensive: a non-integer `cond` records a codegen error and branches
    /// to `else_bb` unconditionally.
    pub fn cond_br(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId) {
        let raw = self.arena.get_value(cond);
        if !raw.is_int_value() {
            tracing::error!(val_type = ?raw.get_type(), "cond_br on non-int, branching to else");
            self.record_codegen_error();
            self.br(else_bb);
            return;
        }
        let then_block = self.arena.get_block(then_bb);
        let else_block = self.arena.get_block(else_bb);
        self.builder
            .build_conditional_branch(raw.into_int_value(), then_block, else_block)
            .expect("build_cond_br");
    }

    /// Defensive: a non-integer `cond` records a codegen error and yields
    /// `else_val`.
    pub fn select(
        &mut self,
        cond: ValueId,
        then_val: ValueId,
        else_val: ValueId,
        name: &str,
    ) -> ValueId {
        let raw = self.arena.get_value(cond);
        if !raw.is_int_value() {
            tracing::error!(val_type = ?raw.get_type(), "select on non-int cond, returning else");
            self.record_codegen_error();
            return else_val;
        }
        let t = self.arena.get_value(then_val);
        let e = self.arena.get_value(else_val);
        let v = self
            .builder
            .build_select(raw.into_int_value(), t, e, name)
            .expect("select");
        self.arena.push_value(v)
    }

    pub fn ret(&mut self, val: ValueId) {
        let v = self.arena.get_value(val);
        self.builder.build_return(Some(&v)).expect("build_return");
    }

    pub fn ret_void(&mut self) {
        self.builder.build_return(None).expect("build_return");
    }

    pub fn unreachable(&mut self) {
        self.builder.build_unreachable().expect("build_unreachable");
    }
}
