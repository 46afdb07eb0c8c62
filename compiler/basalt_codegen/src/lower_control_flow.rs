//! Control flow lowering: if/else, while, until, break and continue.
//!
//! ```text
//! if:       cond_br c, then, else    then/else ──▶ exit
//! while:    ──▶ cond ──▶ body ──▶ cond          cond ──▶ exit
//! until:    ──▶ body ──▶ cond ──(false)──▶ body  cond ──(true)──▶ exit
//! ```
//!
//! Branch bodies are lowered by nested lowerers with their own scope frame.
//! A body that ends without a terminator falls through to its successor.

use basalt_ir::{Conditional, DebugInfo, ScopeKind, UntilLoop, WhileLoop};

use crate::error::{InternalError, LowerResult};
use crate::expr_lowerer::{ExprLowerer, LoopTargets};

impl ExprLowerer<'_, '_, '_> {
    pub(crate) fn lower_conditional(&mut self, conditional: &Conditional) -> LowerResult<()> {
        let condition = self.lower_expression(&conditional.condition)?;
        let then_block = self.append_block("if:then");
        let else_block = self.append_block("if:else");
        let exit_block = self.append_block("if:exit");
        self.cx.builder.cond_br(condition.value, then_block, else_block);

        let loop_targets = self.loop_targets;
        self.cx.builder.position_at_end(then_block);
        self.nested(ScopeKind::Conditional, loop_targets)
            .lower_block(&conditional.then_branch)?;
        self.branch_if_open(exit_block);

        self.cx.builder.position_at_end(else_block);
        self.nested(ScopeKind::Conditional, loop_targets)
            .lower_block(&conditional.else_branch)?;
        self.branch_if_open(exit_block);

        self.cx.builder.position_at_end(exit_block);
        Ok(())
    }

    pub(crate) fn lower_while_loop(&mut self, while_loop: &WhileLoop) -> LowerResult<()> {
        let cond_block = self.append_block("while:cond");
        let body_block = self.append_block("while:body");
        let exit_block = self.append_block("while:exit");
        self.cx.builder.br(cond_block);

        self.cx.builder.position_at_end(cond_block);
        let condition = self.lower_expression(&while_loop.condition)?;
        self.cx.builder.cond_br(condition.value, body_block, exit_block);

        self.cx.builder.position_at_end(body_block);
        let targets = LoopTargets {
            entry: cond_block,
            exit: exit_block,
        };
        self.nested(ScopeKind::Loop, Some(targets))
            .lower_block(&while_loop.body)?;
        self.branch_if_open(cond_block);

        self.cx.builder.position_at_end(exit_block);
        Ok(())
    }

    pub(crate) fn lower_until_loop(&mut self, until_loop: &UntilLoop) -> LowerResult<()> {
        let body_block = self.append_block("until:body");
        let cond_block = self.append_block("until:cond");
        let exit_block = self.append_block("until:exit");
        self.cx.builder.br(body_block);

        self.cx.builder.position_at_end(body_block);
        let targets = LoopTargets {
            entry: cond_block,
            exit: exit_block,
        };
        self.nested(ScopeKind::Loop, Some(targets))
            .lower_block(&until_loop.body)?;
        self.branch_if_open(cond_block);

        self.cx.builder.position_at_end(cond_block);
        let condition = self.lower_expression(&until_loop.condition)?;
        let keep_going = self.cx.builder.not(condition.value, "until.again");
        self.cx.builder.cond_br(keep_going, body_block, exit_block);

        self.cx.builder.position_at_end(exit_block);
        Ok(())
    }

    pub(crate) fn lower_break(&mut self, debug: &DebugInfo) -> LowerResult<()> {
        let targets = self.enclosing_loop("break", debug)?;
        self.cx.builder.br(targets.exit);
        Ok(())
    }

    pub(crate) fn lower_continue(&mut self, debug: &DebugInfo) -> LowerResult<()> {
        let targets = self.enclosing_loop("continue", debug)?;
        self.cx.builder.br(targets.entry);
        Ok(())
    }

    fn enclosing_loop(&self, statement: &'static str, debug: &DebugInfo) -> LowerResult<LoopTargets> {
        self.loop_targets
            .ok_or_else(|| InternalError::LoopControlOutsideLoop {
                statement,
                location: debug.to_string(),
            })
    }
}
