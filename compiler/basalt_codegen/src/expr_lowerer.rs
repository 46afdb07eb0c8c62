//! Expression and statement lowering coordinator.
//!
//! `ExprLowerer` holds the per-body configuration (function, scope, return
//! type, loop targets) and borrows the session. Each expression and
//! statement kind is lowered by a focused `lower_*` method implemented in a
//! sibling file.
//!
//! Conditionals and loops lower their bodies through a nested lowerer: a
//! copy of the configuration with a fresh scope frame, reborrowing the same
//! session.

use basalt_ir::{ExprKind, Expression, RawScope, ScopeKind, Statement, TypeSignature};

use crate::context::CodegenCx;
use crate::error::{InternalError, LowerResult};
use crate::scope::TranslationScope;
use crate::translated::TranslatedExpression;
use crate::value_id::{BlockId, FunctionId};

/// Jump targets of the innermost enclosing loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopTargets {
    /// Where `continue` goes: the block testing the loop condition.
    pub entry: BlockId,
    /// Where `break` goes.
    pub exit: BlockId,
}

pub struct ExprLowerer<'b, 'a, 'ctx> {
    pub(crate) cx: &'b mut CodegenCx<'a, 'ctx>,
    pub(crate) function: FunctionId,
    pub(crate) scope: TranslationScope,
    pub(crate) return_type: Option<TypeSignature>,
    pub(crate) loop_targets: Option<LoopTargets>,
}

impl<'b, 'a, 'ctx> ExprLowerer<'b, 'a, 'ctx> {
    pub fn new(
        cx: &'b mut CodegenCx<'a, 'ctx>,
        function: FunctionId,
        scope: TranslationScope,
        return_type: Option<TypeSignature>,
    ) -> Self {
        Self {
            cx,
            function,
            scope,
            return_type,
            loop_targets: None,
        }
    }

    /// A lowerer for a nested block: same function and return type, a child
    /// scope frame, and the given loop targets.
    pub(crate) fn nested(
        &mut self,
        kind: ScopeKind,
        loop_targets: Option<LoopTargets>,
    ) -> ExprLowerer<'_, 'a, 'ctx> {
        ExprLowerer {
            cx: &mut *self.cx,
            function: self.function,
            scope: self.scope.nested(kind),
            return_type: self.return_type.clone(),
            loop_targets,
        }
    }

    pub(crate) fn raw_scope(&self) -> &RawScope {
        self.scope.raw()
    }

    pub(crate) fn expr_type(&self, expr: &Expression) -> LowerResult<TypeSignature> {
        self.cx.expression_type(expr, self.scope.raw())
    }

    /// A new block in the current function, labelled `<prefix>@<n>`.
    pub(crate) fn append_block(&mut self, prefix: &str) -> BlockId {
        let label = self.cx.fresh_label(prefix);
        self.cx.builder.append_block(self.function, &label)
    }

    /// The block instructions are currently appended to.
    pub(crate) fn insertion_block(&self) -> LowerResult<BlockId> {
        self.cx
            .builder
            .current_block()
            .ok_or_else(|| InternalError::unreachable("lowering without an insertion block"))
    }

    /// Branch to `target` unless the current block already ended.
    pub(crate) fn branch_if_open(&mut self, target: BlockId) {
        if !self.cx.builder.current_block_terminated() {
            self.cx.builder.br(target);
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Lower an expression to its value and, for places, its address.
    pub fn lower_expression(&mut self, expr: &Expression) -> LowerResult<TranslatedExpression> {
        match &expr.kind {
            ExprKind::IntLiteral(value) => Ok(self.lower_int(*value)),
            ExprKind::FloatLiteral(value) => Ok(self.lower_float(*value)),
            ExprKind::BoolLiteral(value) => Ok(self.lower_bool(*value)),
            ExprKind::CharLiteral(value) => Ok(self.lower_char(*value)),
            ExprKind::StringLiteral(value) => self.lower_string(value),
            ExprKind::ArrayLiteral(array) => self.lower_array(array),
            ExprKind::Identifier(name) => self.lower_identifier(name),
            ExprKind::BinaryOperator(binary) => self.lower_binary(binary, expr),
            ExprKind::UnaryOperator(unary) => self.lower_unary(unary, expr),
            ExprKind::TypeOperator(type_operator) => self.lower_type_operator(type_operator, expr),
            ExprKind::DotMemberAccess(access) => self.lower_dot_member_access(access, expr),
            ExprKind::SquareBracketsAccess(access) => {
                self.lower_square_brackets_access(access, expr)
            }
            ExprKind::FunctionCall(call) => self.lower_call(call)?.ok_or_else(|| {
                InternalError::unreachable(format!(
                    "void call to '{}' used as a value at {}",
                    call.function_name, call.debug
                ))
            }),
        }
    }

    /// Lower `expr` and convert it to `dest`.
    pub(crate) fn lower_converted(
        &mut self,
        expr: &Expression,
        dest: &TypeSignature,
    ) -> LowerResult<TranslatedExpression> {
        let source = self.expr_type(expr)?;
        let lowered = self.lower_expression(expr)?;
        self.cx.apply_cast(lowered, &source, dest)
    }

    /// Lower a sequence of statements, stopping once the block is
    /// terminated. Returns the block lowering ended in.
    pub fn lower_block(&mut self, statements: &[Statement]) -> LowerResult<BlockId> {
        for (position, statement) in statements.iter().enumerate() {
            if self.cx.builder.current_block_terminated() {
                tracing::debug!(
                    skipped = statements.len() - position,
                    at = %statement.debug,
                    "statements after a terminator are unreachable"
                );
                break;
            }
            self.lower_statement(statement)?;
        }
        self.insertion_block()
    }

    /// Close the function body: a void function falling off its end
    /// returns, anything else falling off its end is unreachable.
    pub(crate) fn finish_function(&mut self) {
        if self.cx.builder.current_block_terminated() {
            return;
        }
        if self.return_type.is_none() {
            self.cx.builder.ret_void();
        } else {
            tracing::debug!(
                function = %self.cx.builder.function_name(self.function),
                "end of non-void function marked unreachable"
            );
            self.cx.builder.unreachable();
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
