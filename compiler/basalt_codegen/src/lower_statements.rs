//! Statement lowering: declarations, assignment, return and call statements.
//!
//! Control-flow statements live in `lower_control_flow.rs`.

use basalt_ir::{
    Assignment, ConstDeclaration, DebugInfo, ObjectKind, Return, Statement, StmtKind,
    TypeSignature, VariableDeclaration,
};

use crate::error::{InternalError, LowerResult};
use crate::expr_lowerer::ExprLowerer;
use crate::scope::StorageHandle;
use crate::value_id::{BlockId, ValueId};

impl ExprLowerer<'_, '_, '_> {
    /// Lower one statement. Returns the block lowering continues in.
    pub fn lower_statement(&mut self, statement: &Statement) -> LowerResult<BlockId> {
        tracing::trace!(at = %statement.debug, "lower statement");
        match &statement.kind {
            StmtKind::VariableDeclaration(declaration) => {
                self.lower_variable_declaration(declaration, &statement.debug)?;
            }
            StmtKind::ConstDeclaration(declaration) => {
                self.lower_const_declaration(declaration, &statement.debug)?;
            }
            StmtKind::Assignment(assignment) => self.lower_assignment(assignment, &statement.debug)?,
            StmtKind::Conditional(conditional) => self.lower_conditional(conditional)?,
            StmtKind::WhileLoop(while_loop) => self.lower_while_loop(while_loop)?,
            StmtKind::UntilLoop(until_loop) => self.lower_until_loop(until_loop)?,
            StmtKind::Return(ret) => self.lower_return(ret)?,
            StmtKind::Break => self.lower_break(&statement.debug)?,
            StmtKind::Continue => self.lower_continue(&statement.debug)?,
            StmtKind::FunctionCall(call) => {
                self.lower_call(call)?;
            }
        }
        self.insertion_block()
    }

    fn lower_variable_declaration(
        &mut self,
        declaration: &VariableDeclaration,
        debug: &DebugInfo,
    ) -> LowerResult<String> {
        let initial = declaration
            .initial_value
            .as_ref()
            .map(|value| self.lower_converted(value, &declaration.ty))
            .transpose()?;
        self.declare_slot(
            &declaration.identifier,
            &declaration.ty,
            ObjectKind::Variable,
            debug,
            initial.map(|initial| initial.value),
        )
    }

    fn lower_const_declaration(
        &mut self,
        declaration: &ConstDeclaration,
        debug: &DebugInfo,
    ) -> LowerResult<String> {
        let value = self.lower_converted(&declaration.value, &declaration.ty)?;
        self.declare_slot(
            &declaration.identifier,
            &declaration.ty,
            ObjectKind::Constant,
            debug,
            Some(value.value),
        )
    }

    /// Allocate a named slot, store the initial value and declare it.
    ///
    /// The initializer is lowered before the declaration, so it still sees
    /// any outer object of the same name.
    fn declare_slot(
        &mut self,
        identifier: &str,
        ty: &TypeSignature,
        kind: ObjectKind,
        debug: &DebugInfo,
        initial: Option<ValueId>,
    ) -> LowerResult<String> {
        let layout = self.cx.layout_of(ty)?;
        let address = self.cx.builder.alloca(layout, identifier);
        if let Some(initial) = initial {
            self.cx.builder.store(initial, address);
        }
        Ok(self.scope.declare(
            identifier,
            ty.clone(),
            kind,
            debug,
            StorageHandle { address, layout },
        ))
    }

    fn lower_assignment(&mut self, assignment: &Assignment, debug: &DebugInfo) -> LowerResult<()> {
        let target_ty = self.expr_type(&assignment.target)?;
        let target = self.lower_expression(&assignment.target)?;
        let address = target.address.ok_or_else(|| {
            InternalError::unreachable(format!("assignment to a value without storage at {debug}"))
        })?;
        let value = self.lower_converted(&assignment.value, &target_ty)?;
        self.cx.builder.store(value.value, address);
        Ok(())
    }

    fn lower_return(&mut self, ret: &Return) -> LowerResult<()> {
        match (&ret.value, self.return_type.clone()) {
            (Some(value), Some(return_type)) => {
                let value = self.lower_converted(value, &return_type)?;
                self.cx.builder.ret(value.value);
            }
            (None, None) => self.cx.builder.ret_void(),
            (Some(value), None) => {
                return Err(InternalError::unreachable(format!(
                    "value returned from a void function at {}",
                    value.debug
                )))
            }
            (None, Some(return_type)) => {
                return Err(InternalError::unreachable(format!(
                    "missing return value of type '{return_type}'"
                )))
            }
        }
        Ok(())
    }
}
