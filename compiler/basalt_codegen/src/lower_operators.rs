//! Binary, unary and type operator lowering.
//!
//! The instruction family is picked once per operator from the unaliased
//! type of the (left) operand: `Float` uses the floating point instructions
//! and unordered `fcmp` predicates, `Int`, `Char` and `Bool` use the integer
//! ones with signed predicates. Pointers only support `==` and `!=`, compared
//! as integer addresses.

use basalt_ir::{
    BinaryOp, BinaryOperator, BuiltinCallable, CallableCodeBlock, Expression, PrimitiveType,
    TypeOp, TypeOperator, TypeSignature, UnaryOp, UnaryOperator,
};

use crate::error::{InternalError, LowerResult};
use crate::expr_lowerer::ExprLowerer;
use crate::ir_builder::IrBuilder;
use crate::translated::TranslatedExpression;
use crate::value_id::ValueId;

/// Which instruction family an operand type maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OperandFamily {
    Integer,
    Float,
    Pointer,
}

impl ExprLowerer<'_, '_, '_> {
    fn operand_family(&self, ty: &TypeSignature) -> Option<OperandFamily> {
        match self.cx.unalias(ty) {
            TypeSignature::Primitive(PrimitiveType::Float) => Some(OperandFamily::Float),
            TypeSignature::Primitive(
                PrimitiveType::Int | PrimitiveType::Char | PrimitiveType::Bool,
            ) => Some(OperandFamily::Integer),
            TypeSignature::Pointer(_) | TypeSignature::Primitive(PrimitiveType::RawString) => {
                Some(OperandFamily::Pointer)
            }
            _ => None,
        }
    }

    pub(crate) fn lower_binary(
        &mut self,
        binary: &BinaryOperator,
        expr: &Expression,
    ) -> LowerResult<TranslatedExpression> {
        let operand_ty = self.expr_type(&binary.left)?;
        let left = self.lower_expression(&binary.left)?;
        let right = self.lower_converted(&binary.right, &operand_ty)?;
        let unknown = || InternalError::UnknownOperator {
            operator: binary.op.symbol().to_owned(),
            operand: operand_ty.to_string(),
        };

        if binary.op == BinaryOp::Pow {
            return self.lower_pow(&operand_ty, left.value, right.value, expr);
        }
        if binary.op.is_logical() && !self.cx.unalias(&operand_ty).is_primitive(PrimitiveType::Bool) {
            return Err(unknown());
        }

        let family = self.operand_family(&operand_ty).ok_or_else(unknown)?;
        let (l, r) = (left.value, right.value);
        let builder = &mut self.cx.builder;
        let value = match (family, binary.op) {
            (OperandFamily::Pointer, op @ (BinaryOp::Equal | BinaryOp::NotEqual)) => {
                let l = builder.ptr_to_int(l, "lhs.addr");
                let r = builder.ptr_to_int(r, "rhs.addr");
                int_compare(builder, op, l, r)
            }
            (OperandFamily::Pointer, _) => return Err(unknown()),

            (OperandFamily::Float, BinaryOp::Add) => builder.fadd(l, r, "add"),
            (OperandFamily::Float, BinaryOp::Sub) => builder.fsub(l, r, "sub"),
            (OperandFamily::Float, BinaryOp::Mul) => builder.fmul(l, r, "mul"),
            (OperandFamily::Float, BinaryOp::Div) => builder.fdiv(l, r, "div"),
            (OperandFamily::Float, BinaryOp::Mod) => builder.frem(l, r, "rem"),
            (OperandFamily::Float, op) if op.is_comparison() => float_compare(builder, op, l, r),

            (OperandFamily::Integer, BinaryOp::Add) => builder.add(l, r, "add"),
            (OperandFamily::Integer, BinaryOp::Sub) => builder.sub(l, r, "sub"),
            (OperandFamily::Integer, BinaryOp::Mul) => builder.mul(l, r, "mul"),
            (OperandFamily::Integer, BinaryOp::Div) => builder.sdiv(l, r, "div"),
            (OperandFamily::Integer, BinaryOp::Mod) => builder.srem(l, r, "rem"),
            (OperandFamily::Integer, BinaryOp::And) => builder.and(l, r, "and"),
            (OperandFamily::Integer, BinaryOp::Or) => builder.or(l, r, "or"),
            (OperandFamily::Integer, BinaryOp::Xor) => builder.xor(l, r, "xor"),
            (OperandFamily::Integer, op) if op.is_comparison() => int_compare(builder, op, l, r),

            _ => return Err(unknown()),
        };
        Ok(TranslatedExpression::value(value))
    }

    /// `a ^ b` through the synthesized power helper.
    fn lower_pow(
        &mut self,
        operand_ty: &TypeSignature,
        base: ValueId,
        exponent: ValueId,
        expr: &Expression,
    ) -> LowerResult<TranslatedExpression> {
        let operand = self.cx.unalias(operand_ty);
        if self.operand_family(&operand) == Some(OperandFamily::Pointer) {
            return Err(InternalError::UnknownOperator {
                operator: BinaryOp::Pow.symbol().to_owned(),
                operand: operand.to_string(),
            });
        }
        let helper = CallableCodeBlock::Builtin(BuiltinCallable::Pow { operand });
        let value = self.call_helper(&helper, &[base, exponent], "pow", expr)?;
        Ok(TranslatedExpression::value(value))
    }

    pub(crate) fn lower_unary(
        &mut self,
        unary: &UnaryOperator,
        expr: &Expression,
    ) -> LowerResult<TranslatedExpression> {
        let operand_ty = self.expr_type(&unary.operand)?;
        let operand = self.lower_expression(&unary.operand)?;
        let family = self.operand_family(&operand_ty);
        let unknown = || InternalError::UnknownOperator {
            operator: unary.op.symbol().to_owned(),
            operand: operand_ty.to_string(),
        };
        let value = operand.value;
        let pointee_layout = if unary.op == UnaryOp::Deref {
            let pointee = match self.cx.unalias(&operand_ty) {
                TypeSignature::Pointer(pointee) => *pointee,
                TypeSignature::Primitive(PrimitiveType::RawString) => TypeSignature::char(),
                _ => return Err(unknown()),
            };
            Some(self.cx.layout_of(&pointee)?)
        } else {
            None
        };
        let builder = &mut self.cx.builder;
        let lowered = match (unary.op, family) {
            (UnaryOp::Not, _) => TranslatedExpression::value(builder.not(value, "not")),
            (UnaryOp::Minus, Some(OperandFamily::Float)) => {
                TranslatedExpression::value(builder.fneg(value, "neg"))
            }
            (UnaryOp::Minus, Some(OperandFamily::Integer)) => {
                TranslatedExpression::value(builder.neg(value, "neg"))
            }
            (UnaryOp::Plus, _) => TranslatedExpression::value(value),
            (UnaryOp::Increment | UnaryOp::Decrement, Some(OperandFamily::Float)) => {
                let one = builder.const_f64(1.0);
                TranslatedExpression::value(if unary.op == UnaryOp::Increment {
                    builder.fadd(value, one, "inc")
                } else {
                    builder.fsub(value, one, "dec")
                })
            }
            (UnaryOp::Increment | UnaryOp::Decrement, Some(OperandFamily::Integer)) => {
                let ty = builder.value_type(value);
                let one = builder.const_int(ty, 1);
                TranslatedExpression::value(if unary.op == UnaryOp::Increment {
                    builder.add(value, one, "inc")
                } else {
                    builder.sub(value, one, "dec")
                })
            }
            (UnaryOp::Deref, _) => {
                let layout = pointee_layout.ok_or_else(unknown)?;
                let loaded = builder.load(layout, value, "deref");
                TranslatedExpression::place(loaded, value)
            }
            (UnaryOp::AddressOf, _) => {
                TranslatedExpression::value(operand.address_or_materialize(builder, "addr"))
            }
            _ => return Err(unknown()),
        };
        tracing::trace!(op = unary.op.symbol(), at = %expr.debug, "lowered unary operator");
        Ok(lowered)
    }

    /// `value is T` and `value as T`.
    ///
    /// `is` on a union calls the tag test helper. On a non-union operand the
    /// answer is known statically.
    pub(crate) fn lower_type_operator(
        &mut self,
        type_operator: &TypeOperator,
        expr: &Expression,
    ) -> LowerResult<TranslatedExpression> {
        let source = self.expr_type(&type_operator.expression)?;
        let operand = self.lower_expression(&type_operator.expression)?;
        match type_operator.op {
            TypeOp::Is if !self.cx.is_union(&source) => {
                let holds = self.cx.program.validate_assignment(&type_operator.ty, &source);
                Ok(TranslatedExpression::value(self.cx.builder.const_bool(holds)))
            }
            TypeOp::Is => {
                let helper = CallableCodeBlock::Builtin(BuiltinCallable::Is {
                    union_type: source,
                    checked: type_operator.ty.clone(),
                });
                let value = self.call_helper(&helper, &[operand.value], "is", expr)?;
                Ok(TranslatedExpression::value(value))
            }
            TypeOp::As => {
                let helper = CallableCodeBlock::Builtin(BuiltinCallable::As {
                    source,
                    dest: type_operator.ty.clone(),
                });
                let value = self.call_helper(&helper, &[operand.value], "as", expr)?;
                Ok(TranslatedExpression::value(value))
            }
        }
    }

    /// Lower `helper` (cached) and call it with already lowered arguments.
    fn call_helper(
        &mut self,
        helper: &CallableCodeBlock,
        args: &[ValueId],
        name: &str,
        expr: &Expression,
    ) -> LowerResult<ValueId> {
        let function = self.cx.lower_callable(helper)?;
        self.cx.builder.call(function, args, name).ok_or_else(|| {
            InternalError::unreachable(format!(
                "helper '{}' returned nothing at {}",
                helper.unique_name(),
                expr.debug
            ))
        })
    }
}

fn int_compare(builder: &mut IrBuilder<'_, '_>, op: BinaryOp, l: ValueId, r: ValueId) -> ValueId {
    match op {
        BinaryOp::Less => builder.icmp_slt(l, r, "cmp"),
        BinaryOp::Greater => builder.icmp_sgt(l, r, "cmp"),
        BinaryOp::LessEq => builder.icmp_sle(l, r, "cmp"),
        BinaryOp::GreaterEq => builder.icmp_sge(l, r, "cmp"),
        BinaryOp::NotEqual => builder.icmp_ne(l, r, "ne"),
        _ => builder.icmp_eq(l, r, "eq"),
    }
}

fn float_compare(builder: &mut IrBuilder<'_, '_>, op: BinaryOp, l: ValueId, r: ValueId) -> ValueId {
    match op {
        BinaryOp::Less => builder.fcmp_ult(l, r, "cmp"),
        BinaryOp::Greater => builder.fcmp_ugt(l, r, "cmp"),
        BinaryOp::LessEq => builder.fcmp_ule(l, r, "cmp"),
        BinaryOp::GreaterEq => builder.fcmp_uge(l, r, "cmp"),
        BinaryOp::NotEqual => builder.fcmp_une(l, r, "ne"),
        _ => builder.fcmp_ueq(l, r, "eq"),
    }
}
