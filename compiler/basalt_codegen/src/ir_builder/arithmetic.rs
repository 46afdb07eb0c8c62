//! Integer, float and bitwise arithmetic for `IrBuilder`.

use inkwell::values::{FloatValue, IntValue};

use super::IrBuilder;
use crate::value_id::ValueId;

impl<'ctx> IrBuilder<'_, 'ctx> {
    /// Both operands as integers, or `None` after recording a codegen error.
    fn int_operands(
        &self,
        lhs: ValueId,
        rhs: ValueId,
        op: &'static str,
    ) -> Option<(IntValue<'ctx>, IntValue<'ctx>)> {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        if !l.is_int_value() || !r.is_int_value() {
            tracing::error!(lhs_type = ?l.get_type(), rhs_type = ?r.get_type(), op, "integer op on non-int operands");
            self.record_codegen_error();
            return None;
        }
        Some((l.into_int_value(), r.into_int_value()))
    }

    /// Both operands as floats, or `None` after recording a codegen error.
    fn float_operands(
        &self,
        lhs: ValueId,
        rhs: ValueId,
        op: &'static str,
    ) -> Option<(FloatValue<'ctx>, FloatValue<'ctx>)> {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        if !l.is_float_value() || !r.is_float_value() {
            tracing::error!(lhs_type = ?l.get_type(), rhs_type = ?r.get_type(), op, "float op on non-float operands");
            self.record_codegen_error();
            return None;
        }
        Some((l.into_float_value(), r.into_float_value()))
    }

    // -- Integer arithmetic --

    pub fn add(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.int_operands(lhs, rhs, "add") else {
            return self.const_i64(0);
        };
        let v = self.builder.build_int_add(l, r, name).expect("add");
        self.arena.push_value(v.into())
    }

    pub fn sub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.int_operands(lhs, rhs, "sub") else {
            return self.const_i64(0);
        };
        let v = self.builder.build_int_sub(l, r, name).expect("sub");
        self.arena.push_value(v.into())
    }

    pub fn mul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.int_operands(lhs, rhs, "mul") else {
            return self.const_i64(0);
        };
        let v = self.builder.build_int_mul(l, r, name).expect("mul");
        self.arena.push_value(v.into())
    }

    pub fn sdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.int_operands(lhs, rhs, "sdiv") else {
            return self.const_i64(0);
        };
        let v = self.builder.build_int_signed_div(l, r, name).expect("sdiv");
        self.arena.push_value(v.into())
    }

    pub fn srem(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.int_operands(lhs, rhs, "srem") else {
            return self.const_i64(0);
        };
        let v = self.builder.build_int_signed_rem(l, r, name).expect("srem");
        self.arena.push_value(v.into())
    }

    /// Integer negation (`0 - val`).
    pub fn neg(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val);
        if !v.is_int_value() {
            tracing::error!(val_type = ?v.get_type(), "neg on non-int operand");
            self.record_codegen_error();
            return self.const_i64(0);
        }
        let result = self
            .builder
            .build_int_neg(v.into_int_value(), name)
            .expect("neg");
        self.arena.push_value(result.into())
    }

    // -- Float arithmetic --

    pub fn fadd(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.float_operands(lhs, rhs, "fadd") else {
            return self.const_f64(0.0);
        };
        let v = self.builder.build_float_add(l, r, name).expect("fadd");
        self.arena.push_value(v.into())
    }

    pub fn fsub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.float_operands(lhs, rhs, "fsub") else {
            return self.const_f64(0.0);
        };
        let v = self.builder.build_float_sub(l, r, name).expect("fsub");
        self.arena.push_value(v.into())
    }

    pub fn fmul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.float_operands(lhs, rhs, "fmul") else {
            return self.const_f64(0.0);
        };
        let v = self.builder.build_float_mul(l, r, name).expect("fmul");
        self.arena.push_value(v.into())
    }

    pub fn fdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.float_operands(lhs, rhs, "fdiv") else {
            return self.const_f64(0.0);
        };
        let v = self.builder.build_float_div(l, r, name).expect("fdiv");
        self.arena.push_value(v.into())
    }

    pub fn frem(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.float_operands(lhs, rhs, "frem") else {
            return self.const_f64(0.0);
        };
        let v = self.builder.build_float_rem(l, r, name).expect("frem");
        self.arena.push_value(v.into())
    }

    pub fn fneg(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val);
        if !v.is_float_value() {
            tracing::error!(val_type = ?v.get_type(), "fneg on non-float operand");
            self.record_codegen_error();
            return self.const_f64(0.0);
        }
        let result = self
            .builder
            .build_float_neg(v.into_float_value(), name)
            .expect("fneg");
        self.arena.push_value(result.into())
    }

    // -- Bitwise --

    pub fn and(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.int_operands(lhs, rhs, "and") else {
            return self.const_bool(false);
        };
        let v = self.builder.build_and(l, r, name).expect("and");
        self.arena.push_value(v.into())
    }

    pub fn or(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.int_operands(lhs, rhs, "or") else {
            return self.const_bool(false);
        };
        let v = self.builder.build_or(l, r, name).expect("or");
        self.arena.push_value(v.into())
    }

    pub fn xor(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let Some((l, r)) = self.int_operands(lhs, rhs, "xor") else {
            return self.const_bool(false);
        };
        let v = self.builder.build_xor(l, r, name).expect("xor");
        self.arena.push_value(v.into())
    }

    /// Bitwise complement; logical not on `i1`.
    pub fn not(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val);
        if !v.is_int_value() {
            tracing::error!(val_type = ?v.get_type(), "not on non-int operand");
            self.record_codegen_error();
            return self.const_bool(false);
        }
        let result = self
            .builder
            .build_not(v.into_int_value(), name)
            .expect("not");
        self.arena.push_value(result.into())
    }
}
