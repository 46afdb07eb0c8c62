//! Integer and floating-point comparisons for `IrBuilder`.

use inkwell::{FloatPredicate, IntPredicate};

use super::IrBuilder;
use crate::value_id::ValueId;

impl IrBuilder<'_, '_> {
    // -- Integer comparisons --

    /// Defensive: non-integer operands record a codegen error and yield
    /// `false`.
    fn icmp_impl(&mut self, pred: IntPredicate, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        if !l.is_int_value() || !r.is_int_value() {
            tracing::error!(
                lhs_type = ?l.get_type(),
                rhs_type = ?r.get_type(),
                "icmp on non-int operands, returning false"
            );
            self.record_codegen_error();
            return self.const_bool(false);
        }
        let v = self
            .builder
            .build_int_compare(pred, l.into_int_value(), r.into_int_value(), name)
            .expect("icmp");
        self.arena.push_value(v.into())
    }

    pub fn icmp_eq(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp_impl(IntPredicate::EQ, lhs, rhs, name)
    }

    pub fn icmp_ne(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp_impl(IntPredicate::NE, lhs, rhs, name)
    }

    pub fn icmp_slt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp_impl(IntPredicate::SLT, lhs, rhs, name)
    }

    pub fn icmp_sgt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp_impl(IntPredicate::SGT, lhs, rhs, name)
    }

    pub fn icmp_sle(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp_impl(IntPredicate::SLE, lhs, rhs, name)
    }

    pub fn icmp_sge(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp_impl(IntPredicate::SGE, lhs, rhs, name)
    }

    // -- Float comparisons (unordered: true when either side is NaN) --

    /// Defensive: non-float operands record a codegen error and yield
    /// `false`.
    fn fcmp_impl(
        &mut self,
        pred: FloatPredicate,
        lhs: ValueId,
        rhs: ValueId,
        name: &str,
    ) -> ValueId {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        if !l.is_float_value() || !r.is_float_value() {
            tracing::error!(
                lhs_type = ?l.get_type(),
                rhs_type = ?r.get_type(),
                "fcmp on non-float operands, returning false"
            );
            self.record_codegen_error();
            return self.const_bool(false);
        }
        let v = self
            .builder
            .build_float_compare(pred, l.into_float_value(), r.into_float_value(), name)
            .expect("fcmp");
        self.arena.push_value(v.into())
    }

    pub fn fcmp_ueq(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp_impl(FloatPredicate::UEQ, lhs, rhs, name)
    }

    pub fn fcmp_une(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp_impl(FloatPredicate::UNE, lhs, rhs, name)
    }

    pub fn fcmp_ult(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp_impl(FloatPredicate::ULT, lhs, rhs, name)
    }

    pub fn fcmp_ugt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp_impl(FloatPredicate::UGT, lhs, rhs, name)
    }

    pub fn fcmp_ule(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp_impl(FloatPredicate::ULE, lhs, rhs, name)
    }

    pub fn fcmp_uge(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp_impl(FloatPredicate::UGE, lhs, rhs, name)
    }
}
