//! Synthesized helpers for operators without a single instruction.
//!
//! | Helper | Body |
//! |--------|------|
//! | `__basalt_pow_int` | repeated `mul`; negative exponents yield 0 |
//! | `__basalt_pow_float` | repeated `fmul` over the truncated exponent; negative exponents yield the reciprocal |
//! | `__basalt_is[U][T]` | tag test on the union argument |
//! | `__basalt_as[S][D]` | the cast engine applied to the argument |

use basalt_ir::{BuiltinCallable, PrimitiveType, TypeSignature};

use crate::context::CodegenCx;
use crate::error::{InternalError, LowerResult};
use crate::scope::StorageHandle;
use crate::translated::TranslatedExpression;
use crate::value_id::{BlockId, FunctionId, ValueId};

impl CodegenCx<'_, '_> {
    pub(super) fn define_builtin(
        &mut self,
        function: FunctionId,
        builtin: &BuiltinCallable,
    ) -> LowerResult<()> {
        let entry = self.builder.append_block(function, "entry");
        self.builder.position_at_end(entry);
        match builtin {
            BuiltinCallable::Pow { operand } => match self.unalias(operand).as_primitive() {
                Some(PrimitiveType::Int) => {
                    self.define_pow_int(function);
                    Ok(())
                }
                Some(PrimitiveType::Float) => {
                    self.define_pow_float(function);
                    Ok(())
                }
                _ => Err(InternalError::UnsupportedBuiltin {
                    name: builtin.unique_string_id(),
                }),
            },
            BuiltinCallable::Is {
                union_type,
                checked,
            } => {
                let (slot, _) = self.spill_param(function, 0, union_type)?;
                let matched = self.emit_tag_test(slot.address, slot.layout, checked, "is");
                self.builder.ret(matched);
                Ok(())
            }
            BuiltinCallable::As { source, dest } => {
                let (slot, value) = self.spill_param(function, 0, source)?;
                let converted = self.apply_cast(
                    TranslatedExpression::place(value, slot.address),
                    source,
                    dest,
                )?;
                self.builder.ret(converted.value);
                Ok(())
            }
        }
    }

    /// Store parameter `index` into a slot. Returns the slot and the value.
    fn spill_param(
        &mut self,
        function: FunctionId,
        index: u32,
        ty: &TypeSignature,
    ) -> LowerResult<(StorageHandle, ValueId)> {
        let param = self.builder.get_param(function, index);
        let layout = self.layout_of(ty)?;
        let address = self.builder.alloca(layout, "value.addr");
        self.builder.store(param, address);
        Ok((StorageHandle { address, layout }, param))
    }

    fn helper_block(&mut self, function: FunctionId, prefix: &str) -> BlockId {
        let label = self.fresh_label(prefix);
        self.builder.append_block(function, &label)
    }

    fn define_pow_int(&mut self, function: FunctionId) {
        let base = self.builder.get_param(function, 0);
        let exponent = self.builder.get_param(function, 1);
        self.builder.set_value_name(base, "base");
        self.builder.set_value_name(exponent, "exponent");

        let negative = self.helper_block(function, "pow:negative");
        let cond = self.helper_block(function, "pow:cond");
        let body = self.helper_block(function, "pow:body");
        let exit = self.helper_block(function, "pow:exit");

        let i64 = self.builder.i64_type();
        let result = self.builder.alloca(i64, "result");
        let counter = self.builder.alloca(i64, "counter");
        let one = self.builder.const_i64(1);
        let zero = self.builder.const_i64(0);
        self.builder.store(one, result);
        self.builder.store(zero, counter);
        let is_negative = self.builder.icmp_slt(exponent, zero, "is_negative");
        self.builder.cond_br(is_negative, negative, cond);

        self.builder.position_at_end(negative);
        self.builder.ret(zero);

        self.builder.position_at_end(cond);
        let done = self.builder.load(i64, counter, "done");
        let more = self.builder.icmp_slt(done, exponent, "more");
        self.builder.cond_br(more, body, exit);

        self.builder.position_at_end(body);
        let acc = self.builder.load(i64, result, "acc");
        let next = self.builder.mul(acc, base, "next");
        self.builder.store(next, result);
        let step = self.builder.add(done, one, "step");
        self.builder.store(step, counter);
        self.builder.br(cond);

        self.builder.position_at_end(exit);
        let value = self.builder.load(i64, result, "pow");
        self.builder.ret(value);
    }

    fn define_pow_float(&mut self, function: FunctionId) {
        let base = self.builder.get_param(function, 0);
        let exponent = self.builder.get_param(function, 1);
        self.builder.set_value_name(base, "base");
        self.builder.set_value_name(exponent, "exponent");

        let flip = self.helper_block(function, "pow:flip");
        let cond = self.helper_block(function, "pow:cond");
        let body = self.helper_block(function, "pow:body");
        let exit = self.helper_block(function, "pow:exit");
        let reciprocal = self.helper_block(function, "pow:reciprocal");
        let done = self.helper_block(function, "pow:done");

        let i64 = self.builder.i64_type();
        let double = self.builder.f64_type();
        let result = self.builder.alloca(double, "result");
        let counter = self.builder.alloca(i64, "counter");
        let times = self.builder.alloca(i64, "times");
        let one = self.builder.const_i64(1);
        let zero = self.builder.const_i64(0);
        let one_f = self.builder.const_f64(1.0);
        self.builder.store(one_f, result);
        self.builder.store(zero, counter);
        let truncated = self.builder.fp_to_si(exponent, i64, "truncated");
        self.builder.store(truncated, times);
        let is_negative = self.builder.icmp_slt(truncated, zero, "is_negative");
        self.builder.cond_br(is_negative, flip, cond);

        // `i64::MIN` has no positive counterpart; run the loop `i64::MAX` times.
        self.builder.position_at_end(flip);
        let min = self.builder.const_i64(i64::MIN);
        let max = self.builder.const_i64(i64::MAX);
        let is_min = self.builder.icmp_eq(truncated, min, "is_min");
        let negated = self.builder.neg(truncated, "negated");
        let magnitude = self.builder.select(is_min, max, negated, "magnitude");
        self.builder.store(magnitude, times);
        self.builder.br(cond);

        self.builder.position_at_end(cond);
        let finished = self.builder.load(i64, counter, "finished");
        let limit = self.builder.load(i64, times, "limit");
        let more = self.builder.icmp_slt(finished, limit, "more");
        self.builder.cond_br(more, body, exit);

        self.builder.position_at_end(body);
        let acc = self.builder.load(double, result, "acc");
        let next = self.builder.fmul(acc, base, "next");
        self.builder.store(next, result);
        let step = self.builder.add(finished, one, "step");
        self.builder.store(step, counter);
        self.builder.br(cond);

        self.builder.position_at_end(exit);
        let value = self.builder.load(double, result, "pow");
        self.builder.cond_br(is_negative, reciprocal, done);

        self.builder.position_at_end(reciprocal);
        let inverted = self.builder.fdiv(one_f, value, "inverted");
        self.builder.ret(inverted);

        self.builder.position_at_end(done);
        self.builder.ret(value);
    }
}
