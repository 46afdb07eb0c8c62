//! Common-feature-adoption dispatch.
//!
//! A descriptor's entry point receives union-typed arguments and forwards
//! them to the concrete function matching their runtime tags. Every decision
//! node over `n` alternatives costs `n - 1` tag tests: the last alternative
//! is whatever is left once the others failed.
//!
//! ```text
//! entry ──▶ test@0 ──no──▶ test@1 ──no──▶ run(n-1)
//!             │yes           │yes
//!             ▼              ▼
//!           run@0          run@1 ...
//! ```
//!
//! Argument slots keep the descriptor's representation throughout. Only the
//! static type tracked for each argument is narrowed while descending the
//! plan, and payloads are projected at the leaf.

use basalt_ir::{
    CallableCodeBlock, CommonFeatureAdoptionPlan, CommonFeatureAdoptionPlanDescriptor,
    FunctionRef, RecursiveAdoptionPlan, TypeSignature,
};

use crate::context::CodegenCx;
use crate::error::{InternalError, LowerResult};
use crate::scope::StorageHandle;
use crate::translated::TranslatedExpression;
use crate::value_id::FunctionId;

impl CodegenCx<'_, '_> {
    pub(super) fn define_dispatch(
        &mut self,
        function: FunctionId,
        descriptor: &CommonFeatureAdoptionPlanDescriptor,
    ) -> LowerResult<()> {
        if !descriptor.plan.is_well_formed() {
            return Err(InternalError::MalformedPlan {
                callable: descriptor.unique_string_id(),
            });
        }
        let entry = self.builder.append_block(function, "entry");
        self.builder.position_at_end(entry);

        let mut slots = Vec::with_capacity(descriptor.arg_types.len());
        for (index, ty) in descriptor.arg_types.iter().enumerate() {
            let position = u32::try_from(index).map_err(|_| InternalError::MalformedPlan {
                callable: descriptor.unique_string_id(),
            })?;
            let param = self.builder.get_param(function, position);
            let layout = self.layout_of(ty)?;
            let address = self.builder.alloca(layout, &format!("cfa.arg{index}"));
            self.builder.store(param, address);
            slots.push(StorageHandle { address, layout });
        }

        tracing::debug!(
            descriptor = %descriptor.unique_string_id(),
            tag_tests = descriptor.plan.tag_test_count(),
            "lowering dispatch"
        );
        self.lower_plan(
            function,
            descriptor,
            &descriptor.plan,
            descriptor.arg_types.clone(),
            &slots,
        )
    }

    fn lower_plan(
        &mut self,
        function: FunctionId,
        descriptor: &CommonFeatureAdoptionPlanDescriptor,
        plan: &CommonFeatureAdoptionPlan,
        narrowed: Vec<TypeSignature>,
        slots: &[StorageHandle],
    ) -> LowerResult<()> {
        match plan {
            CommonFeatureAdoptionPlan::DirectAdoption(target) => {
                self.lower_direct_adoption(descriptor, target, &narrowed, slots)
            }
            CommonFeatureAdoptionPlan::RecursiveAdoption(node) => {
                self.lower_recursive_adoption(function, descriptor, node, narrowed, slots)
            }
        }
    }

    fn lower_recursive_adoption(
        &mut self,
        function: FunctionId,
        descriptor: &CommonFeatureAdoptionPlanDescriptor,
        node: &RecursiveAdoptionPlan,
        narrowed: Vec<TypeSignature>,
        slots: &[StorageHandle],
    ) -> LowerResult<()> {
        let slot = *slots.get(node.argument_index).ok_or_else(|| InternalError::MalformedPlan {
            callable: descriptor.unique_string_id(),
        })?;
        let count = node.alternatives.len();

        let mut run_blocks = Vec::with_capacity(count);
        for _ in 0..count {
            let label = self.fresh_label("cfa:run");
            run_blocks.push(self.builder.append_block(function, &label));
        }
        let mut test_blocks = Vec::with_capacity(count - 1);
        for _ in 1..count {
            let label = self.fresh_label("cfa:test");
            test_blocks.push(self.builder.append_block(function, &label));
        }

        let first = test_blocks.first().copied().unwrap_or(run_blocks[0]);
        self.builder.br(first);
        for (index, &test_block) in test_blocks.iter().enumerate() {
            self.builder.position_at_end(test_block);
            let matched = self.emit_tag_test(
                slot.address,
                slot.layout,
                &node.alternatives[index],
                "cfa.match",
            );
            let otherwise = test_blocks
                .get(index + 1)
                .copied()
                .unwrap_or(run_blocks[count - 1]);
            self.builder.cond_br(matched, run_blocks[index], otherwise);
        }

        for ((alternative, nested), run_block) in node
            .alternatives
            .iter()
            .zip(&node.nested_plans)
            .zip(run_blocks)
        {
            self.builder.position_at_end(run_block);
            let mut narrowed = narrowed.clone();
            narrowed[node.argument_index] = alternative.clone();
            self.lower_plan(function, descriptor, nested, narrowed, slots)?;
        }
        Ok(())
    }

    /// Forward the slots to `target`, projecting payloads where a union
    /// argument meets a non-union parameter.
    fn lower_direct_adoption(
        &mut self,
        descriptor: &CommonFeatureAdoptionPlanDescriptor,
        target: &FunctionRef,
        narrowed: &[TypeSignature],
        slots: &[StorageHandle],
    ) -> LowerResult<()> {
        let callee = self.lower_callable(&CallableCodeBlock::Function(target.clone()))?;

        let mut args = Vec::with_capacity(target.arguments.len());
        for (index, parameter) in target.arguments.iter().enumerate() {
            let (Some(original), Some(narrowed), Some(&slot)) = (
                descriptor.arg_types.get(index),
                narrowed.get(index),
                slots.get(index),
            ) else {
                return Err(InternalError::MalformedPlan {
                    callable: descriptor.unique_string_id(),
                });
            };
            let loaded =
                self.builder
                    .load(slot.layout, slot.address, &format!("cfa.arg{index}.value"));
            let mut value = TranslatedExpression::place(loaded, slot.address);
            let mut current = original;
            if self.is_union(original) && !self.is_union(narrowed) {
                value = self.apply_cast(value, original, narrowed)?;
                current = narrowed;
            }
            let converted = self.apply_cast(value, current, &parameter.ty)?;
            args.push(converted.value);
        }

        let result = self.builder.call(callee, &args, "cfa.result");
        match (result, &target.return_type, &descriptor.return_type) {
            (Some(result), Some(leaf_type), Some(return_type)) => {
                let converted =
                    self.apply_cast(TranslatedExpression::value(result), leaf_type, return_type)?;
                self.builder.ret(converted.value);
            }
            (_, _, None) => self.builder.ret_void(),
            _ => {
                return Err(InternalError::unreachable(format!(
                    "void adoption '{}' inside non-void '{}'",
                    target.unique_string_id(),
                    descriptor.unique_string_id()
                )))
            }
        }
        Ok(())
    }
}
