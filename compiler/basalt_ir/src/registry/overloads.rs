//! Overload resolution and common-feature-adoption plan generation.
//!
//! A call binds to a concrete function when one overload accepts the static
//! argument types. Otherwise union-typed arguments are expanded, left to
//! right, into their alternatives until every path of the resulting decision
//! tree reaches a concrete overload.

use std::rc::Rc;

use tracing::debug;

use crate::ast::{FunctionCall, FunctionRef};
use crate::callable::{
    CallableCodeBlock, CommonFeatureAdoptionPlan, CommonFeatureAdoptionPlanDescriptor,
    RecursiveAdoptionPlan,
};
use crate::program::ProgramRepresentation;
use crate::scope::RawScope;
use crate::types::TypeSignature;

use super::ProgramRegistry;

impl ProgramRegistry {
    pub(super) fn resolve_call(
        &self,
        call: &FunctionCall,
        scope: &RawScope,
    ) -> Option<CallableCodeBlock> {
        let arg_types = call
            .arguments
            .iter()
            .map(|argument| self.resolve_expression_type(argument, scope))
            .collect::<Option<Vec<_>>>()?;

        if let Some(function) = self.retrieve_function_definition(&call.function_name, &arg_types) {
            return Some(CallableCodeBlock::Function(function));
        }

        let plan = self.generate_adoption_plan(&call.function_name, &arg_types, 0)?;
        let return_type = adoption_plan_return_type(&plan)?;
        debug!(
            function = %call.function_name,
            tests = plan.tag_test_count(),
            "generated common feature adoption plan"
        );
        Some(CallableCodeBlock::Adoption(Rc::new(
            CommonFeatureAdoptionPlanDescriptor {
                function_name: call.function_name.clone(),
                arg_types,
                return_type,
                filename: call.debug.filename.clone(),
                debug: call.debug.clone(),
                plan,
            },
        )))
    }

    /// Exact match first, then the first overload accepting every argument.
    fn retrieve_function_definition(
        &self,
        name: &str,
        arg_types: &[TypeSignature],
    ) -> Option<FunctionRef> {
        let candidates: Vec<&FunctionRef> = self
            .overloads
            .get(name)?
            .iter()
            .filter(|f| !f.is_generic() && f.arguments.len() == arg_types.len())
            .collect();

        let exact = candidates.iter().find(|f| {
            f.arguments
                .iter()
                .zip(arg_types)
                .all(|(parameter, actual)| self.same_type(&parameter.ty, actual))
        });
        if let Some(function) = exact {
            return Some(Rc::clone(function));
        }

        candidates
            .into_iter()
            .find(|f| {
                f.arguments
                    .iter()
                    .zip(arg_types)
                    .all(|(parameter, actual)| self.validate_assignment(&parameter.ty, actual))
            })
            .cloned()
    }

    fn generate_adoption_plan(
        &self,
        name: &str,
        arg_types: &[TypeSignature],
        argument_index: usize,
    ) -> Option<CommonFeatureAdoptionPlan> {
        if let Some(function) = self.retrieve_function_definition(name, arg_types) {
            return Some(CommonFeatureAdoptionPlan::DirectAdoption(function));
        }
        let current = arg_types.get(argument_index)?;
        let alternatives = self.fetch_union_alternatives(current);
        if alternatives.is_empty() {
            return self.generate_adoption_plan(name, arg_types, argument_index + 1);
        }

        let mut nested_plans = Vec::with_capacity(alternatives.len());
        for alternative in &alternatives {
            let mut narrowed = arg_types.to_vec();
            narrowed[argument_index] = alternative.clone();
            nested_plans.push(self.generate_adoption_plan(name, &narrowed, argument_index)?);
        }
        Some(CommonFeatureAdoptionPlan::RecursiveAdoption(
            RecursiveAdoptionPlan {
                argument_index,
                alternatives,
                nested_plans,
            },
        ))
    }
}

/// `Some(None)` when every leaf is void, the inline union of the leaf return
/// types when none is, and `None` when the two are mixed.
fn adoption_plan_return_type(plan: &CommonFeatureAdoptionPlan) -> Option<Option<TypeSignature>> {
    let leaves = plan.leaf_return_types();
    let has_void = leaves.iter().any(Option::is_none);
    let has_value = leaves.iter().any(Option::is_some);
    match (has_void, has_value) {
        (true, true) => None,
        (true, false) => Some(None),
        (false, _) => Some(Some(TypeSignature::InlineUnion(
            leaves.into_iter().flatten().collect(),
        ))),
    }
}
