//! Callable code blocks and common-feature-adoption (CFA) plans.
//!
//! A call site resolves to a [`CallableCodeBlock`]:
//!
//! - a concrete [`FunctionDefinition`](crate::FunctionDefinition),
//! - a [`CommonFeatureAdoptionPlanDescriptor`], a synthetic entry point that
//!   dispatches on the runtime tags of union-typed arguments, or
//! - a [`BuiltinCallable`], a helper synthesized by the backend for operators
//!   without a direct instruction (`^`, `is`, `as`).
//!
//! Every callable has a unique name. Two callables with the same unique name
//! are the same function once lowered.

use std::rc::Rc;

use crate::ast::FunctionRef;
use crate::debug_info::DebugInfo;
use crate::types::{PrimitiveType, TypeSignature};

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// One decision node of a CFA plan.
///
/// `nested_plans[i]` handles the case where argument `argument_index`
/// currently holds `alternatives[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct RecursiveAdoptionPlan {
    pub argument_index: usize,
    pub alternatives: Vec<TypeSignature>,
    pub nested_plans: Vec<CommonFeatureAdoptionPlan>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommonFeatureAdoptionPlan {
    DirectAdoption(FunctionRef),
    RecursiveAdoption(RecursiveAdoptionPlan),
}

impl CommonFeatureAdoptionPlan {
    pub fn is_direct_adoption(&self) -> bool {
        matches!(self, Self::DirectAdoption(_))
    }

    /// Every decision node has at least one alternative and exactly one
    /// nested plan per alternative.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Self::DirectAdoption(_) => true,
            Self::RecursiveAdoption(node) => {
                !node.alternatives.is_empty()
                    && node.alternatives.len() == node.nested_plans.len()
                    && node.nested_plans.iter().all(Self::is_well_formed)
            }
        }
    }

    /// Return types of every leaf, left to right. `None` marks a void leaf.
    pub fn leaf_return_types(&self) -> Vec<Option<TypeSignature>> {
        match self {
            Self::DirectAdoption(function) => vec![function.return_type.clone()],
            Self::RecursiveAdoption(node) => node
                .nested_plans
                .iter()
                .flat_map(Self::leaf_return_types)
                .collect(),
        }
    }

    /// Number of explicit tag tests the plan needs: `n - 1` per decision node.
    pub fn tag_test_count(&self) -> usize {
        match self {
            Self::DirectAdoption(_) => 0,
            Self::RecursiveAdoption(node) => {
                node.alternatives.len().saturating_sub(1)
                    + node
                        .nested_plans
                        .iter()
                        .map(Self::tag_test_count)
                        .sum::<usize>()
            }
        }
    }
}

/// A synthetic dispatching entry point for one call site shape.
#[derive(Clone, Debug, PartialEq)]
pub struct CommonFeatureAdoptionPlanDescriptor {
    pub function_name: String,
    pub arg_types: Vec<TypeSignature>,
    pub return_type: Option<TypeSignature>,
    pub filename: String,
    pub debug: DebugInfo,
    pub plan: CommonFeatureAdoptionPlan,
}

impl CommonFeatureAdoptionPlanDescriptor {
    /// `[CFA::file]name(T1,T2)`.
    pub fn unique_string_id(&self) -> String {
        let args: Vec<String> = self
            .arg_types
            .iter()
            .map(TypeSignature::fully_qualified_name)
            .collect();
        format!(
            "[CFA::{}]{}({})",
            self.filename,
            self.function_name,
            args.join(",")
        )
    }
}

// ---------------------------------------------------------------------------
// Builtins
// ---------------------------------------------------------------------------

/// Helpers the backend synthesizes on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinCallable {
    /// `a ^ b` with both operands of `operand` type.
    Pow { operand: TypeSignature },
    /// `value is checked` where `value` has type `union_type`.
    Is {
        union_type: TypeSignature,
        checked: TypeSignature,
    },
    /// `value as dest` where `value` has type `source`.
    As {
        source: TypeSignature,
        dest: TypeSignature,
    },
}

impl BuiltinCallable {
    pub fn unique_string_id(&self) -> String {
        match self {
            Self::Pow { operand } => match operand.as_primitive() {
                Some(PrimitiveType::Int) => "__basalt_pow_int".to_owned(),
                Some(PrimitiveType::Float) => "__basalt_pow_float".to_owned(),
                _ => format!("__basalt_pow[{}]", operand.fully_qualified_name()),
            },
            Self::Is {
                union_type,
                checked,
            } => format!(
                "__basalt_is[{}][{}]",
                union_type.fully_qualified_name(),
                checked.fully_qualified_name()
            ),
            Self::As { source, dest } => format!(
                "__basalt_as[{}][{}]",
                source.fully_qualified_name(),
                dest.fully_qualified_name()
            ),
        }
    }

    pub fn arg_types(&self) -> Vec<TypeSignature> {
        match self {
            Self::Pow { operand } => vec![operand.clone(), operand.clone()],
            Self::Is { union_type, .. } => vec![union_type.clone()],
            Self::As { source, .. } => vec![source.clone()],
        }
    }

    pub fn return_type(&self) -> TypeSignature {
        match self {
            Self::Pow { operand } => operand.clone(),
            Self::Is { .. } => TypeSignature::bool(),
            Self::As { dest, .. } => dest.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// CallableCodeBlock
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum CallableCodeBlock {
    Function(FunctionRef),
    Adoption(Rc<CommonFeatureAdoptionPlanDescriptor>),
    Builtin(BuiltinCallable),
}

impl CallableCodeBlock {
    /// Key of the lowering cache and name of the emitted function.
    pub fn unique_name(&self) -> String {
        match self {
            Self::Function(function) => function.unique_string_id(),
            Self::Adoption(descriptor) => descriptor.unique_string_id(),
            Self::Builtin(builtin) => builtin.unique_string_id(),
        }
    }

    pub fn arg_types(&self) -> Vec<TypeSignature> {
        match self {
            Self::Function(function) => function.arg_types(),
            Self::Adoption(descriptor) => descriptor.arg_types.clone(),
            Self::Builtin(builtin) => builtin.arg_types(),
        }
    }

    pub fn return_type(&self) -> Option<TypeSignature> {
        match self {
            Self::Function(function) => function.return_type.clone(),
            Self::Adoption(descriptor) => descriptor.return_type.clone(),
            Self::Builtin(builtin) => Some(builtin.return_type()),
        }
    }
}

#[cfg(test)]
mod tests;
