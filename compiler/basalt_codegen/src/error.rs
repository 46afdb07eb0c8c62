//! Internal errors raised while lowering.
//!
//! An [`InternalError`] means the program handed to the backend breaks an
//! assumption the type checker should have guaranteed. Lowering stops at the
//! first one; there is no recovery and no partial module.

use std::fmt;

/// A fatal lowering failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// A variant or state that well-typed programs never produce.
    UnreachableVariant { context: String },
    /// An identifier without storage in the current scope.
    UnresolvedIdentifier { name: String },
    /// A generic parameter survived specialization and reached layout.
    TemplateParamInLayout { name: String },
    /// An element-wise array cast between arrays of different lengths.
    ArrayLengthMismatch { expected: usize, actual: usize },
    /// A built-in helper the backend cannot synthesize.
    UnsupportedBuiltin { name: String },
    /// The program representation could not type an expression.
    TypeDeduction { location: String },
    /// A call site did not resolve to any callable.
    CallResolution { function: String, location: String },
    /// A member access did not resolve to a field.
    FieldResolution { member: String, location: String },
    /// A custom type without a definition.
    UnknownType { name: String },
    /// `break` or `continue` outside any loop.
    LoopControlOutsideLoop { statement: &'static str, location: String },
    /// A CFA plan node whose alternatives and nested plans disagree.
    MalformedPlan { callable: String },
    /// An operator applied to operands it is not defined for.
    UnknownOperator { operator: String, operand: String },
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreachableVariant { context } => {
                write!(f, "unreachable lowering state: {context}")
            }
            Self::UnresolvedIdentifier { name } => {
                write!(f, "identifier '{name}' has no storage in scope")
            }
            Self::TemplateParamInLayout { name } => {
                write!(f, "template parameter '{name}' reached type layout")
            }
            Self::ArrayLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "cannot convert an array of {actual} elements into one of {expected}"
                )
            }
            Self::UnsupportedBuiltin { name } => {
                write!(f, "unsupported built-in '{name}'")
            }
            Self::TypeDeduction { location } => {
                write!(f, "could not deduce the type of the expression at {location}")
            }
            Self::CallResolution { function, location } => {
                write!(f, "call to '{function}' at {location} did not resolve")
            }
            Self::FieldResolution { member, location } => {
                write!(f, "member '{member}' at {location} did not resolve to a field")
            }
            Self::UnknownType { name } => write!(f, "type '{name}' is not defined"),
            Self::LoopControlOutsideLoop {
                statement,
                location,
            } => write!(f, "'{statement}' outside of a loop at {location}"),
            Self::MalformedPlan { callable } => {
                write!(f, "malformed adoption plan for '{callable}'")
            }
            Self::UnknownOperator { operator, operand } => {
                write!(f, "operator '{operator}' is not defined for '{operand}'")
            }
        }
    }
}

impl std::error::Error for InternalError {}

impl InternalError {
    pub(crate) fn unreachable(context: impl Into<String>) -> Self {
        Self::UnreachableVariant {
            context: context.into(),
        }
    }
}

pub type LowerResult<T> = Result<T, InternalError>;
