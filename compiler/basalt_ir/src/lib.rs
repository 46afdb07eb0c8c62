//! Source-level program model consumed by the Basalt backend.
//!
//! Everything in this crate describes a program that has already been parsed,
//! type-checked and specialized. The backend only reads from it.
//!
//! # Architecture
//!
//! - [`types`]: type signatures and named type definitions.
//! - [`ast`]: expressions, statements and function definitions.
//! - [`callable`]: callable code blocks and common-feature-adoption plans.
//! - [`scope`]: the raw name-resolution scope handed out by the type checker.
//! - [`program`]: the [`ProgramRepresentation`] trait, the narrow interface the
//!   backend uses to query the type checker and registry.
//! - [`registry`]: [`ProgramRegistry`], an in-memory implementation of that trait.

pub mod ast;
pub mod callable;
pub mod debug_info;
pub mod program;
pub mod registry;
pub mod scope;
pub mod types;

pub use ast::{
    Argument, ArrayLiteral, Assignment, BinaryOp, BinaryOperator, Conditional, ConstDeclaration,
    DotMemberAccess, ExprKind, Expression, FunctionCall, FunctionDefinition, FunctionRef, Return,
    SquareBracketsAccess, Statement, StmtKind, TypeOp, TypeOperator, UnaryOp, UnaryOperator,
    UntilLoop, VariableDeclaration, WhileLoop,
};
pub use callable::{
    BuiltinCallable, CallableCodeBlock, CommonFeatureAdoptionPlan,
    CommonFeatureAdoptionPlanDescriptor, RecursiveAdoptionPlan,
};
pub use debug_info::DebugInfo;
pub use program::ProgramRepresentation;
pub use registry::{ProgramRegistry, RegistryError};
pub use scope::{ObjectDescriptor, ObjectKind, RawScope, ScopeKind};
pub use types::{
    CustomType, PrimitiveType, StructDefinition, StructField, TypeAlias, TypeDefinition,
    TypeSignature, UnionDefinition,
};
