//! Expressions, statements and function definitions.
//!
//! The tree is the type checker's output: names are resolved, generics are
//! specialized, and every expression has a type that can be queried through
//! [`ProgramRepresentation::resolve_expression_type`](crate::ProgramRepresentation::resolve_expression_type).

use std::rc::Rc;

use crate::debug_info::DebugInfo;
use crate::types::TypeSignature;

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Equal,
    NotEqual,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Xor => "^^",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "^" => Self::Pow,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessEq,
            ">=" => Self::GreaterEq,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "&&" => Self::And,
            "||" => Self::Or,
            "^^" => Self::Xor,
            _ => return None,
        })
    }

    /// Whether the operator yields `Bool` from two operands of the same type.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Less
                | Self::Greater
                | Self::LessEq
                | Self::GreaterEq
                | Self::Equal
                | Self::NotEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Xor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
    Increment,
    Decrement,
    Deref,
    AddressOf,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::Deref => "#",
            Self::AddressOf => "&",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "!" => Self::Not,
            "-" => Self::Minus,
            "+" => Self::Plus,
            "++" => Self::Increment,
            "--" => Self::Decrement,
            "#" => Self::Deref,
            "&" => Self::AddressOf,
            _ => return None,
        })
    }
}

/// `is` / `as`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeOp {
    Is,
    As,
}

impl TypeOp {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Is => "is",
            Self::As => "as",
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayLiteral {
    pub length: usize,
    pub stored_type: TypeSignature,
    pub elements: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOperator {
    pub op: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryOperator {
    pub op: UnaryOp,
    pub operand: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeOperator {
    pub op: TypeOp,
    pub expression: Box<Expression>,
    pub ty: TypeSignature,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DotMemberAccess {
    pub struct_value: Box<Expression>,
    pub member_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SquareBracketsAccess {
    pub storage: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub function_name: String,
    pub arguments: Vec<Expression>,
    pub debug: DebugInfo,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    IntLiteral(i64),
    FloatLiteral(f64),
    BoolLiteral(bool),
    CharLiteral(u8),
    StringLiteral(String),
    ArrayLiteral(ArrayLiteral),
    Identifier(String),
    BinaryOperator(BinaryOperator),
    UnaryOperator(UnaryOperator),
    TypeOperator(TypeOperator),
    DotMemberAccess(DotMemberAccess),
    SquareBracketsAccess(SquareBracketsAccess),
    FunctionCall(FunctionCall),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub debug: DebugInfo,
}

impl Expression {
    pub fn new(kind: ExprKind, debug: DebugInfo) -> Self {
        Self { kind, debug }
    }

    pub fn int(value: i64, debug: DebugInfo) -> Self {
        Self::new(ExprKind::IntLiteral(value), debug)
    }

    pub fn float(value: f64, debug: DebugInfo) -> Self {
        Self::new(ExprKind::FloatLiteral(value), debug)
    }

    pub fn bool(value: bool, debug: DebugInfo) -> Self {
        Self::new(ExprKind::BoolLiteral(value), debug)
    }

    pub fn char(value: u8, debug: DebugInfo) -> Self {
        Self::new(ExprKind::CharLiteral(value), debug)
    }

    pub fn string(value: impl Into<String>, debug: DebugInfo) -> Self {
        Self::new(ExprKind::StringLiteral(value.into()), debug)
    }

    pub fn identifier(name: impl Into<String>, debug: DebugInfo) -> Self {
        Self::new(ExprKind::Identifier(name.into()), debug)
    }

    pub fn array(stored_type: TypeSignature, elements: Vec<Expression>, debug: DebugInfo) -> Self {
        Self::new(
            ExprKind::ArrayLiteral(ArrayLiteral {
                length: elements.len(),
                stored_type,
                elements,
            }),
            debug,
        )
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression, debug: DebugInfo) -> Self {
        Self::new(
            ExprKind::BinaryOperator(BinaryOperator {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }),
            debug,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expression, debug: DebugInfo) -> Self {
        Self::new(
            ExprKind::UnaryOperator(UnaryOperator {
                op,
                operand: Box::new(operand),
            }),
            debug,
        )
    }

    pub fn type_operator(
        op: TypeOp,
        expression: Expression,
        ty: TypeSignature,
        debug: DebugInfo,
    ) -> Self {
        Self::new(
            ExprKind::TypeOperator(TypeOperator {
                op,
                expression: Box::new(expression),
                ty,
            }),
            debug,
        )
    }

    pub fn dot(struct_value: Expression, member_name: impl Into<String>, debug: DebugInfo) -> Self {
        Self::new(
            ExprKind::DotMemberAccess(DotMemberAccess {
                struct_value: Box::new(struct_value),
                member_name: member_name.into(),
            }),
            debug,
        )
    }

    pub fn index(storage: Expression, index: Expression, debug: DebugInfo) -> Self {
        Self::new(
            ExprKind::SquareBracketsAccess(SquareBracketsAccess {
                storage: Box::new(storage),
                index: Box::new(index),
            }),
            debug,
        )
    }

    pub fn call(
        function_name: impl Into<String>,
        arguments: Vec<Expression>,
        debug: DebugInfo,
    ) -> Self {
        let call = FunctionCall {
            function_name: function_name.into(),
            arguments,
            debug: debug.clone(),
        };
        Self::new(ExprKind::FunctionCall(call), debug)
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDeclaration {
    pub identifier: String,
    pub ty: TypeSignature,
    pub initial_value: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstDeclaration {
    pub identifier: String,
    pub ty: TypeSignature,
    pub value: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub target: Expression,
    pub value: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Conditional {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    pub else_branch: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileLoop {
    pub condition: Expression,
    pub body: Vec<Statement>,
}

/// Runs `body` first, then repeats it until `condition` becomes true.
#[derive(Clone, Debug, PartialEq)]
pub struct UntilLoop {
    pub condition: Expression,
    pub body: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub value: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    VariableDeclaration(VariableDeclaration),
    ConstDeclaration(ConstDeclaration),
    Assignment(Assignment),
    Conditional(Conditional),
    WhileLoop(WhileLoop),
    UntilLoop(UntilLoop),
    Return(Return),
    Break,
    Continue,
    FunctionCall(FunctionCall),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub kind: StmtKind,
    pub debug: DebugInfo,
}

impl Statement {
    pub fn new(kind: StmtKind, debug: DebugInfo) -> Self {
        Self { kind, debug }
    }

    pub fn var(
        identifier: impl Into<String>,
        ty: TypeSignature,
        initial_value: Option<Expression>,
        debug: DebugInfo,
    ) -> Self {
        Self::new(
            StmtKind::VariableDeclaration(VariableDeclaration {
                identifier: identifier.into(),
                ty,
                initial_value,
            }),
            debug,
        )
    }

    pub fn constant(
        identifier: impl Into<String>,
        ty: TypeSignature,
        value: Expression,
        debug: DebugInfo,
    ) -> Self {
        Self::new(
            StmtKind::ConstDeclaration(ConstDeclaration {
                identifier: identifier.into(),
                ty,
                value,
            }),
            debug,
        )
    }

    pub fn assign(target: Expression, value: Expression, debug: DebugInfo) -> Self {
        Self::new(StmtKind::Assignment(Assignment { target, value }), debug)
    }

    pub fn conditional(
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
        debug: DebugInfo,
    ) -> Self {
        Self::new(
            StmtKind::Conditional(Conditional {
                condition,
                then_branch,
                else_branch,
            }),
            debug,
        )
    }

    pub fn while_loop(condition: Expression, body: Vec<Statement>, debug: DebugInfo) -> Self {
        Self::new(StmtKind::WhileLoop(WhileLoop { condition, body }), debug)
    }

    pub fn until_loop(condition: Expression, body: Vec<Statement>, debug: DebugInfo) -> Self {
        Self::new(StmtKind::UntilLoop(UntilLoop { condition, body }), debug)
    }

    pub fn ret(value: Option<Expression>, debug: DebugInfo) -> Self {
        Self::new(StmtKind::Return(Return { value }), debug)
    }

    pub fn call(
        function_name: impl Into<String>,
        arguments: Vec<Expression>,
        debug: DebugInfo,
    ) -> Self {
        let call = FunctionCall {
            function_name: function_name.into(),
            arguments,
            debug: debug.clone(),
        };
        Self::new(StmtKind::FunctionCall(call), debug)
    }
}

// ---------------------------------------------------------------------------
// Function definitions
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub ty: TypeSignature,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: TypeSignature) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub package: String,
    pub template_generics: Vec<String>,
    pub arguments: Vec<Argument>,
    /// `None` for functions returning nothing.
    pub return_type: Option<TypeSignature>,
    pub code: Vec<Statement>,
    pub debug: DebugInfo,
}

/// Function definitions are shared between the registry, plans and callables.
pub type FunctionRef = Rc<FunctionDefinition>;

impl FunctionDefinition {
    /// `name(file@line:tok)`, stable across call sites.
    pub fn unique_string_id(&self) -> String {
        format!("{}({})", self.name, self.debug.unique_string_id())
    }

    pub fn is_generic(&self) -> bool {
        !self.template_generics.is_empty()
    }

    pub fn arg_types(&self) -> Vec<TypeSignature> {
        self.arguments.iter().map(|a| a.ty.clone()).collect()
    }
}
