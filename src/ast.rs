//! Syntax tree handed from the parser to the translator.
//!
//! The parser builds these nodes once and the translator only reads them. The
//! tree is deliberately wider than the set of nodes the translator knows how to
//! rewrite: unsupported kinds still parse so they can be reported by name.

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// Numeric literal kept as its source lexeme (`10`, `0.0`, `-1`, `1e-05`).
    Number(String),
    /// String literal with escapes already decoded.
    String(String),
    Name(String),
    Constant(Constant),
    List(Vec<Expression>),
    Tuple(Vec<Expression>),
    Dict(Vec<(Expression, Expression)>),
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    BoolOp {
        op: BoolOperator,
        values: Vec<Expression>,
    },
    /// `left ops[0] comparators[0] ops[1] comparators[1] ...`
    Compare {
        left: Box<Expression>,
        ops: Vec<CompareOperator>,
        comparators: Vec<Expression>,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    Attribute {
        object: Box<Expression>,
        name: String,
    },
    Subscript {
        object: Box<Expression>,
        index: Box<Expression>,
    },
    Lambda {
        params: Vec<Parameter>,
        body: Box<Expression>,
    },
}

impl Expression {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "Number",
            Self::String(_) => "String",
            Self::Name(_) => "Name",
            Self::Constant(_) => "Constant",
            Self::List(_) => "List",
            Self::Tuple(_) => "Tuple",
            Self::Dict(_) => "Dict",
            Self::BinaryOp { .. } => "BinaryOp",
            Self::Unary { .. } => "UnaryOp",
            Self::BoolOp { .. } => "BoolOp",
            Self::Compare { .. } => "Compare",
            Self::Call { .. } => "Call",
            Self::Attribute { .. } => "Attribute",
            Self::Subscript { .. } => "Subscript",
            Self::Lambda { .. } => "Lambda",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Constant {
    True,
    False,
    None,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Pow,
    Mod,
    MatMult,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinaryOperator {
    /// Source spelling, used in diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mult => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Pow => "**",
            Self::Mod => "%",
            Self::MatMult => "@",
            Self::LShift => "<<",
            Self::RShift => ">>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CompareOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CompareOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtE => "<=",
            Self::Gt => ">",
            Self::GtE => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Is => "is",
            Self::IsNot => "is not",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Neg,
    Pos,
    Not,
    Invert,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BoolOperator {
    And,
    Or,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parameter {
    pub name: String,
}

/// One `name [as alias]` entry of an import statement.
#[derive(Debug, PartialEq, Clone)]
pub struct ImportAlias {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    FunctionDef(FunctionDef),
    /// `a = b = value` keeps every target; only one is translatable.
    Assign {
        targets: Vec<Expression>,
        value: Expression,
    },
    AugAssign {
        target: Expression,
        op: BinaryOperator,
        value: Expression,
    },
    If {
        condition: Expression,
        then_body: Vec<Statement>,
        else_body: Vec<Statement>,
    },
    For {
        target: Expression,
        iterable: Expression,
        body: Vec<Statement>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Assert {
        condition: Expression,
        message: Option<Expression>,
    },
    /// `from a.b import x, y` stores `module = ["a", "b"]`; `import a.b` stores
    /// the dotted path as a single name with an empty module.
    Import {
        module: Vec<String>,
        names: Vec<ImportAlias>,
    },
    Return(Option<Expression>),
    Pass,
    Break,
    Continue,
    Expr(Expression),
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FunctionDef(_) => "FunctionDef",
            Self::Assign { .. } => "Assign",
            Self::AugAssign { .. } => "AugAssign",
            Self::If { .. } => "If",
            Self::For { .. } => "For",
            Self::While { .. } => "While",
            Self::Assert { .. } => "Assert",
            Self::Import { .. } => "Import",
            Self::Return(_) => "Return",
            Self::Pass => "Pass",
            Self::Break => "Break",
            Self::Continue => "Continue",
            Self::Expr(_) => "Expr",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Module {
    pub body: Vec<Statement>,
}
