use serde::{Deserialize, Serialize};

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A statement list; the root "module" body and every nested body is a Block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub body: Vec<Stat>,
}

/// Statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stat {
    /// `local a, b = x, y` or `local function f() ... end`
    Local(LocalDeclaration),

    /// `a.b, c = x, y`
    Assign(AssignmentStatement),

    /// `function f() ... end` / `function T.f() ... end` / `function T:f() ... end`
    Function(FunctionDeclaration),

    /// `return a, b`
    Return(ReturnStatement),

    /// Bare `do ... end` block
    Do { body: Block, span: Span },

    /// Expression statement (a function or method call)
    Call { expr: Expr, span: Span },

    /// `if ... then ... elseif ... else ... end`
    If {
        arms: Vec<(Expr, Block)>,
        else_body: Option<Block>,
        span: Span,
    },

    /// `while cond do ... end`
    While { condition: Expr, body: Block, span: Span },

    /// `repeat ... until cond`
    Repeat { body: Block, condition: Expr, span: Span },

    /// `for i = a, b [, c] do ... end`
    NumericFor {
        variable: String,
        start: Expr,
        limit: Expr,
        step: Option<Expr>,
        body: Block,
        span: Span,
    },

    /// `for a, b in ... do ... end`
    GenericFor {
        names: Vec<String>,
        exprs: Vec<Expr>,
        body: Block,
        span: Span,
    },

    /// `break`
    Break { span: Span },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDeclaration {
    pub names: Vec<String>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentStatement {
    pub targets: Vec<Expr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// Function statement: plain name or single-level member name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: FunctionName,
    pub params: Vec<Param>,
    pub body: Block,
    pub is_local: bool,
    pub span: Span,
}

// externally tagged: internal tagging cannot represent `Name(String)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionName {
    Name(String),
    Member {
        base: String,
        indexer: Indexer,
        member: String,
    },
}

/// Member access style: `a.b` vs `a:b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indexer {
    Dot,
    Colon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Param {
    Name(String),
    Vararg,
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    Nil { span: Span },

    Boolean { value: bool, span: Span },

    Number { value: f64, span: Span },

    String { value: String, span: Span },

    /// `...`
    Vararg { span: Span },

    Identifier { name: String, span: Span },

    /// `base.member` (colon members only occur in method calls and
    /// function names; see `FunctionName`)
    Member {
        base: Box<Expr>,
        member: String,
        span: Span,
    },

    /// `base[key]`
    Index {
        base: Box<Expr>,
        key: Box<Expr>,
        span: Span,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// `f(a, b)`, `f "s"`, `f {}` and method calls `o:m(a)`
    Call {
        callee: Box<Expr>,
        method: Option<String>,
        args: Vec<Expr>,
        span: Span,
    },

    Table(TableConstructor),

    /// Anonymous `function(...) ... end` expression
    Function {
        params: Vec<Param>,
        body: Block,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Nil { span }
            | Expr::Boolean { span, .. }
            | Expr::Number { span, .. }
            | Expr::String { span, .. }
            | Expr::Vararg { span }
            | Expr::Identifier { span, .. }
            | Expr::Member { span, .. }
            | Expr::Index { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Call { span, .. }
            | Expr::Function { span, .. } => *span,
            Expr::Table(table) => table.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConstructor {
    pub fields: Vec<TableField>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TableField {
    /// `name = value`
    Named { key: String, value: Expr },

    /// `[expr] = value`
    Indexed { key: Expr, value: Expr },

    /// positional `value`
    Item { value: Expr },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Concat,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
    Length,
}
