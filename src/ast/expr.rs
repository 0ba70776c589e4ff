use crate::ast::{Pattern, Stmt};
use crate::source::SourceLoc;

/// An expression node together with the source location it was parsed at.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub loc: SourceLoc,
}

impl Expr {
    pub fn new(kind: ExprKind, loc: SourceLoc) -> Self {
        Expr { kind, loc }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Neq,
    And,
    Or,
    Pipe,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "!=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Pipe => "|>",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Pow
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Neq)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// A `{ statements...; final_expr? }` block.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub final_expr: Option<Box<Expr>>,
}

/// One `pattern (if guard)? -> body` arm of a `match` expression.
#[derive(Debug, Clone)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f64),
    StringLit(String),
    BoolLit(bool),
    Ident(String),

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    ListLit(Vec<Expr>),
    TupleLit(Vec<Expr>),
    MapLit(Vec<(Expr, Expr)>),

    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },

    Block(Block),

    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },

    /// `name <- value` — requires `value : Result(ok, err)`, binds `name : ok`.
    Bind {
        name: String,
        value: Box<Expr>,
    },

    With {
        bindings: Vec<(String, Expr)>,
        body: Box<Expr>,
        else_arms: Vec<MatchArm>,
    },

    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },

    For {
        var: String,
        iterable: Box<Expr>,
        body: Box<Expr>,
    },

    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },

    Dot {
        object: Box<Expr>,
        field: String,
    },

    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        inclusive: bool,
    },

    ListComprehension {
        body: Box<Expr>,
        var: String,
        iterable: Box<Expr>,
        filter: Option<Box<Expr>>,
    },

    InterpolatedString(Vec<Expr>),

    /// Postfix `expr?`.
    Try(Box<Expr>),

    Spawn(Box<Expr>),
    Send {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Receive(Box<Expr>),
}
